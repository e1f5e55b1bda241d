//! Request plumbing shared by the sub-clients.

use crate::error::{Result, ServerClientError};
use crate::types::Envelope;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// Join path segments onto the base URL, percent-encoding each one
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ServerClientError::InvalidUrl(format!("{} cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Attach the bearer token when there is one
pub(crate) fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

pub(crate) async fn send(request: RequestBuilder) -> Result<Response> {
    request.send().await.map_err(ServerClientError::from_send)
}

/// Unwrap a `{ success, data, error }` reply
///
/// `id` names the entity the request was about, for `NotFound`.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response, id: &str) -> Result<T> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ServerClientError::AuthRequired);
    }

    let body = response.text().await?;
    let envelope: Envelope<T> = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            return Err(ServerClientError::ParseError(e.to_string()));
        }
        Err(_) if status == StatusCode::NOT_FOUND => {
            return Err(ServerClientError::rejection("Resource not found".into(), id));
        }
        Err(_) => {
            return Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: body,
            });
        }
    };

    if envelope.success {
        envelope
            .data
            .ok_or_else(|| ServerClientError::ParseError("reply carried no data".into()))
    } else {
        let message = envelope
            .error
            .or(envelope.message)
            .unwrap_or_else(|| format!("request failed ({})", status.as_u16()));
        Err(ServerClientError::rejection(message, id))
    }
}
