//! Like-state synchronizer tests
//!
//! The fake service hands every request a oneshot receiver queued by the
//! test, so replies arrive exactly when the test sends them.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tunebox_core::{LikeService, Track, TrackId, TuneError, UserId};
use tunebox_likes::{LikeError, LikeStateSynchronizer};

type Reply<T> = oneshot::Sender<tunebox_core::Result<T>>;
type Pending<T> = Mutex<VecDeque<oneshot::Receiver<tunebox_core::Result<T>>>>;

#[derive(Default)]
struct GatedLikes {
    toggles: Pending<bool>,
    ids: Pending<Vec<TrackId>>,
    tracks: Pending<Vec<Track>>,
    checks: Pending<bool>,
    toggle_calls: AtomicUsize,
}

impl GatedLikes {
    fn next_toggle(&self) -> Reply<bool> {
        gate(&self.toggles)
    }

    fn next_ids(&self) -> Reply<Vec<TrackId>> {
        gate(&self.ids)
    }

    fn next_tracks(&self) -> Reply<Vec<Track>> {
        gate(&self.tracks)
    }

    fn next_check(&self) -> Reply<bool> {
        gate(&self.checks)
    }

    fn toggle_calls(&self) -> usize {
        self.toggle_calls.load(Ordering::SeqCst)
    }
}

fn gate<T>(queue: &Pending<T>) -> Reply<T> {
    let (tx, rx) = oneshot::channel();
    queue.lock().unwrap().push_back(rx);
    tx
}

async fn answer<T>(queue: &Pending<T>) -> tunebox_core::Result<T> {
    let rx = queue
        .lock()
        .unwrap()
        .pop_front()
        .expect("test did not queue a reply");
    rx.await
        .unwrap_or_else(|_| Err(TuneError::network("reply dropped")))
}

#[async_trait]
impl LikeService for GatedLikes {
    async fn toggle(&self, _user: &UserId, _track: &TrackId) -> tunebox_core::Result<bool> {
        self.toggle_calls.fetch_add(1, Ordering::SeqCst);
        answer(&self.toggles).await
    }

    async fn list_liked(&self, _user: &UserId) -> tunebox_core::Result<Vec<Track>> {
        answer(&self.tracks).await
    }

    async fn list_liked_ids(&self, _user: &UserId) -> tunebox_core::Result<Vec<TrackId>> {
        answer(&self.ids).await
    }

    async fn is_liked(&self, _user: &UserId, _track: &TrackId) -> tunebox_core::Result<bool> {
        answer(&self.checks).await
    }
}

fn setup() -> (Arc<GatedLikes>, LikeStateSynchronizer) {
    let service = Arc::new(GatedLikes::default());
    let sync = LikeStateSynchronizer::new(service.clone(), UserId::new("u1"));
    (service, sync)
}

fn id(s: &str) -> TrackId {
    TrackId::new(s)
}

async fn seed_liked(service: &GatedLikes, sync: &LikeStateSynchronizer, ids: &[&str]) {
    let reply = service.next_ids();
    reply.send(Ok(ids.iter().copied().map(id).collect())).unwrap();
    sync.refresh().await.unwrap();
}

// ===== Toggle =====

#[tokio::test]
async fn optimistic_like_is_visible_before_reply() {
    let (service, sync) = setup();
    let reply = service.next_toggle();
    let x = id("x");

    let (result, ()) = tokio::join!(sync.toggle_like(&x), async {
        assert!(sync.is_liked(&x));
        assert!(sync.is_pending(&x));
        reply.send(Ok(true)).unwrap();
    });

    assert_eq!(result, Ok(true));
    assert!(sync.is_liked(&x));
    assert!(!sync.is_pending(&x));
}

#[tokio::test]
async fn server_disagreement_corrects_view() {
    let (service, sync) = setup();
    let reply = service.next_toggle();
    let x = id("x");

    let (result, ()) = tokio::join!(sync.toggle_like(&x), async {
        assert!(sync.is_liked(&x));
        reply.send(Ok(false)).unwrap();
    });

    assert_eq!(result, Ok(false));
    assert!(!sync.is_liked(&x));
}

#[tokio::test]
async fn unlike_of_liked_track() {
    let (service, sync) = setup();
    seed_liked(&service, &sync, &["x"]).await;

    let reply = service.next_toggle();
    reply.send(Ok(false)).unwrap();

    assert_eq!(sync.toggle_like(&id("x")).await, Ok(false));
    assert!(sync.liked_ids().is_empty());
}

#[tokio::test]
async fn second_toggle_while_pending_is_busy() {
    let (service, sync) = setup();
    let reply = service.next_toggle();
    let x = id("x");

    let (first, ()) = tokio::join!(sync.toggle_like(&x), async {
        assert_eq!(sync.toggle_like(&x).await, Err(LikeError::Busy(x.clone())));
        // The rejected call left the optimistic state alone
        assert!(sync.is_liked(&x));
        reply.send(Ok(true)).unwrap();
    });

    assert_eq!(first, Ok(true));
    assert!(sync.is_liked(&x));
    assert_eq!(service.toggle_calls(), 1);
}

#[tokio::test]
async fn toggles_on_different_tracks_are_independent() {
    let (service, sync) = setup();
    let reply_x = service.next_toggle();
    let reply_y = service.next_toggle();
    let (x, y) = (id("x"), id("y"));

    let (rx, ry, ()) = tokio::join!(sync.toggle_like(&x), sync.toggle_like(&y), async {
        assert!(sync.is_pending(&x));
        assert!(sync.is_pending(&y));
        reply_y.send(Ok(true)).unwrap();
        reply_x.send(Err(TuneError::network("timeout"))).unwrap();
    });

    assert!(matches!(rx, Err(LikeError::Network(_))));
    assert_eq!(ry, Ok(true));
    assert_eq!(sync.liked_ids(), vec![y]);
}

// ===== Rollback =====

#[tokio::test]
async fn network_failure_rolls_back() {
    let (service, sync) = setup();
    seed_liked(&service, &sync, &["x"]).await;
    let before = sync.is_liked(&id("x"));

    let reply = service.next_toggle();
    reply
        .send(Err(TuneError::network("connection refused")))
        .unwrap();
    let result = sync.toggle_like(&id("x")).await;

    assert!(matches!(result, Err(LikeError::Network(_))));
    assert_eq!(sync.is_liked(&id("x")), before);
    assert!(!sync.is_pending(&id("x")));

    // Released: the next toggle goes through
    let reply = service.next_toggle();
    reply.send(Ok(false)).unwrap();
    assert_eq!(sync.toggle_like(&id("x")).await, Ok(false));
}

#[tokio::test]
async fn missing_track_rolls_back_as_not_found() {
    let (service, sync) = setup();
    let reply = service.next_toggle();
    reply
        .send(Err(TuneError::not_found("Song", "x")))
        .unwrap();

    let result = sync.toggle_like(&id("x")).await;

    assert!(matches!(result, Err(LikeError::NotFound(_))));
    assert!(!sync.is_liked(&id("x")));
}

#[tokio::test]
async fn abandoned_toggle_rolls_back() {
    let (service, sync) = setup();
    let _reply = service.next_toggle();
    let x = id("x");

    {
        let toggle = sync.toggle_like(&x);
        tokio::pin!(toggle);
        tokio::select! {
            biased;
            _ = &mut toggle => panic!("toggle finished without a reply"),
            () = std::future::ready(()) => {}
        }
        assert!(sync.is_pending(&x));
        assert!(sync.is_liked(&x));
    }

    assert!(!sync.is_pending(&x));
    assert!(!sync.is_liked(&x));
}

// ===== Refresh =====

#[tokio::test]
async fn refresh_loads_liked_set() {
    let (service, sync) = setup();
    seed_liked(&service, &sync, &["b", "a"]).await;

    assert_eq!(sync.liked_ids(), vec![id("a"), id("b")]);
    assert!(sync.is_liked(&id("a")));
    assert!(!sync.is_liked(&id("c")));
}

#[tokio::test]
async fn refresh_does_not_clobber_pending_toggle() {
    let (service, sync) = setup();
    let toggle_reply = service.next_toggle();
    let ids_reply = service.next_ids();
    let x = id("x");

    let (toggled, refreshed, ()) = tokio::join!(sync.toggle_like(&x), sync.refresh(), async {
        // Snapshot taken before the toggle reached the server
        ids_reply.send(Ok(vec![id("y")])).unwrap();
        tokio::task::yield_now().await;
        assert!(sync.is_liked(&x));
        assert!(sync.is_pending(&x));
        toggle_reply.send(Ok(true)).unwrap();
    });

    assert_eq!(toggled, Ok(true));
    assert!(refreshed.is_ok());
    assert_eq!(sync.liked_ids(), vec![id("x"), id("y")]);
}

#[tokio::test]
async fn refresh_does_not_clobber_toggle_settled_during_it() {
    let (service, sync) = setup();
    let ids_reply = service.next_ids();
    let x = id("x");

    let (refreshed, ()) = tokio::join!(sync.refresh(), async {
        let reply = service.next_toggle();
        reply.send(Ok(true)).unwrap();
        assert_eq!(sync.toggle_like(&x).await, Ok(true));
        // The refresh request went out before the like existed
        ids_reply.send(Ok(Vec::new())).unwrap();
    });

    assert_eq!(refreshed, Ok(vec![x.clone()]));
    assert!(sync.is_liked(&x));
}

#[tokio::test]
async fn refresh_replaces_stale_settled_entries() {
    let (service, sync) = setup();
    seed_liked(&service, &sync, &["a", "b"]).await;
    seed_liked(&service, &sync, &["b", "c"]).await;

    assert_eq!(sync.liked_ids(), vec![id("b"), id("c")]);
}

#[tokio::test]
async fn failed_refresh_keeps_state() {
    let (service, sync) = setup();
    seed_liked(&service, &sync, &["a"]).await;

    let reply = service.next_ids();
    reply.send(Err(TuneError::network("offline"))).unwrap();

    assert!(matches!(sync.refresh().await, Err(LikeError::Network(_))));
    assert_eq!(sync.liked_ids(), vec![id("a")]);
}

// ===== Extras =====

#[tokio::test]
async fn liked_tracks_in_server_order() {
    let (service, sync) = setup();
    let reply = service.next_tracks();
    reply
        .send(Ok(vec![
            Track::new("Second", "Artist", 100, "/uploads/2.mp3").with_id("t2"),
            Track::new("First", "Artist", 100, "/uploads/1.mp3").with_id("t1"),
        ]))
        .unwrap();

    let tracks = sync.liked_tracks().await.unwrap();

    let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t2", "t1"]);
    assert!(sync.is_liked(&id("t1")));
}

#[tokio::test]
async fn reconcile_single_track() {
    let (service, sync) = setup();
    let reply = service.next_check();
    reply.send(Ok(true)).unwrap();

    assert_eq!(sync.reconcile_track(&id("x")).await, Ok(true));
    assert!(sync.is_liked(&id("x")));
}

#[tokio::test]
async fn clear_forgets_everything() {
    let (service, sync) = setup();
    seed_liked(&service, &sync, &["a"]).await;
    let reply = service.next_toggle();
    let x = id("x");

    let (result, ()) = tokio::join!(sync.toggle_like(&x), async {
        sync.clear();
        reply.send(Ok(true)).unwrap();
    });

    // The caller still learns the answer, the cleared state stays empty
    assert_eq!(result, Ok(true));
    assert!(sync.liked_ids().is_empty());
    assert!(!sync.is_pending(&x));
}
