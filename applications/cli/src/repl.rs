//! Interactive transport loop
//!
//! The terminal stands in for the media element: `ready`, `end`, `time` and
//! `fail` raise media events carrying the live load token, everything else
//! is a transport call.

use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;
use tunebox_likes::LikeStateSynchronizer;
use tunebox_playback::{
    MediaEvent, PlaybackError, PlaybackEvent, PlaybackSessionController, SessionState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based position in the listing
    Select(usize),
    Ready,
    End,
    Fail(String),
    Time(Duration),
    Pause,
    Resume,
    Next,
    Prev,
    Seek(Duration),
    Repeat,
    Shuffle,
    /// Volume level, 0-100
    Volume(u8),
    Mute,
    Like,
    Status,
    List,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("`{0}` is not a valid {1}")]
    InvalidArgument(String, &'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Self::Status);
        };
        let rest = words.collect::<Vec<_>>().join(" ");

        let command = match name.to_ascii_lowercase().as_str() {
            "select" | "s" => Self::Select(position(&rest)?),
            "ready" => Self::Ready,
            "end" => Self::End,
            "fail" => Self::Fail(if rest.is_empty() {
                "media error".to_string()
            } else {
                rest
            }),
            "time" => Self::Time(seconds("time", &rest)?),
            "pause" => Self::Pause,
            "resume" | "play" => Self::Resume,
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "seek" => Self::Seek(seconds("seek", &rest)?),
            "repeat" => Self::Repeat,
            "shuffle" => Self::Shuffle,
            "volume" | "vol" => Self::Volume(level(&rest)?),
            "mute" => Self::Mute,
            "like" => Self::Like,
            "status" => Self::Status,
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn position(arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument("select", "a track number"));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidArgument(arg.to_string(), "track number")),
    }
}

fn level(arg: &str) -> Result<u8, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument("volume", "a level from 0 to 100"));
    }
    match arg.parse::<u8>() {
        Ok(level) if level <= 100 => Ok(level),
        _ => Err(CommandError::InvalidArgument(arg.to_string(), "volume level")),
    }
}

fn seconds(command: &'static str, arg: &str) -> Result<Duration, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command, "a position in seconds"));
    }
    arg.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| CommandError::InvalidArgument(arg.to_string(), "position"))
}

const HELP: &str = "\
commands:
  select <n>    load track n from the list
  ready         media element: track is playable
  end           media element: track finished
  fail [why]    media element: track failed to load
  time <secs>   media element: playback position
  pause | resume | next | prev | seek <secs>
  repeat        cycle repeat none -> all -> one
  shuffle       toggle shuffle
  volume <n>    set volume 0-100
  mute          toggle mute
  like          toggle like on the current track
  status | list | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One listening session driven from text commands
pub struct Session<W: Write> {
    controller: PlaybackSessionController,
    likes: Option<Arc<LikeStateSynchronizer>>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(
        controller: PlaybackSessionController,
        likes: Option<Arc<LikeStateSynchronizer>>,
        out: W,
    ) -> Self {
        Self {
            controller,
            likes,
            out,
        }
    }

    /// Read commands until `quit` or end of input
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> anyhow::Result<()> {
        writeln!(self.out, "{}", HELP)?;
        self.print_queue()?;

        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            match line.parse::<Command>() {
                Ok(command) => {
                    if self.execute(command).await? == Flow::Quit {
                        break;
                    }
                }
                Err(e) => writeln!(self.out, "{}", e)?,
            }
        }

        self.controller.flush_play_counts().await;
        self.print_events()?;
        Ok(())
    }

    /// Apply one command and print what changed
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        debug!(command = ?command, "Executing");
        let token = self.controller.load_token();

        let result = match command {
            Command::Select(n) => match n.checked_sub(1) {
                Some(index) => self.controller.select_index(index).map(drop),
                None => Err(PlaybackError::IndexOutOfBounds(n)),
            },
            Command::Ready => {
                self.controller.handle_media_event(MediaEvent::Ready { token });
                Ok(())
            }
            Command::End => {
                self.controller.handle_media_event(MediaEvent::Ended { token });
                Ok(())
            }
            Command::Fail(reason) => {
                self.controller
                    .handle_media_event(MediaEvent::Failed { token, reason });
                Ok(())
            }
            Command::Time(position) => {
                self.controller
                    .handle_media_event(MediaEvent::TimeUpdate { token, position });
                Ok(())
            }
            Command::Pause => {
                self.controller.pause();
                Ok(())
            }
            Command::Resume => self.controller.play(),
            Command::Next => match self.controller.next() {
                Ok(None) => {
                    writeln!(self.out, "end of queue")?;
                    Ok(())
                }
                step => step.map(drop),
            },
            Command::Prev => self.controller.previous().map(drop),
            Command::Seek(position) => self.controller.seek(position).map(drop),
            Command::Repeat => {
                self.controller.cycle_repeat();
                Ok(())
            }
            Command::Shuffle => {
                self.controller.toggle_shuffle();
                Ok(())
            }
            Command::Volume(level) => {
                self.controller.set_volume(level);
                Ok(())
            }
            Command::Mute => {
                self.controller.toggle_mute();
                Ok(())
            }
            Command::Like => {
                self.toggle_like().await?;
                Ok(())
            }
            Command::Status => {
                self.print_status()?;
                Ok(())
            }
            Command::List => {
                self.print_queue()?;
                Ok(())
            }
            Command::Help => {
                writeln!(self.out, "{}", HELP)?;
                Ok(())
            }
            Command::Quit => return Ok(Flow::Quit),
        };

        if let Err(e) = result {
            writeln!(self.out, "error: {}", e)?;
        }

        self.controller.poll_play_counts();
        self.print_events()?;
        Ok(Flow::Continue)
    }

    pub fn controller(&self) -> &PlaybackSessionController {
        &self.controller
    }

    async fn toggle_like(&mut self) -> anyhow::Result<()> {
        let Some(likes) = &self.likes else {
            writeln!(self.out, "log in to like tracks")?;
            return Ok(());
        };
        let Some(track) = self.controller.current_track() else {
            writeln!(self.out, "nothing selected")?;
            return Ok(());
        };

        let id = track.id.clone();
        let title = track.title.clone();
        match likes.toggle_like(&id).await {
            Ok(true) => writeln!(self.out, "liked {}", title)?,
            Ok(false) => writeln!(self.out, "unliked {}", title)?,
            Err(e) => writeln!(self.out, "like failed: {}", e)?,
        }
        Ok(())
    }

    fn print_events(&mut self) -> anyhow::Result<()> {
        for event in self.controller.drain_events() {
            if let Some(line) = describe(&event) {
                writeln!(self.out, "{}", line)?;
            }
        }
        Ok(())
    }

    fn print_queue(&mut self) -> anyhow::Result<()> {
        let current = self.controller.current_index();
        let mut listing = String::new();
        for (i, track) in self.controller.queue().iter().enumerate() {
            let marker = if Some(i) == current { '>' } else { ' ' };
            let liked = self
                .likes
                .as_ref()
                .is_some_and(|likes| likes.is_liked(&track.id));
            writeln!(
                listing,
                "{} {:>3}. {} - {} [{}]{}{}",
                marker,
                i + 1,
                track.artist,
                track.title,
                format_time(track.duration()),
                if liked { " ♥" } else { "" },
                if track.play_count > 0 {
                    format!(" ({} plays)", track.play_count)
                } else {
                    String::new()
                },
            )?;
        }
        write!(self.out, "{}", listing)?;
        Ok(())
    }

    fn print_status(&mut self) -> anyhow::Result<()> {
        let controller = &self.controller;
        let track = controller
            .current_track()
            .map_or_else(|| "-".to_string(), |t| format!("{} - {}", t.artist, t.title));
        let duration = controller
            .current_track()
            .map_or(Duration::ZERO, tunebox_core::Track::duration);

        writeln!(
            self.out,
            "{:?} | {} | {} / {} | repeat {:?} | shuffle {:?} | volume {}%",
            controller.state(),
            track,
            format_time(controller.elapsed()),
            format_time(duration),
            controller.repeat(),
            controller.shuffle(),
            controller.volume(),
        )?;
        if let Some(error) = controller.last_error() {
            writeln!(self.out, "last error: {}", error)?;
        }
        Ok(())
    }
}

/// One status line per event worth showing
fn describe(event: &PlaybackEvent) -> Option<String> {
    match event {
        PlaybackEvent::LoadRequested { token, track } => Some(format!(
            "loading {} - {} ({}) {}",
            track.artist, track.title, track.file_path, token
        )),
        PlaybackEvent::StateChanged { state } => match state {
            SessionState::Playing => Some("playing".to_string()),
            SessionState::Paused => Some("paused".to_string()),
            SessionState::Ended => Some("stopped".to_string()),
            SessionState::Idle | SessionState::Loading => None,
        },
        PlaybackEvent::Seeked { position } => Some(format!("seeked to {}", format_time(*position))),
        PlaybackEvent::PlayCountUpdated {
            track_id,
            play_count,
        } => Some(format!("{} now has {} plays", track_id, play_count)),
        PlaybackEvent::ModeChanged { repeat, shuffle } => {
            Some(format!("repeat {:?}, shuffle {:?}", repeat, shuffle))
        }
        PlaybackEvent::Error { message } => Some(format!("error: {}", message)),
        PlaybackEvent::VolumeChanged { is_muted: true, .. } => Some("muted".to_string()),
        PlaybackEvent::VolumeChanged { level, .. } => Some(format!("volume {}%", level)),
        PlaybackEvent::TrackChanged { .. } | PlaybackEvent::QueueChanged { .. } => None,
    }
}

/// `m:ss`
pub fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
