//! Queue traversal decisions
//!
//! Pure functions over a queue length, a current index and the traversal
//! mode. They never fail: an empty queue yields `Stop` (or `None`), and a
//! current index past the end is read as the last position.
//!
//! Randomness is passed in, so a seeded RNG makes shuffle picks reproducible.
//!
//! ```text
//!            not last        last
//! ─────────────────────────────────────────────
//! next       current + 1     all → 0
//!                            one → current
//!                            none → Stop
//! natural    one → Restart   one → Restart
//! end        else → next     all → Advance(0)
//!                            none → Stop
//! ```

use crate::types::{RepeatMode, ShuffleMode};
use rand::Rng;

/// Outcome of a user-initiated skip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Move to this index
    Index(usize),

    /// Nothing further to play
    Stop,
}

/// Outcome of a track reaching its natural end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndAction {
    /// Replay the same track from the top without changing the index
    Restart,

    /// Continue with the track at this index
    Advance(usize),

    /// Park the session on the current track
    Stop,
}

/// Index to move to when the user skips forward
///
/// With shuffle on this is a uniform pick over the whole queue, which may be
/// the current index again.
pub fn next_index<R: Rng + ?Sized>(
    len: usize,
    current: usize,
    repeat: RepeatMode,
    shuffle: ShuffleMode,
    rng: &mut R,
) -> Step {
    if len == 0 {
        return Step::Stop;
    }

    if shuffle.is_on() {
        return Step::Index(rng.gen_range(0..len));
    }

    let last = len - 1;
    if current >= last {
        match repeat {
            RepeatMode::All => Step::Index(0),
            RepeatMode::One => Step::Index(last),
            RepeatMode::Off => Step::Stop,
        }
    } else {
        Step::Index(current + 1)
    }
}

/// Index to move to when the user skips back
///
/// Wraps from the first track to the last. Returns `None` for an empty queue.
pub fn previous_index<R: Rng + ?Sized>(
    len: usize,
    current: usize,
    shuffle: ShuffleMode,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    if shuffle.is_on() {
        return Some(rng.gen_range(0..len));
    }

    let current = current.min(len - 1);
    if current == 0 {
        Some(len - 1)
    } else {
        Some(current - 1)
    }
}

/// Resolve a natural end of track
///
/// Unlike [`next_index`], repeat-one never moves: the same track restarts.
pub fn on_natural_end<R: Rng + ?Sized>(
    len: usize,
    current: usize,
    repeat: RepeatMode,
    shuffle: ShuffleMode,
    rng: &mut R,
) -> EndAction {
    if len == 0 {
        return EndAction::Stop;
    }

    if repeat == RepeatMode::One {
        return EndAction::Restart;
    }

    if current >= len - 1 {
        return match repeat {
            RepeatMode::All => EndAction::Advance(0),
            _ => EndAction::Stop,
        };
    }

    match next_index(len, current, repeat, shuffle, rng) {
        Step::Index(index) => EndAction::Advance(index),
        Step::Stop => EndAction::Stop,
    }
}
