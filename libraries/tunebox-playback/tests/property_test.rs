//! Property-based tests for queue traversal
//!
//! Uses proptest to verify traversal invariants across many queue sizes,
//! positions and seeds.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tunebox_playback::queue::{next_index, on_natural_end, previous_index};
use tunebox_playback::{EndAction, RepeatMode, ShuffleMode, Step};

fn any_repeat() -> impl Strategy<Value = RepeatMode> {
    prop_oneof![
        Just(RepeatMode::Off),
        Just(RepeatMode::One),
        Just(RepeatMode::All),
    ]
}

fn any_shuffle() -> impl Strategy<Value = ShuffleMode> {
    prop_oneof![Just(ShuffleMode::Off), Just(ShuffleMode::On)]
}

proptest! {
    /// Property: with repeat-all, len natural ends from the top come back to 0
    #[test]
    fn repeat_all_natural_end_cycles(len in 1usize..200) {
        let mut rng = StdRng::seed_from_u64(0);
        let mut current = 0;

        for step in 1..=len {
            match on_natural_end(len, current, RepeatMode::All, ShuffleMode::Off, &mut rng) {
                EndAction::Advance(index) => current = index,
                other => prop_assert!(false, "unexpected {:?} at step {}", other, step),
            }
            if step < len {
                prop_assert_ne!(current, 0);
            }
        }

        prop_assert_eq!(current, 0);
    }

    /// Property: with repeat-all, len skips from the top come back to 0
    #[test]
    fn repeat_all_next_cycles(len in 1usize..200) {
        let mut rng = StdRng::seed_from_u64(0);
        let mut current = 0;

        for _ in 0..len {
            match next_index(len, current, RepeatMode::All, ShuffleMode::Off, &mut rng) {
                Step::Index(index) => current = index,
                Step::Stop => prop_assert!(false, "repeat-all never stops"),
            }
        }

        prop_assert_eq!(current, 0);
    }

    /// Property: without repeat, the last track always stops
    #[test]
    fn repeat_none_stops_at_last(len in 1usize..200, shuffle in any_shuffle(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        prop_assert_eq!(
            on_natural_end(len, len - 1, RepeatMode::Off, shuffle, &mut rng),
            EndAction::Stop
        );
    }

    /// Property: repeat-one restarts from every position
    #[test]
    fn repeat_one_always_restarts(len in 1usize..200, pos in 0usize..200, shuffle in any_shuffle()) {
        let mut rng = StdRng::seed_from_u64(3);
        let current = pos % len;
        prop_assert_eq!(
            on_natural_end(len, current, RepeatMode::One, shuffle, &mut rng),
            EndAction::Restart
        );
    }

    /// Property: every index produced is inside the queue
    #[test]
    fn indices_stay_in_bounds(
        len in 1usize..100,
        current in 0usize..150,
        repeat in any_repeat(),
        shuffle in any_shuffle(),
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);

        if let Step::Index(index) = next_index(len, current, repeat, shuffle, &mut rng) {
            prop_assert!(index < len);
        }
        if let Some(index) = previous_index(len, current, shuffle, &mut rng) {
            prop_assert!(index < len);
        }
        if let EndAction::Advance(index) = on_natural_end(len, current, repeat, shuffle, &mut rng) {
            prop_assert!(index < len);
        }
    }

    /// Property: previous undoes next away from the edges
    #[test]
    fn previous_inverts_next(len in 2usize..100, pos in 0usize..100) {
        let mut rng = StdRng::seed_from_u64(0);
        let current = pos % (len - 1);

        let Step::Index(next) = next_index(len, current, RepeatMode::Off, ShuffleMode::Off, &mut rng) else {
            return Err(TestCaseError::fail("mid-queue skip stopped"));
        };
        prop_assert_eq!(previous_index(len, next, ShuffleMode::Off, &mut rng), Some(current));
    }

    /// Property: the same seed yields the same shuffle walk
    #[test]
    fn shuffle_is_reproducible_with_seed(len in 1usize..50, seed in any::<u64>()) {
        let walk = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|i| next_index(len, i % len, RepeatMode::Off, ShuffleMode::On, &mut rng))
                .collect::<Vec<_>>()
        };

        prop_assert_eq!(walk(seed), walk(seed));
    }
}
