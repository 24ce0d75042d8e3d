//! Sequence counter state machines of the time-based generators
//!
//! Each time-based version keeps its own state: UUIDv1 and UUIDv6 generators each own a
//! [`GregorianSequence`] and UUIDv7 generators own a [`MillisSequence`]. The states are plain
//! values mutated through `&mut self`; sharing one across threads takes a lock around the whole
//! read-modify-write, as the process-wide generators do.

use tracing::{debug, trace};

use crate::source::EntropySource;
use crate::Error;

/// The largest value of the 14-bit clock sequence of UUIDv1 and UUIDv6.
pub const MAX_CLOCK_SEQ: u16 = (1 << 14) - 1;

/// Clock sequence state of a UUIDv1 or UUIDv6 generator, counted in 100-nanosecond intervals.
///
/// Within the same interval the sequence is incremented, wrapping from [`MAX_CLOCK_SEQ`] to zero.
/// Whenever the interval changes (forwards or backwards) the sequence is reseeded with a fresh
/// random 14-bit value rather than reset to zero, so that processes sharing a clock tick do not
/// start from the same value.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct GregorianSequence {
    last_timestamp: Option<u64>,
    last_sequence: u16,
}

impl GregorianSequence {
    /// Creates the initial state, which has observed no timestamp yet.
    pub const fn new() -> Self {
        Self {
            last_timestamp: None,
            last_sequence: 0,
        }
    }

    /// Creates a state as if `sequence` had just been issued at `timestamp`.
    ///
    /// `sequence` is masked to 14 bits.
    pub const fn with_state(timestamp: u64, sequence: u16) -> Self {
        Self {
            last_timestamp: Some(timestamp),
            last_sequence: sequence & MAX_CLOCK_SEQ,
        }
    }

    /// Returns the last timestamp observed.
    pub const fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    /// Returns the last sequence issued.
    pub const fn last_sequence(&self) -> u16 {
        self.last_sequence
    }

    /// Advances the state to `timestamp` and returns the clock sequence to embed.
    ///
    /// Fails only when reseeding is required and `rng` is unavailable, in which case the state is
    /// left untouched.
    pub fn next<E: EntropySource + ?Sized>(
        &mut self,
        timestamp: u64,
        rng: &mut E,
    ) -> Result<u16, Error> {
        match self.last_timestamp {
            Some(last) if last == timestamp => {
                self.last_sequence = (self.last_sequence + 1) & MAX_CLOCK_SEQ;
                if self.last_sequence == 0 {
                    trace!(timestamp, "clock sequence rolled over");
                }
                return Ok(self.last_sequence);
            }
            Some(last) if last > timestamp => {
                debug!(
                    timestamp,
                    last_timestamp = last,
                    "clock moved backwards; reseeding clock sequence"
                );
            }
            _ => {}
        }

        let sequence = rng.next_u16()? & MAX_CLOCK_SEQ;
        self.last_timestamp = Some(timestamp);
        self.last_sequence = sequence;
        Ok(sequence)
    }
}

/// Sequence counter state of a UUIDv7 generator, counted in whole milliseconds.
///
/// Within the same millisecond the 16-bit counter is incremented, wrapping from `u16::MAX` to
/// zero; the counter restarts from zero whenever the millisecond changes.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct MillisSequence {
    last_unix_ts_ms: Option<u64>,
    last_sequence: u16,
}

impl MillisSequence {
    /// Creates the initial state, which has observed no millisecond yet.
    pub const fn new() -> Self {
        Self {
            last_unix_ts_ms: None,
            last_sequence: 0,
        }
    }

    /// Creates a state as if `sequence` had just been issued at `unix_ts_ms`.
    pub const fn with_state(unix_ts_ms: u64, sequence: u16) -> Self {
        Self {
            last_unix_ts_ms: Some(unix_ts_ms),
            last_sequence: sequence,
        }
    }

    /// Returns the last millisecond observed.
    pub const fn last_unix_ts_ms(&self) -> Option<u64> {
        self.last_unix_ts_ms
    }

    /// Returns the last sequence issued.
    pub const fn last_sequence(&self) -> u16 {
        self.last_sequence
    }

    /// Advances the state to `unix_ts_ms` and returns the counter value to embed.
    pub fn next(&mut self, unix_ts_ms: u64) -> u16 {
        match self.last_unix_ts_ms {
            Some(last) if last == unix_ts_ms => {
                self.last_sequence = self.last_sequence.wrapping_add(1);
                if self.last_sequence == 0 {
                    trace!(unix_ts_ms, "millisecond counter rolled over");
                }
            }
            last => {
                if let Some(last) = last.filter(|&last| last > unix_ts_ms) {
                    debug!(
                        unix_ts_ms,
                        last_unix_ts_ms = last,
                        "clock moved backwards; restarting millisecond counter"
                    );
                }
                self.last_unix_ts_ms = Some(unix_ts_ms);
                self.last_sequence = 0;
            }
        }
        self.last_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::{GregorianSequence, MillisSequence, MAX_CLOCK_SEQ};
    use crate::source::{FixedByteSequence, SeededRandom};
    use crate::Error;

    /// Increments clock sequence within same timestamp
    #[test]
    fn increments_clock_sequence_within_same_timestamp() {
        let mut rng = FixedByteSequence::new([0x33, 0xc8]);
        let mut s = GregorianSequence::new();
        assert_eq!(s.next(1_000, &mut rng).unwrap(), 0x33c8);
        for i in 1..100 {
            assert_eq!(s.next(1_000, &mut rng).unwrap(), 0x33c8 + i);
        }
        assert_eq!(s.last_timestamp(), Some(1_000));
        assert_eq!(s.last_sequence(), 0x33c8 + 99);
    }

    /// Reseeds clock sequence randomly when timestamp changes
    #[test]
    fn reseeds_clock_sequence_randomly_when_timestamp_changes() {
        let mut rng = FixedByteSequence::new([0xff, 0xff, 0x00, 0x07, 0x12, 0x34]);
        let mut s = GregorianSequence::new();
        assert_eq!(s.next(1_000, &mut rng).unwrap(), MAX_CLOCK_SEQ);
        assert_eq!(s.next(2_000, &mut rng).unwrap(), 0x0007);
        assert_eq!(s.next(2_000, &mut rng).unwrap(), 0x0008);

        // clock regression reseeds as well
        assert_eq!(s.next(1_500, &mut rng).unwrap(), 0x1234);
        assert_eq!(s.last_timestamp(), Some(1_500));
    }

    /// Treats first timestamp as new even at zero
    #[test]
    fn treats_first_timestamp_as_new_even_at_zero() {
        let mut rng = FixedByteSequence::new([0x12, 0x34]);
        let mut s = GregorianSequence::new();
        assert_eq!(s.last_timestamp(), None);
        assert_eq!(s.next(0, &mut rng).unwrap(), 0x1234);
        assert_eq!(s.next(0, &mut rng).unwrap(), 0x1235);

        let mut s = MillisSequence::new();
        assert_eq!(s.last_unix_ts_ms(), None);
        assert_eq!(s.next(0), 0);
        assert_eq!(s.next(0), 1);
    }

    /// Wraps clock sequence to zero without error
    #[test]
    fn wraps_clock_sequence_to_zero_without_error() {
        let mut rng = FixedByteSequence::default();
        let mut s = GregorianSequence::with_state(1_000, MAX_CLOCK_SEQ);
        assert_eq!(s.next(1_000, &mut rng).unwrap(), 0);
        assert_eq!(s.next(1_000, &mut rng).unwrap(), 1);

        assert_eq!(GregorianSequence::with_state(0, u16::MAX).last_sequence(), MAX_CLOCK_SEQ);
    }

    /// Leaves state untouched when entropy is unavailable
    #[test]
    fn leaves_state_untouched_when_entropy_is_unavailable() {
        let mut rng = FixedByteSequence::new([0x01]);
        let mut s = GregorianSequence::with_state(1_000, 5);
        assert!(matches!(
            s.next(2_000, &mut rng),
            Err(Error::EntropyUnavailable(_))
        ));
        assert_eq!(s, GregorianSequence::with_state(1_000, 5));

        // no entropy is needed within the same timestamp
        assert_eq!(s.next(1_000, &mut rng).unwrap(), 6);
    }

    /// Never issues the same pair twice in a row
    #[test]
    fn never_issues_the_same_pair_twice_in_a_row() {
        let mut rng = SeededRandom::new(0);
        let mut s = GregorianSequence::new();
        let mut prev = None;
        for i in 0..100_000u64 {
            let ts = i / 64;
            let seq = s.next(ts, &mut rng).unwrap();
            assert_ne!(Some((ts, seq)), prev);
            prev = Some((ts, seq));
        }
    }

    /// Counts milliseconds from zero and wraps to zero without error
    #[test]
    fn counts_milliseconds_from_zero_and_wraps_to_zero_without_error() {
        let mut s = MillisSequence::new();
        assert_eq!(s.next(1_000), 0);
        assert_eq!(s.next(1_000), 1);
        assert_eq!(s.next(1_000), 2);
        assert_eq!(s.next(1_001), 0);
        assert_eq!(s.next(999), 0);
        assert_eq!(s.last_unix_ts_ms(), Some(999));

        let mut s = MillisSequence::with_state(1_000, u16::MAX);
        assert_eq!(s.next(1_000), 0);
        assert_eq!(s.next(1_000), 1);
        assert_eq!(s.last_sequence(), 1);
    }
}
