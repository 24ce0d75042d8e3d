//! Per-version UUID generators and related types.

use std::iter::FusedIterator;

use crate::sequence::{GregorianSequence, MillisSequence};
use crate::source::clock::{gregorian_intervals, unix_millis};
use crate::source::{ClockSource, EntropySource, NodeSource, RandomNode, SecureRandom, SystemClock};
use crate::{Error, Uuid};

const MAX_GREGORIAN: u64 = (1 << 60) - 1;
const MAX_UNIX_TS_MS: u64 = (1 << 48) - 1;
const MAX_RAND_58: u64 = (1 << 58) - 1;

/// Clock, entropy, node, and sequence state shared by the UUIDv1 and UUIDv6 generators.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
struct GregorianCore<C, E, N> {
    clock: C,
    rng: E,
    node: N,
    sequence: GregorianSequence,
}

impl<C, E, N> GregorianCore<C, E, N> {
    const fn new(clock: C, rng: E, node: N) -> Self {
        Self {
            clock,
            rng,
            node,
            sequence: GregorianSequence::new(),
        }
    }
}

impl<C: ClockSource, E: EntropySource, N: NodeSource> GregorianCore<C, E, N> {
    /// Reads the clock as a 60-bit tick count, wrapping like the timestamp field itself.
    fn now(&mut self) -> u64 {
        gregorian_intervals(self.clock.unix_time()) & MAX_GREGORIAN
    }

    /// Resolves the node and advances the clock sequence for `timestamp`.
    fn fields(&mut self, timestamp: u64) -> Result<(u16, [u8; 6]), Error> {
        assert!(
            timestamp <= MAX_GREGORIAN,
            "`timestamp` must be a 60-bit integer"
        );
        let node = self.node.node_id()?;
        let clock_seq = self.sequence.next(timestamp, &mut self.rng)?;
        Ok((clock_seq, node))
    }
}

/// Represents a UUIDv1 generator that owns a clock sequence and a node identifier.
///
/// # Examples
///
/// ```rust
/// use uuid9562::V1Generator;
///
/// let mut g: V1Generator = Default::default();
/// let x = g.generate()?;
/// assert_eq!(x.version(), 1);
/// # Ok::<(), uuid9562::Error>(())
/// ```
///
/// # Generators
///
/// Each time-based version has its own generator type and its own sequence state:
///
/// | Generator       | Timestamp                     | Same tick          | New tick           |
/// | --------------- | ----------------------------- | ------------------ | ------------------ |
/// | [`V1Generator`] | 100 ns since 1582, low first  | 14-bit seq + 1     | Random 14-bit seq  |
/// | [`V6Generator`] | 100 ns since 1582, high first | 14-bit seq + 1     | Random 14-bit seq  |
/// | [`V7Generator`] | ms since 1970                 | 16-bit counter + 1 | Counter reset to 0 |
///
/// Sequences wrap silently at their field width. A tick that moves backwards counts as a new
/// tick. `generate` reads the clock source while `generate_core` takes the tick from the caller,
/// which is handy for replaying or testing a fixed timeline.
///
/// A generator is not synchronized; wrap it in a `Mutex` to share it across threads.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V1Generator<C = SystemClock, E = SecureRandom, N = RandomNode<SecureRandom>> {
    core: GregorianCore<C, E, N>,
}

impl<C, E, N> V1Generator<C, E, N> {
    /// Creates a generator instance.
    pub const fn new(clock: C, rng: E, node: N) -> Self {
        Self {
            core: GregorianCore::new(clock, rng, node),
        }
    }

    /// Returns a mutable reference to the clock source.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.core.clock
    }

    /// Returns the current clock sequence state.
    pub fn sequence(&self) -> &GregorianSequence {
        &self.core.sequence
    }
}

impl<C: ClockSource, E: EntropySource, N: NodeSource> V1Generator<C, E, N> {
    /// Generates a new UUIDv1 object from the current clock reading.
    pub fn generate(&mut self) -> Result<Uuid, Error> {
        let timestamp = self.core.now();
        self.generate_core(timestamp)
    }

    /// Generates a new UUIDv1 object from the `timestamp` passed, counted in 100-nanosecond
    /// intervals since 1582-10-15.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is not a 60-bit integer.
    pub fn generate_core(&mut self, timestamp: u64) -> Result<Uuid, Error> {
        let (clock_seq, node) = self.core.fields(timestamp)?;
        Ok(Uuid::from_fields_v1(timestamp, clock_seq, node))
    }
}

/// Represents a UUIDv6 generator, the time-ordered counterpart of [`V1Generator`].
///
/// See the [`V1Generator`] type documentation for the description.
///
/// # Examples
///
/// ```rust
/// use uuid9562::V6Generator;
///
/// let mut g: V6Generator = Default::default();
/// let x = g.generate()?;
/// let y = g.generate()?;
/// assert!(x < y);
/// # Ok::<(), uuid9562::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V6Generator<C = SystemClock, E = SecureRandom, N = RandomNode<SecureRandom>> {
    core: GregorianCore<C, E, N>,
}

impl<C, E, N> V6Generator<C, E, N> {
    /// Creates a generator instance.
    pub const fn new(clock: C, rng: E, node: N) -> Self {
        Self {
            core: GregorianCore::new(clock, rng, node),
        }
    }

    /// Returns a mutable reference to the clock source.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.core.clock
    }

    /// Returns the current clock sequence state.
    pub fn sequence(&self) -> &GregorianSequence {
        &self.core.sequence
    }
}

impl<C: ClockSource, E: EntropySource, N: NodeSource> V6Generator<C, E, N> {
    /// Generates a new UUIDv6 object from the current clock reading.
    pub fn generate(&mut self) -> Result<Uuid, Error> {
        let timestamp = self.core.now();
        self.generate_core(timestamp)
    }

    /// Generates a new UUIDv6 object from the `timestamp` passed, counted in 100-nanosecond
    /// intervals since 1582-10-15.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is not a 60-bit integer.
    pub fn generate_core(&mut self, timestamp: u64) -> Result<Uuid, Error> {
        let (clock_seq, node) = self.core.fields(timestamp)?;
        Ok(Uuid::from_fields_v6(timestamp, clock_seq, node))
    }
}

/// Represents a UUIDv7 generator that encapsulates a millisecond counter.
///
/// With the sequence counter on (the default), the 16-bit counter occupies the 12-bit `rand_a`
/// field and the top four bits of `rand_b`, so UUIDs generated within the same millisecond sort
/// in generation order until the counter wraps; the other 58 bits of `rand_b` stay random. With
/// the counter off, all 74 bits are random.
///
/// # Examples
///
/// ```rust
/// use std::{sync, thread};
/// use uuid9562::V7Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(<V7Generator>::default()));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 let x = g.lock().unwrap().generate().unwrap();
///                 println!("{} by thread {}", x, i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct V7Generator<C = SystemClock, E = SecureRandom> {
    clock: C,
    rng: E,
    sequence: MillisSequence,
    use_sequence_counter: bool,
}

impl<C: Default, E: Default> Default for V7Generator<C, E> {
    fn default() -> Self {
        Self::new(C::default(), E::default())
    }
}

impl<C, E> V7Generator<C, E> {
    /// Creates a generator instance with the sequence counter on.
    pub const fn new(clock: C, rng: E) -> Self {
        Self {
            clock,
            rng,
            sequence: MillisSequence::new(),
            use_sequence_counter: true,
        }
    }

    /// Turns the sequence counter on or off, consuming and returning the generator.
    pub fn with_sequence_counter(mut self, enabled: bool) -> Self {
        self.use_sequence_counter = enabled;
        self
    }

    /// Turns the sequence counter on or off.
    pub fn set_sequence_counter(&mut self, enabled: bool) {
        self.use_sequence_counter = enabled;
    }

    /// Returns `true` if the sequence counter is on.
    pub const fn uses_sequence_counter(&self) -> bool {
        self.use_sequence_counter
    }

    /// Returns a mutable reference to the clock source.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Returns the current counter state.
    pub fn sequence(&self) -> &MillisSequence {
        &self.sequence
    }
}

impl<C: ClockSource, E: EntropySource> V7Generator<C, E> {
    /// Generates a new UUIDv7 object from the current clock reading.
    pub fn generate(&mut self) -> Result<Uuid, Error> {
        let unix_ts_ms = unix_millis(self.clock.unix_time()) & MAX_UNIX_TS_MS;
        self.generate_core(unix_ts_ms)
    }

    /// Generates a new UUIDv7 object from the `unix_ts_ms` passed.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 48-bit integer.
    pub fn generate_core(&mut self, unix_ts_ms: u64) -> Result<Uuid, Error> {
        assert!(
            unix_ts_ms <= MAX_UNIX_TS_MS,
            "`unix_ts_ms` must be a 48-bit integer"
        );

        if self.use_sequence_counter {
            // draw first so that a failed draw leaves the counter as is
            let rand = self.rng.next_u64()? & MAX_RAND_58;
            let counter = self.sequence.next(unix_ts_ms);
            Ok(Uuid::from_fields_v7(
                unix_ts_ms,
                counter >> 4,
                (u64::from(counter & 0xf) << 58) | rand,
            ))
        } else {
            let mut rand = [0u8; 10];
            self.rng.fill_bytes(&mut rand)?;
            let rand_a = u16::from_be_bytes([rand[0], rand[1]]) & 0xfff;
            let rand_b = u64::from_be_bytes([
                rand[2], rand[3], rand[4], rand[5], rand[6], rand[7], rand[8], rand[9],
            ]) & ((1 << 62) - 1);
            Ok(Uuid::from_fields_v7(unix_ts_ms, rand_a, rand_b))
        }
    }
}

/// Generates a UUIDv4 object from 16 bytes drawn from `rng`.
///
/// # Examples
///
/// ```rust
/// use uuid9562::generator::random_v4;
/// use uuid9562::source::SecureRandom;
///
/// let x = random_v4(&mut SecureRandom)?;
/// assert_eq!(x.version(), 4);
/// # Ok::<(), uuid9562::Error>(())
/// ```
pub fn random_v4<E: EntropySource + ?Sized>(rng: &mut E) -> Result<Uuid, Error> {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes)?;
    Ok(Uuid::from_random_bytes(bytes))
}

/// Supports operations as an infinite iterator that produces a new UUIDv1 for each call of
/// `next()`.
impl<C: ClockSource, E: EntropySource, N: NodeSource> Iterator for V1Generator<C, E, N> {
    type Item = Result<Uuid, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<C: ClockSource, E: EntropySource, N: NodeSource> FusedIterator for V1Generator<C, E, N> {}

/// Supports operations as an infinite iterator that produces a new UUIDv6 for each call of
/// `next()`.
impl<C: ClockSource, E: EntropySource, N: NodeSource> Iterator for V6Generator<C, E, N> {
    type Item = Result<Uuid, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<C: ClockSource, E: EntropySource, N: NodeSource> FusedIterator for V6Generator<C, E, N> {}

/// Supports operations as an infinite iterator that produces a new UUIDv7 for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use uuid9562::V7Generator;
///
/// <V7Generator>::default()
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e.unwrap()));
/// ```
impl<C: ClockSource, E: EntropySource> Iterator for V7Generator<C, E> {
    type Item = Result<Uuid, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<C: ClockSource, E: EntropySource> FusedIterator for V7Generator<C, E> {}
