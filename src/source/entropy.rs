//! Random byte sources

use rand::{rngs::OsRng, RngCore, SeedableRng};
use rand_chacha::ChaCha12Rng;

use crate::Error;

/// A trait that defines the random number interface consumed by the generators.
///
/// Implementations must report failure instead of substituting weaker randomness.
pub trait EntropySource {
    /// Fills `dest` with random data.
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error>;

    /// Returns the next random `u16`.
    fn next_u16(&mut self) -> Result<u16, Error> {
        let mut buf = [0u8; 2];
        self.fill_bytes(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Returns the next random `u64`.
    fn next_u64(&mut self) -> Result<u64, Error> {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }
}

/// The operating system's cryptographically secure random number generator.
///
/// Every call reaches the OS source, and its failure is propagated as
/// [`Error::EntropyUnavailable`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct SecureRandom;

impl EntropySource for SecureRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        OsRng.try_fill_bytes(dest).map_err(Error::EntropyUnavailable)
    }
}

/// An adapter that implements [`EntropySource`] for [`RngCore`] types from `rand` (v0.8) crate.
///
/// # Examples
///
/// ```rust
/// use uuid9562::source::{FixedClock, RandomNode, RngAdapter};
/// use uuid9562::V6Generator;
///
/// let rng = RngAdapter(rand::thread_rng());
/// let mut g = V6Generator::new(FixedClock::default(), rng.clone(), RandomNode::new(rng));
/// println!("{}", g.generate()?);
/// # Ok::<(), uuid9562::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct RngAdapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> EntropySource for RngAdapter<T> {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.0.try_fill_bytes(dest).map_err(Error::EntropyUnavailable)
    }
}

/// A reproducible pseudo-random stream derived from a 64-bit seed.
///
/// The stream is not secret and must not be used for identifiers that have to be unguessable.
#[derive(Clone, Debug)]
pub struct SeededRandom(ChaCha12Rng);

impl SeededRandom {
    /// Creates a stream from `seed`; equal seeds yield equal streams.
    pub fn new(seed: u64) -> Self {
        Self(ChaCha12Rng::seed_from_u64(seed))
    }
}

impl EntropySource for SeededRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.0.fill_bytes(dest);
        Ok(())
    }
}

/// A source that replays a fixed byte sequence and fails once it runs out.
///
/// # Examples
///
/// ```rust
/// use uuid9562::source::{EntropySource, FixedByteSequence};
///
/// let mut rng = FixedByteSequence::new([0x33, 0xc8]);
/// assert_eq!(rng.next_u16()?, 0x33c8);
/// assert!(rng.next_u16().is_err());
/// # Ok::<(), uuid9562::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct FixedByteSequence {
    bytes: Vec<u8>,
    position: usize,
}

impl FixedByteSequence {
    /// Creates a source that yields `bytes` in order.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            position: 0,
        }
    }

    /// Returns the number of bytes left.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }
}

impl EntropySource for FixedByteSequence {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        if dest.len() > self.remaining() {
            return Err(Error::entropy("fixed byte sequence exhausted"));
        }
        let end = self.position + dest.len();
        dest.copy_from_slice(&self.bytes[self.position..end]);
        self.position = end;
        Ok(())
    }
}
