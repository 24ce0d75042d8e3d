//! Replaceable sources of time, randomness, and node identity consumed by the generators.
//!
//! Each capability is a small trait with a production implementation and deterministic ones for
//! tests and simulations:
//!
//! | Capability        | Production                        | Deterministic                            |
//! | ----------------- | --------------------------------- | ---------------------------------------- |
//! | [`ClockSource`]   | [`SystemClock`]                   | [`FixedClock`]                           |
//! | [`EntropySource`] | [`SecureRandom`], [`RngAdapter`]  | [`FixedByteSequence`], [`SeededRandom`]  |
//! | [`NodeSource`]    | [`RandomNode`], [`HardwareNode`]  | [`FixedNode`]                            |

pub mod clock;
pub mod entropy;
pub mod node;

pub use clock::{ClockSource, FixedClock, SystemClock};
pub use entropy::{EntropySource, FixedByteSequence, RngAdapter, SecureRandom, SeededRandom};
pub use node::{FixedNode, HardwareNode, NodeSource, RandomNode};
