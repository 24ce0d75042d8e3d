//! RFC 9562 UUID generation and codec
//!
//! ```rust
//! use uuid9562::{uuid4, uuid5, uuid7, Uuid};
//!
//! let uuid = uuid7()?;
//! println!("{}", uuid); // e.g. "01809424-3e59-7c05-9219-566f82fff672"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//!
//! let uuid = uuid4()?;
//! println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//!
//! let uuid = uuid5(&Uuid::NAMESPACE_DNS, "www.example.com");
//! assert_eq!(uuid.to_string(), "2ed6657d-e927-568b-95e1-2665a8aea6a2");
//! # Ok::<(), uuid9562::Error>(())
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562).
//!
//! # Supported versions
//!
//! | Version | Bits derived from                          | Process-wide  | Owned or pure                 |
//! | ------- | ------------------------------------------ | ------------- | ----------------------------- |
//! | 1       | Gregorian time, clock sequence, node       | [`uuid1()`]   | [`V1Generator`]               |
//! | 3       | MD5 of namespace and name                  | [`uuid3()`]   | [`Uuid::new_v3()`]            |
//! | 4       | Random                                     | [`uuid4()`]   | [`generator::random_v4()`]    |
//! | 5       | SHA-1 of namespace and name                | [`uuid5()`]   | [`Uuid::new_v5()`]            |
//! | 6       | Gregorian time (sortable), clock seq, node | [`uuid6()`]   | [`V6Generator`]               |
//! | 7       | Unix time in ms, counter, random           | [`uuid7()`]   | [`V7Generator`]               |
//! | 8       | Application-defined                        | [`uuid8()`]   | [`Uuid::from_custom_bytes()`] |
//!
//! Version 2 is not supported; [`generate()`] reports it as [`Error::UnsupportedVersion`].
//!
//! Every generator and constructor stamps the version and variant bits last, so every output has
//! the `10` variant and is neither the Nil nor the Max UUID.
//!
//! # Field and bit layout
//!
//! UUIDv6 lays the 60-bit timestamp out from the most significant bits down:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           time_high                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           time_mid            |  ver  |       time_low        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|         clock_seq         |             node              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                              node                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! UUIDv1 carries the same fields with the timestamp split low bits first, which is why UUIDv1
//! values do not sort by creation time.
//!
//! - The timestamp counts 100-nanosecond intervals since 1582-10-15T00:00:00Z.
//! - The 14-bit `clock_seq` is incremented for each UUID generated within the same interval,
//!   wrapping to zero, and is reseeded randomly whenever the interval changes.
//! - The 48-bit `node` is a random value with the multicast bit set unless a hardware address or
//!   an explicit value is configured.
//!
//! UUIDv7 produced by this library has the following layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        counter        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|counter|                     rand                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in milliseconds.
//! - The 16-bit `counter` starts from zero in each millisecond and is incremented by one for each
//!   UUID generated within it, wrapping to zero. It can be replaced by random bits with
//!   [`set_v7_sequence_counter()`] or [`V7Generator::with_sequence_counter()`].
//! - The remaining 58 `rand` bits are filled with a cryptographically strong random number.
//!
//! # Crate features
//!
//! - `global_gen` (default): process-wide generators and the entry point functions.
//! - `serde`: serialization as the 8-4-4-4-12 string (human-readable formats) or 16 bytes.
//! - `uuid`: conversion from and into [`uuid::Uuid`](https://docs.rs/uuid).
//!
//! # Logging
//!
//! The library emits [`tracing`] events when a node identifier is chosen, when a clock moves
//! backwards, when a sequence rolls over, and when global generators are reset after a fork. It
//! does not install a subscriber.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{Error, ParseError};

mod uuid;
pub use self::uuid::{Uuid, Variant};

mod fields;
mod name;

pub mod generator;
pub mod sequence;
pub mod source;

#[doc(inline)]
pub use generator::{V1Generator, V6Generator, V7Generator};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{generate, must, node_id, set_node_id, set_v7_sequence_counter};
#[cfg(feature = "global_gen")]
pub use global_gen::{use_hardware_node, uuid1, uuid3, uuid4, uuid5, uuid6, uuid7, uuid8};
