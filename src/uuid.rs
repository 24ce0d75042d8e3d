use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{fmt, ops, str};

use crate::source::clock::GREGORIAN_OFFSET;
use crate::{Error, ParseError};

/// Represents a Universally Unique IDentifier.
///
/// The 16-byte big-endian array is the canonical representation; the comparison operators order
/// values byte by byte, which is the creation order for versions 6 and 7.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

/// Byte ranges of the five hexadecimal groups in the 8-4-4-4-12 string representation.
const SEGMENTS: [(usize, usize); 5] = [(0, 8), (9, 13), (14, 18), (19, 23), (24, 36)];

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Name space ID for fully-qualified domain names (6ba7b810-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_DNS: Self = Self([
        0x6b, 0xa7, 0xb8, 0x10, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
        0xc8,
    ]);

    /// Name space ID for URLs (6ba7b811-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_URL: Self = Self([
        0x6b, 0xa7, 0xb8, 0x11, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
        0xc8,
    ]);

    /// Name space ID for ISO OIDs (6ba7b812-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_OID: Self = Self([
        0x6b, 0xa7, 0xb8, 0x12, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
        0xc8,
    ]);

    /// Name space ID for X.500 DNs (6ba7b814-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_X500: Self = Self([
        0x6b, 0xa7, 0xb8, 0x14, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
        0xc8,
    ]);

    /// Creates an object from a 16-byte big-endian array.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Consumes the object and returns the underlying byte array.
    pub const fn into_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Returns the big-endian `u128` value.
    pub const fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Returns the 16-byte binary form as a `Vec<u8>`, e.g. for a database blob column.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Returns true if the object is the Nil UUID.
    pub fn is_nil(&self) -> bool {
        self.0 == Self::NIL.0
    }

    /// Returns true if the object is the Max UUID.
    pub fn is_max(&self) -> bool {
        self.0 == Self::MAX.0
    }

    /// Returns the 4-bit version field value (bits 48 through 51).
    ///
    /// Any nibble from 0 to 15 is reported as is, whether or not this crate generates that
    /// version. Check [`Uuid::variant()`] as well to tell an RFC 9562 UUID from others.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid9562::Uuid;
    ///
    /// let x = "c232ab00-9414-11ec-b3c8-9f6bdeced846".parse::<Uuid>()?;
    /// assert_eq!(x.version(), 1);
    /// # Ok::<(), uuid9562::ParseError>(())
    /// ```
    pub const fn version(&self) -> u8 {
        self.0[6] >> 4
    }

    /// Reports the variant field value of the UUID.
    pub fn variant(&self) -> Variant {
        match self.0[8] >> 4 {
            0x0..=0x7 if self.is_nil() => Variant::Nil,
            0x0..=0x7 => Variant::Var0,
            0x8..=0xb => Variant::Var10,
            0xc..=0xd => Variant::Var110,
            _ if self.is_max() => Variant::Max,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the creation time embedded in a time-based UUID (versions 1, 6, and 7).
    ///
    /// Returns [`UNIX_EPOCH`] for all other versions, so callers have to check
    /// [`Uuid::version()`] to distinguish a UUID actually created at the epoch from one that
    /// carries no timestamp. Precision is 100 nanoseconds for versions 1 and 6 and one
    /// millisecond for version 7.
    pub fn timestamp(&self) -> SystemTime {
        if let Some(ticks) = self.gregorian_timestamp() {
            let ticks = i128::from(ticks) - i128::from(GREGORIAN_OFFSET);
            let abs = ticks.unsigned_abs();
            let delta = Duration::new(
                (abs / 10_000_000) as u64,
                ((abs % 10_000_000) * 100) as u32,
            );
            if ticks >= 0 {
                UNIX_EPOCH + delta
            } else {
                UNIX_EPOCH.checked_sub(delta).unwrap_or(UNIX_EPOCH)
            }
        } else if let Some(unix_ts_ms) = self.unix_ts_ms() {
            UNIX_EPOCH + Duration::from_millis(unix_ts_ms)
        } else {
            UNIX_EPOCH
        }
    }

    /// Returns the 60-bit count of 100-nanosecond intervals since 1582-10-15 if the object is a
    /// UUIDv1 or UUIDv6.
    pub fn gregorian_timestamp(&self) -> Option<u64> {
        let b = &self.0;
        let time_hi_12 = (u64::from(b[6] & 0x0f) << 8) | u64::from(b[7]);
        let first_32 = u64::from(u32::from_be_bytes([b[0], b[1], b[2], b[3]]));
        let mid_16 = u64::from(u16::from_be_bytes([b[4], b[5]]));
        match self.version() {
            1 => Some((time_hi_12 << 48) | (mid_16 << 32) | first_32),
            6 => Some((first_32 << 28) | (mid_16 << 12) | time_hi_12),
            _ => None,
        }
    }

    /// Returns the 48-bit Unix timestamp in milliseconds if the object is a UUIDv7.
    pub fn unix_ts_ms(&self) -> Option<u64> {
        if self.version() == 7 {
            let mut buf = [0u8; 8];
            buf[2..].copy_from_slice(&self.0[..6]);
            Some(u64::from_be_bytes(buf))
        } else {
            None
        }
    }

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    ///
    /// Both upper-case and lower-case digits are accepted. Errors report the input length, the
    /// dash placement, or the 1-based index of the first hexadecimal group that contains a
    /// non-hexadecimal character.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid9562::{ParseError, Uuid};
    ///
    /// assert!(Uuid::parse_str("6BA7B810-9DAD-11D1-80B4-00C04FD430C8").is_ok());
    /// assert_eq!(
    ///     Uuid::parse_str("6ba7b810-9dad-11d1-80b4-00c04fd430cx"),
    ///     Err(ParseError::Segment(5))
    /// );
    /// ```
    pub fn parse_str(src: &str) -> Result<Self, ParseError> {
        Self::parse_ascii(src.as_bytes())
    }

    fn parse_ascii(src: &[u8]) -> Result<Self, ParseError> {
        if src.len() != 36 {
            return Err(ParseError::Length(src.len()));
        }
        if src[8] != b'-' || src[13] != b'-' || src[18] != b'-' || src[23] != b'-' {
            return Err(ParseError::Dash);
        }

        let mut dst = [0u8; 16];
        let mut dst_iter = dst.iter_mut();
        for (i, &(start, end)) in SEGMENTS.iter().enumerate() {
            let err = || ParseError::Segment(i as u8 + 1);
            for pair in src[start..end].chunks_exact(2) {
                let hi = char::from(pair[0]).to_digit(16).ok_or_else(err)? as u8;
                let lo = char::from(pair[1]).to_digit(16).ok_or_else(err)? as u8;
                if let Some(e) = dst_iter.next() {
                    *e = (hi << 4) | lo;
                }
            }
        }
        Ok(Self(dst))
    }

    /// Creates an object from either the 16-byte binary form or the 36-byte 8-4-4-4-12 text form.
    ///
    /// This is the entry point for storage layers that may hand over a UUID column either as raw
    /// bytes or as text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid9562::Uuid;
    ///
    /// let text = b"6ba7b810-9dad-11d1-80b4-00c04fd430c8";
    /// let x = Uuid::from_slice(text)?;
    /// assert_eq!(x, Uuid::NAMESPACE_DNS);
    /// assert_eq!(Uuid::from_slice(x.as_bytes())?, x);
    /// # Ok::<(), uuid9562::Error>(())
    /// ```
    pub fn from_slice(src: &[u8]) -> Result<Self, Error> {
        match src.len() {
            16 => {
                let mut dst = [0u8; 16];
                dst.copy_from_slice(src);
                Ok(Self(dst))
            }
            36 => Ok(Self::parse_ascii(src)?),
            len => Err(Error::Length(len)),
        }
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// structure that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid9562::Uuid;
    ///
    /// let x = "2ED6657D-E927-568B-95E1-2665A8AEA6A2".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "2ed6657d-e927-568b-95e1-2665a8aea6a2");
    /// assert_eq!(format!("{}", y), "2ed6657d-e927-568b-95e1-2665a8aea6a2");
    /// # Ok::<(), uuid9562::ParseError>(())
    /// ```
    pub fn encode(&self) -> impl ops::Deref<Target = str> + fmt::Display {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [b'-'; 36];
        let mut src_iter = self.0.iter();
        for &(start, end) in SEGMENTS.iter() {
            for pair in buffer[start..end].chunks_exact_mut(2) {
                if let Some(&e) = src_iter.next() {
                    pair[0] = DIGITS[usize::from(e >> 4)];
                    pair[1] = DIGITS[usize::from(e & 15)];
                }
            }
        }
        debug_assert!(buffer.is_ascii());
        UuidStr(buffer)
    }
}

/// Variant field values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// Reserved, NCS backward compatibility (`0b0xxx`), excluding the Nil UUID.
    Var0,
    /// The variant specified by RFC 9562 (`0b10xx`).
    Var10,
    /// Reserved, Microsoft Corporation backward compatibility (`0b110x`).
    Var110,
    /// Reserved for future definition (`0b111x`), excluding the Max UUID.
    VarReserved,
    /// The Nil UUID.
    Nil,
    /// The Max UUID.
    Max,
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_str(src)
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl From<Uuid> for Vec<u8> {
    fn from(src: Uuid) -> Self {
        src.0.to_vec()
    }
}

impl TryFrom<&str> for Uuid {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl TryFrom<String> for Uuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Concrete return type of [`Uuid::encode()`] containing the stack-allocated 8-4-4-4-12 string
/// representation.
struct UuidStr([u8; 36]);

impl ops::Deref for UuidStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        debug_assert!(self.0.is_ascii());
        unsafe { str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for UuidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Uuid::parse_str(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Uuid::from_slice(value).map_err(de::Error::custom)
        }
    }

}
