//! Bit layouts of the time-based, random, and custom versions.
//!
//! Every constructor assembles the fields first and stamps the version and variant bits last, so
//! bits 48 through 51 and 64 through 65 of the assembled value are always overwritten.

use crate::Uuid;

/// Overwrites the version nibble and the `10` variant bits of an assembled byte array.
pub(crate) const fn stamp(mut bytes: [u8; 16], version: u8) -> Uuid {
    bytes[6] = (bytes[6] & 0x0f) | (version << 4);
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

impl Uuid {
    /// Creates a UUID byte array from UUIDv1 field values.
    ///
    /// `timestamp` is the 60-bit count of 100-nanosecond intervals since 1582-10-15, laid out as
    /// `time_low`, `time_mid`, and `time_high`; `clock_seq` is the 14-bit clock sequence.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is not a 60-bit or `clock_seq` is not a 14-bit integer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid9562::Uuid;
    ///
    /// let node = [0x9f, 0x6b, 0xde, 0xce, 0xd8, 0x46];
    /// let x = Uuid::from_fields_v1(0x1ec_9414_c232_ab00, 0x33c8, node);
    /// assert_eq!(x.to_string(), "c232ab00-9414-11ec-b3c8-9f6bdeced846");
    /// ```
    pub const fn from_fields_v1(timestamp: u64, clock_seq: u16, node: [u8; 6]) -> Self {
        if timestamp >= 1 << 60 || clock_seq >= 1 << 14 {
            panic!("invalid field value");
        }

        stamp(
            [
                (timestamp >> 24) as u8,
                (timestamp >> 16) as u8,
                (timestamp >> 8) as u8,
                timestamp as u8,
                (timestamp >> 40) as u8,
                (timestamp >> 32) as u8,
                (timestamp >> 56) as u8,
                (timestamp >> 48) as u8,
                (clock_seq >> 8) as u8,
                clock_seq as u8,
                node[0],
                node[1],
                node[2],
                node[3],
                node[4],
                node[5],
            ],
            1,
        )
    }

    /// Creates a UUID byte array from UUIDv6 field values.
    ///
    /// Takes the same field values as [`Uuid::from_fields_v1()`] but lays the timestamp out from
    /// the most significant bits down, so the byte order of the results follows the timestamp
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is not a 60-bit or `clock_seq` is not a 14-bit integer.
    pub const fn from_fields_v6(timestamp: u64, clock_seq: u16, node: [u8; 6]) -> Self {
        if timestamp >= 1 << 60 || clock_seq >= 1 << 14 {
            panic!("invalid field value");
        }

        stamp(
            [
                (timestamp >> 52) as u8,
                (timestamp >> 44) as u8,
                (timestamp >> 36) as u8,
                (timestamp >> 28) as u8,
                (timestamp >> 20) as u8,
                (timestamp >> 12) as u8,
                (timestamp >> 8) as u8,
                timestamp as u8,
                (clock_seq >> 8) as u8,
                clock_seq as u8,
                node[0],
                node[1],
                node[2],
                node[3],
                node[4],
                node[5],
            ],
            6,
        )
    }

    /// Creates a UUID byte array from UUIDv7 field values.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 48-bit, `rand_a` is not a 12-bit, or `rand_b` is not a
    /// 62-bit integer.
    pub const fn from_fields_v7(unix_ts_ms: u64, rand_a: u16, rand_b: u64) -> Self {
        if unix_ts_ms >= 1 << 48 || rand_a >= 1 << 12 || rand_b >= 1 << 62 {
            panic!("invalid field value");
        }

        stamp(
            [
                (unix_ts_ms >> 40) as u8,
                (unix_ts_ms >> 32) as u8,
                (unix_ts_ms >> 24) as u8,
                (unix_ts_ms >> 16) as u8,
                (unix_ts_ms >> 8) as u8,
                unix_ts_ms as u8,
                (rand_a >> 8) as u8,
                rand_a as u8,
                (rand_b >> 56) as u8,
                (rand_b >> 48) as u8,
                (rand_b >> 40) as u8,
                (rand_b >> 32) as u8,
                (rand_b >> 24) as u8,
                (rand_b >> 16) as u8,
                (rand_b >> 8) as u8,
                rand_b as u8,
            ],
            7,
        )
    }

    /// Creates a UUIDv4 from 16 random bytes, overwriting the six version and variant bits.
    pub const fn from_random_bytes(bytes: [u8; 16]) -> Self {
        stamp(bytes, 4)
    }

    /// Creates a UUIDv8 from an application-defined payload, overwriting only the six version and
    /// variant bits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid9562::Uuid;
    ///
    /// let x = Uuid::from_custom_bytes([0xff; 16]);
    /// assert_eq!(x.to_string(), "ffffffff-ffff-8fff-bfff-ffffffffffff");
    /// assert_eq!(x.version(), 8);
    /// ```
    pub const fn from_custom_bytes(bytes: [u8; 16]) -> Self {
        stamp(bytes, 8)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Uuid, Variant};

    const MAX_UINT60: u64 = (1 << 60) - 1;
    const MAX_UINT14: u16 = (1 << 14) - 1;
    const RFC_TIMESTAMP: u64 = 0x1ec_9414_c232_ab00;
    const RFC_NODE: [u8; 6] = [0x9f, 0x6b, 0xde, 0xce, 0xd8, 0x46];

    /// Encodes prepared v1 and v6 cases correctly
    #[test]
    fn encodes_prepared_v1_and_v6_cases_correctly() {
        let cases: [((u64, u16, [u8; 6]), &str, &str); 5] = [
            (
                (0, 0, [0; 6]),
                "00000000-0000-1000-8000-000000000000",
                "00000000-0000-6000-8000-000000000000",
            ),
            (
                (MAX_UINT60, 0, [0; 6]),
                "ffffffff-ffff-1fff-8000-000000000000",
                "ffffffff-ffff-6fff-8000-000000000000",
            ),
            (
                (0, MAX_UINT14, [0xff; 6]),
                "00000000-0000-1000-bfff-ffffffffffff",
                "00000000-0000-6000-bfff-ffffffffffff",
            ),
            (
                (RFC_TIMESTAMP, 0x33c8, RFC_NODE),
                "c232ab00-9414-11ec-b3c8-9f6bdeced846",
                "1ec9414c-232a-6b00-b3c8-9f6bdeced846",
            ),
            (
                (RFC_TIMESTAMP, 0x0123, [0x01, 0x23, 0x45, 0x67, 0x89, 0xab]),
                "c232ab00-9414-11ec-8123-0123456789ab",
                "1ec9414c-232a-6b00-8123-0123456789ab",
            ),
        ];

        for (fs, v1, v6) in cases {
            let x = Uuid::from_fields_v1(fs.0, fs.1, fs.2);
            assert_eq!(&x.encode() as &str, v1);
            assert_eq!(x.version(), 1);
            assert_eq!(x.gregorian_timestamp(), Some(fs.0));

            let y = Uuid::from_fields_v6(fs.0, fs.1, fs.2);
            assert_eq!(&y.encode() as &str, v6);
            assert_eq!(y.version(), 6);
            assert_eq!(y.gregorian_timestamp(), Some(fs.0));
        }
    }

    /// Encodes prepared v7 cases correctly
    #[test]
    fn encodes_prepared_v7_cases_correctly() {
        const MAX_UINT48: u64 = (1 << 48) - 1;
        const MAX_UINT12: u16 = (1 << 12) - 1;
        const MAX_UINT62: u64 = (1 << 62) - 1;

        let cases = [
            ((0, 0, 0), "00000000-0000-7000-8000-000000000000"),
            ((MAX_UINT48, 0, 0), "ffffffff-ffff-7000-8000-000000000000"),
            ((0, MAX_UINT12, 0), "00000000-0000-7fff-8000-000000000000"),
            ((0, 0, MAX_UINT62), "00000000-0000-7000-bfff-ffffffffffff"),
            (
                (MAX_UINT48, MAX_UINT12, MAX_UINT62),
                "ffffffff-ffff-7fff-bfff-ffffffffffff",
            ),
            (
                (0x17f22e279b0, 0xcc3, 0x18c4dc0c0c07398f),
                "017f22e2-79b0-7cc3-98c4-dc0c0c07398f",
            ),
        ];

        for (fs, text) in cases {
            let x = Uuid::from_fields_v7(fs.0, fs.1, fs.2);
            assert_eq!(&x.encode() as &str, text);
            assert_eq!(x.unix_ts_ms(), Some(fs.0));
        }
    }

    /// Overwrites only version and variant bits of random and custom payloads
    #[test]
    fn overwrites_only_version_and_variant_bits_of_random_and_custom_payloads() {
        let rfc_random = [
            0x91, 0x91, 0x08, 0xf7, 0x52, 0xd1, 0x33, 0x20, 0x5b, 0xac, 0xf8, 0x47, 0xdb, 0x41,
            0x48, 0xa8,
        ];
        assert_eq!(
            &Uuid::from_random_bytes(rfc_random).encode() as &str,
            "919108f7-52d1-4320-9bac-f847db4148a8"
        );

        let cases = [
            (
                [0x00; 16],
                "00000000-0000-4000-8000-000000000000",
                "00000000-0000-8000-8000-000000000000",
            ),
            (
                [0xff; 16],
                "ffffffff-ffff-4fff-bfff-ffffffffffff",
                "ffffffff-ffff-8fff-bfff-ffffffffffff",
            ),
        ];
        for (bytes, v4, v8) in cases {
            assert_eq!(&Uuid::from_random_bytes(bytes).encode() as &str, v4);
            assert_eq!(&Uuid::from_custom_bytes(bytes).encode() as &str, v8);
        }
    }

    /// Stamps RFC variant and is neither Nil nor Max
    #[test]
    fn stamps_rfc_variant_and_is_neither_nil_nor_max() {
        let xs = [
            Uuid::from_fields_v1(0, 0, [0; 6]),
            Uuid::from_fields_v1(MAX_UINT60, MAX_UINT14, [0xff; 6]),
            Uuid::from_fields_v6(0, 0, [0; 6]),
            Uuid::from_fields_v6(MAX_UINT60, MAX_UINT14, [0xff; 6]),
            Uuid::from_fields_v7(0, 0, 0),
            Uuid::from_random_bytes([0x00; 16]),
            Uuid::from_random_bytes([0xff; 16]),
            Uuid::from_custom_bytes([0x00; 16]),
            Uuid::from_custom_bytes([0xff; 16]),
        ];
        for x in xs {
            assert_eq!(x.variant(), Variant::Var10);
            assert!(!x.is_nil());
            assert!(!x.is_max());
        }
    }

    /// Rejects out-of-range clock sequence
    #[test]
    #[should_panic(expected = "invalid field value")]
    fn rejects_out_of_range_clock_sequence() {
        Uuid::from_fields_v1(0, 1 << 14, [0; 6]);
    }
}
