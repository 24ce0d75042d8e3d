//! Name-based UUIDs (versions 3 and 5)

use md5::Md5;
use sha1::{Digest, Sha1};

use crate::fields::stamp;
use crate::Uuid;

impl Uuid {
    /// Creates a UUIDv3 from the MD5 hash of `namespace` followed by `name`.
    ///
    /// The result depends on the inputs only; the same pair yields the same UUID in any process at
    /// any time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid9562::Uuid;
    ///
    /// let x = Uuid::new_v3(&Uuid::NAMESPACE_DNS, "www.example.com");
    /// assert_eq!(x.to_string(), "5df41881-3aed-3515-88a7-2f4a814cf09e");
    /// ```
    pub fn new_v3(namespace: &Uuid, name: impl AsRef<[u8]>) -> Self {
        hash_into::<Md5>(namespace, name.as_ref(), 3)
    }

    /// Creates a UUIDv5 from the SHA-1 hash of `namespace` followed by `name`, truncated to 16
    /// bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid9562::Uuid;
    ///
    /// let x = Uuid::new_v5(&Uuid::NAMESPACE_DNS, "www.example.com");
    /// assert_eq!(x.to_string(), "2ed6657d-e927-568b-95e1-2665a8aea6a2");
    /// ```
    pub fn new_v5(namespace: &Uuid, name: impl AsRef<[u8]>) -> Self {
        hash_into::<Sha1>(namespace, name.as_ref(), 5)
    }
}

fn hash_into<D: Digest>(namespace: &Uuid, name: &[u8], version: u8) -> Uuid {
    let digest = D::new()
        .chain_update(namespace.as_bytes())
        .chain_update(name)
        .finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    stamp(bytes, version)
}

#[cfg(test)]
mod tests {
    use crate::{Uuid, Variant};

    /// Reproduces RFC 9562 name-based test vectors
    #[test]
    fn reproduces_rfc_9562_name_based_test_vectors() {
        assert_eq!(
            Uuid::new_v3(&Uuid::NAMESPACE_DNS, "www.example.com").to_string(),
            "5df41881-3aed-3515-88a7-2f4a814cf09e"
        );
        assert_eq!(
            Uuid::new_v5(&Uuid::NAMESPACE_DNS, "www.example.com").to_string(),
            "2ed6657d-e927-568b-95e1-2665a8aea6a2"
        );
    }

    /// Produces identical UUIDs for identical inputs
    #[test]
    fn produces_identical_uuids_for_identical_inputs() {
        let namespaces = [
            Uuid::NAMESPACE_DNS,
            Uuid::NAMESPACE_URL,
            Uuid::NAMESPACE_OID,
            Uuid::NAMESPACE_X500,
        ];
        let names: [&[u8]; 4] = [b"", b"www.example.com", b"https://example.com/", &[0xff; 64]];

        for ns in namespaces {
            for name in names {
                let v3 = Uuid::new_v3(&ns, name);
                assert_eq!(v3, Uuid::new_v3(&ns, name.to_vec()));
                assert_eq!(v3.version(), 3);
                assert_eq!(v3.variant(), Variant::Var10);

                let v5 = Uuid::new_v5(&ns, name);
                assert_eq!(v5, Uuid::new_v5(&ns, name.to_vec()));
                assert_eq!(v5.version(), 5);
                assert_eq!(v5.variant(), Variant::Var10);

                assert_ne!(v3, v5);
            }
        }
    }

    /// Separates namespaces sharing a name
    #[test]
    fn separates_namespaces_sharing_a_name() {
        let x = Uuid::new_v5(&Uuid::NAMESPACE_DNS, "example");
        let y = Uuid::new_v5(&Uuid::NAMESPACE_URL, "example");
        assert_ne!(x, y);

        // derived namespaces chain like any other UUID
        let z = Uuid::new_v5(&x, "child");
        assert_eq!(z, Uuid::new_v5(&x, "child"));
        assert_ne!(z, Uuid::new_v5(&y, "child"));
    }
}
