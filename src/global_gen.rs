//! Process-wide generators and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync::{self, atomic};

use tracing::debug;

use crate::generator::{random_v4, V1Generator, V6Generator, V7Generator};
use crate::source::{HardwareNode, NodeSource, SecureRandom, SystemClock};
use crate::{Error, Uuid};
use inner::{lock, ForkSafe, GlobalNode};

type GlobalV1 = V1Generator<SystemClock, SecureRandom, GlobalNode>;
type GlobalV6 = V6Generator<SystemClock, SecureRandom, GlobalNode>;
type GlobalV7 = V7Generator<SystemClock, SecureRandom>;

/// Node identifier shared by the global UUIDv1 and UUIDv6 generators, set on first use.
static NODE: sync::RwLock<Option<[u8; 6]>> = sync::RwLock::new(None);

/// The switch read by [`uuid7()`] on each call.
static V7_SEQUENCE_COUNTER: atomic::AtomicBool = atomic::AtomicBool::new(true);

/// Generates a UUIDv1 object.
///
/// This function employs a global generator whose clock sequence is shared by all threads, so
/// that calls observing the same 100-nanosecond tick always receive distinct sequence values. The
/// node identifier is a random value drawn on first use unless set by [`set_node_id()`] or
/// [`use_hardware_node()`]. On Unix, this function resets the clock sequence when the process ID
/// changes (i.e., upon process forks).
///
/// # Examples
///
/// ```rust
/// let uuid = uuid9562::uuid1()?;
/// println!("{}", uuid); // e.g., "c232ab00-9414-11ec-b3c8-9f6bdeced846"
/// # Ok::<(), uuid9562::Error>(())
/// ```
pub fn uuid1() -> Result<Uuid, Error> {
    static G: sync::OnceLock<sync::Mutex<ForkSafe<GlobalV1>>> = sync::OnceLock::new();
    lock(&G).get_mut().generate()
}

/// Generates a UUIDv3 object from `namespace` and `name`.
///
/// # Examples
///
/// ```rust
/// use uuid9562::{uuid3, Uuid};
///
/// let uuid = uuid3(&Uuid::NAMESPACE_URL, "https://www.example.com/");
/// assert_eq!(uuid, uuid3(&Uuid::NAMESPACE_URL, "https://www.example.com/"));
/// ```
pub fn uuid3(namespace: &Uuid, name: impl AsRef<[u8]>) -> Uuid {
    Uuid::new_v3(namespace, name)
}

/// Generates a UUIDv4 object from the operating system's secure random number generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid9562::uuid4()?;
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// # Ok::<(), uuid9562::Error>(())
/// ```
pub fn uuid4() -> Result<Uuid, Error> {
    random_v4(&mut SecureRandom)
}

/// Generates a UUIDv5 object from `namespace` and `name`.
///
/// # Examples
///
/// ```rust
/// use uuid9562::{uuid5, Uuid};
///
/// let uuid = uuid5(&Uuid::NAMESPACE_DNS, "www.example.com");
/// assert_eq!(uuid.to_string(), "2ed6657d-e927-568b-95e1-2665a8aea6a2");
/// ```
pub fn uuid5(namespace: &Uuid, name: impl AsRef<[u8]>) -> Uuid {
    Uuid::new_v5(namespace, name)
}

/// Generates a UUIDv6 object.
///
/// Behaves like [`uuid1()`] with its own clock sequence, laying the timestamp out so that the
/// results sort by creation time.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid9562::uuid6()?;
/// println!("{}", uuid); // e.g., "1ec9414c-232a-6b00-b3c8-9f6bdeced846"
/// # Ok::<(), uuid9562::Error>(())
/// ```
pub fn uuid6() -> Result<Uuid, Error> {
    static G: sync::OnceLock<sync::Mutex<ForkSafe<GlobalV6>>> = sync::OnceLock::new();
    lock(&G).get_mut().generate()
}

/// Generates a UUIDv7 object.
///
/// This function employs a global generator and, while the sequence counter is on (see
/// [`set_v7_sequence_counter()`]), guarantees the process-wide monotonic order of UUIDs generated
/// within the same millisecond. On Unix, this function resets the generator when the process ID
/// changes (i.e., upon process forks) to prevent collisions across processes.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid9562::uuid7()?;
/// println!("{}", uuid); // e.g., "01809424-3e59-7c05-9219-566f82fff672"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
/// # Ok::<(), uuid9562::Error>(())
/// ```
pub fn uuid7() -> Result<Uuid, Error> {
    static G: sync::OnceLock<sync::Mutex<ForkSafe<GlobalV7>>> = sync::OnceLock::new();
    let mut guard = lock(&G);
    let g = guard.get_mut();
    g.set_sequence_counter(V7_SEQUENCE_COUNTER.load(atomic::Ordering::Relaxed));
    g.generate()
}

/// Creates a UUIDv8 object from an application-defined payload.
///
/// Only the version and variant bits of `bytes` are overwritten.
pub fn uuid8(bytes: [u8; 16]) -> Uuid {
    Uuid::from_custom_bytes(bytes)
}

/// Generates a UUID of the `version` given, for the versions that need no caller input.
///
/// # Errors
///
/// Returns [`Error::InputRequired`] for versions 3, 5, and 8, which need a namespace and name or a
/// payload, and [`Error::UnsupportedVersion`] for version 2 and any other unimplemented value.
///
/// # Examples
///
/// ```rust
/// use uuid9562::{generate, Error};
///
/// assert_eq!(generate(6)?.version(), 6);
/// assert!(matches!(generate(5), Err(Error::InputRequired(5))));
/// assert!(matches!(generate(2), Err(Error::UnsupportedVersion(2))));
/// # Ok::<(), uuid9562::Error>(())
/// ```
pub fn generate(version: u8) -> Result<Uuid, Error> {
    match version {
        1 => uuid1(),
        4 => uuid4(),
        6 => uuid6(),
        7 => uuid7(),
        3 | 5 | 8 => Err(Error::InputRequired(version)),
        _ => Err(Error::UnsupportedVersion(version)),
    }
}

/// Unwraps the result of a call that the caller knows cannot fail, panicking otherwise.
///
/// # Panics
///
/// Panics with the error message if `result` is an `Err`.
///
/// # Examples
///
/// ```rust
/// use uuid9562::{must, Uuid};
///
/// let ns = must("6ba7b810-9dad-11d1-80b4-00c04fd430c8".parse::<Uuid>());
/// assert_eq!(ns, Uuid::NAMESPACE_DNS);
/// ```
#[track_caller]
pub fn must<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("uuid9562: {}", err),
    }
}

/// Overrides the node identifier of the global UUIDv1 and UUIDv6 generators.
///
/// Calls racing against concurrent [`uuid1()`] or [`uuid6()`] calls may let either node value
/// through to those calls; set the node before generating if that matters.
pub fn set_node_id(node: [u8; 6]) {
    *NODE.write().unwrap_or_else(sync::PoisonError::into_inner) = Some(node);
    debug!(node = ?node, "node identifier overridden");
}

/// Switches the global UUIDv1 and UUIDv6 generators to the hardware address of a local network
/// interface, returning the address chosen.
///
/// # Errors
///
/// Returns [`Error::NodeUnavailable`] and keeps the current node if no usable address is found.
pub fn use_hardware_node() -> Result<[u8; 6], Error> {
    let node = HardwareNode::new().node_id()?;
    set_node_id(node);
    Ok(node)
}

/// Returns the node identifier of the global UUIDv1 and UUIDv6 generators, drawing a random one
/// if none is set yet.
pub fn node_id() -> Result<[u8; 6], Error> {
    GlobalNode.node_id()
}

/// Turns the sequence counter of the global UUIDv7 generator on (the default) or off.
///
/// See [`V7Generator`] for the trade-off.
pub fn set_v7_sequence_counter(enabled: bool) {
    V7_SEQUENCE_COUNTER.store(enabled, atomic::Ordering::Relaxed);
}

mod inner {
    use std::sync;

    use tracing::debug;

    use super::NODE;
    use crate::source::{NodeSource, RandomNode, SecureRandom};
    use crate::Error;

    /// Returns the lock handle of a process-wide generator, creating one if none exists.
    ///
    /// A generator poisoned by a panicking holder is reused as is; its state is always consistent
    /// between calls.
    pub fn lock<G: Default>(
        cell: &'static sync::OnceLock<sync::Mutex<ForkSafe<G>>>,
    ) -> sync::MutexGuard<'static, ForkSafe<G>> {
        cell.get_or_init(Default::default)
            .lock()
            .unwrap_or_else(sync::PoisonError::into_inner)
    }

    /// The node source backed by the process-wide node identifier.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct GlobalNode;

    impl NodeSource for GlobalNode {
        fn node_id(&mut self) -> Result<[u8; 6], Error> {
            if let Some(node) = *NODE.read().unwrap_or_else(sync::PoisonError::into_inner) {
                return Ok(node);
            }

            let mut slot = NODE.write().unwrap_or_else(sync::PoisonError::into_inner);
            match *slot {
                Some(node) => Ok(node),
                None => {
                    let node = RandomNode::new(SecureRandom).node_id()?;
                    *slot = Some(node);
                    Ok(node)
                }
            }
        }
    }

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct ForkSafe<G> {
        #[cfg(unix)]
        pid: u32,
        generator: G,
    }

    impl<G: Default> Default for ForkSafe<G> {
        fn default() -> Self {
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: Default::default(),
            }
        }
    }

    impl<G: Default> ForkSafe<G> {
        /// Returns a mutable reference to the inner generator, reseting the generator state on
        /// Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut G {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                debug!(
                    parent = self.pid,
                    child = std::process::id(),
                    "process forked; resetting global generator"
                );
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}

#[cfg(test)]
mod tests_v7 {
    use super::uuid7;
    use crate::Variant;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = {
        let _switch = super::tests_util::counter_switch_shared();
        (0..N_SAMPLES).map(|_| uuid7().unwrap().into()).collect()
    });

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-7[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates sortable string representation by creation time
    #[test]
    fn generates_sortable_string_representation_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1] < samples[i]);
            }
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = uuid7().unwrap().unix_ts_ms().unwrap() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        let bins = SAMPLES.with(|samples| super::tests_util::count_bits(samples));

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], n, "version bit 50");
        assert_eq!(bins[51], n, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in 70..128 {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
        }
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        for _ in 0..1_000 {
            let e = uuid7().unwrap();
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), 7);
        }
    }

    /// Generates no IDs sharing same timestamp and counters under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_counters_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let _switch = super::tests_util::counter_switch_shared();
        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(uuid7().unwrap()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            let bytes = e.as_bytes();
            s.insert((<[u8; 8]>::try_from(&bytes[..8]).unwrap(), bytes[8] & 0x3c));
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}



#[cfg(test)]
mod tests_entry {
    use super::{generate, must, node_id, set_node_id, set_v7_sequence_counter, use_hardware_node};
    use super::{uuid3, uuid5, uuid7, uuid8};
    use crate::{Error, Uuid, Variant};

    /// Dispatches generation by version number
    #[test]
    fn dispatches_generation_by_version_number() {
        for v in [1, 4, 6, 7] {
            assert_eq!(generate(v).unwrap().version(), v);
        }
        for v in [3, 5, 8] {
            assert!(matches!(generate(v), Err(Error::InputRequired(e)) if e == v));
        }
        for v in [0, 2, 9, 15, 16, 255] {
            assert!(matches!(generate(v), Err(Error::UnsupportedVersion(e)) if e == v));
        }
    }

    /// Delegates name-based and custom versions to encoders
    #[test]
    fn delegates_name_based_and_custom_versions_to_encoders() {
        assert_eq!(
            uuid3(&Uuid::NAMESPACE_DNS, "www.example.com").to_string(),
            "5df41881-3aed-3515-88a7-2f4a814cf09e"
        );
        assert_eq!(
            uuid5(&Uuid::NAMESPACE_DNS, "www.example.com").to_string(),
            "2ed6657d-e927-568b-95e1-2665a8aea6a2"
        );
        assert_eq!(uuid8([0u8; 16]).to_string(), "00000000-0000-8000-8000-000000000000");
    }

    /// Unwraps successful results and panics on errors
    #[test]
    fn unwraps_successful_results_and_panics_on_errors() {
        assert_eq!(
            must("6ba7b811-9dad-11d1-80b4-00c04fd430c8".parse::<Uuid>()),
            Uuid::NAMESPACE_URL
        );
        let result = std::panic::catch_unwind(|| must(generate(2)));
        assert!(result.is_err());
    }

    /// Keeps node identifier stable until overridden
    #[test]
    fn keeps_node_identifier_stable_until_overridden() {
        let node = node_id().unwrap();
        assert_eq!(node_id().unwrap(), node);

        set_node_id([0x03, 0x12, 0x34, 0x56, 0x78, 0x9a]);
        assert_eq!(node_id().unwrap(), [0x03, 0x12, 0x34, 0x56, 0x78, 0x9a]);

        match use_hardware_node() {
            Ok(hw) => assert_eq!(node_id().unwrap(), hw),
            Err(err) => {
                assert!(matches!(err, Error::NodeUnavailable));
                assert_eq!(node_id().unwrap(), [0x03, 0x12, 0x34, 0x56, 0x78, 0x9a]);
            }
        }
    }

    /// Keeps sequence counter on by default
    #[test]
    fn keeps_sequence_counter_on_by_default() {
        let _switch = super::tests_util::counter_switch_shared();
        let x = generate(7).unwrap();
        let y = generate(7).unwrap();
        assert!(x < y);
    }

    /// Fills counter bits randomly while sequence counter is off
    #[test]
    fn fills_counter_bits_randomly_while_sequence_counter_is_off() {
        let _switch = super::tests_util::counter_switch_exclusive();
        set_v7_sequence_counter(false);
        let xs: Vec<Uuid> = (0..1_000).map(|_| uuid7().unwrap()).collect();
        set_v7_sequence_counter(true);

        for e in &xs {
            assert_eq!(e.version(), 7);
            assert_eq!(e.variant(), Variant::Var10);
        }
        // random counter bits break creation order within a millisecond
        assert!(xs.windows(2).any(|w| w[0] > w[1]));

        let x = uuid7().unwrap();
        let y = uuid7().unwrap();
        assert!(x < y);
    }
}
