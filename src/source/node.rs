//! Node identifier sources for UUIDv1 and UUIDv6

use tracing::debug;

use super::EntropySource;
use crate::Error;

/// A trait that defines the 48-bit node identifier interface consumed by the UUIDv1 and UUIDv6
/// generators.
///
/// Implementations are expected to return the same value for the lifetime of the instance.
pub trait NodeSource {
    /// Returns the 6-byte node identifier.
    fn node_id(&mut self) -> Result<[u8; 6], Error>;
}

/// A caller-supplied node identifier.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct FixedNode(/** The node identifier. */ pub [u8; 6]);

impl NodeSource for FixedNode {
    fn node_id(&mut self) -> Result<[u8; 6], Error> {
        Ok(self.0)
    }
}

/// A random node identifier drawn on first use and kept for the lifetime of the instance.
///
/// The multicast and locally administered bits are set so that the value never collides with an
/// IEEE 802 hardware address.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct RandomNode<E> {
    rng: E,
    node: Option<[u8; 6]>,
}

impl<E> RandomNode<E> {
    /// Creates a source that draws the node identifier from `rng`.
    pub const fn new(rng: E) -> Self {
        Self { rng, node: None }
    }
}

impl<E: EntropySource> NodeSource for RandomNode<E> {
    fn node_id(&mut self) -> Result<[u8; 6], Error> {
        if let Some(node) = self.node {
            return Ok(node);
        }

        let mut node = [0u8; 6];
        self.rng.fill_bytes(&mut node)?;
        node[0] |= 0x03;
        debug!(node = ?node, "generated random node identifier");
        self.node = Some(node);
        Ok(node)
    }
}

/// The hardware address of a local network interface.
///
/// The first interface, in the order the operating system reports them, with a non-zero 6-byte
/// address is used. When interfaces cannot be enumerated or none has such an address,
/// [`Error::NodeUnavailable`] is returned; the lookup is retried on the next call.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct HardwareNode {
    node: Option<[u8; 6]>,
}

impl HardwareNode {
    /// Creates a source that looks up the hardware address on first use.
    pub const fn new() -> Self {
        Self { node: None }
    }
}

impl NodeSource for HardwareNode {
    fn node_id(&mut self) -> Result<[u8; 6], Error> {
        if let Some(node) = self.node {
            return Ok(node);
        }

        let node = select_hardware_address(interface_addresses()).ok_or(Error::NodeUnavailable)?;
        debug!(node = ?node, "using hardware address as node identifier");
        self.node = Some(node);
        Ok(node)
    }
}

/// Picks the first usable address; loopback and virtual interfaces without a link-layer address
/// report all zeros.
fn select_hardware_address<I>(addresses: I) -> Option<[u8; 6]>
where
    I: IntoIterator<Item = [u8; 6]>,
{
    addresses.into_iter().find(|node| node != &[0u8; 6])
}

#[cfg(not(target_family = "wasm"))]
fn interface_addresses() -> Vec<[u8; 6]> {
    match mac_address::MacAddressIterator::new() {
        Ok(it) => it.map(|addr| addr.bytes()).collect(),
        Err(err) => {
            debug!(error = %err, "failed to enumerate network interfaces");
            Vec::new()
        }
    }
}

#[cfg(target_family = "wasm")]
fn interface_addresses() -> Vec<[u8; 6]> {
    Vec::new()
}
