use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload length of the reference workload.
pub const PACKET_SIZE: usize = 64;

/// Opaque router identifier in `0..num_routers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouterId(pub u32);

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// One source/destination pair of a traffic pattern. `src != dst` always holds
/// for pairs produced by the traffic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficPair {
    pub src: RouterId,
    pub dst: RouterId,
}

impl TrafficPair {
    pub fn new(src: u32, dst: u32) -> Self {
        Self {
            src: RouterId(src),
            dst: RouterId(dst),
        }
    }
}

/// A single simulated transmission. Lives only for one pass through the
/// injector and the network under test.
#[derive(Debug, Clone)]
pub struct Packet {
    pub src: RouterId,
    pub dst: RouterId,
    pub payload: BytesMut,
}

impl Packet {
    pub fn new(pair: TrafficPair, payload: BytesMut) -> Self {
        Self {
            src: pair.src,
            dst: pair.dst,
            payload,
        }
    }
}
