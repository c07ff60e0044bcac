use thiserror::Error;

use crate::packet::{Packet, RouterId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transmission {src}->{dst} failed: {reason}")]
pub struct TransmitError {
    pub src: RouterId,
    pub dst: RouterId,
    pub reason: String,
}

impl TransmitError {
    pub fn new(packet: &Packet, reason: impl Into<String>) -> Self {
        Self {
            src: packet.src,
            dst: packet.dst,
            reason: reason.into(),
        }
    }
}

/// The network being stress-tested. The harness hands every packet, after
/// fault injection, to this collaborator and records the outcome around it.
pub trait NetworkUnderTest {
    /// Carry `packet` from `packet.src` to `packet.dst`.
    /// `corrupted` tells the network whether bit errors were injected.
    /// An error is counted as a failed transmission, never dropped.
    fn transmit(&mut self, packet: &Packet, corrupted: bool) -> Result<(), TransmitError>;
}

/// Accepts every packet. The transmission itself is modelled purely by the
/// driver's simulated delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelayOnlyNetwork;

impl NetworkUnderTest for DelayOnlyNetwork {
    fn transmit(&mut self, _packet: &Packet, _corrupted: bool) -> Result<(), TransmitError> {
        Ok(())
    }
}
