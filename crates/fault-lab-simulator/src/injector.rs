use rand::Rng;
use serde::Serialize;
use tracing::debug;

/// Upper bound of bit flips applied to one corrupted packet.
pub const MAX_BIT_ERRORS: usize = 3;

/// One applied bit flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitFlip {
    pub byte: usize,
    pub bit: u8,
}

/// Probabilistic bit-error injection.
#[derive(Debug, Clone, Copy)]
pub struct FaultInjector {
    error_rate: f64,
}

impl FaultInjector {
    pub fn new(error_rate: f64) -> Self {
        Self { error_rate }
    }

    /// With probability `error_rate`, flip between one and three random bits
    /// of `payload` in place and return the flips applied. Positions are drawn
    /// independently, so the same bit may be flipped twice and end up
    /// unchanged. Returns `None` and leaves `payload` untouched otherwise.
    pub fn inject<R: Rng + ?Sized>(&self, rng: &mut R, payload: &mut [u8]) -> Option<Vec<BitFlip>> {
        if payload.is_empty() || rng.random::<f64>() >= self.error_rate {
            return None;
        }

        let num_errors = rng.random_range(1..=MAX_BIT_ERRORS);
        let mut flips = Vec::with_capacity(num_errors);
        for _ in 0..num_errors {
            let byte = rng.random_range(0..payload.len());
            let bit = rng.random_range(0..8u8);
            payload[byte] ^= 1 << bit;
            flips.push(BitFlip { byte, bit });
        }
        debug!("Injected {} bit error(s): {:?}", flips.len(), flips);
        Some(flips)
    }
}
