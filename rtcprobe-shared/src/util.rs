use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;


/// Picks an SSRC that is neither zero nor contained in `taken`.
pub fn random_ssrc<R: Rng + ?Sized>(rng: &mut R, taken: &[u32]) -> u32 {
    loop {
        let ssrc = rng.random::<u32>();
        if ssrc != 0 && !taken.contains(&ssrc) {
            return ssrc;
        }
    }
}

/// Milliseconds since the UNIX epoch, used for SDP origin session ids and versions.
pub fn unix_millis() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64)
}
