use sdp::description::TransportInfo;
use serde::{Deserialize, Serialize};

use crate::native::RTCIceCandidateInit;

/// Candidate signaling in either of its two shapes. Raw updates carry one
/// native candidate; structured updates carry whole transports keyed by
/// content and may hold new ICE credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IceUpdate {
    Raw(RTCIceCandidateInit),
    Structured(TransportInfo),
}
