use std::fmt;

use serde::{Deserialize, Serialize};

/// ICE gathering progress reported by the native layer. Local candidates
/// are held back until this reaches `Gathering`.
///
/// ## Specifications
///
/// * [W3C RTCIceGatheringState](https://w3c.github.io/webrtc-pc/#dom-rtcicegatheringstate)
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RTCIceGatheringState {
    #[default]
    New,
    Gathering,
    Complete,
}

impl fmt::Display for RTCIceGatheringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCIceGatheringState::New => "new",
            RTCIceGatheringState::Gathering => "gathering",
            RTCIceGatheringState::Complete => "complete",
        };
        write!(f, "{s}")
    }
}
