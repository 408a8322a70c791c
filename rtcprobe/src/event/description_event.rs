use sdp::description::SessionDescription;
use serde::{Deserialize, Serialize};

/// Whether the native layer has accepted the description yet.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptionPhase {
    /// Emitted before `set_local_description` resolved, only when the
    /// negotiation policy assumes it will succeed.
    #[serde(rename = "provisional")]
    Provisional,
    #[default]
    #[serde(rename = "confirmed")]
    Confirmed,
}

/// A local offer or answer, structured for signaling and as the raw SDP
/// handed to the native layer.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionEvent {
    pub session: SessionDescription,
    pub sdp: String,
    pub phase: DescriptionPhase,
}
