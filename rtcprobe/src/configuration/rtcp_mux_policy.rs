use serde::{Deserialize, Serialize};

/// Whether RTCP is multiplexed with RTP. With `Require`, RTCP-component
/// candidates are never signalled.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RTCRtcpMuxPolicy {
    #[default]
    Negotiate,
    Require,
}
