use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a session description is an offer or an answer, as understood
/// by the native layer.
///
/// ## Specifications
///
/// * [W3C RTCSessionDescription.type](https://w3c.github.io/webrtc-pc/#dom-rtcsessiondescription-type)
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RTCSdpType {
    Offer,
    Answer,
}

impl fmt::Display for RTCSdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCSdpType::Offer => write!(f, "offer"),
            RTCSdpType::Answer => write!(f, "answer"),
        }
    }
}
