use serde::{Deserialize, Serialize};

/// Options for a data channel opened through the native layer.
///
/// ## Specifications
///
/// * [W3C RTCDataChannelInit](https://w3c.github.io/webrtc-pc/#dom-rtcdatachannelinit)
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RTCDataChannelInit {
    pub ordered: Option<bool>,
    pub max_packet_life_time: Option<u16>,
    pub max_retransmits: Option<u16>,
    pub protocol: Option<String>,
    pub negotiated: Option<u16>,
}

/// What the native layer hands back for a newly created data channel.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCDataChannelHandle {
    pub id: Option<u16>,
    pub label: String,
}
