use serde::{Deserialize, Serialize};

/// Options handed to the native layer when creating an answer.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCAnswerOptions {
    /// Request voice activity detection where the codecs support it.
    #[serde(default)]
    pub voice_activity_detection: bool,
}

/// Options handed to the native layer when creating an offer.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCOfferOptions {
    /// Generate fresh ICE credentials, restarting ICE on every content.
    #[serde(default)]
    pub ice_restart: bool,
    #[serde(default)]
    pub offer_to_receive_audio: bool,
    #[serde(default)]
    pub offer_to_receive_video: bool,
}
