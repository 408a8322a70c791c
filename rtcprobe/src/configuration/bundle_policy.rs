use serde::{Deserialize, Serialize};

/// Media bundling policy. Under `MaxBundle` every content shares one
/// transport, so the candidate gatherer drops candidates that repeat an
/// already signalled `(ip, port)` of the same type.
///
/// ## Specifications
///
/// * [W3C RTCBundlePolicy](https://w3c.github.io/webrtc-pc/#rtcbundlepolicy-enum)
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum RTCBundlePolicy {
    #[default]
    #[serde(rename = "balanced")]
    Balanced,

    #[serde(rename = "max-bundle")]
    MaxBundle,
}
