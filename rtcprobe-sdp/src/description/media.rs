use serde::{Deserialize, Serialize};

use crate::senders::Senders;

/// RTP-style application of a media section.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtpApplication {
    pub media: String,
    #[serde(default)]
    pub payloads: Vec<Payload>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encryption: Vec<Encryption>,
    /// Media-level feedback, i.e. `a=rtcp-fb:*` lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<Feedback>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_extensions: Vec<HeaderExtension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_groups: Vec<SourceGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Bandwidth>,
    #[serde(default)]
    pub mux: bool,
    #[serde(default)]
    pub rsize: bool,
    /// Fallback ssrc for sources that carry none of their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssrc: Option<u32>,
}

fn default_channels() -> u16 {
    1
}

/// One RTP codec: `a=rtpmap` plus its `a=fmtp` and `a=rtcp-fb` lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub id: u8,
    pub name: String,
    pub clockrate: u32,
    #[serde(default = "default_channels")]
    pub channels: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxptime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptime: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<Feedback>,
}

impl Default for Payload {
    fn default() -> Self {
        Payload {
            id: 0,
            name: String::new(),
            clockrate: 0,
            channels: default_channels(),
            maxptime: None,
            ptime: None,
            parameters: vec![],
            feedback: vec![],
        }
    }
}

/// A fmtp token or an ssrc attribute.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Parameter {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(rename = "type")]
    pub feedback_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subtype: String,
    /// Only set for `trr-int`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

/// `a=crypto:` (SDES-SRTP).
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encryption {
    pub tag: String,
    pub cipher_suite: String,
    pub key_params: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_params: Option<String>,
}

/// `a=extmap:`
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderExtension {
    pub id: u16,
    pub uri: String,
    #[serde(default)]
    pub senders: Senders,
}

/// RFC 5576 source with its attributes in first-seen order.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssrc: Option<u32>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Source {
    pub fn has_parameter(&self, key: &str) -> bool {
        self.parameters.iter().any(|p| p.key == key)
    }
}

/// `a=ssrc-group:`
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceGroup {
    pub semantics: String,
    #[serde(default)]
    pub sources: Vec<u32>,
}

/// `b=<type>:<bandwidth>`
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bandwidth {
    #[serde(rename = "type")]
    pub bandwidth_type: String,
    pub bandwidth: u32,
}
