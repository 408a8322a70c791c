pub mod media;
pub mod transport;

use serde::{Deserialize, Serialize};

pub use media::*;
pub use transport::*;

use crate::senders::{Role, Senders};

/// Structured form of an SDP session: one [`MediaContent`] per m-line, in
/// m-line order, plus the session-level `a=group:` lines.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescription {
    #[serde(default)]
    pub contents: Vec<MediaContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
}

/// `a=group:<semantics> <mid>...`
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub semantics: String,
    #[serde(default)]
    pub contents: Vec<String>,
}

/// One media section. `name` is the mid, or the media type when the section
/// carries no `a=mid:`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContent {
    #[serde(default)]
    pub creator: Role,
    pub name: String,
    /// Unset when the section carries no direction attribute at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senders: Option<Senders>,
    pub application: Application,
    #[serde(default)]
    pub transport: Transport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "applicationType")]
pub enum Application {
    #[serde(rename = "rtp")]
    Rtp(RtpApplication),
    #[serde(rename = "datachannel")]
    DataChannel,
}

impl Default for Application {
    fn default() -> Self {
        Application::Rtp(RtpApplication::default())
    }
}

impl SessionDescription {
    pub fn content(&self, name: &str) -> Option<&MediaContent> {
        self.contents.iter().find(|c| c.name == name)
    }

    pub fn content_mut(&mut self, name: &str) -> Option<&mut MediaContent> {
        self.contents.iter_mut().find(|c| c.name == name)
    }
}

impl MediaContent {
    /// The m-line media token: `audio`, `video` or `application`.
    pub fn media(&self) -> &str {
        match &self.application {
            Application::Rtp(rtp) => rtp.media.as_str(),
            Application::DataChannel => "application",
        }
    }

    pub fn rtp(&self) -> Option<&RtpApplication> {
        match &self.application {
            Application::Rtp(rtp) => Some(rtp),
            Application::DataChannel => None,
        }
    }

    pub fn rtp_mut(&mut self) -> Option<&mut RtpApplication> {
        match &mut self.application {
            Application::Rtp(rtp) => Some(rtp),
            Application::DataChannel => None,
        }
    }
}
