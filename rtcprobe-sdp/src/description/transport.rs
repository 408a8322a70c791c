use serde::{Deserialize, Serialize};
use std::fmt;

use crate::senders::Role;

pub const TRANSPORT_ICE_UDP: &str = "iceUdp";

fn default_transport_type() -> String {
    TRANSPORT_ICE_UDP.to_owned()
}

/// ICE transport of one content. Candidates are only ever populated together
/// with `credentials`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    #[serde(default = "default_transport_type")]
    pub transport_type: String,
    #[serde(flatten)]
    pub credentials: Option<IceCredentials>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fingerprints: Vec<Fingerprint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sctp: Vec<Sctpmap>,
}

impl Default for Transport {
    fn default() -> Self {
        Transport {
            transport_type: default_transport_type(),
            credentials: None,
            fingerprints: vec![],
            candidates: vec![],
            sctp: vec![],
        }
    }
}

impl Transport {
    pub fn ufrag(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.ufrag.as_str())
    }
}

/// ICE username fragment and password. Both or neither.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCredentials {
    pub ufrag: String,
    pub pwd: String,
}

impl IceCredentials {
    pub fn new(ufrag: impl Into<String>, pwd: impl Into<String>) -> Self {
        IceCredentials {
            ufrag: ufrag.into(),
            pwd: pwd.into(),
        }
    }
}

/// `a=fingerprint:` with the section's `a=setup:` role.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub hash: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
}

/// `a=sctpmap:<number> <protocol> <streams>`
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sctpmap {
    pub number: u16,
    pub protocol: String,
    pub streams: u16,
}

/// Represents the type of an ICE candidate.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateType {
    #[default]
    #[serde(rename = "host")]
    Host,
    #[serde(rename = "srflx")]
    ServerReflexive,
    #[serde(rename = "prflx")]
    PeerReflexive,
    #[serde(rename = "relay")]
    Relay,
}

const CANDIDATE_TYPE_HOST_STR: &str = "host";
const CANDIDATE_TYPE_SRFLX_STR: &str = "srflx";
const CANDIDATE_TYPE_PRFLX_STR: &str = "prflx";
const CANDIDATE_TYPE_RELAY_STR: &str = "relay";

impl CandidateType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            CANDIDATE_TYPE_HOST_STR => Some(CandidateType::Host),
            CANDIDATE_TYPE_SRFLX_STR => Some(CandidateType::ServerReflexive),
            CANDIDATE_TYPE_PRFLX_STR => Some(CandidateType::PeerReflexive),
            CANDIDATE_TYPE_RELAY_STR => Some(CandidateType::Relay),
            _ => None,
        }
    }
}

impl fmt::Display for CandidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            CandidateType::Host => CANDIDATE_TYPE_HOST_STR,
            CandidateType::ServerReflexive => CANDIDATE_TYPE_SRFLX_STR,
            CandidateType::PeerReflexive => CANDIDATE_TYPE_PRFLX_STR,
            CandidateType::Relay => CANDIDATE_TYPE_RELAY_STR,
        };
        write!(f, "{s}")
    }
}

/// TCP candidate type (RFC 6544).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TcpType {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "passive")]
    Passive,
    #[serde(rename = "so")]
    SimultaneousOpen,
}

const TCP_TYPE_ACTIVE_STR: &str = "active";
const TCP_TYPE_PASSIVE_STR: &str = "passive";
const TCP_TYPE_SO_STR: &str = "so";

impl TcpType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            TCP_TYPE_ACTIVE_STR => Some(TcpType::Active),
            TCP_TYPE_PASSIVE_STR => Some(TcpType::Passive),
            TCP_TYPE_SO_STR => Some(TcpType::SimultaneousOpen),
            _ => None,
        }
    }
}

impl fmt::Display for TcpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            TcpType::Active => TCP_TYPE_ACTIVE_STR,
            TcpType::Passive => TCP_TYPE_PASSIVE_STR,
            TcpType::SimultaneousOpen => TCP_TYPE_SO_STR,
        };
        write!(f, "{s}")
    }
}

/// Structured ICE candidate. `id` is regenerated on every parse.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub id: String,
    pub foundation: String,
    pub component: u16,
    pub protocol: String,
    pub priority: u32,
    pub ip: String,
    pub port: u16,
    #[serde(rename = "type")]
    pub candidate_type: CandidateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_port: Option<u16>,
    #[serde(default)]
    pub generation: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_type: Option<TcpType>,
    #[serde(default)]
    pub network: String,
}

impl Candidate {
    /// Transport preference carried in the top byte of the priority.
    pub fn type_preference(&self) -> u32 {
        self.priority >> 24
    }
}

/// Per-content candidate batch exchanged through the signaling channel.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportInfo {
    #[serde(default)]
    pub contents: Vec<TransportContent>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportContent {
    pub name: String,
    #[serde(default)]
    pub creator: Role,
    #[serde(default)]
    pub transport: Transport,
}
