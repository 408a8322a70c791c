
use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};
use std::fmt;

/// Which side of the session a description is interpreted for.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "initiator")]
    Initiator,
    #[serde(rename = "responder")]
    Responder,
}

/// Whether a description travels towards (incoming) or away from (outgoing)
/// the local side.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "incoming")]
    Incoming,
    #[default]
    #[serde(rename = "outgoing")]
    Outgoing,
}

/// Abstract sender role of a content, independent of which side reads it.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Senders {
    #[serde(rename = "initiator")]
    Initiator,
    #[serde(rename = "responder")]
    Responder,
    #[default]
    #[serde(rename = "both")]
    Both,
    #[serde(rename = "none")]
    None,
}

/// SDP media direction attribute.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SdpDirection {
    #[default]
    #[serde(rename = "sendrecv")]
    SendRecv,
    #[serde(rename = "sendonly")]
    SendOnly,
    #[serde(rename = "recvonly")]
    RecvOnly,
    #[serde(rename = "inactive")]
    Inactive,
}

const ROLE_INITIATOR_STR: &str = "initiator";
const ROLE_RESPONDER_STR: &str = "responder";
const DIRECTION_INCOMING_STR: &str = "incoming";
const DIRECTION_OUTGOING_STR: &str = "outgoing";
const SENDERS_BOTH_STR: &str = "both";
const SENDERS_NONE_STR: &str = "none";
const SENDRECV_STR: &str = "sendrecv";
const SENDONLY_STR: &str = "sendonly";
const RECVONLY_STR: &str = "recvonly";
const INACTIVE_STR: &str = "inactive";

type Table = [(&'static str, &'static str); 8];

const INITIATOR_INCOMING: Table = [
    (ROLE_INITIATOR_STR, RECVONLY_STR),
    (ROLE_RESPONDER_STR, SENDONLY_STR),
    (SENDERS_BOTH_STR, SENDRECV_STR),
    (SENDERS_NONE_STR, INACTIVE_STR),
    (RECVONLY_STR, ROLE_INITIATOR_STR),
    (SENDONLY_STR, ROLE_RESPONDER_STR),
    (SENDRECV_STR, SENDERS_BOTH_STR),
    (INACTIVE_STR, SENDERS_NONE_STR),
];

const INITIATOR_OUTGOING: Table = [
    (ROLE_INITIATOR_STR, SENDONLY_STR),
    (ROLE_RESPONDER_STR, RECVONLY_STR),
    (SENDERS_BOTH_STR, SENDRECV_STR),
    (SENDERS_NONE_STR, INACTIVE_STR),
    (SENDONLY_STR, ROLE_INITIATOR_STR),
    (RECVONLY_STR, ROLE_RESPONDER_STR),
    (SENDRECV_STR, SENDERS_BOTH_STR),
    (INACTIVE_STR, SENDERS_NONE_STR),
];

const RESPONDER_INCOMING: Table = [
    (ROLE_INITIATOR_STR, SENDONLY_STR),
    (ROLE_RESPONDER_STR, RECVONLY_STR),
    (SENDERS_BOTH_STR, SENDRECV_STR),
    (SENDERS_NONE_STR, INACTIVE_STR),
    (SENDONLY_STR, ROLE_INITIATOR_STR),
    (RECVONLY_STR, ROLE_RESPONDER_STR),
    (SENDRECV_STR, SENDERS_BOTH_STR),
    (INACTIVE_STR, SENDERS_NONE_STR),
];

const RESPONDER_OUTGOING: Table = [
    (ROLE_INITIATOR_STR, RECVONLY_STR),
    (ROLE_RESPONDER_STR, SENDONLY_STR),
    (SENDERS_BOTH_STR, SENDRECV_STR),
    (SENDERS_NONE_STR, INACTIVE_STR),
    (RECVONLY_STR, ROLE_INITIATOR_STR),
    (SENDONLY_STR, ROLE_RESPONDER_STR),
    (SENDRECV_STR, SENDERS_BOTH_STR),
    (INACTIVE_STR, SENDERS_NONE_STR),
];

fn table(role: Role, direction: Direction) -> &'static Table {
    match (role, direction) {
        (Role::Initiator, Direction::Incoming) => &INITIATOR_INCOMING,
        (Role::Initiator, Direction::Outgoing) => &INITIATOR_OUTGOING,
        (Role::Responder, Direction::Incoming) => &RESPONDER_INCOMING,
        (Role::Responder, Direction::Outgoing) => &RESPONDER_OUTGOING,
    }
}

/// Translates a senders or SDP direction token through the table for
/// `(role, direction)`. Each table is a bijection between the sender roles
/// and the SDP direction tokens and is its own inverse.
pub fn translate(role: Role, direction: Direction, token: &str) -> Result<&'static str> {
    table(role, direction)
        .iter()
        .find(|(from, _)| *from == token)
        .map(|(_, to)| *to)
        .ok_or_else(|| Error::ErrUnknownDirection {
            role: role.to_string(),
            direction: direction.to_string(),
            senders: token.to_owned(),
        })
}

/// Maps an SDP direction attribute onto the abstract senders value.
pub fn to_senders(role: Role, direction: Direction, sdp_direction: SdpDirection) -> Result<Senders> {
    let token = translate(role, direction, sdp_direction.as_str())?;
    Senders::from_token(token).ok_or_else(|| Error::ErrUnknownDirection {
        role: role.to_string(),
        direction: direction.to_string(),
        senders: token.to_owned(),
    })
}

/// Maps an abstract senders value back onto the SDP direction attribute.
pub fn to_sdp_direction(role: Role, direction: Direction, senders: Senders) -> Result<SdpDirection> {
    let token = translate(role, direction, senders.as_str())?;
    SdpDirection::from_token(token).ok_or_else(|| Error::ErrUnknownDirection {
        role: role.to_string(),
        direction: direction.to_string(),
        senders: token.to_owned(),
    })
}

impl Role {
    pub fn flip(self) -> Self {
        match self {
            Role::Initiator => Role::Responder,
            Role::Responder => Role::Initiator,
        }
    }
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Direction::Incoming => Direction::Outgoing,
            Direction::Outgoing => Direction::Incoming,
        }
    }
}

impl Senders {
    pub fn as_str(&self) -> &'static str {
        match self {
            Senders::Initiator => ROLE_INITIATOR_STR,
            Senders::Responder => ROLE_RESPONDER_STR,
            Senders::Both => SENDERS_BOTH_STR,
            Senders::None => SENDERS_NONE_STR,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            ROLE_INITIATOR_STR => Some(Senders::Initiator),
            ROLE_RESPONDER_STR => Some(Senders::Responder),
            SENDERS_BOTH_STR => Some(Senders::Both),
            SENDERS_NONE_STR => Some(Senders::None),
            _ => None,
        }
    }
}

impl SdpDirection {
    pub const ALL: [SdpDirection; 4] = [
        SdpDirection::SendRecv,
        SdpDirection::SendOnly,
        SdpDirection::RecvOnly,
        SdpDirection::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SdpDirection::SendRecv => SENDRECV_STR,
            SdpDirection::SendOnly => SENDONLY_STR,
            SdpDirection::RecvOnly => RECVONLY_STR,
            SdpDirection::Inactive => INACTIVE_STR,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            SENDRECV_STR => Some(SdpDirection::SendRecv),
            SENDONLY_STR => Some(SdpDirection::SendOnly),
            RECVONLY_STR => Some(SdpDirection::RecvOnly),
            INACTIVE_STR => Some(SdpDirection::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Role::Initiator => ROLE_INITIATOR_STR,
            Role::Responder => ROLE_RESPONDER_STR,
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Incoming => DIRECTION_INCOMING_STR,
            Direction::Outgoing => DIRECTION_OUTGOING_STR,
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Senders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SdpDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
