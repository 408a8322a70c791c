#![allow(dead_code)]

use std::time::SystemTimeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    //SDP
    /// ErrParse indicates a structurally invalid SDP attribute line.
    #[error("sdp: malformed {attribute} line: {line:?}")]
    ErrParse { line: String, attribute: &'static str },
    /// ErrIncompleteTransport indicates a transport carrying candidates
    /// without a resolvable ice-ufrag/ice-pwd pair.
    #[error("sdp: content {0:?} has candidates but no ice-ufrag/ice-pwd")]
    ErrIncompleteTransport(String),
    /// ErrUnknownDirection indicates a senders/direction token missing from
    /// the direction table for the given role and direction.
    #[error("sdp: unknown senders {senders:?} for role {role} and direction {direction}")]
    ErrUnknownDirection {
        role: String,
        direction: String,
        senders: String,
    },
    #[error("sdp: empty session description")]
    ErrEmptySessionDescription,

    //Negotiation
    /// ErrIceRestartMismatch indicates an ICE restart for a content that is
    /// absent from the local session. The negotiation has to start over.
    #[error("negotiation: ice restart for unknown content {0:?}")]
    ErrIceRestartMismatch(String),
    /// ErrNegotiationState indicates an operation invoked out of sequence.
    #[error("negotiation: {operation} is not allowed in state {state}")]
    ErrNegotiationState {
        operation: &'static str,
        state: String,
    },
    #[error("negotiation: connection closed")]
    ErrConnectionClosed,
    #[error("negotiation: no remote description")]
    ErrNoRemoteDescription,
    #[error("negotiation: invalid configuration: {0}")]
    ErrInvalidConfiguration(String),

    /// ErrNative wraps a rejection coming from the native real-time-media layer.
    #[error("native: {0}")]
    ErrNative(String),

    #[error("{0}")]
    Other(String),
}

impl From<SystemTimeError> for Error {
    fn from(e: SystemTimeError) -> Self {
        Error::Other(e.to_string())
    }
}

impl Error {
    /// Builds a parse error for `attribute` from the offending line.
    pub fn parse(line: &str, attribute: &'static str) -> Self {
        Error::ErrParse {
            line: line.to_owned(),
            attribute,
        }
    }
}
