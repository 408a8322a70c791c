#![warn(rust_2018_idioms)]
#![allow(dead_code)]

//! Bidirectional SDP ⇄ structured session codec.
//!
//! [`builder`] turns SDP text into a [`description::SessionDescription`],
//! [`serializer`] writes it back. Sender roles are resolved through the
//! [`senders`] table for a given role and direction.

pub mod builder;
pub mod candidate;
pub mod description;
pub mod parser;
pub mod senders;
pub mod serializer;

pub use builder::{MediaOptions, SessionOptions, to_media_json, to_session_json};
pub use candidate::CandidateCodec;
pub use serializer::{SerializeOptions, to_media_sdp, to_session_sdp};
