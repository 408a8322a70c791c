#![warn(rust_2018_idioms)]
#![allow(dead_code)]

//! Offer/answer and ICE negotiation coordinator for WebRTC diagnostics.
//!
//! A [`negotiator::Negotiator`] sits between signaling and a host-provided
//! [`native::NativePeerConnection`], translating descriptions through the
//! [`sdp`] codec and applying the [`configuration::NegotiationPolicy`].

pub mod configuration;
pub mod event;
pub mod gatherer;
pub mod loopback;
pub mod native;
pub mod negotiator;
pub mod simulcast;
pub mod state;

pub use {sansio, sdp, shared};
