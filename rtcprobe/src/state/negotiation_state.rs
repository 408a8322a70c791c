use std::fmt;

use serde::{Deserialize, Serialize};

/// Offer/answer progress of one [`Negotiator`](crate::negotiator::Negotiator).
///
/// The offering side walks `New → OfferSent → AnswerReceived → Stable`, the
/// answering side `New → OfferReceived → Stable`. A stable negotiator may
/// start another round. `Closed` is terminal and reachable from anywhere.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationState {
    #[default]
    #[serde(rename = "new")]
    New,
    #[serde(rename = "offer-sent")]
    OfferSent,
    #[serde(rename = "offer-received")]
    OfferReceived,
    #[serde(rename = "answer-received")]
    AnswerReceived,
    #[serde(rename = "stable")]
    Stable,
    #[serde(rename = "closed")]
    Closed,
}

const NEGOTIATION_STATE_NEW_STR: &str = "new";
const NEGOTIATION_STATE_OFFER_SENT_STR: &str = "offer-sent";
const NEGOTIATION_STATE_OFFER_RECEIVED_STR: &str = "offer-received";
const NEGOTIATION_STATE_ANSWER_RECEIVED_STR: &str = "answer-received";
const NEGOTIATION_STATE_STABLE_STR: &str = "stable";
const NEGOTIATION_STATE_CLOSED_STR: &str = "closed";

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            NegotiationState::New => NEGOTIATION_STATE_NEW_STR,
            NegotiationState::OfferSent => NEGOTIATION_STATE_OFFER_SENT_STR,
            NegotiationState::OfferReceived => NEGOTIATION_STATE_OFFER_RECEIVED_STR,
            NegotiationState::AnswerReceived => NEGOTIATION_STATE_ANSWER_RECEIVED_STR,
            NegotiationState::Stable => NEGOTIATION_STATE_STABLE_STR,
            NegotiationState::Closed => NEGOTIATION_STATE_CLOSED_STR,
        };
        write!(f, "{s}")
    }
}

impl NegotiationState {
    /// Whether a fresh offer/answer round may start from this state.
    pub fn can_start_round(&self) -> bool {
        matches!(self, NegotiationState::New | NegotiationState::Stable)
    }
}
