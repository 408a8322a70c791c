pub mod bundle_policy;
pub mod negotiation_policy;
pub mod offer_answer_options;
pub mod rtcp_mux_policy;

use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};
use std::time::Duration;

pub use bundle_policy::RTCBundlePolicy;
pub use negotiation_policy::NegotiationPolicy;
pub use offer_answer_options::{RTCAnswerOptions, RTCOfferOptions};
pub use rtcp_mux_policy::RTCRtcpMuxPolicy;

/// Configuration of one [`Negotiator`](crate::negotiator::Negotiator).
#[derive(Default, Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RTCConfiguration {
    pub(crate) bundle_policy: RTCBundlePolicy,

    pub(crate) rtcp_mux_policy: RTCRtcpMuxPolicy,

    pub(crate) negotiation_policy: NegotiationPolicy,
}

impl RTCConfiguration {
    pub fn bundle_policy(&self) -> RTCBundlePolicy {
        self.bundle_policy
    }

    pub fn rtcp_mux_policy(&self) -> RTCRtcpMuxPolicy {
        self.rtcp_mux_policy
    }

    pub fn negotiation_policy(&self) -> &NegotiationPolicy {
        &self.negotiation_policy
    }

    /// Rejects settings the coordinator cannot act on.
    pub fn validate(&self) -> Result<()> {
        if self.negotiation_policy.candidate_batch_window == Some(Duration::ZERO) {
            return Err(Error::ErrInvalidConfiguration(
                "candidate batch window must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RTCConfigurationBuilder {
    pub(crate) bundle_policy: RTCBundlePolicy,

    pub(crate) rtcp_mux_policy: RTCRtcpMuxPolicy,

    pub(crate) negotiation_policy: NegotiationPolicy,
}

impl RTCConfigurationBuilder {
    pub fn new() -> Self {
        RTCConfigurationBuilder::default()
    }

    pub fn with_bundle_policy(mut self, bundle_policy: RTCBundlePolicy) -> Self {
        self.bundle_policy = bundle_policy;
        self
    }

    pub fn with_rtcp_mux_policy(mut self, rtcp_mux_policy: RTCRtcpMuxPolicy) -> Self {
        self.rtcp_mux_policy = rtcp_mux_policy;
        self
    }

    pub fn with_negotiation_policy(mut self, negotiation_policy: NegotiationPolicy) -> Self {
        self.negotiation_policy = negotiation_policy;
        self
    }

    pub fn build(self) -> RTCConfiguration {
        RTCConfiguration {
            bundle_policy: self.bundle_policy,
            rtcp_mux_policy: self.rtcp_mux_policy,
            negotiation_policy: self.negotiation_policy,
        }
    }
}
