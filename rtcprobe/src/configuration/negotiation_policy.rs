use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Negotiation behaviours that trade strictness for latency or
/// interoperability. Everything is off by default.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NegotiationPolicy {
    /// Emit offer/answer events before the native layer has accepted the
    /// local description, followed by a confirmation once it has.
    pub assume_set_local_success: bool,
    /// Synthesize a second simulcast SSRC plus RTX into video answers.
    pub simulcast: bool,
    /// Signal one relay candidate per `(foundation, component)`.
    pub eliminate_duplicate_candidates: bool,
    /// Gather but never signal local candidates.
    pub dont_signal_candidates: bool,
    /// Accumulate outbound candidates per content and flush them once per
    /// window instead of one event per candidate.
    #[serde(rename = "candidateBatchWindowMs", with = "duration_ms")]
    pub candidate_batch_window: Option<Duration>,
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        window: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match window {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
