pub mod description_event;
pub mod ice_update;

use shared::error::Error;

use crate::native::{RTCDataChannelHandle, RTCSdpType};
use crate::state::{
    NegotiationState, RTCIceConnectionState, RTCIceGatheringState, RTCPeerConnectionState,
};

pub use description_event::{DescriptionEvent, DescriptionPhase};
pub use ice_update::IceUpdate;

/// Everything a [`Negotiator`](crate::negotiator::Negotiator) tells its
/// caller, drained through `poll_event`.
#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationEvent {
    /// Local offer ready for signaling.
    Offer(DescriptionEvent),
    /// Local answer ready for signaling.
    Answer(DescriptionEvent),
    /// The native layer accepted a description previously emitted as
    /// provisional.
    DescriptionConfirmed(RTCSdpType),
    /// Local candidates to signal to the remote peer.
    Ice(IceUpdate),
    /// No further local candidates will follow.
    EndOfCandidates,
    /// The remote peer restarted ICE on the named content.
    IceRestart(String),
    Error(Error),
    AddChannel(RTCDataChannelHandle),
    NegotiationStateChange(NegotiationState),
    IceConnectionStateChange(RTCIceConnectionState),
    IceGatheringStateChange(RTCIceGatheringState),
    ConnectionStateChange(RTCPeerConnectionState),
}
