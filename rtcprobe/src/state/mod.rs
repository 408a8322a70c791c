pub mod ice_connection_state;
pub mod ice_gathering_state;
pub mod negotiation_state;
pub mod peer_connection_state;

pub use ice_connection_state::RTCIceConnectionState;
pub use ice_gathering_state::RTCIceGatheringState;
pub use negotiation_state::NegotiationState;
pub use peer_connection_state::RTCPeerConnectionState;
