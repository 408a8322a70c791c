//! Seam to the native real-time-media stack.
//!
//! The coordinator never creates sockets or runs ICE itself. Everything that
//! touches the network goes through [`NativePeerConnection`], which a host
//! implements on top of its WebRTC engine.

pub mod data_channel;
pub mod ice_candidate;
pub mod sdp_type;
pub mod session_description;
pub mod stats_report;

use shared::error::Result;

use crate::configuration::{RTCAnswerOptions, RTCOfferOptions};

pub use data_channel::{RTCDataChannelHandle, RTCDataChannelInit};
pub use ice_candidate::RTCIceCandidateInit;
pub use sdp_type::RTCSdpType;
pub use session_description::RTCSessionDescription;
pub use stats_report::RTCStatsReport;

/// Operations the coordinator needs from a native peer connection.
///
/// Each call completes once with success or a failure. Failures should be
/// reported as [`Error::ErrNative`](shared::error::Error::ErrNative); the
/// coordinator forwards them to its caller without retrying.
///
/// State changes (ICE connection, gathering, peer connection) and locally
/// gathered candidates flow the other way: the host feeds them into the
/// [`Negotiator`](crate::negotiator::Negotiator).
#[allow(async_fn_in_trait)]
pub trait NativePeerConnection {
    async fn create_offer(
        &mut self,
        options: Option<RTCOfferOptions>,
    ) -> Result<RTCSessionDescription>;

    async fn create_answer(
        &mut self,
        options: Option<RTCAnswerOptions>,
    ) -> Result<RTCSessionDescription>;

    async fn set_local_description(&mut self, description: RTCSessionDescription) -> Result<()>;

    async fn set_remote_description(&mut self, description: RTCSessionDescription) -> Result<()>;

    async fn add_ice_candidate(&mut self, candidate: RTCIceCandidateInit) -> Result<()>;

    async fn get_stats(&mut self) -> Result<RTCStatsReport>;

    async fn create_data_channel(
        &mut self,
        label: &str,
        options: Option<RTCDataChannelInit>,
    ) -> Result<RTCDataChannelHandle>;

    async fn close(&mut self) -> Result<()>;
}
