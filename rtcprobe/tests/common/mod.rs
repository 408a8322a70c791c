#![allow(dead_code)]

use rtcprobe::configuration::{RTCAnswerOptions, RTCOfferOptions};
use rtcprobe::native::{
    NativePeerConnection, RTCDataChannelHandle, RTCDataChannelInit, RTCIceCandidateInit,
    RTCSessionDescription, RTCStatsReport,
};
use rtcprobe::shared::error::{Error, Result};

pub const OFFER_SDP: &str = "v=0\r
o=- 1 2 IN IP4 127.0.0.1\r
s=-\r
t=0 0\r
a=group:BUNDLE audio video\r
m=audio 9 UDP/TLS/RTP/SAVPF 111\r
c=IN IP4 0.0.0.0\r
a=ice-ufrag:offerA\r
a=ice-pwd:offerpasswordaudio0000000\r
a=fingerprint:sha-256 19:E2:1C:3B:4B:9F:81:E6:B8:5C:F4:A5:A8:D8:73:04:BB:05:2F:70:9F:04:A9:0E:05:E9:26:33:E8:70:88:A2\r
a=setup:actpass\r
a=mid:audio\r
a=sendrecv\r
a=rtcp-mux\r
a=rtpmap:111 opus/48000/2\r
a=ssrc:1001 cname:probe\r
m=video 9 UDP/TLS/RTP/SAVPF 96\r
c=IN IP4 0.0.0.0\r
a=ice-ufrag:offerV\r
a=ice-pwd:offerpasswordvideo0000000\r
a=fingerprint:sha-256 19:E2:1C:3B:4B:9F:81:E6:B8:5C:F4:A5:A8:D8:73:04:BB:05:2F:70:9F:04:A9:0E:05:E9:26:33:E8:70:88:A2\r
a=setup:actpass\r
a=mid:video\r
a=sendrecv\r
a=rtcp-mux\r
a=rtpmap:96 VP8/90000\r
a=ssrc:2001 cname:probe\r
a=ssrc:2001 msid:stream video0\r
";

pub const ANSWER_SDP: &str = "v=0\r
o=- 3 4 IN IP4 127.0.0.1\r
s=-\r
t=0 0\r
a=group:BUNDLE audio video\r
m=audio 9 UDP/TLS/RTP/SAVPF 111\r
c=IN IP4 0.0.0.0\r
a=ice-ufrag:answerA\r
a=ice-pwd:answerpasswordaudio000000\r
a=fingerprint:sha-256 AB:E2:1C:3B:4B:9F:81:E6:B8:5C:F4:A5:A8:D8:73:04:BB:05:2F:70:9F:04:A9:0E:05:E9:26:33:E8:70:88:A2\r
a=setup:active\r
a=mid:audio\r
a=sendrecv\r
a=rtcp-mux\r
a=rtpmap:111 opus/48000/2\r
a=ssrc:3001 cname:answer\r
m=video 9 UDP/TLS/RTP/SAVPF 96\r
c=IN IP4 0.0.0.0\r
a=ice-ufrag:answerV\r
a=ice-pwd:answerpasswordvideo000000\r
a=fingerprint:sha-256 AB:E2:1C:3B:4B:9F:81:E6:B8:5C:F4:A5:A8:D8:73:04:BB:05:2F:70:9F:04:A9:0E:05:E9:26:33:E8:70:88:A2\r
a=setup:active\r
a=mid:video\r
a=sendrecv\r
a=rtcp-mux\r
a=rtpmap:96 VP8/90000\r
a=ssrc:4001 cname:answer\r
a=ssrc:4001 msid:answer video1\r
";

/// An answer that only accepts the audio content.
pub const AUDIO_ONLY_ANSWER_SDP: &str = "v=0\r
o=- 5 6 IN IP4 127.0.0.1\r
s=-\r
t=0 0\r
m=audio 9 UDP/TLS/RTP/SAVPF 111\r
c=IN IP4 0.0.0.0\r
a=ice-ufrag:answerA\r
a=ice-pwd:answerpasswordaudio000000\r
a=setup:active\r
a=mid:audio\r
a=sendrecv\r
a=rtpmap:111 opus/48000/2\r
";

/// What the coordinator asked of the native layer, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateOffer,
    CreateAnswer,
    SetLocalDescription(RTCSessionDescription),
    SetRemoteDescription(RTCSessionDescription),
    AddIceCandidate(RTCIceCandidateInit),
    GetStats,
    CreateDataChannel(String),
    Close,
}

/// Scripted native peer connection recording every call.
#[derive(Debug, Clone)]
pub struct MockPeerConnection {
    pub calls: Vec<Call>,
    pub offer_sdp: String,
    pub answer_sdp: String,
    /// Names of the operations that fail.
    pub failing: Vec<&'static str>,
    /// Names of the operations whose next call never completes.
    pub hanging: Vec<&'static str>,
    next_channel_id: u16,
}

impl Default for MockPeerConnection {
    fn default() -> Self {
        MockPeerConnection {
            calls: vec![],
            offer_sdp: OFFER_SDP.to_owned(),
            answer_sdp: ANSWER_SDP.to_owned(),
            failing: vec![],
            hanging: vec![],
            next_channel_id: 0,
        }
    }
}

impl MockPeerConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.push(operation);
        self
    }

    pub fn hanging(mut self, operation: &'static str) -> Self {
        self.hanging.push(operation);
        self
    }

    pub fn with_answer(mut self, sdp: &str) -> Self {
        self.answer_sdp = sdp.to_owned();
        self
    }

    async fn hang_once(&mut self, operation: &'static str) {
        if let Some(i) = self.hanging.iter().position(|op| *op == operation) {
            self.hanging.remove(i);
            std::future::pending::<()>().await;
        }
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.failing.contains(&operation) {
            Err(Error::ErrNative(format!("{operation} rejected")))
        } else {
            Ok(())
        }
    }

    pub fn set_remote_calls(&self) -> Vec<&RTCSessionDescription> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetRemoteDescription(desc) => Some(desc),
                _ => None,
            })
            .collect()
    }

    pub fn added_candidates(&self) -> Vec<&RTCIceCandidateInit> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::AddIceCandidate(init) => Some(init),
                _ => None,
            })
            .collect()
    }
}

impl NativePeerConnection for MockPeerConnection {
    async fn create_offer(
        &mut self,
        _options: Option<RTCOfferOptions>,
    ) -> Result<RTCSessionDescription> {
        self.calls.push(Call::CreateOffer);
        self.check("create_offer")?;
        Ok(RTCSessionDescription::offer(self.offer_sdp.clone()))
    }

    async fn create_answer(
        &mut self,
        _options: Option<RTCAnswerOptions>,
    ) -> Result<RTCSessionDescription> {
        self.calls.push(Call::CreateAnswer);
        self.check("create_answer")?;
        Ok(RTCSessionDescription::answer(self.answer_sdp.clone()))
    }

    async fn set_local_description(&mut self, description: RTCSessionDescription) -> Result<()> {
        self.calls.push(Call::SetLocalDescription(description));
        self.hang_once("set_local_description").await;
        self.check("set_local_description")
    }

    async fn set_remote_description(&mut self, description: RTCSessionDescription) -> Result<()> {
        self.calls.push(Call::SetRemoteDescription(description));
        self.hang_once("set_remote_description").await;
        self.check("set_remote_description")
    }

    async fn add_ice_candidate(&mut self, candidate: RTCIceCandidateInit) -> Result<()> {
        self.calls.push(Call::AddIceCandidate(candidate));
        self.check("add_ice_candidate")
    }

    async fn get_stats(&mut self) -> Result<RTCStatsReport> {
        self.calls.push(Call::GetStats);
        self.check("get_stats")?;
        let mut report = RTCStatsReport::default();
        report.reports.insert(
            "transport".to_owned(),
            serde_json::json!({"type": "transport", "bytesSent": 0}),
        );
        Ok(report)
    }

    async fn create_data_channel(
        &mut self,
        label: &str,
        _options: Option<RTCDataChannelInit>,
    ) -> Result<RTCDataChannelHandle> {
        self.calls.push(Call::CreateDataChannel(label.to_owned()));
        self.check("create_data_channel")?;
        let id = self.next_channel_id;
        self.next_channel_id += 1;
        Ok(RTCDataChannelHandle {
            id: Some(id),
            label: label.to_owned(),
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.calls.push(Call::Close);
        self.check("close")
    }
}

pub fn init_log() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init()
        .ok();
}
