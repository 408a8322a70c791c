use super::*;
use crate::description::{CandidateType, Sctpmap};

const SCENARIO_A: &str = "v=0\r\no=- 1 1 IN IP4 0.0.0.0\r\ns=-\r\nt=0 0\r\nm=audio 9 UDP/TLS/RTP/SAVPF 111\r\nc=IN IP4 0.0.0.0\r\na=rtpmap:111 opus/48000/2\r\na=ice-ufrag:abcd\r\na=ice-pwd:efgh1234\r\na=fingerprint:sha-256 AA:BB\r\na=setup:actpass\r\na=mid:audio\r\na=sendrecv\r\n";

#[test]
fn test_scenario_a() -> Result<()> {
    let mut codec = CandidateCodec::new(0);
    let opts = SessionOptions::new(Role::Responder, Direction::Incoming);
    let session = to_session_json(SCENARIO_A, &opts, &mut codec)?;

    assert_eq!(session.contents.len(), 1);
    let content = &session.contents[0];
    assert_eq!(content.name, "audio");
    assert_eq!(content.senders, Some(Senders::Both));
    assert_eq!(content.creator, Role::Initiator);

    let rtp = content.rtp().expect("rtp application");
    assert_eq!(rtp.media, "audio");
    assert_eq!(rtp.payloads.len(), 1);
    assert_eq!(rtp.payloads[0].id, 111);
    assert_eq!(rtp.payloads[0].name, "opus");
    assert_eq!(rtp.payloads[0].clockrate, 48000);
    assert_eq!(rtp.payloads[0].channels, 2);

    assert_eq!(content.transport.ufrag(), Some("abcd"));
    assert_eq!(
        content.transport.credentials,
        Some(IceCredentials::new("abcd", "efgh1234"))
    );
    assert_eq!(content.transport.fingerprints.len(), 1);
    assert_eq!(content.transport.fingerprints[0].hash, "sha-256");
    assert_eq!(content.transport.fingerprints[0].setup.as_deref(), Some("actpass"));

    Ok(())
}

#[test]
fn test_senders_unset_without_direction() -> Result<()> {
    let sdp = "v=0\r\ns=-\r\nm=video 9 RTP/AVPF 96\r\na=rtpmap:96 VP8/90000\r\n";
    let mut codec = CandidateCodec::new(0);
    let session = to_session_json(sdp, &SessionOptions::default(), &mut codec)?;
    assert_eq!(session.contents[0].name, "video");
    assert_eq!(session.contents[0].senders, None);
    assert_eq!(session.contents[0].transport.credentials, None);
    Ok(())
}

#[test]
fn test_session_level_attributes_are_hoisted() -> Result<()> {
    let sdp = "v=0\r\ns=-\r\na=ice-ufrag:sess\r\na=ice-pwd:sesspwd\r\na=sendonly\r\na=group:BUNDLE a0 v0\r\nm=audio 9 RTP/AVPF 0\r\na=mid:a0\r\na=candidate:1 1 udp 2122260223 10.0.0.1 5000 typ host\r\nm=video 9 RTP/AVPF 96\r\na=mid:v0\r\na=recvonly\r\na=ice-ufrag:media\r\na=ice-pwd:mediapwd\r\n";
    let mut codec = CandidateCodec::new(0);
    let opts = SessionOptions {
        role: Role::Initiator,
        direction: Direction::Outgoing,
        creators: vec![Role::Initiator, Role::Responder],
    };
    let session = to_session_json(sdp, &opts, &mut codec)?;

    assert_eq!(session.groups.len(), 1);
    assert_eq!(session.groups[0].contents, vec!["a0", "v0"]);

    let audio = &session.contents[0];
    assert_eq!(audio.senders, Some(Senders::Initiator));
    assert_eq!(audio.transport.ufrag(), Some("sess"));
    assert_eq!(audio.transport.candidates.len(), 1);
    assert_eq!(audio.transport.candidates[0].id, "0");

    let video = &session.contents[1];
    assert_eq!(video.creator, Role::Responder);
    assert_eq!(video.senders, Some(Senders::Responder));
    assert_eq!(video.transport.ufrag(), Some("media"));
    Ok(())
}

#[test]
fn test_candidates_dropped_without_credentials() -> Result<()> {
    let sdp = "v=0\r\nm=audio 9 RTP/AVPF 0\r\na=ice-ufrag:only\r\na=candidate:1 1 udp 2122260223 10.0.0.1 5000 typ host\r\n";
    let mut codec = CandidateCodec::new(0);
    let session = to_session_json(sdp, &SessionOptions::default(), &mut codec)?;
    let transport = &session.contents[0].transport;
    assert_eq!(transport.credentials, None);
    assert!(transport.candidates.is_empty());
    Ok(())
}

#[test]
fn test_rtp_details() -> Result<()> {
    let sdp = "v=0\r\n\
s=-\r\n\
m=video 9 UDP/TLS/RTP/SAVPF 96 97\r\n\
b=AS:1000\r\n\
a=rtcp-mux\r\n\
a=rtcp-rsize\r\n\
a=extmap:2/recvonly urn:ietf:params:rtp-hdrext:toffset\r\n\
a=extmap:3 http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time\r\n\
a=rtpmap:96 VP8/90000\r\n\
a=rtcp-fb:96 nack\r\n\
a=rtcp-fb:96 nack pli\r\n\
a=rtpmap:97 rtx/90000\r\n\
a=fmtp:97 apt=96\r\n\
a=rtcp-fb:* trr-int 100\r\n\
a=ssrc-group:FID 1 2\r\n\
a=ssrc:1 cname:c\r\n\
a=ssrc:2 cname:c\r\n\
a=msid:stream track\r\n\
a=crypto:1 AES_CM_128_HMAC_SHA1_80 inline:key\r\n";
    let mut codec = CandidateCodec::new(0);
    let opts = SessionOptions::new(Role::Initiator, Direction::Incoming);
    let session = to_session_json(sdp, &opts, &mut codec)?;
    let rtp = session.contents[0].rtp().expect("rtp application");

    assert!(rtp.mux);
    assert!(rtp.rsize);
    assert_eq!(rtp.bandwidth.as_ref().map(|b| b.bandwidth), Some(1000));
    assert_eq!(rtp.payloads[0].feedback.len(), 2);
    assert_eq!(rtp.payloads[1].parameters, vec![Parameter::new("apt", "96")]);
    assert_eq!(rtp.feedback.len(), 1);
    assert_eq!(rtp.feedback[0].feedback_type, "trr-int");
    assert_eq!(rtp.header_extensions[0].senders, Senders::Initiator);
    assert_eq!(rtp.header_extensions[1].senders, Senders::Both);
    assert_eq!(rtp.source_groups[0].sources, vec![1, 2]);
    assert_eq!(rtp.encryption.len(), 1);
    assert_eq!(rtp.ssrc, Some(1));

    let source = &rtp.sources[0];
    assert_eq!(
        source.parameters,
        vec![
            Parameter::new("cname", "c"),
            Parameter::new("msid", "stream track"),
            Parameter::new("mslabel", "stream"),
            Parameter::new("label", "track"),
        ]
    );
    Ok(())
}

#[test]
fn test_datachannel_section() -> Result<()> {
    let sdp = "v=0\r\nm=application 9 DTLS/SCTP 5000\r\na=mid:data\r\na=sctpmap:5000 webrtc-datachannel 1024\r\n";
    let mut codec = CandidateCodec::new(0);
    let session = to_session_json(sdp, &SessionOptions::default(), &mut codec)?;
    let content = &session.contents[0];
    assert_eq!(content.application, Application::DataChannel);
    assert_eq!(content.media(), "application");
    assert_eq!(
        content.transport.sctp,
        vec![Sctpmap {
            number: 5000,
            protocol: "webrtc-datachannel".to_owned(),
            streams: 1024,
        }]
    );
    Ok(())
}

#[test]
fn test_duplicate_names_are_kept() -> Result<()> {
    let sdp = "v=0\r\nm=audio 9 RTP/AVPF 0\r\nm=audio 9 RTP/AVPF 8\r\n";
    let mut codec = CandidateCodec::new(0);
    let session = to_session_json(sdp, &SessionOptions::default(), &mut codec)?;
    assert_eq!(session.contents.len(), 2);
    assert_eq!(session.contents[0].name, session.contents[1].name);
    Ok(())
}

#[test]
fn test_errors() {
    let mut codec = CandidateCodec::new(0);
    assert_eq!(
        to_session_json("", &SessionOptions::default(), &mut codec),
        Err(Error::ErrEmptySessionDescription)
    );

    let sdp = "v=0\r\nm=audio 9 RTP/AVPF 0\r\na=extmap:1/sometimes urn:x\r\n";
    assert!(matches!(
        to_session_json(sdp, &SessionOptions::default(), &mut codec),
        Err(Error::ErrUnknownDirection { .. })
    ));

    let sdp = "v=0\r\nm=audio 9 RTP/AVPF 0\r\na=ice-ufrag:u\r\na=ice-pwd:p\r\na=candidate:1 1 udp 1 10.0.0.1\r\n";
    assert!(matches!(
        to_session_json(sdp, &SessionOptions::default(), &mut codec),
        Err(Error::ErrParse { attribute: "candidate", .. })
    ));
}

#[test]
fn test_to_media_json() -> Result<()> {
    let media = "m=audio 9 RTP/AVPF 0\r\na=rtpmap:0 PCMU/8000\r\n";
    let session = "v=0\r\na=ice-ufrag:u\r\na=ice-pwd:p\r\na=inactive\r\n";
    let mut codec = CandidateCodec::new(0);
    let opts = MediaOptions {
        role: Role::Responder,
        direction: Direction::Outgoing,
        creator: Role::Responder,
    };
    let content = to_media_json(media, session, &opts, &mut codec)?;
    assert_eq!(content.senders, Some(Senders::None));
    assert_eq!(content.creator, Role::Responder);
    assert_eq!(content.transport.ufrag(), Some("u"));
    assert_eq!(content.rtp().map(|r| r.payloads[0].name.as_str()), Some("PCMU"));
    Ok(())
}

#[test]
fn test_candidate_type_preserved() -> Result<()> {
    let sdp = "v=0\r\nm=audio 9 RTP/AVPF 0\r\na=ice-ufrag:u\r\na=ice-pwd:p\r\na=candidate:1 1 udp 41885439 198.51.100.1 3478 typ relay raddr 10.0.0.1 rport 5000\r\n";
    let mut codec = CandidateCodec::new(0);
    let session = to_session_json(sdp, &SessionOptions::default(), &mut codec)?;
    let c = &session.contents[0].transport.candidates[0];
    assert_eq!(c.candidate_type, CandidateType::Relay);
    assert_eq!(c.rel_port, Some(5000));
    Ok(())
}
