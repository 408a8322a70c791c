
use shared::error::{Error, Result};
use shared::util::unix_millis;

use crate::candidate::CandidateCodec;
use crate::description::{
    Application, Feedback, MediaContent, Parameter, RtpApplication, SessionDescription, Transport,
};
use crate::senders::{Direction, Role, SdpDirection, to_sdp_direction};

const END_LINE: &str = "\r\n";
const PROTO_DTLS_SRTP: &str = "UDP/TLS/RTP/SAVPF";
const PROTO_SDES_SRTP: &str = "RTP/SAVPF";
const PROTO_RTP: &str = "RTP/AVPF";
const PROTO_DTLS_SCTP: &str = "DTLS/SCTP";
const TRR_INT: &str = "trr-int";

/// How a [`SessionDescription`] is written back to SDP.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    pub role: Role,
    pub direction: Direction,
    /// Origin session id; current UNIX time in milliseconds when unset.
    pub sid: Option<u64>,
    /// Origin session version; current UNIX time in milliseconds when unset.
    pub time: Option<u64>,
}

impl SerializeOptions {
    pub fn new(role: Role, direction: Direction) -> Self {
        SerializeOptions {
            role,
            direction,
            sid: None,
            time: None,
        }
    }
}

/// Writes a whole session as CRLF-terminated SDP text.
pub fn to_session_sdp(session: &SessionDescription, opts: &SerializeOptions) -> Result<String> {
    let sid = match opts.sid {
        Some(sid) => sid,
        None => unix_millis()?,
    };
    let time = match opts.time {
        Some(time) => time,
        None => unix_millis()?,
    };

    let mut sdp = vec![
        "v=0".to_owned(),
        format!("o=- {sid} {time} IN IP4 0.0.0.0"),
        "s=-".to_owned(),
        "t=0 0".to_owned(),
        "a=msid-semantic: WMS *".to_owned(),
    ];
    for group in &session.groups {
        sdp.push(format!(
            "a=group:{} {}",
            group.semantics,
            group.contents.join(" ")
        ));
    }

    let mut out = sdp.join(END_LINE) + END_LINE;
    for content in &session.contents {
        out += &to_media_sdp(content, opts)?;
    }
    Ok(out)
}

/// Writes one media section as CRLF-terminated SDP text.
pub fn to_media_sdp(content: &MediaContent, opts: &SerializeOptions) -> Result<String> {
    let mut sdp = vec![];
    let transport = &content.transport;

    match &content.application {
        Application::Rtp(rtp) => {
            let proto = if !transport.fingerprints.is_empty() {
                PROTO_DTLS_SRTP
            } else if !rtp.encryption.is_empty() {
                PROTO_SDES_SRTP
            } else {
                PROTO_RTP
            };
            let formats: Vec<String> = rtp.payloads.iter().map(|p| p.id.to_string()).collect();
            sdp.push(format!("m={} 9 {} {}", rtp.media, proto, formats.join(" ")));
            sdp.push("c=IN IP4 0.0.0.0".to_owned());
            if let Some(bw) = &rtp.bandwidth {
                sdp.push(format!("b={}:{}", bw.bandwidth_type, bw.bandwidth));
            }
            sdp.push("a=rtcp:1 IN IP4 0.0.0.0".to_owned());
        }
        Application::DataChannel => {
            let formats: Vec<String> = transport.sctp.iter().map(|s| s.number.to_string()).collect();
            sdp.push(format!(
                "m=application 9 {} {}",
                PROTO_DTLS_SCTP,
                formats.join(" ")
            ));
            sdp.push("c=IN IP4 0.0.0.0".to_owned());
        }
    }

    write_transport(&mut sdp, transport);

    let direction = match (&content.application, content.senders) {
        (_, Some(senders)) => Some(to_sdp_direction(opts.role, opts.direction, senders)?),
        (Application::Rtp(_), None) => Some(SdpDirection::SendRecv),
        (Application::DataChannel, None) => None,
    };
    if let Some(direction) = direction {
        sdp.push(format!("a={direction}"));
    }

    sdp.push(format!("a=mid:{}", content.name));

    if let Application::Rtp(rtp) = &content.application {
        write_rtp(&mut sdp, rtp, opts)?;
    }

    if !transport.candidates.is_empty() {
        if transport.credentials.is_none() {
            return Err(Error::ErrIncompleteTransport(content.name.clone()));
        }
        sdp.extend(transport.candidates.iter().map(CandidateCodec::to_candidate_sdp));
    }

    Ok(sdp.join(END_LINE) + END_LINE)
}

fn write_transport(sdp: &mut Vec<String>, transport: &Transport) {
    if let Some(credentials) = &transport.credentials {
        sdp.push(format!("a=ice-ufrag:{}", credentials.ufrag));
        sdp.push(format!("a=ice-pwd:{}", credentials.pwd));
    }

    for fp in &transport.fingerprints {
        sdp.push(format!("a=fingerprint:{} {}", fp.hash, fp.value));
    }
    if let Some(setup) = transport.fingerprints.iter().find_map(|fp| fp.setup.as_ref()) {
        sdp.push(format!("a=setup:{setup}"));
    }

    for sctp in &transport.sctp {
        sdp.push(format!(
            "a=sctpmap:{} {} {}",
            sctp.number, sctp.protocol, sctp.streams
        ));
    }
}

fn write_rtp(sdp: &mut Vec<String>, rtp: &RtpApplication, opts: &SerializeOptions) -> Result<()> {
    if rtp.mux {
        sdp.push("a=rtcp-mux".to_owned());
    }
    if rtp.rsize {
        sdp.push("a=rtcp-rsize".to_owned());
    }

    for crypto in &rtp.encryption {
        let mut line = format!(
            "a=crypto:{} {} {}",
            crypto.tag, crypto.cipher_suite, crypto.key_params
        );
        if let Some(session_params) = &crypto.session_params {
            line += &format!(" {session_params}");
        }
        sdp.push(line);
    }

    for payload in &rtp.payloads {
        let mut rtpmap = format!("a=rtpmap:{} {}/{}", payload.id, payload.name, payload.clockrate);
        if payload.channels != 1 {
            rtpmap += &format!("/{}", payload.channels);
        }
        sdp.push(rtpmap);

        if !payload.parameters.is_empty() {
            let params: Vec<String> = payload.parameters.iter().map(fmtp_token).collect();
            sdp.push(format!("a=fmtp:{} {}", payload.id, params.join(";")));
        }

        let id = payload.id.to_string();
        for fb in &payload.feedback {
            sdp.push(rtcp_fb_line(&id, fb));
        }
    }

    if let Some(ptime) = rtp.payloads.iter().find_map(|p| p.ptime) {
        sdp.push(format!("a=ptime:{ptime}"));
    }
    if let Some(maxptime) = rtp.payloads.iter().find_map(|p| p.maxptime) {
        sdp.push(format!("a=maxptime:{maxptime}"));
    }

    for fb in &rtp.feedback {
        sdp.push(rtcp_fb_line("*", fb));
    }

    for ext in &rtp.header_extensions {
        match to_sdp_direction(opts.role, opts.direction, ext.senders)? {
            SdpDirection::SendRecv => sdp.push(format!("a=extmap:{} {}", ext.id, ext.uri)),
            direction => sdp.push(format!("a=extmap:{}/{} {}", ext.id, direction, ext.uri)),
        }
    }

    for group in &rtp.source_groups {
        let ssrcs: Vec<String> = group.sources.iter().map(u32::to_string).collect();
        sdp.push(format!(
            "a=ssrc-group:{} {}",
            group.semantics,
            ssrcs.join(" ")
        ));
    }

    for source in &rtp.sources {
        let Some(ssrc) = source.ssrc.or(rtp.ssrc) else {
            continue;
        };
        if source.parameters.is_empty() {
            sdp.push(format!("a=ssrc:{ssrc}"));
        }
        for param in &source.parameters {
            match &param.value {
                Some(value) => sdp.push(format!("a=ssrc:{ssrc} {}:{value}", param.key)),
                None => sdp.push(format!("a=ssrc:{ssrc} {}", param.key)),
            }
        }
    }

    Ok(())
}

fn fmtp_token(param: &Parameter) -> String {
    match (param.key.as_str(), &param.value) {
        ("", Some(value)) => value.clone(),
        (key, Some(value)) => format!("{key}={value}"),
        (key, None) => key.to_owned(),
    }
}

fn rtcp_fb_line(id: &str, fb: &Feedback) -> String {
    let mut line = format!("a=rtcp-fb:{id} {}", fb.feedback_type);
    if fb.feedback_type == TRR_INT {
        if let Some(value) = &fb.value {
            line += &format!(" {value}");
        }
        return line;
    }
    if !fb.subtype.is_empty() {
        line += &format!(" {}", fb.subtype);
    }
    for param in &fb.parameters {
        line += &format!(" {param}");
    }
    line
}
