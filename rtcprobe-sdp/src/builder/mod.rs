#[cfg(test)]
mod builder_test;

use log::{trace, warn};
use shared::error::{Error, Result};
use std::collections::HashSet;

use crate::candidate::CandidateCodec;
use crate::description::{
    Application, Feedback, HeaderExtension, IceCredentials, MediaContent, Parameter, Payload,
    RtpApplication, SessionDescription, Transport,
};
use crate::parser::{self, *};
use crate::senders::{Direction, Role, SdpDirection, Senders, to_senders};

const MEDIA_APPLICATION: &str = "application";
const FEEDBACK_ALL_PAYLOADS: &str = "*";

/// How a whole SDP is interpreted.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub role: Role,
    pub direction: Direction,
    /// Creator per m-line, by index. Missing entries default to the initiator.
    pub creators: Vec<Role>,
}

/// How a single media section is interpreted.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct MediaOptions {
    pub role: Role,
    pub direction: Direction,
    pub creator: Role,
}

impl SessionOptions {
    pub fn new(role: Role, direction: Direction) -> Self {
        SessionOptions {
            role,
            direction,
            creators: vec![],
        }
    }

    fn media(&self, index: usize) -> MediaOptions {
        MediaOptions {
            role: self.role,
            direction: self.direction,
            creator: self.creators.get(index).copied().unwrap_or_default(),
        }
    }
}

/// Parses SDP text into a [`SessionDescription`]. Candidate ids are drawn
/// from `codec`.
pub fn to_session_json(
    sdp: &str,
    opts: &SessionOptions,
    codec: &mut CandidateCodec,
) -> Result<SessionDescription> {
    let lines = parser::lines(sdp);
    if lines.is_empty() {
        return Err(Error::ErrEmptySessionDescription);
    }

    let (session_lines, sections) = split_sections(&lines);

    let mut contents = Vec::with_capacity(sections.len());
    let mut seen = HashSet::new();
    for (i, media_lines) in sections.iter().enumerate() {
        let content = media_from_lines(media_lines, session_lines, &opts.media(i), codec)?;
        if !seen.insert(content.name.clone()) {
            warn!(
                "duplicate content name {:?} at m-line {}; lookups by name resolve to the first",
                content.name, i
            );
        }
        contents.push(content);
    }

    Ok(SessionDescription {
        contents,
        groups: parser::groups(&find_lines(ATTR_GROUP, session_lines, None))?,
    })
}

/// Parses one media section, using `session` for the attributes that may
/// be hoisted to session level.
pub fn to_media_json(
    media: &str,
    session: &str,
    opts: &MediaOptions,
    codec: &mut CandidateCodec,
) -> Result<MediaContent> {
    let media_lines = parser::lines(media);
    if media_lines.is_empty() {
        return Err(Error::ErrEmptySessionDescription);
    }
    let session_lines = parser::lines(session);
    media_from_lines(&media_lines, &session_lines, opts, codec)
}

/// Splits lines into the session part and one slice per `m=` section.
fn split_sections<'a, 'b>(lines: &'b [&'a str]) -> (&'b [&'a str], Vec<&'b [&'a str]>) {
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with(LINE_MEDIA))
        .map(|(i, _)| i)
        .collect();

    let Some(&first) = starts.first() else {
        return (lines, vec![]);
    };

    let sections = starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(lines.len());
            &lines[start..end]
        })
        .collect();

    (&lines[..first], sections)
}

fn direction_attribute(lines: &[&str]) -> Option<SdpDirection> {
    lines
        .iter()
        .find_map(|l| l.strip_prefix("a=").and_then(SdpDirection::from_token))
}

fn senders_from_token(role: Role, direction: Direction, token: &str) -> Result<Senders> {
    let sdp_direction =
        SdpDirection::from_token(token).ok_or_else(|| Error::ErrUnknownDirection {
            role: role.to_string(),
            direction: direction.to_string(),
            senders: token.to_owned(),
        })?;
    to_senders(role, direction, sdp_direction)
}

fn media_from_lines(
    media: &[&str],
    session: &[&str],
    opts: &MediaOptions,
    codec: &mut CandidateCodec,
) -> Result<MediaContent> {
    let mline = parser::mline(media[0])?;
    let name = find_line(ATTR_MID, media, None)
        .map(|l| value(l, ATTR_MID).to_owned())
        .unwrap_or_else(|| mline.media.clone());

    let senders = direction_attribute(media)
        .or_else(|| direction_attribute(session))
        .map(|d| to_senders(opts.role, opts.direction, d))
        .transpose()?;

    trace!("parsing {} section {:?} (senders {:?})", mline.media, name, senders);

    let mut transport = transport(media, session, codec)?;
    let application = if mline.media == MEDIA_APPLICATION {
        transport.sctp = find_lines(ATTR_SCTPMAP, media, None)
            .into_iter()
            .map(sctpmap)
            .collect::<Result<_>>()?;
        Application::DataChannel
    } else {
        Application::Rtp(rtp_application(mline.media, media, session, opts)?)
    };

    Ok(MediaContent {
        creator: opts.creator,
        name,
        senders,
        application,
        transport,
    })
}

fn rtp_application(
    media_type: String,
    media: &[&str],
    session: &[&str],
    opts: &MediaOptions,
) -> Result<RtpApplication> {
    let fmtps = find_lines(ATTR_FMTP, media, None)
        .into_iter()
        .map(fmtp)
        .collect::<Result<Vec<_>>>()?;
    let feedbacks = find_lines(ATTR_RTCP_FB, media, None)
        .into_iter()
        .map(rtcpfb)
        .collect::<Result<Vec<(String, Feedback)>>>()?;

    let ptime = find_line(ATTR_PTIME, media, None)
        .map(|l| u32_attribute(l, ATTR_PTIME, "ptime"))
        .transpose()?;
    let maxptime = find_line(ATTR_MAXPTIME, media, None)
        .map(|l| u32_attribute(l, ATTR_MAXPTIME, "maxptime"))
        .transpose()?;

    let mut payloads: Vec<Payload> = find_lines(ATTR_RTPMAP, media, None)
        .into_iter()
        .map(rtpmap)
        .collect::<Result<_>>()?;
    for payload in &mut payloads {
        let id = payload.id.to_string();
        payload.ptime = ptime;
        payload.maxptime = maxptime;
        payload.parameters = fmtps
            .iter()
            .filter(|(fmtp_id, _)| *fmtp_id == payload.id)
            .flat_map(|(_, params)| params.iter().cloned())
            .collect();
        payload.feedback = feedbacks
            .iter()
            .filter(|(fb_id, _)| *fb_id == id)
            .map(|(_, fb)| fb.clone())
            .collect();
    }

    let header_extensions = find_lines(ATTR_EXTMAP, media, None)
        .into_iter()
        .map(|l| {
            let ext = extmap(l)?;
            Ok(HeaderExtension {
                id: ext.id,
                uri: ext.uri,
                senders: senders_from_token(opts.role, opts.direction, &ext.direction)?,
            })
        })
        .collect::<Result<_>>()?;

    let mut sources = parser::sources(&find_lines(ATTR_SSRC, media, None))?;
    if let Some(line) = find_line(ATTR_MSID, media, Some(session)) {
        let msid = parser::msid(line)?;
        let full = value(line, ATTR_MSID).to_owned();
        for source in &mut sources {
            if !source.has_parameter("msid") {
                source.parameters.push(Parameter::new("msid", full.clone()));
            }
            if !source.has_parameter("mslabel") {
                source
                    .parameters
                    .push(Parameter::new("mslabel", msid.stream.clone()));
            }
            if let Some(track) = &msid.track {
                if !source.has_parameter("label") {
                    source.parameters.push(Parameter::new("label", track.clone()));
                }
            }
        }
    }

    let ssrc = sources.first().and_then(|s| s.ssrc);

    Ok(RtpApplication {
        media: media_type,
        payloads,
        encryption: find_lines(ATTR_CRYPTO, media, Some(session))
            .into_iter()
            .map(crypto)
            .collect::<Result<_>>()?,
        feedback: feedbacks
            .into_iter()
            .filter(|(id, _)| id == FEEDBACK_ALL_PAYLOADS)
            .map(|(_, fb)| fb)
            .collect(),
        header_extensions,
        sources,
        source_groups: source_groups(&find_lines(ATTR_SSRC_GROUP, media, None))?,
        bandwidth: find_line(LINE_BANDWIDTH, media, None)
            .map(bandwidth)
            .transpose()?,
        mux: media.contains(&ATTR_RTCP_MUX),
        rsize: media.contains(&ATTR_RTCP_RSIZE),
        ssrc,
    })
}

fn transport(media: &[&str], session: &[&str], codec: &mut CandidateCodec) -> Result<Transport> {
    let setup = find_line(ATTR_SETUP, media, Some(session)).map(|l| value(l, ATTR_SETUP).to_owned());
    let fingerprints = find_lines(ATTR_FINGERPRINT, media, Some(session))
        .into_iter()
        .map(|l| {
            let mut fp = fingerprint(l)?;
            fp.setup = setup.clone();
            Ok(fp)
        })
        .collect::<Result<_>>()?;

    let ufrag = find_line(ATTR_ICE_UFRAG, media, Some(session));
    let pwd = find_line(ATTR_ICE_PWD, media, Some(session));

    let (credentials, candidates) = match (ufrag, pwd) {
        (Some(ufrag), Some(pwd)) => (
            Some(IceCredentials::new(
                value(ufrag, ATTR_ICE_UFRAG),
                value(pwd, ATTR_ICE_PWD),
            )),
            find_lines(ATTR_CANDIDATE, media, None)
                .into_iter()
                .map(|l| codec.to_candidate_json(l))
                .collect::<Result<_>>()?,
        ),
        _ => (None, vec![]),
    };

    Ok(Transport {
        credentials,
        fingerprints,
        candidates,
        ..Default::default()
    })
}
