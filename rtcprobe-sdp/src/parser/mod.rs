//! Fixed-format parsers for the SDP attribute lines the codec understands.
//!
//! Every parser strips its attribute prefix and splits the remainder
//! positionally. A structurally invalid line yields [`Error::ErrParse`];
//! a missing attribute is never an error here.


use std::str::FromStr;

use shared::error::{Error, Result};

use crate::description::{
    Bandwidth, Candidate, CandidateType, Encryption, Feedback, Fingerprint, Group, Parameter,
    Payload, Sctpmap, Source, SourceGroup, TcpType,
};

pub const ATTR_MID: &str = "a=mid:";
pub const ATTR_RTPMAP: &str = "a=rtpmap:";
pub const ATTR_FMTP: &str = "a=fmtp:";
pub const ATTR_RTCP_FB: &str = "a=rtcp-fb:";
pub const ATTR_CRYPTO: &str = "a=crypto:";
pub const ATTR_FINGERPRINT: &str = "a=fingerprint:";
pub const ATTR_SETUP: &str = "a=setup:";
pub const ATTR_EXTMAP: &str = "a=extmap:";
pub const ATTR_ICE_UFRAG: &str = "a=ice-ufrag:";
pub const ATTR_ICE_PWD: &str = "a=ice-pwd:";
pub const ATTR_CANDIDATE: &str = "a=candidate:";
pub const ATTR_SSRC: &str = "a=ssrc:";
pub const ATTR_SSRC_GROUP: &str = "a=ssrc-group:";
pub const ATTR_GROUP: &str = "a=group:";
pub const ATTR_MSID: &str = "a=msid:";
pub const ATTR_SCTPMAP: &str = "a=sctpmap:";
pub const ATTR_RTCP_MUX: &str = "a=rtcp-mux";
pub const ATTR_RTCP_RSIZE: &str = "a=rtcp-rsize";
pub const ATTR_PTIME: &str = "a=ptime:";
pub const ATTR_MAXPTIME: &str = "a=maxptime:";
pub const LINE_BANDWIDTH: &str = "b=";
pub const LINE_MEDIA: &str = "m=";

const CANDIDATE_PREFIX: &str = "candidate:";
const TRR_INT: &str = "trr-int";

/// Parsed `m=` line.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MediaLine {
    pub media: String,
    pub port: u16,
    pub proto: String,
    pub formats: Vec<String>,
}

/// Parsed `a=extmap:` line. `direction` is the raw SDP token, `sendrecv`
/// when the line carries none.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ExtmapLine {
    pub id: u16,
    pub direction: String,
    pub uri: String,
}

/// Parsed `a=msid:<stream> [<track>]` line.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MsidLine {
    pub stream: String,
    pub track: Option<String>,
}

/// Splits SDP text into lines, tolerating bare LF line endings.
pub fn lines(sdp: &str) -> Vec<&str> {
    sdp.split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty())
        .collect()
}

/// First line starting with `prefix`, media lines first. `session_lines`
/// is only consulted when passed and nothing matched at media level.
pub fn find_line<'a>(
    prefix: &str,
    media_lines: &[&'a str],
    session_lines: Option<&[&'a str]>,
) -> Option<&'a str> {
    media_lines
        .iter()
        .find(|l| l.starts_with(prefix))
        .or_else(|| session_lines?.iter().find(|l| l.starts_with(prefix)))
        .copied()
}

/// All lines starting with `prefix`, with the same fallback as [`find_line`].
pub fn find_lines<'a>(
    prefix: &str,
    media_lines: &[&'a str],
    session_lines: Option<&[&'a str]>,
) -> Vec<&'a str> {
    let found: Vec<&str> = media_lines
        .iter()
        .filter(|l| l.starts_with(prefix))
        .copied()
        .collect();
    match session_lines {
        Some(session) if found.is_empty() => session
            .iter()
            .filter(|l| l.starts_with(prefix))
            .copied()
            .collect(),
        _ => found,
    }
}

/// Value of a `<prefix><value>` line.
pub fn value<'a>(line: &'a str, prefix: &str) -> &'a str {
    line.get(prefix.len()..).unwrap_or_default().trim()
}

fn number<T: FromStr>(token: &str, line: &str, attribute: &'static str) -> Result<T> {
    token.parse().map_err(|_| Error::parse(line, attribute))
}

fn fields<'a>(line: &'a str, prefix: &str) -> Vec<&'a str> {
    value(line, prefix).split_whitespace().collect()
}

pub fn mline(line: &str) -> Result<MediaLine> {
    let parts = fields(line, LINE_MEDIA);
    if parts.len() < 3 {
        return Err(Error::parse(line, "m"));
    }
    Ok(MediaLine {
        media: parts[0].to_owned(),
        port: number(parts[1], line, "m")?,
        proto: parts[2].to_owned(),
        formats: parts[3..].iter().map(|s| (*s).to_owned()).collect(),
    })
}

/// `a=rtpmap:<id> <name>/<clockrate>[/<channels>]`
pub fn rtpmap(line: &str) -> Result<Payload> {
    let parts = fields(line, ATTR_RTPMAP);
    if parts.len() < 2 {
        return Err(Error::parse(line, "rtpmap"));
    }
    let id = number(parts[0], line, "rtpmap")?;
    let mut codec = parts[1].split('/');
    let name = codec.next().unwrap_or_default();
    let clockrate = codec
        .next()
        .ok_or_else(|| Error::parse(line, "rtpmap"))
        .and_then(|c| number(c, line, "rtpmap"))?;
    let channels = match codec.next() {
        Some(c) => number(c, line, "rtpmap")?,
        None => 1,
    };

    Ok(Payload {
        id,
        name: name.to_owned(),
        clockrate,
        channels,
        ..Default::default()
    })
}

/// `a=fmtp:<id> <k>=<v>;<k>=<v>;<token>` returning the payload id and its
/// parameters. A token without `=` is kept with an empty key.
pub fn fmtp(line: &str) -> Result<(u8, Vec<Parameter>)> {
    let rest = value(line, ATTR_FMTP);
    let (id, params) = rest
        .split_once(' ')
        .ok_or_else(|| Error::parse(line, "fmtp"))?;
    let id = number(id, line, "fmtp")?;

    let parameters = params
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|token| match token.split_once('=') {
            Some((k, v)) => Parameter::new(k, v),
            None => Parameter::new("", token),
        })
        .collect();

    Ok((id, parameters))
}

/// `a=rtcp-fb:<id|*> <type> [<subtype> <params>...]`. `trr-int` carries a
/// bare value instead of a subtype.
pub fn rtcpfb(line: &str) -> Result<(String, Feedback)> {
    let parts = fields(line, ATTR_RTCP_FB);
    if parts.len() < 2 {
        return Err(Error::parse(line, "rtcp-fb"));
    }
    let id = parts[0].to_owned();
    let feedback_type = parts[1].to_owned();

    let feedback = if feedback_type == TRR_INT {
        Feedback {
            feedback_type,
            value: parts.get(2).map(|v| (*v).to_owned()),
            ..Default::default()
        }
    } else {
        Feedback {
            feedback_type,
            subtype: parts.get(2).map(|s| (*s).to_owned()).unwrap_or_default(),
            value: None,
            parameters: parts.iter().skip(3).map(|p| (*p).to_owned()).collect(),
        }
    };

    Ok((id, feedback))
}

/// `a=crypto:<tag> <suite> <key-params> [<session-params>...]`
pub fn crypto(line: &str) -> Result<Encryption> {
    let parts = fields(line, ATTR_CRYPTO);
    if parts.len() < 3 {
        return Err(Error::parse(line, "crypto"));
    }
    Ok(Encryption {
        tag: parts[0].to_owned(),
        cipher_suite: parts[1].to_owned(),
        key_params: parts[2].to_owned(),
        session_params: (parts.len() > 3).then(|| parts[3..].join(" ")),
    })
}

/// `a=fingerprint:<hash> <value>`. `setup` is resolved by the builder.
pub fn fingerprint(line: &str) -> Result<Fingerprint> {
    let parts = fields(line, ATTR_FINGERPRINT);
    if parts.len() < 2 {
        return Err(Error::parse(line, "fingerprint"));
    }
    Ok(Fingerprint {
        hash: parts[0].to_owned(),
        value: parts[1].to_owned(),
        setup: None,
    })
}

/// `a=extmap:<id>[/<direction>] <uri>`
pub fn extmap(line: &str) -> Result<ExtmapLine> {
    let parts = fields(line, ATTR_EXTMAP);
    if parts.len() < 2 {
        return Err(Error::parse(line, "extmap"));
    }
    let (id, direction) = match parts[0].split_once('/') {
        Some((id, direction)) => (id, direction),
        None => (parts[0], "sendrecv"),
    };
    Ok(ExtmapLine {
        id: number(id, line, "extmap")?,
        direction: direction.to_owned(),
        uri: parts[1].to_owned(),
    })
}

/// `[a=]candidate:<foundation> <component> <protocol> <priority> <ip> <port>
/// typ <type> [raddr <addr>] [rport <port>] [generation <n>] [tcptype <t>]`
///
/// The returned candidate carries no id.
pub fn candidate(line: &str) -> Result<Candidate> {
    let body = line
        .strip_prefix(ATTR_CANDIDATE)
        .or_else(|| line.strip_prefix(CANDIDATE_PREFIX))
        .ok_or_else(|| Error::parse(line, "candidate"))?;

    let parts: Vec<&str> = body.split_whitespace().collect();
    if parts.len() < 8 || parts[6] != "typ" {
        return Err(Error::parse(line, "candidate"));
    }

    let component: u16 = number(parts[1], line, "candidate")?;
    if component != 1 && component != 2 {
        return Err(Error::parse(line, "candidate"));
    }
    let candidate_type =
        CandidateType::from_token(parts[7]).ok_or_else(|| Error::parse(line, "candidate"))?;

    let mut c = Candidate {
        id: String::new(),
        foundation: parts[0].to_owned(),
        component,
        protocol: parts[2].to_lowercase(),
        priority: number(parts[3], line, "candidate")?,
        ip: parts[4].to_owned(),
        port: number(parts[5], line, "candidate")?,
        candidate_type,
        rel_addr: None,
        rel_port: None,
        generation: 0,
        tcp_type: None,
        network: "1".to_owned(),
    };

    for pair in parts[8..].chunks(2) {
        let [key, val] = pair else {
            return Err(Error::parse(line, "candidate"));
        };
        match *key {
            "raddr" => c.rel_addr = Some((*val).to_owned()),
            "rport" => c.rel_port = Some(number(val, line, "candidate")?),
            "generation" => c.generation = number(val, line, "candidate")?,
            "tcptype" => {
                c.tcp_type =
                    Some(TcpType::from_token(val).ok_or_else(|| Error::parse(line, "candidate"))?)
            }
            // network-id, network-cost, ufrag and friends are not modelled
            _ => {}
        }
    }

    Ok(c)
}

/// Groups `a=ssrc:<ssrc> <key>[:<value>]` lines by ssrc, keeping the order
/// ssrcs and their attributes were first seen.
pub fn sources(lines: &[&str]) -> Result<Vec<Source>> {
    let mut sources: Vec<Source> = vec![];
    for line in lines {
        let rest = value(line, ATTR_SSRC);
        let (ssrc, attribute) = rest.split_once(' ').unwrap_or((rest, ""));
        let ssrc: u32 = number(ssrc, line, "ssrc")?;

        let parameter = match attribute.split_once(':') {
            Some((k, v)) => Parameter::new(k, v),
            None => Parameter {
                key: attribute.to_owned(),
                value: None,
            },
        };

        match sources.iter_mut().find(|s| s.ssrc == Some(ssrc)) {
            Some(source) => {
                if !parameter.key.is_empty() {
                    source.parameters.push(parameter);
                }
            }
            None => sources.push(Source {
                ssrc: Some(ssrc),
                parameters: if parameter.key.is_empty() {
                    vec![]
                } else {
                    vec![parameter]
                },
            }),
        }
    }
    Ok(sources)
}

/// `a=ssrc-group:<semantics> <ssrc>...`
pub fn source_groups(lines: &[&str]) -> Result<Vec<SourceGroup>> {
    lines
        .iter()
        .map(|line| {
            let parts = fields(line, ATTR_SSRC_GROUP);
            let Some((semantics, ssrcs)) = parts.split_first() else {
                return Err(Error::parse(line, "ssrc-group"));
            };
            Ok(SourceGroup {
                semantics: (*semantics).to_owned(),
                sources: ssrcs
                    .iter()
                    .map(|s| number(s, line, "ssrc-group"))
                    .collect::<Result<_>>()?,
            })
        })
        .collect()
}

/// `a=group:<semantics> <mid>...`
pub fn groups(lines: &[&str]) -> Result<Vec<Group>> {
    lines
        .iter()
        .map(|line| {
            let parts = fields(line, ATTR_GROUP);
            let Some((semantics, contents)) = parts.split_first() else {
                return Err(Error::parse(line, "group"));
            };
            Ok(Group {
                semantics: (*semantics).to_owned(),
                contents: contents.iter().map(|c| (*c).to_owned()).collect(),
            })
        })
        .collect()
}

/// `b=<type>:<bandwidth>`
pub fn bandwidth(line: &str) -> Result<Bandwidth> {
    let (bandwidth_type, bw) = value(line, LINE_BANDWIDTH)
        .split_once(':')
        .ok_or_else(|| Error::parse(line, "bandwidth"))?;
    Ok(Bandwidth {
        bandwidth_type: bandwidth_type.to_owned(),
        bandwidth: number(bw, line, "bandwidth")?,
    })
}

pub fn msid(line: &str) -> Result<MsidLine> {
    let parts = fields(line, ATTR_MSID);
    let Some(stream) = parts.first() else {
        return Err(Error::parse(line, "msid"));
    };
    Ok(MsidLine {
        stream: (*stream).to_owned(),
        track: parts.get(1).map(|t| (*t).to_owned()),
    })
}

/// `a=sctpmap:<number> <protocol> <streams>`
pub fn sctpmap(line: &str) -> Result<Sctpmap> {
    let parts = fields(line, ATTR_SCTPMAP);
    if parts.len() < 3 {
        return Err(Error::parse(line, "sctpmap"));
    }
    Ok(Sctpmap {
        number: number(parts[0], line, "sctpmap")?,
        protocol: parts[1].to_owned(),
        streams: number(parts[2], line, "sctpmap")?,
    })
}

/// Numeric attribute such as `a=ptime:20`.
pub fn u32_attribute(line: &str, prefix: &str, attribute: &'static str) -> Result<u32> {
    number(value(line, prefix), line, attribute)
}
