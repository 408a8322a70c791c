
use shared::error::Result;
use shared::util::unix_millis;

use crate::description::{Candidate, CandidateType};
use crate::parser;

const ID_RADIX: u64 = 36;

/// Converts ICE candidate lines to [`Candidate`]s and back.
///
/// Every parsed candidate gets a fresh id from `next_id`, so ids never
/// survive a round trip. Seed the codec explicitly to get deterministic ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCodec {
    next_id: u64,
}

impl Default for CandidateCodec {
    fn default() -> Self {
        CandidateCodec::new(unix_millis().unwrap_or_default())
    }
}

impl CandidateCodec {
    pub fn new(seed: u64) -> Self {
        CandidateCodec { next_id: seed }
    }

    /// Parses `a=candidate:...` or `candidate:...`.
    pub fn to_candidate_json(&mut self, line: &str) -> Result<Candidate> {
        let mut candidate = parser::candidate(line)?;
        candidate.id = self.next_id();
        Ok(candidate)
    }

    /// Full `a=candidate:` line for `candidate`.
    pub fn to_candidate_sdp(candidate: &Candidate) -> String {
        format!("a={}", candidate_attribute(candidate))
    }

    fn next_id(&mut self) -> String {
        let id = to_base36(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

/// `candidate:...` attribute value, as carried by trickled ICE candidates.
pub fn candidate_attribute(candidate: &Candidate) -> String {
    let mut out = format!(
        "candidate:{} {} {} {} {} {} typ {}",
        candidate.foundation,
        candidate.component,
        candidate.protocol,
        candidate.priority,
        candidate.ip,
        candidate.port,
        candidate.candidate_type,
    );

    if candidate.candidate_type != CandidateType::Host {
        if let (Some(rel_addr), Some(rel_port)) = (&candidate.rel_addr, candidate.rel_port) {
            out += &format!(" raddr {rel_addr} rport {rel_port}");
        }
    }

    if candidate.protocol.eq_ignore_ascii_case("tcp") {
        if let Some(tcp_type) = candidate.tcp_type {
            out += &format!(" tcptype {tcp_type}");
        }
    }

    out += &format!(" generation {}", candidate.generation);
    out
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_owned();
    }
    let mut digits = vec![];
    while n > 0 {
        let d = (n % ID_RADIX) as u32;
        digits.push(char::from_digit(d, ID_RADIX as u32).unwrap_or('0'));
        n /= ID_RADIX;
    }
    digits.iter().rev().collect()
}
