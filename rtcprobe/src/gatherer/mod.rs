
use log::{debug, trace, warn};
use sdp::description::{
    Candidate, CandidateType, IceCredentials, SessionDescription, Transport, TransportContent,
    TransportInfo,
};
use sdp::senders::Role;
use shared::error::{Error, Result};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::configuration::{
    NegotiationPolicy, RTCBundlePolicy, RTCConfiguration, RTCRtcpMuxPolicy,
};
use crate::event::IceUpdate;
use crate::state::RTCIceGatheringState;

const RTCP_COMPONENT: u16 = 2;

/// A locally gathered candidate as reported by the native layer. `None`
/// marks the end of gathering.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCandidate {
    pub now: Instant,
    pub candidate: Option<GatheredCandidate>,
}

/// A parsed local candidate and the content it was gathered for, by mid or
/// by m-line index.
#[derive(Debug, Clone, PartialEq)]
pub struct GatheredCandidate {
    pub sdp_mid: Option<String>,
    pub sdp_mline_index: Option<u16>,
    pub candidate: Candidate,
}

/// What the gatherer hands back through `poll_read`.
#[derive(Debug, Clone, PartialEq)]
pub enum GathererOutput {
    Ice(IceUpdate),
    EndOfCandidates,
}

#[derive(Debug, Clone)]
struct LocalContent {
    name: String,
    creator: Role,
    credentials: Option<IceCredentials>,
}

/// Outbound candidate pipeline.
///
/// Candidates are held until gathering starts, filtered by the negotiation
/// policy, appended to an ordered buffer and either emitted one by one or
/// batched per content for `candidate_batch_window`. Batching deadlines
/// are surfaced through `poll_timeout` and driven by `handle_timeout`.
pub struct CandidateGatherer {
    policy: NegotiationPolicy,
    bundle_policy: RTCBundlePolicy,
    rtcp_mux_policy: RTCRtcpMuxPolicy,

    contents: Vec<LocalContent>,
    state: RTCIceGatheringState,
    held: VecDeque<LocalCandidate>,
    buffered: Vec<Candidate>,
    pending: Vec<(usize, Candidate)>,
    deadline: Option<Instant>,
    ended: bool,
    closed: bool,

    outputs: VecDeque<GathererOutput>,
}

impl CandidateGatherer {
    pub fn new(config: &RTCConfiguration) -> Self {
        CandidateGatherer {
            policy: *config.negotiation_policy(),
            bundle_policy: config.bundle_policy(),
            rtcp_mux_policy: config.rtcp_mux_policy(),

            contents: vec![],
            state: RTCIceGatheringState::New,
            held: VecDeque::new(),
            buffered: vec![],
            pending: vec![],
            deadline: None,
            ended: false,
            closed: false,

            outputs: VecDeque::new(),
        }
    }

    /// Records the contents of the current local description. Candidates
    /// are matched against them by mid or m-line index.
    pub fn set_local_session(&mut self, session: &SessionDescription) {
        self.contents = session
            .contents
            .iter()
            .map(|c| LocalContent {
                name: c.name.clone(),
                creator: c.creator,
                credentials: c.transport.credentials.clone(),
            })
            .collect();
    }

    pub fn state(&self) -> RTCIceGatheringState {
        self.state
    }

    /// Candidates that survived filtering, in arrival order.
    pub fn buffered(&self) -> &[Candidate] {
        &self.buffered
    }

    fn is_gathering(&self) -> bool {
        matches!(
            self.state,
            RTCIceGatheringState::Gathering | RTCIceGatheringState::Complete
        )
    }

    fn window(&self) -> Option<Duration> {
        self.policy.candidate_batch_window
    }

    fn release_held(&mut self) -> Result<()> {
        while let Some(local) = self.held.pop_front() {
            self.process(local)?;
        }
        Ok(())
    }

    fn process(&mut self, local: LocalCandidate) -> Result<()> {
        let Some(gathered) = local.candidate else {
            self.end_of_candidates();
            return Ok(());
        };

        if self.policy.dont_signal_candidates {
            trace!("not signaling local candidate {}", gathered.candidate.foundation);
            return Ok(());
        }

        let Some(index) = self.content_index(&gathered) else {
            warn!(
                "dropping local candidate for unknown content (mid {:?}, m-line {:?})",
                gathered.sdp_mid, gathered.sdp_mline_index
            );
            return Ok(());
        };
        let candidate = gathered.candidate;

        if let Some(reason) = self.drop_reason(&candidate) {
            trace!(
                "dropping local candidate {} {}:{} ({reason})",
                candidate.candidate_type, candidate.ip, candidate.port
            );
            return Ok(());
        }

        self.buffered.push(candidate.clone());

        if let Some(window) = self.window() {
            if self.deadline.is_none() {
                self.deadline = Some(local.now + window);
            }
            self.pending.push((index, candidate));
        } else {
            let info = self.transport_info(vec![(index, candidate)]);
            self.outputs
                .push_back(GathererOutput::Ice(IceUpdate::Structured(info)));
        }
        Ok(())
    }

    fn drop_reason(&self, candidate: &Candidate) -> Option<&'static str> {
        if self.policy.eliminate_duplicate_candidates
            && candidate.candidate_type == CandidateType::Relay
            && self.buffered.iter().any(|b| {
                b.candidate_type == CandidateType::Relay
                    && b.foundation == candidate.foundation
                    && b.component == candidate.component
                    && b.type_preference() >= candidate.type_preference()
            })
        {
            return Some("duplicate relay");
        }

        if self.bundle_policy == RTCBundlePolicy::MaxBundle
            && self.buffered.iter().any(|b| {
                b.candidate_type == candidate.candidate_type
                    && b.ip == candidate.ip
                    && b.port == candidate.port
            })
        {
            return Some("bundled address");
        }

        if self.rtcp_mux_policy == RTCRtcpMuxPolicy::Require
            && candidate.component == RTCP_COMPONENT
        {
            return Some("rtcp-mux required");
        }

        None
    }

    fn content_index(&self, gathered: &GatheredCandidate) -> Option<usize> {
        if let Some(mid) = &gathered.sdp_mid {
            if let Some(index) = self.contents.iter().position(|c| &c.name == mid) {
                return Some(index);
            }
        }
        gathered
            .sdp_mline_index
            .map(usize::from)
            .filter(|index| *index < self.contents.len())
    }

    /// Groups candidates per content, keeping the order in which contents
    /// first appear.
    fn transport_info(&self, candidates: Vec<(usize, Candidate)>) -> TransportInfo {
        let mut contents: Vec<(usize, TransportContent)> = vec![];
        for (index, candidate) in candidates {
            if let Some((_, content)) = contents.iter_mut().find(|(i, _)| *i == index) {
                content.transport.candidates.push(candidate);
                continue;
            }
            let Some(local) = self.contents.get(index) else {
                continue;
            };
            contents.push((
                index,
                TransportContent {
                    name: local.name.clone(),
                    creator: local.creator,
                    transport: Transport {
                        credentials: local.credentials.clone(),
                        candidates: vec![candidate],
                        ..Default::default()
                    },
                },
            ));
        }
        TransportInfo {
            contents: contents.into_iter().map(|(_, c)| c).collect(),
        }
    }

    fn flush(&mut self) {
        self.deadline = None;
        if self.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        debug!("flushing {} batched local candidates", pending.len());
        let info = self.transport_info(pending);
        self.outputs
            .push_back(GathererOutput::Ice(IceUpdate::Structured(info)));
    }

    fn end_of_candidates(&mut self) {
        self.flush();
        if !self.ended {
            self.ended = true;
            self.outputs.push_back(GathererOutput::EndOfCandidates);
        }
    }
}

impl sansio::Protocol<LocalCandidate, (), RTCIceGatheringState> for CandidateGatherer {
    type Rout = GathererOutput;
    type Wout = ();
    type Eout = ();
    type Error = Error;
    type Time = Instant;

    fn handle_read(&mut self, msg: LocalCandidate) -> Result<()> {
        if self.closed {
            return Err(Error::ErrConnectionClosed);
        }
        if self.is_gathering() {
            self.process(msg)
        } else {
            trace!("holding local candidate until gathering starts");
            self.held.push_back(msg);
            Ok(())
        }
    }

    fn poll_read(&mut self) -> Option<Self::Rout> {
        self.outputs.pop_front()
    }

    fn handle_write(&mut self, _msg: ()) -> Result<()> {
        Ok(())
    }

    fn poll_write(&mut self) -> Option<Self::Wout> {
        None
    }

    fn handle_event(&mut self, state: RTCIceGatheringState) -> Result<()> {
        if self.closed {
            return Err(Error::ErrConnectionClosed);
        }
        let previous = self.state;
        self.state = state;
        match state {
            RTCIceGatheringState::Gathering => {
                if previous == RTCIceGatheringState::Complete {
                    // New gathering round, e.g. after an ICE restart.
                    self.ended = false;
                    self.buffered.clear();
                }
                self.release_held()
            }
            RTCIceGatheringState::Complete => {
                self.release_held()?;
                self.end_of_candidates();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn poll_event(&mut self) -> Option<Self::Eout> {
        None
    }

    fn handle_timeout(&mut self, now: Instant) -> Result<()> {
        if self.deadline.is_some_and(|deadline| deadline <= now) {
            self.flush();
        }
        Ok(())
    }

    fn poll_timeout(&mut self) -> Option<Self::Time> {
        self.deadline
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.held.clear();
        self.buffered.clear();
        self.pending.clear();
        self.deadline = None;
        self.outputs.clear();
        Ok(())
    }
}
