//! Offer/answer and ICE negotiation on top of a [`NativePeerConnection`].
//!
//! The [`Negotiator`] translates between the native layer's SDP and the
//! structured session model, keeps the ICE credentials of both sides per
//! content, detects ICE restarts in structured candidate updates and runs
//! locally gathered candidates through the [`CandidateGatherer`].
//! Everything it has to tell the caller is queued as a
//! [`NegotiationEvent`] and drained with [`Negotiator::poll_event`].
//!
//! Nothing is committed before the native layer accepted it: credentials
//! and descriptions are recorded only once the matching native call
//! returned `Ok`, so a rejected or cancelled call leaves the negotiator as
//! it was.

use log::{debug, trace, warn};
use sansio::Protocol;
use sdp::candidate::candidate_attribute;
use sdp::description::{IceCredentials, SessionDescription};
use sdp::senders::{Direction, Role};
use sdp::{CandidateCodec, SerializeOptions, SessionOptions, to_session_json, to_session_sdp};
use shared::error::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::configuration::{RTCAnswerOptions, RTCConfiguration, RTCOfferOptions};
use crate::event::{DescriptionEvent, DescriptionPhase, IceUpdate, NegotiationEvent};
use crate::gatherer::{CandidateGatherer, GatheredCandidate, GathererOutput, LocalCandidate};
use crate::native::{
    NativePeerConnection, RTCDataChannelHandle, RTCDataChannelInit, RTCIceCandidateInit,
    RTCSdpType, RTCSessionDescription, RTCStatsReport,
};
use crate::simulcast;
use crate::state::{
    NegotiationState, RTCIceConnectionState, RTCIceGatheringState, RTCPeerConnectionState,
};

/// A remote offer or answer as received from signaling.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteDescription {
    Sdp(String),
    Structured(SessionDescription),
}

/// A description applied to the native layer, in both representations.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDescription {
    pub sdp_type: RTCSdpType,
    pub session: SessionDescription,
    pub sdp: String,
    role: Role,
    direction: Direction,
}

impl AppliedDescription {
    fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions::new(self.role, self.direction)
    }

    fn to_native(&self) -> RTCSessionDescription {
        RTCSessionDescription {
            sdp_type: self.sdp_type,
            sdp: self.sdp.clone(),
        }
    }
}

/// A provisionally emitted local description awaiting
/// [`Negotiator::confirm_local`].
#[derive(Debug, Clone)]
struct PendingLocal {
    applied: AppliedDescription,
    previous: NegotiationState,
}

/// Drives one side of an offer/answer exchange.
pub struct Negotiator<C: NativePeerConnection> {
    native: C,
    config: RTCConfiguration,
    state: NegotiationState,
    codec: CandidateCodec,

    local: Option<AppliedDescription>,
    pending_local: Option<PendingLocal>,
    remote: Option<AppliedDescription>,
    local_credentials: HashMap<String, IceCredentials>,
    remote_credentials: HashMap<String, IceCredentials>,

    gatherer: CandidateGatherer,
    ice_connection_state: RTCIceConnectionState,
    connection_state: RTCPeerConnectionState,

    events: VecDeque<NegotiationEvent>,
}

impl<C: NativePeerConnection> Negotiator<C> {
    pub fn new(native: C, config: RTCConfiguration) -> Result<Self> {
        Self::with_codec(native, config, CandidateCodec::default())
    }

    /// Like [`Negotiator::new`] with an explicitly seeded candidate codec,
    /// for deterministic candidate ids.
    pub fn with_codec(native: C, config: RTCConfiguration, codec: CandidateCodec) -> Result<Self> {
        config.validate()?;
        let gatherer = CandidateGatherer::new(&config);
        Ok(Negotiator {
            native,
            config,
            state: NegotiationState::New,
            codec,

            local: None,
            pending_local: None,
            remote: None,
            local_credentials: HashMap::new(),
            remote_credentials: HashMap::new(),

            gatherer,
            ice_connection_state: RTCIceConnectionState::New,
            connection_state: RTCPeerConnectionState::New,

            events: VecDeque::new(),
        })
    }

    pub fn native(&self) -> &C {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut C {
        &mut self.native
    }

    pub fn config(&self) -> &RTCConfiguration {
        &self.config
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn local_description(&self) -> Option<&AppliedDescription> {
        self.local.as_ref()
    }

    pub fn remote_description(&self) -> Option<&AppliedDescription> {
        self.remote.as_ref()
    }

    pub fn local_credentials(&self, content: &str) -> Option<&IceCredentials> {
        self.local_credentials.get(content)
    }

    pub fn remote_credentials(&self, content: &str) -> Option<&IceCredentials> {
        self.remote_credentials.get(content)
    }

    pub fn ice_connection_state(&self) -> RTCIceConnectionState {
        self.ice_connection_state
    }

    pub fn ice_gathering_state(&self) -> RTCIceGatheringState {
        self.gatherer.state()
    }

    pub fn connection_state(&self) -> RTCPeerConnectionState {
        self.connection_state
    }

    /// Whether a provisionally emitted local description still waits for
    /// [`Negotiator::confirm_local`].
    pub fn has_pending_local(&self) -> bool {
        self.pending_local.is_some()
    }

    /// Creates a local offer.
    ///
    /// With `assume_set_local_success` the offer is returned and emitted
    /// provisionally right after creation and [`Negotiator::confirm_local`]
    /// applies it. Otherwise it is applied before this returns.
    pub async fn offer(&mut self, options: Option<RTCOfferOptions>) -> Result<DescriptionEvent> {
        self.check_round("offer")?;

        let desc = match self.native.create_offer(options).await {
            Ok(desc) => desc,
            Err(err) => return Err(self.fail(err)),
        };
        let session = to_session_json(
            &desc.sdp,
            &SessionOptions::new(Role::Initiator, Direction::Outgoing),
            &mut self.codec,
        )?;

        self.begin_local(AppliedDescription {
            sdp_type: RTCSdpType::Offer,
            session,
            sdp: desc.sdp,
            role: Role::Initiator,
            direction: Direction::Outgoing,
        })
        .await
    }

    /// Applies a remote offer.
    pub async fn handle_offer(&mut self, offer: RemoteDescription) -> Result<()> {
        self.check_round("handle_offer")?;

        let applied = self.remote_input(offer, RTCSdpType::Offer, Role::Responder)?;
        if let Err(err) = self.native.set_remote_description(applied.to_native()).await {
            return Err(self.fail(err));
        }

        self.commit_remote(applied);
        self.set_state(NegotiationState::OfferReceived);
        Ok(())
    }

    /// Creates a local answer to the applied remote offer. With simulcast
    /// enabled the answer is rewritten from the mutated model before the
    /// native layer sees it. Two-phase like [`Negotiator::offer`].
    pub async fn answer(&mut self, options: Option<RTCAnswerOptions>) -> Result<DescriptionEvent> {
        self.require("answer", NegotiationState::OfferReceived)?;

        let desc = match self.native.create_answer(options).await {
            Ok(desc) => desc,
            Err(err) => return Err(self.fail(err)),
        };
        let opts = SessionOptions::new(Role::Responder, Direction::Outgoing);
        let mut session = to_session_json(&desc.sdp, &opts, &mut self.codec)?;

        let mut sdp = desc.sdp;
        if self.config.negotiation_policy().simulcast
            && simulcast::apply(&mut session, &mut rand::rng()) > 0
        {
            sdp = to_session_sdp(
                &session,
                &SerializeOptions::new(Role::Responder, Direction::Outgoing),
            )?;
        }

        self.begin_local(AppliedDescription {
            sdp_type: RTCSdpType::Answer,
            session,
            sdp,
            role: Role::Responder,
            direction: Direction::Outgoing,
        })
        .await
    }

    /// Applies the provisionally emitted local description to the native
    /// layer and emits [`NegotiationEvent::DescriptionConfirmed`].
    ///
    /// A rejection drops the description and returns to the state before
    /// it was created. If the returned future is dropped before completion
    /// the description stays pending and may be confirmed again.
    pub async fn confirm_local(&mut self) -> Result<()> {
        if self.state == NegotiationState::Closed {
            return Err(Error::ErrConnectionClosed);
        }
        let desc = match &self.pending_local {
            Some(pending) => pending.applied.to_native(),
            None => {
                return Err(Error::ErrNegotiationState {
                    operation: "confirm_local",
                    state: self.state.to_string(),
                });
            }
        };

        let result = self.native.set_local_description(desc).await;
        let Some(pending) = self.pending_local.take() else {
            return result;
        };
        if let Err(err) = result {
            self.set_state(pending.previous);
            return Err(self.fail(err));
        }

        let sdp_type = pending.applied.sdp_type;
        self.events
            .push_back(NegotiationEvent::DescriptionConfirmed(sdp_type));
        self.commit_local(pending.applied);
        Ok(())
    }

    /// Applies the remote answer to a pending local offer. A provisional
    /// offer is confirmed first.
    pub async fn handle_answer(&mut self, answer: RemoteDescription) -> Result<()> {
        if self.pending_local.is_some() && self.state == NegotiationState::OfferSent {
            self.confirm_local().await?;
        }
        self.require("handle_answer", NegotiationState::OfferSent)?;

        let applied = self.remote_input(answer, RTCSdpType::Answer, Role::Initiator)?;
        if let Err(err) = self.native.set_remote_description(applied.to_native()).await {
            return Err(self.fail(err));
        }

        self.set_state(NegotiationState::AnswerReceived);
        self.commit_remote(applied);
        self.set_state(NegotiationState::Stable);
        Ok(())
    }

    /// Applies remote candidates.
    ///
    /// Raw candidates go straight to the native layer. For structured
    /// updates, contents whose ufrag differs from the stored one are ICE
    /// restarts: the remote description is patched and re-applied exactly
    /// once before any of the update's candidates are added.
    pub async fn process_ice(&mut self, update: IceUpdate) -> Result<()> {
        if self.state == NegotiationState::Closed {
            return Err(Error::ErrConnectionClosed);
        }

        let info = match update {
            IceUpdate::Raw(init) => {
                if let Err(err) = self.native.add_ice_candidate(init).await {
                    return Err(self.fail(err));
                }
                return Ok(());
            }
            IceUpdate::Structured(info) => info,
        };

        let Some(mut remote) = self.remote.clone() else {
            return Err(Error::ErrNoRemoteDescription);
        };
        let mut remote_credentials = self.remote_credentials.clone();

        let mut restarted = vec![];
        for content in &info.contents {
            let Some(credentials) = &content.transport.credentials else {
                continue;
            };
            match remote_credentials.get(&content.name) {
                Some(stored) if stored.ufrag != credentials.ufrag => {}
                Some(_) => continue,
                None => {
                    remote_credentials.insert(content.name.clone(), credentials.clone());
                    continue;
                }
            }

            let known_locally = self
                .local
                .as_ref()
                .is_some_and(|local| local.session.content(&content.name).is_some());
            if !known_locally {
                let err = Error::ErrIceRestartMismatch(content.name.clone());
                warn!("{err}, starting over");
                self.reset();
                self.events.push_back(NegotiationEvent::Error(err.clone()));
                return Err(err);
            }

            debug!(
                "ice restart on {:?}: ufrag {:?}",
                content.name, credentials.ufrag
            );
            remote_credentials.insert(content.name.clone(), credentials.clone());
            if let Some(patched) = remote.session.content_mut(&content.name) {
                patched.transport.credentials = Some(credentials.clone());
            }
            restarted.push(content.name.clone());
        }

        if !restarted.is_empty() {
            remote.sdp = to_session_sdp(&remote.session, &remote.serialize_options())?;
            if let Err(err) = self.native.set_remote_description(remote.to_native()).await {
                return Err(self.fail(err));
            }
            self.remote = Some(remote);
            for name in restarted {
                self.events.push_back(NegotiationEvent::IceRestart(name));
            }
        }
        self.remote_credentials = remote_credentials;

        for content in &info.contents {
            let sdp_mline_index = self.remote.as_ref().and_then(|remote| {
                remote
                    .session
                    .contents
                    .iter()
                    .position(|c| c.name == content.name)
                    .map(|i| i as u16)
            });
            let username_fragment = content
                .transport
                .ufrag()
                .or_else(|| {
                    self.remote_credentials
                        .get(&content.name)
                        .map(|c| c.ufrag.as_str())
                })
                .map(str::to_owned);

            for candidate in &content.transport.candidates {
                let init = RTCIceCandidateInit {
                    candidate: candidate_attribute(candidate),
                    sdp_mid: Some(content.name.clone()),
                    sdp_mline_index,
                    username_fragment: username_fragment.clone(),
                };
                trace!("adding remote candidate {:?}", init.candidate);
                if let Err(err) = self.native.add_ice_candidate(init).await {
                    return Err(self.fail(err));
                }
            }
        }

        Ok(())
    }

    /// Feeds a locally gathered candidate, `None` once gathering is done.
    /// Candidate ids come from the same counter as those of parsed
    /// descriptions.
    pub fn handle_local_candidate(
        &mut self,
        candidate: Option<RTCIceCandidateInit>,
        now: Instant,
    ) -> Result<()> {
        if self.state == NegotiationState::Closed {
            return Err(Error::ErrConnectionClosed);
        }
        let candidate = match candidate {
            Some(init) => Some(GatheredCandidate {
                candidate: self.codec.to_candidate_json(&init.candidate)?,
                sdp_mid: init.sdp_mid,
                sdp_mline_index: init.sdp_mline_index,
            }),
            None => None,
        };
        self.gatherer.handle_read(LocalCandidate { now, candidate })?;
        self.drain_gatherer();
        Ok(())
    }

    pub fn handle_ice_gathering_state_change(&mut self, state: RTCIceGatheringState) -> Result<()> {
        self.events
            .push_back(NegotiationEvent::IceGatheringStateChange(state));
        self.gatherer.handle_event(state)?;
        self.drain_gatherer();
        Ok(())
    }

    pub fn handle_ice_connection_state_change(&mut self, state: RTCIceConnectionState) {
        debug!("ice connection state {} -> {}", self.ice_connection_state, state);
        self.ice_connection_state = state;
        self.events
            .push_back(NegotiationEvent::IceConnectionStateChange(state));
    }

    pub fn handle_connection_state_change(&mut self, state: RTCPeerConnectionState) {
        debug!("connection state {} -> {}", self.connection_state, state);
        self.connection_state = state;
        self.events
            .push_back(NegotiationEvent::ConnectionStateChange(state));
    }

    pub async fn create_data_channel(
        &mut self,
        label: &str,
        options: Option<RTCDataChannelInit>,
    ) -> Result<RTCDataChannelHandle> {
        if self.state == NegotiationState::Closed {
            return Err(Error::ErrConnectionClosed);
        }
        match self.native.create_data_channel(label, options).await {
            Ok(handle) => {
                self.events
                    .push_back(NegotiationEvent::AddChannel(handle.clone()));
                Ok(handle)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub async fn get_stats(&mut self) -> Result<RTCStatsReport> {
        match self.native.get_stats().await {
            Ok(report) => Ok(report),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Closes the native connection. The negotiator is unusable afterwards.
    pub async fn close(&mut self) -> Result<()> {
        if self.state == NegotiationState::Closed {
            return Ok(());
        }
        let result = self.native.close().await;
        self.pending_local = None;
        self.gatherer.close()?;
        self.set_state(NegotiationState::Closed);
        result.map_err(|err| self.fail(err))
    }

    pub fn poll_event(&mut self) -> Option<NegotiationEvent> {
        self.events.pop_front()
    }

    /// Next candidate batching deadline, if any.
    pub fn poll_timeout(&mut self) -> Option<Instant> {
        self.gatherer.poll_timeout()
    }

    pub fn handle_timeout(&mut self, now: Instant) -> Result<()> {
        self.gatherer.handle_timeout(now)?;
        self.drain_gatherer();
        Ok(())
    }

    /// Emits a freshly created local description. Provisionally, leaving
    /// the native step to [`Negotiator::confirm_local`], when the policy
    /// assumes the native layer accepts it. Otherwise after applying it.
    async fn begin_local(&mut self, applied: AppliedDescription) -> Result<DescriptionEvent> {
        let sdp_type = applied.sdp_type;
        let mut event = DescriptionEvent {
            session: applied.session.clone(),
            sdp: applied.sdp.clone(),
            phase: DescriptionPhase::Provisional,
        };

        if self.config.negotiation_policy().assume_set_local_success {
            self.events
                .push_back(description_event(sdp_type, event.clone()));
            let previous = self.state;
            self.pending_local = Some(PendingLocal { applied, previous });
            if sdp_type == RTCSdpType::Offer {
                self.set_state(NegotiationState::OfferSent);
            }
            return Ok(event);
        }

        if let Err(err) = self.native.set_local_description(applied.to_native()).await {
            return Err(self.fail(err));
        }
        event.phase = DescriptionPhase::Confirmed;
        self.events
            .push_back(description_event(sdp_type, event.clone()));
        self.commit_local(applied);
        Ok(event)
    }

    fn remote_input(
        &mut self,
        input: RemoteDescription,
        sdp_type: RTCSdpType,
        role: Role,
    ) -> Result<AppliedDescription> {
        let (session, sdp) = match input {
            RemoteDescription::Sdp(sdp) => (
                to_session_json(
                    &sdp,
                    &SessionOptions::new(role, Direction::Incoming),
                    &mut self.codec,
                )?,
                sdp,
            ),
            RemoteDescription::Structured(session) => {
                let sdp =
                    to_session_sdp(&session, &SerializeOptions::new(role, Direction::Incoming))?;
                (session, sdp)
            }
        };
        Ok(AppliedDescription {
            sdp_type,
            session,
            sdp,
            role,
            direction: Direction::Incoming,
        })
    }

    /// Records a local description the native layer accepted and moves to
    /// the state it leads to.
    fn commit_local(&mut self, applied: AppliedDescription) {
        self.local_credentials = credentials(&applied.session);
        self.gatherer.set_local_session(&applied.session);
        let next = match applied.sdp_type {
            RTCSdpType::Offer => NegotiationState::OfferSent,
            RTCSdpType::Answer => NegotiationState::Stable,
        };
        self.local = Some(applied);
        self.set_state(next);
    }

    fn commit_remote(&mut self, applied: AppliedDescription) {
        self.remote_credentials = credentials(&applied.session);
        self.remote = Some(applied);
    }

    fn drain_gatherer(&mut self) {
        while let Some(output) = self.gatherer.poll_read() {
            let event = match output {
                GathererOutput::Ice(update) => NegotiationEvent::Ice(update),
                GathererOutput::EndOfCandidates => NegotiationEvent::EndOfCandidates,
            };
            self.events.push_back(event);
        }
    }

    fn check_round(&self, operation: &'static str) -> Result<()> {
        if self.state == NegotiationState::Closed {
            return Err(Error::ErrConnectionClosed);
        }
        if !self.state.can_start_round() {
            return Err(Error::ErrNegotiationState {
                operation,
                state: self.state.to_string(),
            });
        }
        Ok(())
    }

    fn require(&self, operation: &'static str, expected: NegotiationState) -> Result<()> {
        if self.state == NegotiationState::Closed {
            return Err(Error::ErrConnectionClosed);
        }
        if self.state != expected || self.pending_local.is_some() {
            return Err(Error::ErrNegotiationState {
                operation,
                state: self.state.to_string(),
            });
        }
        Ok(())
    }

    fn set_state(&mut self, state: NegotiationState) {
        if self.state != state {
            debug!("negotiation state {} -> {}", self.state, state);
            self.state = state;
            self.events
                .push_back(NegotiationEvent::NegotiationStateChange(state));
        }
    }

    /// Drops both descriptions and all credentials.
    fn reset(&mut self) {
        self.local = None;
        self.pending_local = None;
        self.remote = None;
        self.local_credentials.clear();
        self.remote_credentials.clear();
        self.set_state(NegotiationState::New);
    }

    /// Reports a native failure as an event and hands it back for returning.
    fn fail(&mut self, err: Error) -> Error {
        warn!("native layer failed: {err}");
        self.events.push_back(NegotiationEvent::Error(err.clone()));
        err
    }
}

fn description_event(sdp_type: RTCSdpType, event: DescriptionEvent) -> NegotiationEvent {
    match sdp_type {
        RTCSdpType::Offer => NegotiationEvent::Offer(event),
        RTCSdpType::Answer => NegotiationEvent::Answer(event),
    }
}

/// Credentials per content name. The first of duplicate names wins.
fn credentials(session: &SessionDescription) -> HashMap<String, IceCredentials> {
    let mut map = HashMap::new();
    for content in &session.contents {
        if let Some(creds) = &content.transport.credentials {
            map.entry(content.name.clone())
                .or_insert_with(|| creds.clone());
        }
    }
    map
}
