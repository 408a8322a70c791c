//! Both sides of a negotiation in one process.
//!
//! Diagnostics often connect a peer to itself. [`Loopback`] plays the
//! signaling channel between an initiating and a responding [`Negotiator`],
//! forwarding descriptions in structured form and local candidates as the
//! other side's remote candidates.

use log::debug;
use shared::error::Result;

use crate::configuration::RTCConfiguration;
use crate::event::NegotiationEvent;
use crate::native::NativePeerConnection;
use crate::negotiator::{Negotiator, RemoteDescription};

pub struct Loopback<C: NativePeerConnection> {
    initiator: Negotiator<C>,
    responder: Negotiator<C>,
    initiator_events: Vec<NegotiationEvent>,
    responder_events: Vec<NegotiationEvent>,
}

impl<C: NativePeerConnection> Loopback<C> {
    pub fn new(initiator: C, responder: C, config: RTCConfiguration) -> Result<Self> {
        Ok(Loopback {
            initiator: Negotiator::new(initiator, config.clone())?,
            responder: Negotiator::new(responder, config)?,
            initiator_events: vec![],
            responder_events: vec![],
        })
    }

    pub fn initiator(&self) -> &Negotiator<C> {
        &self.initiator
    }

    pub fn initiator_mut(&mut self) -> &mut Negotiator<C> {
        &mut self.initiator
    }

    pub fn responder(&self) -> &Negotiator<C> {
        &self.responder
    }

    pub fn responder_mut(&mut self) -> &mut Negotiator<C> {
        &mut self.responder
    }

    /// Every event the initiator emitted, in order, except the candidate
    /// updates consumed by [`Loopback::exchange_candidates`].
    pub fn initiator_events(&self) -> &[NegotiationEvent] {
        &self.initiator_events
    }

    pub fn responder_events(&self) -> &[NegotiationEvent] {
        &self.responder_events
    }

    /// Runs one full offer/answer round and leaves both sides stable.
    /// Provisional descriptions are signaled before their side confirms
    /// them.
    pub async fn negotiate(&mut self) -> Result<()> {
        let offer = self.initiator.offer(None).await?;
        self.responder
            .handle_offer(RemoteDescription::Structured(offer.session))
            .await?;
        if self.initiator.has_pending_local() {
            self.initiator.confirm_local().await?;
        }

        let answer = self.responder.answer(None).await?;
        self.initiator
            .handle_answer(RemoteDescription::Structured(answer.session))
            .await?;
        if self.responder.has_pending_local() {
            self.responder.confirm_local().await?;
        }

        self.exchange_candidates().await?;
        Ok(())
    }

    /// Forwards pending local candidates of each side to the other until
    /// neither has any left. Returns the number of updates forwarded.
    pub async fn exchange_candidates(&mut self) -> Result<usize> {
        let mut forwarded = 0;
        loop {
            let mut round = 0;

            while let Some(event) = self.initiator.poll_event() {
                match event {
                    NegotiationEvent::Ice(update) => {
                        self.responder.process_ice(update).await?;
                        round += 1;
                    }
                    other => self.initiator_events.push(other),
                }
            }

            while let Some(event) = self.responder.poll_event() {
                match event {
                    NegotiationEvent::Ice(update) => {
                        self.initiator.process_ice(update).await?;
                        round += 1;
                    }
                    other => self.responder_events.push(other),
                }
            }

            if round == 0 {
                break;
            }
            forwarded += round;
        }
        debug!("loopback forwarded {forwarded} candidate updates");
        Ok(forwarded)
    }

    /// Delivers outstanding candidates, then closes both sides.
    pub async fn close(&mut self) -> Result<()> {
        self.exchange_candidates().await?;
        self.initiator.close().await?;
        self.responder.close().await?;

        while let Some(event) = self.initiator.poll_event() {
            self.initiator_events.push(event);
        }
        while let Some(event) = self.responder.poll_event() {
            self.responder_events.push(event);
        }
        Ok(())
    }
}
