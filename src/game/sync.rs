// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Round synchronisation state machine.
//!
//! One [`SyncMachine`] runs on every node. The leader stages rounds, broadcasts
//! [`Message::RoundProgress`] and collects [`Message::Submission`]s; followers play the round the
//! leader announces and report their match back. Exactly one [`SyncState`] is active at a time
//! and it alone decides which inputs are accepted.
//!
//! Inputs that do not fit the current state are dropped with a log line and reported as
//! [`Outcome::Ignored`]. The radio may lose, duplicate or reorder messages, so none of this is
//! treated as a fault.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! machine.begin();
//! sensor.calibrate()?;
//! machine.post(Event::StartupFinished)?;
//!
//! loop {
//!     if submit.poll() {
//!         machine.post(Event::SubmitPressed)?;
//!     }
//!     machine.poll(clock.now_ms());
//! }
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::config::{ConfigError, GameConfig, Role};
use crate::game::events::{try_post, Event, EventQueue, QueueFull};
use crate::game::gate::CalibrationGate;
use crate::game::rounds::RoundEngine;
use crate::game::submissions::SubmissionTracker;
use crate::game::{Orientation, ParticipantId};
use crate::io::{Cue, Indicator, OrientationSource, PeripheralSink, Screen, Transport};
use crate::protocol::{Envelope, Message};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyncState {
    /// Sensor offsets are being computed.
    Initializing,
    /// Waiting for the leader to start the next round.
    RoundStaged,
    /// Countdown in progress.
    RoundLoading,
    /// Round is live; the operator is trying to match the target.
    Processing,
    /// Leader has matched and is collecting follower submissions.
    LeaderWaiting,
    /// Follower has submitted and is waiting for the leader to move on.
    FollowerWaiting,
    /// Every round is complete; waiting for the confirm button.
    CalibrationStaged,
    CalibrationComplete,
}

/// Why an input was dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The current state does not accept this input.
    InvalidTransition,
    /// The input only makes sense for the other role.
    WrongRole,
    /// Every round has already been played.
    RoundsExhausted,
    /// The orientation did not match the round target.
    NoMatch,
    /// Confirm pressed before every round was complete.
    RoundsIncomplete,
    UnknownParticipant,
    /// Sender does not match the participant it claims to speak for.
    Spoofed,
    /// Message refers to a round other than the one in play.
    StaleRound,
    /// Addressed to another node.
    NotForUs,
    /// Message type this node never consumes.
    UnexpectedMessage,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Ignored(IgnoreReason),
}

pub struct SyncMachine<S, P, T, D, const R: usize, const N: usize> {
    config: GameConfig<R, N>,
    state: SyncState,
    rounds: RoundEngine<R>,
    submissions: SubmissionTracker<N>,
    gate: CalibrationGate,
    queue: EventQueue,

    sensor: S,
    panel: P,
    radio: T,
    delay: D,

    /// Time of the last live sample, `None` to sample on the next poll.
    last_sample_ms: Option<u32>,
    last_sample: Orientation,
}

impl<S, P, T, D, const R: usize, const N: usize> SyncMachine<S, P, T, D, R, N>
where
    S: OrientationSource,
    P: PeripheralSink,
    T: Transport,
    D: DelayNs,
{
    pub fn new(
        config: GameConfig<R, N>,
        sensor: S,
        panel: P,
        radio: T,
        delay: D,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rounds: RoundEngine::new(config.targets, config.tolerance),
            submissions: SubmissionTracker::new(config.participants),
            gate: CalibrationGate::new(),
            queue: EventQueue::new(),
            state: SyncState::Initializing,
            config,
            sensor,
            panel,
            radio,
            delay,
            last_sample_ms: None,
            last_sample: Orientation::default(),
        })
    }

    /// Show the setup screen, clear the indicators and, on the leader, announce the module to the
    /// hub. Call once before the sensor starts its offset calibration.
    pub fn begin(&mut self) {
        info!(
            "node {} starting as {}",
            self.config.local_id.0,
            if self.config.role.is_leader() { "leader" } else { "follower" }
        );

        for round in 0..R {
            self.panel.set_indicator(Indicator::Round(round as u8), false);
        }
        self.panel.set_indicator(Indicator::Calibrated, false);
        self.panel.render(Screen::CalibrationSetup);

        if self.config.role.is_leader() {
            self.radio.send(self.config.upstream, &Message::ModuleConnected);
        }
    }

    /// Queue an input for the next [`poll`](Self::poll).
    pub fn post(&mut self, event: Event) -> Result<(), QueueFull> {
        try_post(&self.queue, event)
    }

    /// One pass of the control loop: take at most one message off the radio, handle at most one
    /// queued event, then refresh the live reading if a round is running. Anything still queued
    /// waits for the next pass.
    pub fn poll(&mut self, now_ms: u32) {
        if let Some(envelope) = self.radio.receive() {
            if let Err(e) = try_post(&self.queue, Event::Received(envelope)) {
                warn!("{}", e);
            }
        }

        if let Ok(event) = self.queue.try_receive() {
            self.handle(event);
        }

        self.refresh_live(now_ms);
    }

    /// Run a single event to completion.
    pub fn handle(&mut self, event: Event) -> Outcome {
        let outcome = match event {
            Event::StartupFinished => self.on_startup_finished(),
            Event::SubmitPressed => self.on_submit_pressed(),
            Event::LoadNextRoundPressed => self.on_load_pressed(),
            Event::ConfirmCalibrationPressed => self.on_confirm_pressed(),
            Event::Received(envelope) => self.on_received(envelope),
        };

        if let Outcome::Ignored(reason) = outcome {
            warn!("ignored {:?} in {:?}: {:?}", event, self.state, reason);
        }
        outcome
    }

    fn on_startup_finished(&mut self) -> Outcome {
        if self.state != SyncState::Initializing {
            return Outcome::Ignored(IgnoreReason::InvalidTransition);
        }

        self.enter(SyncState::RoundStaged);
        match self.config.role {
            Role::Leader => self.panel.render(Screen::RoundStaged {
                round: self.rounds.current_round() as u8,
            }),
            Role::Follower { .. } => self.panel.render(Screen::WaitingForLeader),
        }
        Outcome::Handled
    }

    fn on_load_pressed(&mut self) -> Outcome {
        if !self.config.role.is_leader() {
            return Outcome::Ignored(IgnoreReason::WrongRole);
        }
        if self.state != SyncState::RoundStaged {
            return Outcome::Ignored(IgnoreReason::InvalidTransition);
        }
        if self.rounds.current_target().is_none() {
            return Outcome::Ignored(IgnoreReason::RoundsExhausted);
        }

        self.load_round();
        Outcome::Handled
    }

    fn on_submit_pressed(&mut self) -> Outcome {
        let Some(target) = self.rounds.current_target() else {
            return Outcome::Ignored(IgnoreReason::RoundsExhausted);
        };
        if self.state != SyncState::Processing {
            return Outcome::Ignored(IgnoreReason::InvalidTransition);
        }

        let sample = self.sensor.sample();
        self.last_sample = sample;
        info!(
            "submit: roll={} pitch={} yaw={}",
            sample.roll, sample.pitch, sample.yaw
        );

        if !self.rounds.matches_current(&sample) {
            info!("round {} not matched, try again", target.index + 1);
            return Outcome::Ignored(IgnoreReason::NoMatch);
        }

        match self.config.role {
            Role::Leader => {
                self.submissions.record_submission(self.config.local_id);
                if self.submissions.all_submitted() {
                    self.complete_round();
                } else {
                    self.enter(SyncState::LeaderWaiting);
                    self.panel.render(Screen::WaitingForFollowers);
                }
            }
            Role::Follower { leader } => {
                self.radio.send(
                    leader,
                    &Message::Submission {
                        participant: self.config.local_id,
                        round: target.index,
                        orientation: sample,
                    },
                );
                self.enter(SyncState::FollowerWaiting);
                self.panel.render(Screen::WaitingForLeader);
            }
        }
        Outcome::Handled
    }

    fn on_confirm_pressed(&mut self) -> Outcome {
        if !self.config.role.is_leader() {
            return Outcome::Ignored(IgnoreReason::WrongRole);
        }
        if self.state != SyncState::CalibrationStaged {
            return Outcome::Ignored(IgnoreReason::InvalidTransition);
        }
        if !self.gate.maybe_complete(&self.rounds) {
            return Outcome::Ignored(IgnoreReason::RoundsIncomplete);
        }

        self.complete_calibration();
        Outcome::Handled
    }

    fn on_received(&mut self, envelope: Envelope) -> Outcome {
        if envelope.to != self.config.local_id {
            return Outcome::Ignored(IgnoreReason::NotForUs);
        }

        match envelope.message {
            Message::Submission {
                participant,
                round,
                orientation,
            } => self.on_submission(envelope.from, participant, round, orientation),
            Message::RoundProgress { round } => self.on_round_progress(envelope.from, round),
            Message::GroupCalibrated { .. } | Message::ModuleConnected => {
                Outcome::Ignored(IgnoreReason::UnexpectedMessage)
            }
        }
    }

    fn on_submission(
        &mut self,
        from: ParticipantId,
        participant: ParticipantId,
        round: u8,
        orientation: Orientation,
    ) -> Outcome {
        if !self.config.role.is_leader() {
            return Outcome::Ignored(IgnoreReason::WrongRole);
        }
        if !matches!(
            self.state,
            SyncState::Processing | SyncState::LeaderWaiting
        ) {
            return Outcome::Ignored(IgnoreReason::InvalidTransition);
        }
        if !self.submissions.is_known(participant) {
            return Outcome::Ignored(IgnoreReason::UnknownParticipant);
        }
        if participant != from || participant == self.config.local_id {
            return Outcome::Ignored(IgnoreReason::Spoofed);
        }
        if usize::from(round) != self.rounds.current_round() {
            return Outcome::Ignored(IgnoreReason::StaleRound);
        }

        info!(
            "participant {} matched round {} (roll={} pitch={} yaw={})",
            participant.0,
            round + 1,
            orientation.roll,
            orientation.pitch,
            orientation.yaw
        );
        self.submissions.record_submission(participant);

        if self.submissions.all_submitted() {
            self.complete_round();
        } else {
            debug!("waiting for remaining participants");
        }
        Outcome::Handled
    }

    fn on_round_progress(&mut self, from: ParticipantId, round: u8) -> Outcome {
        let Role::Follower { leader } = self.config.role else {
            return Outcome::Ignored(IgnoreReason::WrongRole);
        };
        if from != leader {
            return Outcome::Ignored(IgnoreReason::Spoofed);
        }

        let round = usize::from(round);
        let current = self.rounds.current_round();
        let fresh = match self.state {
            // A node that has not played yet may join at the round in progress.
            SyncState::RoundStaged => round >= current,
            // The round we submitted for is finished only once the leader moves past it.
            SyncState::FollowerWaiting => round > current,
            _ => return Outcome::Ignored(IgnoreReason::InvalidTransition),
        };
        if !fresh || round >= R {
            return Outcome::Ignored(IgnoreReason::StaleRound);
        }

        // Rounds the leader has moved past are complete for the whole group.
        while self.rounds.current_round() < round {
            let index = self.rounds.current_round();
            if let Err(e) = self.rounds.complete_current() {
                error!("catch-up failed: {}", e);
                return Outcome::Ignored(IgnoreReason::StaleRound);
            }
            self.panel.set_indicator(Indicator::Round(index as u8), true);
        }

        self.load_round();
        Outcome::Handled
    }

    /// Announce the current round (leader), run the countdown and go live.
    fn load_round(&mut self) {
        self.enter(SyncState::RoundLoading);
        let round = self.rounds.current_round() as u8;

        if self.config.role.is_leader() {
            let local = self.config.local_id;
            for &peer in self.config.participants.iter().filter(|&&p| p != local) {
                self.radio.send(peer, &Message::RoundProgress { round });
            }
        }

        for remaining in (1..=self.config.countdown_steps).rev() {
            self.panel.render(Screen::Countdown { round, remaining });
            self.delay.delay_ms(self.config.countdown_step_ms);
        }
        self.panel.render(Screen::Blank);

        self.last_sample_ms = None;
        self.enter(SyncState::Processing);
    }

    /// Every participant has matched: close the round and stage what comes next.
    fn complete_round(&mut self) {
        let index = self.rounds.current_round();
        let next = match self.rounds.complete_current() {
            Ok(next) => next,
            Err(e) => {
                error!("cannot complete round: {}", e);
                return;
            }
        };
        info!("all participants matched round {}", index + 1);

        self.panel.set_indicator(Indicator::Round(index as u8), true);
        self.panel.play_cue(Cue::Success);
        self.submissions.reset();

        if next < R {
            self.enter(SyncState::RoundStaged);
            self.panel.render(Screen::RoundStaged { round: next as u8 });
        } else {
            self.enter(SyncState::CalibrationStaged);
            self.panel.render(Screen::CalibrationStaged);
        }
    }

    fn complete_calibration(&mut self) {
        self.enter(SyncState::CalibrationComplete);
        self.panel.render(Screen::CalibrationComplete);
        self.panel.play_cue(Cue::Triumph);
        self.panel.set_indicator(Indicator::Calibrated, true);
        self.radio.send(
            self.config.upstream,
            &Message::GroupCalibrated { calibrated: true },
        );
    }

    fn refresh_live(&mut self, now_ms: u32) {
        if self.state != SyncState::Processing {
            return;
        }

        let due = self.last_sample_ms.map_or(true, |last| {
            now_ms.wrapping_sub(last) >= self.config.sample_interval_ms
        });
        if !due {
            return;
        }

        let sample = self.sensor.sample();
        self.last_sample = sample;
        self.last_sample_ms = Some(now_ms);
        self.panel.render(Screen::Orientation(sample));

        for (i, &done) in self.rounds.completed().iter().enumerate() {
            self.panel.set_indicator(Indicator::Round(i as u8), done);
        }
    }

    fn enter(&mut self, next: SyncState) {
        info!("state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    #[inline]
    pub fn state(&self) -> SyncState {
        self.state
    }

    #[inline]
    pub fn current_round(&self) -> usize {
        self.rounds.current_round()
    }

    #[inline]
    pub fn rounds(&self) -> &RoundEngine<R> {
        &self.rounds
    }

    #[inline]
    pub fn submissions(&self) -> &SubmissionTracker<N> {
        &self.submissions
    }

    /// Whether the terminal calibration action has run.
    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.gate.has_fired()
    }

    /// Most recent orientation read by the machine.
    #[inline]
    pub fn last_sample(&self) -> Orientation {
        self.last_sample
    }

    #[inline]
    pub fn config(&self) -> &GameConfig<R, N> {
        &self.config
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn radio(&self) -> &T {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut T {
        &mut self.radio
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}
