// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Per-round submission tracking.
//!
//! The roster is fixed when the tracker is built; a submission is a boolean flag, so repeated
//! submissions from the same node before a [`SubmissionTracker::reset`] count once.

use log::warn;

use crate::game::ParticipantId;

pub struct SubmissionTracker<const N: usize> {
    participants: [ParticipantId; N],
    submitted: [bool; N],
}

impl<const N: usize> SubmissionTracker<N> {
    pub fn new(participants: [ParticipantId; N]) -> Self {
        Self {
            participants,
            submitted: [false; N],
        }
    }

    /// Record that `participant` matched the current round.
    ///
    /// Returns false, and changes nothing, if the participant is not on the roster.
    pub fn record_submission(&mut self, participant: ParticipantId) -> bool {
        match self.position(participant) {
            Some(slot) => {
                self.submitted[slot] = true;
                true
            }
            None => {
                warn!("ignoring submission from unknown participant {}", participant.0);
                false
            }
        }
    }

    pub fn all_submitted(&self) -> bool {
        self.submitted.iter().all(|&s| s)
    }

    pub fn has_submitted(&self, participant: ParticipantId) -> bool {
        self.position(participant)
            .is_some_and(|slot| self.submitted[slot])
    }

    /// Clear every flag. Called once per round transition.
    pub fn reset(&mut self) {
        self.submitted = [false; N];
    }

    #[inline]
    pub fn is_known(&self, participant: ParticipantId) -> bool {
        self.position(participant).is_some()
    }

    #[inline]
    pub fn participants(&self) -> &[ParticipantId; N] {
        &self.participants
    }

    fn position(&self, participant: ParticipantId) -> Option<usize> {
        self.participants.iter().position(|&p| p == participant)
    }
}
