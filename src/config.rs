// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Game configuration.
//!
//! Round targets, tolerance and the participant roster are fixed for the lifetime of the process.
//! The defaults below match the three-round game the boards ship with; a board binary builds a
//! [`GameConfig`] from them and hands it to the [`SyncMachine`](crate::game::SyncMachine).

use thiserror::Error;

use crate::game::{Orientation, ParticipantId};

/// Number of rounds in the default game.
pub const DEFAULT_ROUNDS: usize = 3;

/// Number of nodes in the default game (leader + one follower).
pub const DEFAULT_PARTICIPANTS: usize = 2;

/// Default round targets.
pub const DEFAULT_TARGETS: [Orientation; DEFAULT_ROUNDS] = [
    Orientation::new(0, 0, 10),
    Orientation::new(0, 0, 20),
    Orientation::new(0, 0, 10),
];

/// Degrees of slack allowed on each axis.
pub const DEFAULT_TOLERANCE_DEG: u16 = 2;

/// Countdown shown before a round goes live.
pub const DEFAULT_COUNTDOWN_STEPS: u8 = 5;
pub const DEFAULT_COUNTDOWN_STEP_MS: u32 = 1_000;

/// Live orientation refresh period while a round is running.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 100;

pub const LEADER_ID: ParticipantId = ParticipantId(102);
pub const FOLLOWER_ID: ParticipantId = ParticipantId(112);
pub const HUB_ID: ParticipantId = ParticipantId(1);

/// Which side of the protocol this node plays.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// Owns round progression and collects submissions.
    Leader,
    /// Submits matches to `leader` and waits for round progress.
    Follower { leader: ParticipantId },
}

impl Role {
    #[inline]
    pub fn is_leader(&self) -> bool {
        matches!(self, Role::Leader)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one round is required")]
    NoRounds,
    #[error("{0} rounds do not fit in a one-byte round index")]
    TooManyRounds(usize),
    #[error("local node {0:?} is not in the participant list")]
    LocalNotParticipant(ParticipantId),
    #[error("participant {0:?} is listed more than once")]
    DuplicateParticipant(ParticipantId),
    #[error("leader {0:?} is not in the participant list")]
    LeaderNotParticipant(ParticipantId),
    #[error("a follower cannot name itself as leader")]
    FollowerIsLeader,
    #[error("countdown steps must be non-zero")]
    EmptyCountdown,
}

/// Everything the core needs to run a game on one node.
#[derive(Copy, Clone, Debug)]
pub struct GameConfig<const R: usize, const N: usize> {
    pub role: Role,
    pub local_id: ParticipantId,
    /// Hub that receives the startup and calibrated notifications.
    pub upstream: ParticipantId,
    pub participants: [ParticipantId; N],
    pub targets: [Orientation; R],
    pub tolerance: u16,
    pub countdown_steps: u8,
    pub countdown_step_ms: u32,
    pub sample_interval_ms: u32,
}

impl GameConfig<DEFAULT_ROUNDS, DEFAULT_PARTICIPANTS> {
    /// The shipped leader configuration.
    pub const fn default_leader() -> Self {
        Self {
            role: Role::Leader,
            local_id: LEADER_ID,
            upstream: HUB_ID,
            participants: [LEADER_ID, FOLLOWER_ID],
            targets: DEFAULT_TARGETS,
            tolerance: DEFAULT_TOLERANCE_DEG,
            countdown_steps: DEFAULT_COUNTDOWN_STEPS,
            countdown_step_ms: DEFAULT_COUNTDOWN_STEP_MS,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
        }
    }

    /// The shipped follower configuration.
    pub const fn default_follower() -> Self {
        Self {
            role: Role::Follower { leader: LEADER_ID },
            local_id: FOLLOWER_ID,
            ..Self::default_leader()
        }
    }
}

impl<const R: usize, const N: usize> GameConfig<R, N> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if R == 0 {
            return Err(ConfigError::NoRounds);
        }
        if R > usize::from(u8::MAX) {
            return Err(ConfigError::TooManyRounds(R));
        }
        if self.countdown_steps == 0 {
            return Err(ConfigError::EmptyCountdown);
        }

        for (i, id) in self.participants.iter().enumerate() {
            if self.participants[..i].contains(id) {
                return Err(ConfigError::DuplicateParticipant(*id));
            }
        }

        if !self.is_participant(self.local_id) {
            return Err(ConfigError::LocalNotParticipant(self.local_id));
        }

        if let Role::Follower { leader } = self.role {
            if leader == self.local_id {
                return Err(ConfigError::FollowerIsLeader);
            }
            if !self.is_participant(leader) {
                return Err(ConfigError::LeaderNotParticipant(leader));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn is_participant(&self, id: ParticipantId) -> bool {
        self.participants.contains(&id)
    }

    /// Number of rounds in the game.
    #[inline]
    pub const fn rounds(&self) -> usize {
        R
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_configs_are_valid() {
        assert_eq!(GameConfig::default_leader().validate(), Ok(()));
        assert_eq!(GameConfig::default_follower().validate(), Ok(()));
    }

    #[test]
    fn local_node_must_participate() {
        let mut cfg = GameConfig::default_leader();
        cfg.local_id = ParticipantId(7);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::LocalNotParticipant(ParticipantId(7)))
        );
    }

    #[test]
    fn duplicate_participants_rejected() {
        let mut cfg = GameConfig::default_leader();
        cfg.participants = [LEADER_ID, LEADER_ID];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateParticipant(LEADER_ID))
        );
    }

    #[test]
    fn follower_needs_a_known_leader() {
        let mut cfg = GameConfig::default_follower();
        cfg.role = Role::Follower {
            leader: ParticipantId(50),
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::LeaderNotParticipant(ParticipantId(50)))
        );

        cfg.role = Role::Follower {
            leader: FOLLOWER_ID,
        };
        assert_eq!(cfg.validate(), Err(ConfigError::FollowerIsLeader));
    }

    #[test]
    fn empty_round_list_rejected() {
        let cfg: GameConfig<0, 2> = GameConfig {
            role: Role::Leader,
            local_id: LEADER_ID,
            upstream: HUB_ID,
            participants: [LEADER_ID, FOLLOWER_ID],
            targets: [],
            tolerance: 2,
            countdown_steps: 1,
            countdown_step_ms: 0,
            sample_interval_ms: 100,
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoRounds));
    }

    #[test]
    fn zero_countdown_rejected() {
        let mut cfg = GameConfig::default_leader();
        cfg.countdown_steps = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyCountdown));
    }
}
