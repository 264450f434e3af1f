// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Round targets, per-round completion flags and the current-round cursor.
//!
//! Completion flags only ever go from `false` to `true`, and the cursor only moves forward by one
//! immediately after the flag at the cursor is set. Nothing resets them for the life of the
//! process.

use thiserror::Error;

use crate::game::orientation::{self, Orientation, RoundTarget};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    #[error("round {index} does not exist")]
    OutOfRange { index: usize },
    #[error("round {index} is not the current round ({current})")]
    NotCurrent { index: usize, current: usize },
    #[error("round {index} is already complete")]
    AlreadyComplete { index: usize },
    #[error("round {index} must be marked complete before the cursor advances")]
    NotComplete { index: usize },
}

/// Owns the round sequence for one game.
pub struct RoundEngine<const R: usize> {
    targets: [Orientation; R],
    completed: [bool; R],
    current: usize,
    tolerance: u16,
}

impl<const R: usize> RoundEngine<R> {
    pub fn new(targets: [Orientation; R], tolerance: u16) -> Self {
        Self {
            targets,
            completed: [false; R],
            current: 0,
            tolerance,
        }
    }

    /// Index of the round being played. Equal to `R` once every round has been attempted.
    #[inline]
    pub fn current_round(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn total_rounds(&self) -> usize {
        R
    }

    #[inline]
    pub fn tolerance(&self) -> u16 {
        self.tolerance
    }

    /// Target for the current round, or `None` past the end of the sequence.
    pub fn current_target(&self) -> Option<RoundTarget> {
        self.targets.get(self.current).map(|&orientation| RoundTarget {
            index: self.current as u8,
            orientation,
        })
    }

    /// Test a sample against the current round's target.
    ///
    /// Always false once the sequence is exhausted.
    pub fn matches_current(&self, sample: &Orientation) -> bool {
        self.current_target()
            .is_some_and(|t| orientation::matches(&t.orientation, sample, self.tolerance))
    }

    /// Set the completion flag for `index`, which must be the current, not-yet-complete round.
    pub fn mark_round_complete(&mut self, index: usize) -> Result<(), RoundError> {
        if index >= R {
            return Err(RoundError::OutOfRange { index });
        }
        if index != self.current {
            return Err(RoundError::NotCurrent {
                index,
                current: self.current,
            });
        }
        if self.completed[index] {
            return Err(RoundError::AlreadyComplete { index });
        }
        self.completed[index] = true;
        Ok(())
    }

    /// Move the cursor past the round that was just marked complete.
    pub fn advance(&mut self) -> Result<usize, RoundError> {
        match self.completed.get(self.current) {
            None => Err(RoundError::OutOfRange {
                index: self.current,
            }),
            Some(false) => Err(RoundError::NotComplete {
                index: self.current,
            }),
            Some(true) => {
                self.current += 1;
                Ok(self.current)
            }
        }
    }

    /// Mark the current round complete and advance the cursor.
    pub fn complete_current(&mut self) -> Result<usize, RoundError> {
        self.mark_round_complete(self.current)?;
        self.advance()
    }

    #[inline]
    pub fn is_complete(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub fn all_rounds_complete(&self) -> bool {
        self.completed.iter().all(|&done| done)
    }

    /// Per-round completion flags, in round order.
    #[inline]
    pub fn completed(&self) -> &[bool; R] {
        &self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RoundEngine<3> {
        RoundEngine::new(
            [
                Orientation::new(0, 0, 10),
                Orientation::new(0, 0, 20),
                Orientation::new(0, 0, 10),
            ],
            2,
        )
    }

    #[test]
    fn starts_at_round_zero_with_nothing_complete() {
        let rounds = engine();
        assert_eq!(rounds.current_round(), 0);
        assert_eq!(rounds.completed(), &[false; 3]);
        assert!(!rounds.all_rounds_complete());
        assert_eq!(
            rounds.current_target(),
            Some(RoundTarget {
                index: 0,
                orientation: Orientation::new(0, 0, 10)
            })
        );
    }

    #[test]
    fn cursor_follows_completion_one_step_at_a_time() {
        let mut rounds = engine();
        assert_eq!(rounds.complete_current(), Ok(1));
        assert!(rounds.is_complete(0));
        assert_eq!(rounds.current_target().map(|t| t.index), Some(1));

        assert_eq!(rounds.complete_current(), Ok(2));
        assert_eq!(rounds.complete_current(), Ok(3));
        assert!(rounds.all_rounds_complete());
        assert_eq!(rounds.current_target(), None);
    }

    #[test]
    fn out_of_order_completion_is_rejected() {
        let mut rounds = engine();
        assert_eq!(
            rounds.mark_round_complete(1),
            Err(RoundError::NotCurrent {
                index: 1,
                current: 0
            })
        );
        assert_eq!(
            rounds.mark_round_complete(9),
            Err(RoundError::OutOfRange { index: 9 })
        );
        assert_eq!(rounds.completed(), &[false; 3]);
    }

    #[test]
    fn double_completion_is_rejected() {
        let mut rounds = engine();
        assert_eq!(rounds.mark_round_complete(0), Ok(()));
        assert_eq!(
            rounds.mark_round_complete(0),
            Err(RoundError::AlreadyComplete { index: 0 })
        );
    }

    #[test]
    fn cannot_advance_past_incomplete_round() {
        let mut rounds = engine();
        assert_eq!(rounds.advance(), Err(RoundError::NotComplete { index: 0 }));
        assert_eq!(rounds.current_round(), 0);
    }

    #[test]
    fn matching_uses_the_current_target() {
        let mut rounds = engine();
        assert!(rounds.matches_current(&Orientation::new(1, -1, 11)));
        assert!(!rounds.matches_current(&Orientation::new(0, 0, 20)));

        rounds.complete_current().unwrap();
        assert!(rounds.matches_current(&Orientation::new(0, 0, 20)));

        rounds.complete_current().unwrap();
        rounds.complete_current().unwrap();
        assert!(!rounds.matches_current(&Orientation::new(0, 0, 10)));
    }
}
