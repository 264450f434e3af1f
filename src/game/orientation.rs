// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Orientation samples and the tolerance match used to score a round.

/// Roll, pitch and yaw in whole degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Orientation {
    pub roll: i16,
    pub pitch: i16,
    pub yaw: i16,
}

impl Orientation {
    pub const fn new(roll: i16, pitch: i16, yaw: i16) -> Self {
        Self { roll, pitch, yaw }
    }
}

/// A round's target orientation, tagged with its position in the round sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoundTarget {
    pub index: u8,
    pub orientation: Orientation,
}

/// Returns true if `sample` is within `tolerance` degrees of `target` on every axis.
///
/// A difference exactly equal to the tolerance still counts as a match.
pub fn matches(target: &Orientation, sample: &Orientation, tolerance: u16) -> bool {
    within(target.roll, sample.roll, tolerance)
        && within(target.pitch, sample.pitch, tolerance)
        && within(target.yaw, sample.yaw, tolerance)
}

#[inline]
fn within(target: i16, sample: i16, tolerance: u16) -> bool {
    // Widen first so i16::MIN - i16::MAX cannot overflow.
    (i32::from(target) - i32::from(sample)).unsigned_abs() <= u32::from(tolerance)
}
