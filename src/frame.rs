//! Canonical-frame normalization.
//!
//! The policy was trained with the team starting on one side of the passage.
//! When the reference agent starts on the other side the whole scene is
//! rotated by π about the vertical axis before it reaches the policy, and
//! every command is rotated back afterwards.

use std::fmt;

use crate::types::{Command, Vec2};

/// Rotation about the vertical axis shared by all agents during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameTransform {
    /// No rotation.
    #[default]
    Identity,
    /// Rotation by π: `(x, y) -> (-x, -y)`.
    HalfTurn,
}

impl FrameTransform {
    /// Rotation angle about the vertical axis (rad).
    pub fn yaw(&self) -> f64 {
        match self {
            FrameTransform::Identity => 0.0,
            FrameTransform::HalfTurn => std::f64::consts::PI,
        }
    }

    /// Maps a world-frame vector into the canonical frame.
    pub fn apply(&self, v: Vec2) -> Vec2 {
        match self {
            FrameTransform::Identity => v,
            FrameTransform::HalfTurn => -v,
        }
    }

    /// Maps a canonical-frame vector back into the world frame.
    pub fn invert(&self, v: Vec2) -> Vec2 {
        // A half turn is its own inverse.
        match self {
            FrameTransform::Identity => v,
            FrameTransform::HalfTurn => -v,
        }
    }

    /// Maps a canonical-frame command back into the world frame.
    ///
    /// Only the planar velocity is rotated; the heading passes through.
    pub fn invert_command(&self, command: Command) -> Command {
        Command::new(self.invert(command.velocity()), command.yaw)
    }
}

impl fmt::Display for FrameTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameTransform::Identity => write!(f, "identity"),
            FrameTransform::HalfTurn => write!(f, "half-turn"),
        }
    }
}

/// Chooses the frame transform for a tick.
///
/// The decision is global: one transform is shared by every agent.
pub trait FrameNormalizer: Send + Sync {
    /// Computes the transform from the reference agent's start position.
    fn compute_frame(&self, reference_position: Vec2) -> FrameTransform;
}

/// Mirrors the scene whenever the reference agent starts at `y > 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideMirror;

impl FrameNormalizer for SideMirror {
    fn compute_frame(&self, reference_position: Vec2) -> FrameTransform {
        if reference_position.y > 0.0 {
            FrameTransform::HalfTurn
        } else {
            FrameTransform::Identity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_y_selects_half_turn() {
        assert_eq!(
            SideMirror.compute_frame(Vec2::new(0.0, 1.0)),
            FrameTransform::HalfTurn
        );
        assert_eq!(
            SideMirror.compute_frame(Vec2::new(5.0, -1.0)),
            FrameTransform::Identity
        );
    }

    #[test]
    fn zero_y_is_identity() {
        assert_eq!(
            SideMirror.compute_frame(Vec2::new(3.0, 0.0)),
            FrameTransform::Identity
        );
    }

    #[test]
    fn half_turn_maps_point_and_back() {
        let t = SideMirror.compute_frame(Vec2::new(0.0, 2.0));
        let canonical = t.apply(Vec2::new(1.0, 1.0));
        assert_eq!(canonical, Vec2::new(-1.0, -1.0));
        assert_eq!(t.invert(canonical), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn invert_undoes_apply() {
        let samples = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.5, -0.25),
            Vec2::new(-1e6, 3.3e-7),
            Vec2::new(f64::MIN_POSITIVE, -2.0),
        ];
        for t in [FrameTransform::Identity, FrameTransform::HalfTurn] {
            for v in samples {
                let back = t.invert(t.apply(v));
                assert!((back.x - v.x).abs() < 1e-12);
                assert!((back.y - v.y).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn heading_passes_through() {
        let cmd = Command::new(Vec2::new(0.25, 0.0), std::f64::consts::FRAC_PI_2);
        let world = FrameTransform::HalfTurn.invert_command(cmd);
        assert_eq!(world.velocity(), Vec2::new(-0.25, 0.0));
        assert_eq!(world.yaw, std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn yaw_angles() {
        assert_eq!(FrameTransform::Identity.yaw(), 0.0);
        assert_eq!(FrameTransform::HalfTurn.yaw(), std::f64::consts::PI);
    }
}
