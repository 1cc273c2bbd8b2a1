//! Pose primitives and the shared body/vehicle schemas
//!
//! Joint and sub-part order is fixed for the lifetime of a session and is
//! shared by sender and receiver: the index IS the identity on the wire,
//! no names travel.

use std::fmt;

use crate::{Quat, Vec3};

/// Rigid-body pose: position plus unit-quaternion orientation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Pose {
            position,
            orientation: orientation.normalize(),
        }
    }

    /// A zero position together with an identity orientation marks an
    /// uninitialized remote actor. Receivers must drop such poses rather
    /// than snap the actor to the origin.
    pub fn is_sentinel(&self) -> bool {
        self.position == Vec3::ZERO && self.orientation == Quat::IDENTITY
    }
}

/// Joint identifier for the pedestrian skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    // Head
    Head,
    Neck,

    // Torso
    Spine,
    Chest,
    Hips,

    // Left arm
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    LeftHand,

    // Right arm
    RightShoulder,
    RightElbow,
    RightWrist,
    RightHand,

    // Left leg
    LeftHip,
    LeftKnee,
    LeftAnkle,
    LeftFoot,

    // Right leg
    RightHip,
    RightKnee,
    RightAnkle,
    RightFoot,
}

impl Joint {
    /// All joints in wire order
    pub fn all() -> &'static [Joint] {
        &[
            Joint::Head,
            Joint::Neck,
            Joint::Spine,
            Joint::Chest,
            Joint::Hips,
            Joint::LeftShoulder,
            Joint::LeftElbow,
            Joint::LeftWrist,
            Joint::LeftHand,
            Joint::RightShoulder,
            Joint::RightElbow,
            Joint::RightWrist,
            Joint::RightHand,
            Joint::LeftHip,
            Joint::LeftKnee,
            Joint::LeftAnkle,
            Joint::LeftFoot,
            Joint::RightHip,
            Joint::RightKnee,
            Joint::RightAnkle,
            Joint::RightFoot,
        ]
    }

    /// Number of joints
    pub fn count() -> usize {
        21
    }
}

/// Named sub-part of a vehicle actor. The schema is established once at
/// session setup; messages carry sub-poses in this fixed order, never
/// resolved by name per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubPart {
    // Cyclist
    Pedal,
    PedalLeft,
    PedalRight,
    WheelBack,
    WheelFront,

    // Driver
    WheelFrontLeft,
    WheelFrontRight,
    WheelBackLeft,
    WheelBackRight,
}

impl SubPart {
    /// Cyclist sub-parts in wire order
    pub fn cyclist() -> &'static [SubPart] {
        &[
            SubPart::Pedal,
            SubPart::PedalLeft,
            SubPart::PedalRight,
            SubPart::WheelBack,
            SubPart::WheelFront,
        ]
    }

    /// Driver sub-parts in wire order
    pub fn driver() -> &'static [SubPart] {
        &[
            SubPart::WheelFrontLeft,
            SubPart::WheelFrontRight,
            SubPart::WheelBackLeft,
            SubPart::WheelBackRight,
        ]
    }
}

impl fmt::Display for SubPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubPart::Pedal => "pedal",
            SubPart::PedalLeft => "pedal_left",
            SubPart::PedalRight => "pedal_right",
            SubPart::WheelBack => "wheel_back",
            SubPart::WheelFront => "wheel_front",
            SubPart::WheelFrontLeft => "wheel_front_left",
            SubPart::WheelFrontRight => "wheel_front_right",
            SubPart::WheelBackLeft => "wheel_back_left",
            SubPart::WheelBackRight => "wheel_back_right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_count_matches_all() {
        assert_eq!(Joint::all().len(), Joint::count());
    }

    #[test]
    fn test_sentinel_detection() {
        assert!(Pose::default().is_sentinel());

        let moved = Pose::new(Vec3::new(0.0, 0.0, 0.001), Quat::identity());
        assert!(!moved.is_sentinel());

        let turned = Pose::new(Vec3::zero(), Quat::from_yaw(0.1));
        assert!(!turned.is_sentinel());
    }

    #[test]
    fn test_subpart_schemas_disjoint() {
        for part in SubPart::cyclist() {
            assert!(!SubPart::driver().contains(part));
        }
    }
}
