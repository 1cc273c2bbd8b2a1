//! Ordered pose sequences with a stable index schema

use crossway_core::{Joint, Pose, Role, SubPart};

/// An ordered sequence of poses. Index order is stable for the lifetime of
/// a session and shared by sender and receiver; the index is the identity.
#[derive(Clone, Debug, Default)]
pub struct JointSet {
    poses: Vec<Pose>,
}

impl JointSet {
    /// Create a set of `n` default poses
    pub fn with_len(n: usize) -> Self {
        JointSet {
            poses: vec![Pose::default(); n],
        }
    }

    /// The full pedestrian skeleton
    pub fn skeleton() -> Self {
        Self::with_len(Joint::count())
    }

    /// The sub-part set for a vehicle role. Pedestrians use the skeleton.
    pub fn sub_parts(role: Role) -> Self {
        match role {
            Role::Pedestrian => Self::skeleton(),
            Role::Cyclist => Self::with_len(SubPart::cyclist().len()),
            Role::Driver => Self::with_len(SubPart::driver().len()),
        }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Pose> {
        self.poses.get(index)
    }

    /// Write a pose; out-of-range writes are skipped. Local sets may
    /// legitimately be smaller than the sender's.
    pub fn set(&mut self, index: usize, pose: Pose) {
        if let Some(slot) = self.poses.get_mut(index) {
            *slot = pose;
        }
    }

    pub fn joint(&self, joint: Joint) -> Option<&Pose> {
        self.poses.get(joint as usize)
    }

    pub fn set_joint(&mut self, joint: Joint, pose: Pose) {
        self.set(joint as usize, pose);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.poses.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pose> {
        self.poses.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossway_core::{Quat, Vec3};

    #[test]
    fn test_skeleton_size() {
        assert_eq!(JointSet::skeleton().len(), 21);
        assert_eq!(JointSet::sub_parts(Role::Cyclist).len(), 5);
        assert_eq!(JointSet::sub_parts(Role::Driver).len(), 4);
    }

    #[test]
    fn test_out_of_range_write_skipped() {
        let mut set = JointSet::with_len(2);
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::identity());

        set.set(5, pose);

        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|p| p.is_sentinel()));
    }
}
