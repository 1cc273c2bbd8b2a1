//! Shared test doubles for the collaborator seams
//!
//! Every seam the session exposes gets a recording or scripted stand-in
//! here, so integration tests can assert on what actually reached the
//! presentation layer.

use std::collections::HashMap;

use crossway_core::{ClientId, Pose, SubPart};
use crossway_session::{DisplayElement, DisplaySink, InputSource, PoseSink};

/// An input source that holds a fixed axis pair until rescripted
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptedInput {
    /// Forward/back axis in [-1, 1]
    pub forward: f32,
    /// Turn axis in [-1, 1]
    pub turn: f32,
}

impl ScriptedInput {
    pub fn new(forward: f32, turn: f32) -> Self {
        ScriptedInput { forward, turn }
    }
}

impl InputSource for ScriptedInput {
    fn read_axes(&mut self) -> (f32, f32) {
        (self.forward, self.turn)
    }
}

/// Records every pose write, keyed the way a scene graph would key them
#[derive(Debug, Default)]
pub struct RecordedScene {
    /// Root transforms by remote actor
    pub roots: HashMap<ClientId, Pose>,
    /// Sub-part transforms (wheels, pedals) by remote actor
    pub sub_poses: HashMap<(ClientId, SubPart), Pose>,
    /// Skeleton joints by remote actor and joint index
    pub joints: HashMap<(ClientId, usize), Pose>,
}

impl RecordedScene {
    /// Distinct remote actors that wrote a joint into this scene
    pub fn joint_senders(&self) -> Vec<ClientId> {
        let mut senders: Vec<ClientId> = self.joints.keys().map(|(id, _)| *id).collect();
        senders.sort_by_key(|id| id.0);
        senders.dedup();
        senders
    }
}

impl PoseSink for RecordedScene {
    fn apply_pose(&mut self, target: ClientId, pose: Pose) {
        self.roots.insert(target, pose);
    }

    fn apply_sub_pose(&mut self, target: ClientId, part: SubPart, pose: Pose) {
        self.sub_poses.insert((target, part), pose);
    }

    fn apply_joint(&mut self, target: ClientId, index: usize, pose: Pose) {
        self.joints.insert((target, index), pose);
    }
}

/// Records eHMI element states as the display sink sees them
#[derive(Debug, Default)]
pub struct RecordedDisplay {
    states: HashMap<DisplayElement, bool>,
}

impl RecordedDisplay {
    pub fn is_active(&self, element: DisplayElement) -> bool {
        self.states.get(&element).copied().unwrap_or(false)
    }

    /// Every element currently switched on
    pub fn active(&self) -> Vec<DisplayElement> {
        self.states
            .iter()
            .filter(|(_, &on)| on)
            .map(|(&element, _)| element)
            .collect()
    }
}

impl DisplaySink for RecordedDisplay {
    fn set_active(&mut self, element: DisplayElement, active: bool) {
        self.states.insert(element, active);
    }
}
