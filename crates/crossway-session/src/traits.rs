//! Collaborator seams toward the presentation layer
//!
//! The core only requires that its consumers can set transform poses,
//! flip visual elements on and off, and produce a local input delta.

use crossway_core::{ClientId, EhmiDisplay, Pose, SubPart, WhomIndicator};

/// One switchable visual element of the eHMI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayElement {
    /// The main display backplate
    Backplate,
    /// One of the eleven display variants
    Variant(EhmiDisplay),
    /// A target-specific whom indicator
    Indicator(WhomIndicator),
}

/// Receives decoded remote pose data for rendering
pub trait PoseSink {
    /// Set a remote actor's root transform
    fn apply_pose(&mut self, target: ClientId, pose: Pose);

    /// Set a remote actor's sub-part transform (wheel, pedal)
    fn apply_sub_pose(&mut self, target: ClientId, part: SubPart, pose: Pose);

    /// Set one joint of a remote pedestrian skeleton by index
    fn apply_joint(&mut self, target: ClientId, index: usize, pose: Pose);
}

/// Produces the local participant's input delta once per tick
pub trait InputSource {
    /// Abstract axis pair: (forward/back, turn left/right), each in [-1, 1]
    fn read_axes(&mut self) -> (f32, f32);
}

/// Switches eHMI visual elements on and off
pub trait DisplaySink {
    fn set_active(&mut self, element: DisplayElement, active: bool);
}
