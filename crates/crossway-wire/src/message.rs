//! Message structures for Crossway traffic
//!
//! Three participant data messages (pedestrian joint chunks, cyclist data,
//! driver data), three server broadcasts (condition, speed, driving state),
//! and the Hello used to register a connection's role with the relay.

use crossway_core::{ClientId, Pose, Role};

/// Message kind identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageKind {
    /// Connection registration: sender id + role
    Hello = 0x00,
    /// Chunk of pedestrian joint poses
    PoseChunk = 0x01,
    /// Cyclist root pose + sub-part poses
    CyclistData = 0x02,
    /// Driver root pose + sub-part poses
    DriverData = 0x03,
    /// Experiment condition broadcast
    Condition = 0x04,
    /// AV speed broadcast
    Speed = 0x05,
    /// AV driving state broadcast
    DrivingState = 0x06,
}

impl MessageKind {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(MessageKind::Hello),
            0x01 => Some(MessageKind::PoseChunk),
            0x02 => Some(MessageKind::CyclistData),
            0x03 => Some(MessageKind::DriverData),
            0x04 => Some(MessageKind::Condition),
            0x05 => Some(MessageKind::Speed),
            0x06 => Some(MessageKind::DrivingState),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Connection registration message
#[derive(Clone, Debug, PartialEq)]
pub struct HelloMessage {
    pub sender: ClientId,
    pub role: Role,
}

/// A bounded slice of a joint set, applied independently and idempotently
/// to the indices it names
#[derive(Clone, Debug, PartialEq)]
pub struct PoseChunkMessage {
    pub sender: ClientId,
    pub start_index: u32,
    pub poses: Vec<Pose>,
}

/// Root pose plus fixed-schema sub-part poses for a vehicle actor.
/// Sub-poses are ordered by the sending role's SubPart schema.
#[derive(Clone, Debug, PartialEq)]
pub struct RoleDataMessage {
    pub sender: ClientId,
    pub root: Pose,
    pub sub_poses: Vec<Pose>,
}

/// Experiment condition broadcast. Carried as a raw number: receivers
/// validate against the condition table and warn on unrecognized values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionMessage {
    pub condition_num: i32,
}

/// Server-authoritative AV speed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedMessage {
    pub speed: f32,
}

/// Server-authoritative AV driving state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrivingStateMessage {
    pub is_driving: bool,
}

/// One Crossway wire message
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Hello(HelloMessage),
    PoseChunk(PoseChunkMessage),
    CyclistData(RoleDataMessage),
    DriverData(RoleDataMessage),
    Condition(ConditionMessage),
    Speed(SpeedMessage),
    DrivingState(DrivingStateMessage),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Hello(_) => MessageKind::Hello,
            Message::PoseChunk(_) => MessageKind::PoseChunk,
            Message::CyclistData(_) => MessageKind::CyclistData,
            Message::DriverData(_) => MessageKind::DriverData,
            Message::Condition(_) => MessageKind::Condition,
            Message::Speed(_) => MessageKind::Speed,
            Message::DrivingState(_) => MessageKind::DrivingState,
        }
    }

    /// The originating participant, for messages that carry one.
    /// Server broadcasts have no sender.
    pub fn sender(&self) -> Option<ClientId> {
        match self {
            Message::Hello(m) => Some(m.sender),
            Message::PoseChunk(m) => Some(m.sender),
            Message::CyclistData(m) => Some(m.sender),
            Message::DriverData(m) => Some(m.sender),
            Message::Condition(_) | Message::Speed(_) | Message::DrivingState(_) => None,
        }
    }
}
