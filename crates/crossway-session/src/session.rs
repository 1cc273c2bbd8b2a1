//! Participant session - the per-tick loop for one locally-controlled role
//!
//! Only the locally-controlled session samples and sends. All sessions
//! apply received messages except self-origin ones, which are always
//! discarded on receipt. Remote actors live in owned replicas written only
//! by the local receive handler and mirrored out through the PoseSink.

use tracing::{debug, warn};

use crossway_core::{ClientId, Pose, Quat, Role, SubPart, Vec3};
use crossway_state::{apply_chunk, encode_chunks, JointSet, DEFAULT_CHUNK_SIZE};
use crossway_wire::{HelloMessage, Message, RoleDataMessage};

use crate::{DisplaySink, EhmiController, InputSource, PoseSink};

/// Wheel/pedal spin rate for the cyclist rig, degrees per second
const CYCLIST_SPIN_RATE: f32 = 200.0;

/// Driver wheel spin per unit of forward speed, degrees per unit
const DRIVER_WHEEL_SPIN: f32 = 60.0;

/// One locally-controlled participant
pub struct ParticipantSession {
    id: ClientId,
    role: Role,
    root: Pose,
    /// Local pose tree: the full skeleton for a pedestrian, the sub-part
    /// set for a vehicle role
    local_parts: JointSet,
    spin_angle: f32,

    /// Owned replica of the remote pedestrian skeleton
    remote_joints: JointSet,
    /// Last applied remote root poses
    remote_cyclist: Option<Pose>,
    remote_driver: Option<Pose>,

    ehmi: EhmiController,
}

impl ParticipantSession {
    pub fn new(id: ClientId, role: Role) -> Self {
        Self::with_pose(id, role, Pose::default())
    }

    pub fn with_pose(id: ClientId, role: Role, root: Pose) -> Self {
        ParticipantSession {
            id,
            role,
            root,
            local_parts: JointSet::sub_parts(role),
            spin_angle: 0.0,
            remote_joints: JointSet::skeleton(),
            remote_cyclist: None,
            remote_driver: None,
            ehmi: EhmiController::new(),
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn root(&self) -> Pose {
        self.root
    }

    pub fn ehmi(&self) -> &EhmiController {
        &self.ehmi
    }

    /// The local pose tree, for the host to write tracking data into
    pub fn local_parts_mut(&mut self) -> &mut JointSet {
        &mut self.local_parts
    }

    /// The owned replica of the remote pedestrian skeleton
    pub fn remote_joints(&self) -> &JointSet {
        &self.remote_joints
    }

    /// Last applied remote cyclist root, if any real update arrived
    pub fn remote_cyclist(&self) -> Option<Pose> {
        self.remote_cyclist
    }

    /// Last applied remote driver root, if any real update arrived
    pub fn remote_driver(&self) -> Option<Pose> {
        self.remote_driver
    }

    /// The registration message sent once after connecting
    pub fn hello(&self) -> Message {
        Message::Hello(HelloMessage {
            sender: self.id,
            role: self.role,
        })
    }

    /// One simulation tick: consume local input, integrate the root pose
    /// with an Euler step, sample the pose tree, and produce the tick's
    /// outgoing messages.
    pub fn tick(&mut self, dt: f32, input: &mut dyn InputSource) -> Vec<Message> {
        let (forward_axis, turn_axis) = input.read_axes();

        let yaw = turn_axis * self.role.turn_rate().to_radians() * dt;
        self.root.orientation = self.root.orientation.mul(&Quat::from_yaw(yaw));

        let step = self
            .root
            .orientation
            .forward()
            .scale(forward_axis * self.role.move_speed() * dt);
        let previous = self.root.position;
        self.root.position = self.root.position.add(&step);

        match self.role {
            Role::Pedestrian => self.sample_pedestrian(self.root.position.sub(&previous)),
            Role::Cyclist => self.sample_cyclist(dt),
            Role::Driver => self.sample_driver(dt, forward_axis),
        }
    }

    /// Carry the skeleton with the rig root and emit joint chunks
    fn sample_pedestrian(&mut self, root_delta: Vec3) -> Vec<Message> {
        for pose in self.local_parts.iter_mut() {
            pose.position = pose.position.add(&root_delta);
        }

        encode_chunks(&self.local_parts, self.id, DEFAULT_CHUNK_SIZE)
            .into_iter()
            .map(Message::PoseChunk)
            .collect()
    }

    fn sample_cyclist(&mut self, dt: f32) -> Vec<Message> {
        self.spin_angle += CYCLIST_SPIN_RATE.to_radians() * dt;
        let spin = Quat::from_pitch(self.spin_angle);
        for pose in self.local_parts.iter_mut() {
            *pose = Pose::new(self.root.position, self.root.orientation.mul(&spin));
        }

        vec![Message::CyclistData(RoleDataMessage {
            sender: self.id,
            root: self.root,
            sub_poses: self.local_parts.iter().copied().collect(),
        })]
    }

    fn sample_driver(&mut self, dt: f32, forward_axis: f32) -> Vec<Message> {
        self.spin_angle +=
            forward_axis * self.role.move_speed() * DRIVER_WHEEL_SPIN.to_radians() * dt;
        let spin = Quat::from_pitch(self.spin_angle);
        for pose in self.local_parts.iter_mut() {
            *pose = Pose::new(self.root.position, self.root.orientation.mul(&spin));
        }

        vec![Message::DriverData(RoleDataMessage {
            sender: self.id,
            root: self.root,
            sub_poses: self.local_parts.iter().copied().collect(),
        })]
    }

    /// Apply one received message. Self-origin messages are discarded for
    /// every message type; malformed or sentinel data is dropped without
    /// touching any state.
    pub fn handle_message(
        &mut self,
        msg: &Message,
        poses: &mut dyn PoseSink,
        display: &mut dyn DisplaySink,
    ) {
        if msg.sender() == Some(self.id) {
            return;
        }

        match msg {
            Message::PoseChunk(chunk) => {
                if chunk.poses.is_empty() {
                    warn!(sender = %chunk.sender, "empty pose chunk received, ignoring");
                    return;
                }
                apply_chunk(&mut self.remote_joints, chunk);
                for (i, pose) in chunk.poses.iter().enumerate() {
                    let index = chunk.start_index as usize + i;
                    if index < self.remote_joints.len() {
                        poses.apply_joint(chunk.sender, index, *pose);
                    }
                }
            }
            Message::CyclistData(data) => {
                if let Some(root) = Self::checked_root(data) {
                    self.remote_cyclist = Some(root);
                    Self::apply_role_data(data, SubPart::cyclist(), poses);
                }
            }
            Message::DriverData(data) => {
                if let Some(root) = Self::checked_root(data) {
                    self.remote_driver = Some(root);
                    Self::apply_role_data(data, SubPart::driver(), poses);
                }
            }
            Message::Condition(msg) => {
                self.ehmi.apply_condition(msg.condition_num, display);
            }
            Message::Speed(_) | Message::DrivingState(_) => {
                // AV state is consumed by the vehicle mirror, not by
                // participant sessions
                debug!(kind = ?msg.kind(), "AV broadcast ignored by participant session");
            }
            Message::Hello(_) => {
                debug!("hello received by participant session, ignoring");
            }
        }
    }

    fn checked_root(data: &RoleDataMessage) -> Option<Pose> {
        if data.root.is_sentinel() {
            warn!(sender = %data.sender, "empty role data received, skipping");
            return None;
        }
        Some(data.root)
    }

    fn apply_role_data(data: &RoleDataMessage, schema: &[SubPart], poses: &mut dyn PoseSink) {
        poses.apply_pose(data.sender, data.root);
        for (part, pose) in schema.iter().zip(data.sub_poses.iter()) {
            poses.apply_sub_pose(data.sender, *part, *pose);
        }
        if data.sub_poses.len() > schema.len() {
            debug!(
                sender = %data.sender,
                extra = data.sub_poses.len() - schema.len(),
                "role data carried more sub-poses than the schema, extras ignored"
            );
        }
    }
}
