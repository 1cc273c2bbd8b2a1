//! Binary encode/decode for Crossway messages
//!
//! Layout per message (all integers and floats little-endian):
//! - Hello:        [kind:1][sender:8][role:1]
//! - PoseChunk:    [kind:1][sender:8][start_index:4][count:2][pose:28]*count
//! - Cyclist/Driver data:
//!                 [kind:1][sender:8][root_pose:28][count:1][pose:28]*count
//! - Condition:    [kind:1][condition_num:4 signed]
//! - Speed:        [kind:1][speed:4]
//! - DrivingState: [kind:1][is_driving:1]
//!
//! A pose is [position:12][orientation:16] (x,y,z then w,x,y,z).

use bytes::{Buf, BufMut, BytesMut};

use crossway_core::{ClientId, CrosswayError, CrosswayResult, Pose, Quat, Role, Vec3};

use crate::{
    ConditionMessage, DrivingStateMessage, HelloMessage, Message, MessageKind, PoseChunkMessage,
    RoleDataMessage, SpeedMessage,
};

/// Serialized pose size: 3 position floats + 4 orientation floats
pub const POSE_SIZE: usize = 28;

/// Largest datagram the codec will produce or accept. A full 21-joint
/// chunk set stays far below this; the bound is MTU-friendly.
pub const MAX_MESSAGE_SIZE: usize = 1400;

fn put_pose(buf: &mut BytesMut, pose: &Pose) {
    buf.put_f32_le(pose.position.x);
    buf.put_f32_le(pose.position.y);
    buf.put_f32_le(pose.position.z);
    buf.put_f32_le(pose.orientation.w);
    buf.put_f32_le(pose.orientation.x);
    buf.put_f32_le(pose.orientation.y);
    buf.put_f32_le(pose.orientation.z);
}

fn get_pose(buf: &mut &[u8]) -> CrosswayResult<Pose> {
    if buf.remaining() < POSE_SIZE {
        return Err(CrosswayError::BufferTooShort {
            expected: POSE_SIZE,
            actual: buf.remaining(),
        });
    }
    let position = Vec3::new(buf.get_f32_le(), buf.get_f32_le(), buf.get_f32_le());
    let orientation = Quat {
        w: buf.get_f32_le(),
        x: buf.get_f32_le(),
        y: buf.get_f32_le(),
        z: buf.get_f32_le(),
    };
    Ok(Pose {
        position,
        orientation,
    })
}

fn get_client_id(buf: &mut &[u8]) -> CrosswayResult<ClientId> {
    if buf.remaining() < 8 {
        return Err(CrosswayError::BufferTooShort {
            expected: 8,
            actual: buf.remaining(),
        });
    }
    Ok(ClientId::new(buf.get_u64_le()))
}

fn need(buf: &&[u8], n: usize) -> CrosswayResult<()> {
    if buf.remaining() < n {
        return Err(CrosswayError::BufferTooShort {
            expected: n,
            actual: buf.remaining(),
        });
    }
    Ok(())
}

/// Serialize a message to bytes
pub fn encode(msg: &Message) -> CrosswayResult<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(64);
    buf.put_u8(msg.kind().to_byte());

    match msg {
        Message::Hello(m) => {
            buf.put_u64_le(m.sender.0);
            buf.put_u8(m.role.to_byte());
        }
        Message::PoseChunk(m) => {
            buf.put_u64_le(m.sender.0);
            buf.put_u32_le(m.start_index);
            buf.put_u16_le(m.poses.len() as u16);
            for pose in &m.poses {
                put_pose(&mut buf, pose);
            }
        }
        Message::CyclistData(m) | Message::DriverData(m) => {
            buf.put_u64_le(m.sender.0);
            put_pose(&mut buf, &m.root);
            buf.put_u8(m.sub_poses.len() as u8);
            for pose in &m.sub_poses {
                put_pose(&mut buf, pose);
            }
        }
        Message::Condition(m) => {
            buf.put_i32_le(m.condition_num);
        }
        Message::Speed(m) => {
            buf.put_f32_le(m.speed);
        }
        Message::DrivingState(m) => {
            buf.put_u8(m.is_driving as u8);
        }
    }

    if buf.len() > MAX_MESSAGE_SIZE {
        return Err(CrosswayError::InvalidWireFormat(format!(
            "Message too large: {} > {}",
            buf.len(),
            MAX_MESSAGE_SIZE
        )));
    }

    Ok(buf.to_vec())
}

/// Parse a message from bytes
pub fn decode(bytes: &[u8]) -> CrosswayResult<Message> {
    let mut buf = bytes;

    need(&buf, 1)?;
    let kind_byte = buf.get_u8();
    let kind =
        MessageKind::from_byte(kind_byte).ok_or(CrosswayError::UnknownMessageKind(kind_byte))?;

    match kind {
        MessageKind::Hello => {
            let sender = get_client_id(&mut buf)?;
            need(&buf, 1)?;
            let role_byte = buf.get_u8();
            let role = Role::from_byte(role_byte).ok_or(CrosswayError::UnknownRole(role_byte))?;
            Ok(Message::Hello(HelloMessage { sender, role }))
        }
        MessageKind::PoseChunk => {
            let sender = get_client_id(&mut buf)?;
            need(&buf, 6)?;
            let start_index = buf.get_u32_le();
            let count = buf.get_u16_le() as usize;
            let mut poses = Vec::with_capacity(count);
            for _ in 0..count {
                poses.push(get_pose(&mut buf)?);
            }
            Ok(Message::PoseChunk(PoseChunkMessage {
                sender,
                start_index,
                poses,
            }))
        }
        MessageKind::CyclistData | MessageKind::DriverData => {
            let sender = get_client_id(&mut buf)?;
            let root = get_pose(&mut buf)?;
            need(&buf, 1)?;
            let count = buf.get_u8() as usize;
            let mut sub_poses = Vec::with_capacity(count);
            for _ in 0..count {
                sub_poses.push(get_pose(&mut buf)?);
            }
            let data = RoleDataMessage {
                sender,
                root,
                sub_poses,
            };
            if kind == MessageKind::CyclistData {
                Ok(Message::CyclistData(data))
            } else {
                Ok(Message::DriverData(data))
            }
        }
        MessageKind::Condition => {
            need(&buf, 4)?;
            Ok(Message::Condition(ConditionMessage {
                condition_num: buf.get_i32_le(),
            }))
        }
        MessageKind::Speed => {
            need(&buf, 4)?;
            Ok(Message::Speed(SpeedMessage {
                speed: buf.get_f32_le(),
            }))
        }
        MessageKind::DrivingState => {
            need(&buf, 1)?;
            Ok(Message::DrivingState(DrivingStateMessage {
                is_driving: buf.get_u8() != 0,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_pose(seed: f32) -> Pose {
        Pose::new(
            Vec3::new(seed, seed + 1.0, seed + 2.0),
            Quat::from_yaw(seed * 0.1),
        )
    }

    #[test]
    fn test_hello_roundtrip() {
        let msg = Message::Hello(HelloMessage {
            sender: ClientId::new(42),
            role: Role::Cyclist,
        });
        let bytes = encode(&msg).unwrap();
        assert_eq!(decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_pose_chunk_roundtrip() {
        let msg = Message::PoseChunk(PoseChunkMessage {
            sender: ClientId::new(7),
            start_index: 9,
            poses: vec![sample_pose(1.0), sample_pose(2.0), sample_pose(3.0)],
        });
        let bytes = encode(&msg).unwrap();
        assert_eq!(decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_role_data_roundtrip() {
        let cyclist = Message::CyclistData(RoleDataMessage {
            sender: ClientId::new(11),
            root: sample_pose(4.0),
            sub_poses: vec![sample_pose(5.0); 5],
        });
        let bytes = encode(&cyclist).unwrap();
        assert_eq!(decode(&bytes).unwrap(), cyclist);

        let driver = Message::DriverData(RoleDataMessage {
            sender: ClientId::new(12),
            root: sample_pose(6.0),
            sub_poses: vec![sample_pose(7.0); 4],
        });
        let bytes = encode(&driver).unwrap();
        assert_eq!(decode(&bytes).unwrap(), driver);
    }

    #[test]
    fn test_broadcast_roundtrips() {
        for msg in [
            Message::Condition(ConditionMessage { condition_num: 7 }),
            Message::Speed(SpeedMessage { speed: 8.25 }),
            Message::DrivingState(DrivingStateMessage { is_driving: true }),
        ] {
            let bytes = encode(&msg).unwrap();
            assert_eq!(decode(&bytes).unwrap(), msg);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = decode(&[0x7F, 0, 0, 0]);
        assert!(matches!(result, Err(CrosswayError::UnknownMessageKind(0x7F))));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let mut bytes = encode(&Message::Hello(HelloMessage {
            sender: ClientId::new(1),
            role: Role::Driver,
        }))
        .unwrap();
        *bytes.last_mut().unwrap() = 9;
        assert!(matches!(decode(&bytes), Err(CrosswayError::UnknownRole(9))));
    }

    #[test]
    fn test_truncated_rejected() {
        let msg = Message::PoseChunk(PoseChunkMessage {
            sender: ClientId::new(3),
            start_index: 0,
            poses: vec![sample_pose(0.0); 3],
        });
        let bytes = encode(&msg).unwrap();
        for cut in [0, 1, 8, 14, bytes.len() - 1] {
            assert!(
                matches!(decode(&bytes[..cut]), Err(CrosswayError::BufferTooShort { .. })),
                "cut at {}",
                cut
            );
        }
    }

    proptest! {
        #[test]
        fn prop_pose_chunk_roundtrip(
            sender in any::<u64>(),
            start in 0u32..64,
            count in 0usize..21,
            seed in -100.0f32..100.0,
        ) {
            let msg = Message::PoseChunk(PoseChunkMessage {
                sender: ClientId::new(sender),
                start_index: start,
                poses: (0..count).map(|i| sample_pose(seed + i as f32)).collect(),
            });
            let bytes = encode(&msg).unwrap();
            prop_assert_eq!(decode(&bytes).unwrap(), msg);
        }
    }
}
