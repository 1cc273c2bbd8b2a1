//! Identity types for Crossway
//!
//! All identifiers are 64-bit for wire efficiency. A deployment has at most
//! a handful of participants, so collisions are not a practical concern.

use std::fmt;

/// Participant identity - assigned once per session, carried in every message
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClientId(pub u64);

impl ClientId {
    pub const ZERO: ClientId = ClientId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        ClientId(id)
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        ClientId(u64::from_le_bytes(bytes))
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Client({:016x})", self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Relay connection identity - unique per accepted connection, server-local
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConnId(pub u64);

impl ConnId {
    #[inline]
    pub fn new(id: u64) -> Self {
        ConnId(id)
    }
}

impl fmt::Debug for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conn({})", self.0)
    }
}

/// Participant role. These three roles form the relay quorum set; the AV is
/// driven by the server and does not count toward quorum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Role {
    Pedestrian = 0,
    Cyclist = 1,
    Driver = 2,
}

impl Role {
    /// All quorum roles in wire order
    pub fn all() -> &'static [Role] {
        &[Role::Pedestrian, Role::Cyclist, Role::Driver]
    }

    /// Number of roles required for relay quorum
    pub fn quorum() -> usize {
        3
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Role::Pedestrian),
            1 => Some(Role::Cyclist),
            2 => Some(Role::Driver),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Forward movement speed in units per second
    pub fn move_speed(self) -> f32 {
        match self {
            Role::Pedestrian => 1.5,
            Role::Cyclist => 5.0,
            Role::Driver => 8.0,
        }
    }

    /// Turn rate in degrees per second
    pub fn turn_rate(self) -> f32 {
        match self {
            Role::Pedestrian => 120.0,
            Role::Cyclist => 100.0,
            Role::Driver => 60.0,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Pedestrian => "pedestrian",
            Role::Cyclist => "cyclist",
            Role::Driver => "driver",
        };
        f.write_str(name)
    }
}
