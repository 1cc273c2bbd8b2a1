//! Math primitives - 3D position and rotation
//!
//! Just enough vector math for pose synchronization and the AV movement
//! model. Rotations are unit quaternions; constructors normalize.

/// 3D position in scene units (meters)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn add(&self, other: &Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    pub fn scale(&self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Linear interpolation
    pub fn lerp(&self, other: &Vec3, t: f32) -> Vec3 {
        Vec3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Distance to another position
    pub fn distance(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Unit quaternion rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Quat { w, x, y, z }.normalize()
    }

    /// Rotation about the vertical (Y) axis, angle in radians
    pub fn from_yaw(angle: f32) -> Self {
        let half = angle * 0.5;
        Quat {
            w: half.cos(),
            x: 0.0,
            y: half.sin(),
            z: 0.0,
        }
    }

    /// Rotation about the lateral (X) axis, angle in radians. Used for
    /// wheel and pedal spin.
    pub fn from_pitch(angle: f32) -> Self {
        let half = angle * 0.5;
        Quat {
            w: half.cos(),
            x: half.sin(),
            y: 0.0,
            z: 0.0,
        }
    }

    /// Hamilton product: the rotation `other` followed by `self`
    pub fn mul(&self, other: &Quat) -> Quat {
        Quat {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
        .normalize()
    }

    /// Rotate a vector by this quaternion
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        // q * v * q^-1 expanded for unit quaternions
        let (qw, qx, qy, qz) = (self.w, self.x, self.y, self.z);
        let (vx, vy, vz) = (v.x, v.y, v.z);

        let tx = 2.0 * (qy * vz - qz * vy);
        let ty = 2.0 * (qz * vx - qx * vz);
        let tz = 2.0 * (qx * vy - qy * vx);

        Vec3 {
            x: vx + qw * tx + qy * tz - qz * ty,
            y: vy + qw * ty + qz * tx - qx * tz,
            z: vz + qw * tz + qx * ty - qy * tx,
        }
    }

    /// The local forward axis (+Z) under this rotation
    pub fn forward(&self) -> Vec3 {
        self.rotate(&Vec3::new(0.0, 0.0, 1.0))
    }

    pub fn dot(&self, other: &Quat) -> f32 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn normalize(&self) -> Quat {
        let len = (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if len < 0.0001 {
            return Quat::identity();
        }
        Quat {
            w: self.w / len,
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
        }
    }
}

/// Critically-damped approach toward a target, game-engine SmoothDamp style.
/// Returns the new position; `velocity` is carried between calls.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current.sub(&target);
    let temp = velocity.add(&change.scale(omega)).scale(dt);
    *velocity = velocity.sub(&temp.scale(omega)).scale(exp);

    let mut out = target.add(&change.add(&temp).scale(exp));

    // Do not overshoot the target
    let orig_to_target = target.sub(&current);
    let out_to_target = out.sub(&current);
    if orig_to_target.x * out_to_target.x
        + orig_to_target.y * out_to_target.y
        + orig_to_target.z * out_to_target.z
        > orig_to_target.length() * orig_to_target.length()
    {
        out = target;
        *velocity = Vec3::zero();
    }

    out
}
