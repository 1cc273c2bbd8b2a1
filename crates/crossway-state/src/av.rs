//! Autonomous vehicle behavior
//!
//! Three pieces:
//! - `AvMachine`: the standalone drive/decelerate/stop lifecycle, with the
//!   one-shot eHMI activation and the distance-based deceleration policy
//! - `MirroredAv`: the networked variant that applies server-authoritative
//!   speed/driving state and only resolves trigger-volume events locally
//! - `ServerVehicle`: the server-side speed model whose output is broadcast
//!   to clients every tick

use tracing::{debug, info, warn};

use crossway_core::{smooth_damp, Condition, EhmiDisplay, Vec3, WhomIndicator};

/// AV yielding mode, pushed by the server in the networked variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvMode {
    /// Decelerate and show the eHMI at the trigger volume
    Yield,
    /// Keep driving, never show the eHMI
    NonYield,
    /// Show the eHMI without decelerating
    WhomOnly,
}

/// AV lifecycle phase. `Stopped` is terminal for a run; re-arming requires
/// an external reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvPhase {
    Idle,
    Driving,
    Decelerating,
    Stopped,
}

/// Tuning constants for the standalone AV
#[derive(Debug, Clone)]
pub struct AvConfig {
    /// Cruise speed in units per second
    pub max_speed: f32,
    /// Acceleration toward cruise speed, units per second squared
    pub acceleration: f32,
    /// Linear speed decay while decelerating, units per second squared
    pub deceleration_rate: f32,
    /// Distance at which the eHMI activates (one-shot)
    pub ehmi_distance: f32,
    /// Distance at which deceleration begins under yield conditions
    pub stop_distance: f32,
    /// Settle time for the smooth approach onto the stop point
    pub settle_time: f32,
    /// Distance at which the smooth approach is considered settled
    pub settle_tolerance: f32,
}

impl Default for AvConfig {
    fn default() -> Self {
        AvConfig {
            max_speed: 10.0,
            acceleration: 2.0,
            deceleration_rate: 1.0,
            ehmi_distance: 25.0,
            stop_distance: 10.0,
            settle_time: 0.5,
            settle_tolerance: 0.01,
        }
    }
}

/// Observable transitions emitted by `AvMachine::tick`. The host maps these
/// onto its display sink; the machine itself never touches presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum AvEvent {
    /// One-shot eHMI activation with the condition's display variant and
    /// whom-group indicators
    EhmiActivated {
        display: EhmiDisplay,
        indicators: &'static [WhomIndicator],
        distance: f32,
    },
    /// Deceleration toward the stop point began
    DecelerationStarted { distance: f32 },
    /// Speed reached zero; the smooth approach onto the stop point begins
    Stopped,
    /// Obstacle collision under a non-yield condition forced an immediate
    /// stop, no interpolation
    HardStopped,
}

/// Standalone AV behavior state machine
#[derive(Debug)]
pub struct AvMachine {
    config: AvConfig,
    condition: Option<Condition>,
    phase: AvPhase,
    speed: f32,
    position: Vec3,
    forward: Vec3,
    stop_point: Vec3,
    ehmi_active: bool,
    settling: bool,
    settle_velocity: Vec3,
}

impl AvMachine {
    pub fn new(config: AvConfig, position: Vec3, forward: Vec3, stop_point: Vec3) -> Self {
        AvMachine {
            config,
            condition: None,
            phase: AvPhase::Idle,
            speed: 0.0,
            position,
            forward,
            stop_point,
            ehmi_active: false,
            settling: false,
            settle_velocity: Vec3::zero(),
        }
    }

    pub fn phase(&self) -> AvPhase {
        self.phase
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn ehmi_active(&self) -> bool {
        self.ehmi_active
    }

    pub fn condition(&self) -> Option<Condition> {
        self.condition
    }

    /// Select the experiment condition for this run. Selection is allowed
    /// at any time; a change after deceleration has begun does not cancel
    /// the deceleration already in progress.
    pub fn select_condition(&mut self, condition: Condition) {
        info!(condition = condition.number(), "AV condition selected");
        self.condition = Some(condition);
    }

    /// Start driving. Rejected while no condition has been selected.
    pub fn start_driving(&mut self) {
        if self.condition.is_none() {
            warn!("select a condition before starting the AV");
            return;
        }
        if self.phase != AvPhase::Idle {
            debug!(phase = ?self.phase, "start ignored, AV already underway");
            return;
        }
        info!("AV driving started");
        self.phase = AvPhase::Driving;
    }

    /// Advance the machine by one tick
    pub fn tick(&mut self, dt: f32) -> Vec<AvEvent> {
        let mut events = Vec::new();

        match self.phase {
            AvPhase::Idle => {}
            AvPhase::Driving => {
                self.speed = move_towards(self.speed, self.config.max_speed, self.config.acceleration * dt);
                self.advance(dt);
                self.check_distance_triggers(&mut events);
            }
            AvPhase::Decelerating => {
                self.speed = move_towards(self.speed, 0.0, self.config.deceleration_rate * dt);
                self.advance(dt);
                self.check_distance_triggers(&mut events);
                if self.speed <= 0.0 {
                    self.phase = AvPhase::Stopped;
                    self.settling = true;
                    self.settle_velocity = Vec3::zero();
                    info!("AV stopped, settling onto stop point");
                    events.push(AvEvent::Stopped);
                }
            }
            AvPhase::Stopped => {
                if self.settling {
                    self.position = smooth_damp(
                        self.position,
                        self.stop_point,
                        &mut self.settle_velocity,
                        self.config.settle_time,
                        dt,
                    );
                    if self.position.distance(&self.stop_point) < self.config.settle_tolerance {
                        self.position = self.stop_point;
                        self.settling = false;
                    }
                }
            }
        }

        events
    }

    /// Obstacle trigger-volume collision. Under a non-yield condition this
    /// forces an immediate hard stop; otherwise the distance policy already
    /// brought the AV to a halt and the event is ignored.
    pub fn obstacle_trigger(&mut self) -> Vec<AvEvent> {
        let non_yield = self.condition.map(|c| c.is_non_yield()).unwrap_or(false);
        if non_yield && self.phase == AvPhase::Driving {
            self.speed = 0.0;
            self.phase = AvPhase::Stopped;
            self.settling = false;
            info!("AV hard stop at obstacle");
            return vec![AvEvent::HardStopped];
        }
        Vec::new()
    }

    fn advance(&mut self, dt: f32) {
        self.position = self.position.add(&self.forward.scale(self.speed * dt));
    }

    fn check_distance_triggers(&mut self, events: &mut Vec<AvEvent>) {
        let Some(condition) = self.condition else {
            return;
        };
        let distance = self.position.distance(&self.stop_point);

        // One-shot: never re-armed during a run
        if !self.ehmi_active && distance < self.config.ehmi_distance {
            self.ehmi_active = true;
            info!(distance, "eHMI activated");
            events.push(AvEvent::EhmiActivated {
                display: condition.display(),
                indicators: condition.whom_indicators(),
                distance,
            });
        }

        if self.phase == AvPhase::Driving
            && distance < self.config.stop_distance
            && !condition.is_non_yield()
        {
            self.phase = AvPhase::Decelerating;
            info!(distance, "deceleration triggered");
            events.push(AvEvent::DecelerationStarted { distance });
        }
    }
}

/// Networked AV mirror. Speed and driving state come from the server and
/// are applied verbatim; only the trigger-volume reaction is local.
#[derive(Debug)]
pub struct MirroredAv {
    mode: AvMode,
    speed: f32,
    driving: bool,
    decelerating: bool,
    ehmi_visible: bool,
    deceleration_rate: f32,
    position: Vec3,
    forward: Vec3,
}

impl MirroredAv {
    pub fn new(mode: AvMode, position: Vec3, forward: Vec3) -> Self {
        MirroredAv {
            mode,
            speed: 0.0,
            driving: false,
            decelerating: false,
            ehmi_visible: false,
            deceleration_rate: 2.0,
            position,
            forward,
        }
    }

    pub fn set_mode(&mut self, mode: AvMode) {
        self.mode = mode;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_driving(&self) -> bool {
        self.driving
    }

    pub fn ehmi_visible(&self) -> bool {
        self.ehmi_visible
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Apply a server speed broadcast, no local recomputation
    pub fn apply_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Apply a server driving-state broadcast
    pub fn apply_driving(&mut self, is_driving: bool) {
        self.driving = is_driving;
        if !is_driving {
            self.decelerating = false;
        }
    }

    /// Trigger-volume entry, resolved by mode
    pub fn trigger_enter(&mut self) {
        match self.mode {
            AvMode::Yield => {
                self.decelerating = true;
                self.ehmi_visible = true;
            }
            AvMode::NonYield => {
                self.driving = true;
                self.decelerating = false;
                self.ehmi_visible = false;
            }
            AvMode::WhomOnly => {
                self.ehmi_visible = true;
            }
        }
    }

    /// Trigger-volume exit reverses eHMI visibility for the modes that
    /// showed it
    pub fn trigger_exit(&mut self) {
        if matches!(self.mode, AvMode::Yield | AvMode::WhomOnly) {
            self.ehmi_visible = false;
        }
    }

    /// Advance by one tick using the last server-supplied speed
    pub fn tick(&mut self, dt: f32) {
        if !self.driving {
            return;
        }
        if self.decelerating {
            self.speed = move_towards(self.speed, 0.0, self.deceleration_rate * dt);
            if self.speed <= 0.0 {
                self.driving = false;
                self.decelerating = false;
            }
        }
        self.position = self.position.add(&self.forward.scale(self.speed * dt));
    }
}

/// Server-side AV speed model. The current speed is broadcast to every
/// client each tick; clients never recompute it.
#[derive(Debug)]
pub struct ServerVehicle {
    current_speed: f32,
    target_speed: f32,
    acceleration: f32,
    deceleration: f32,
    driving: bool,
}

/// Tuning constants for the server vehicle model
#[derive(Debug, Clone)]
pub struct ServerVehicleConfig {
    pub target_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
}

impl Default for ServerVehicleConfig {
    fn default() -> Self {
        ServerVehicleConfig {
            target_speed: 10.0,
            acceleration: 2.0,
            deceleration: 2.0,
        }
    }
}

impl ServerVehicle {
    pub fn new(config: ServerVehicleConfig) -> Self {
        ServerVehicle {
            current_speed: 0.0,
            target_speed: config.target_speed,
            acceleration: config.acceleration,
            deceleration: config.deceleration,
            driving: false,
        }
    }

    pub fn is_driving(&self) -> bool {
        self.driving
    }

    pub fn speed(&self) -> f32 {
        self.current_speed
    }

    pub fn start_driving(&mut self) {
        info!("vehicle started driving");
        self.driving = true;
    }

    pub fn stop_driving(&mut self) {
        info!("vehicle stopped driving");
        self.driving = false;
    }

    /// Advance the speed model by one tick and return the speed to
    /// broadcast
    pub fn tick(&mut self, dt: f32) -> f32 {
        if self.driving {
            self.current_speed =
                move_towards(self.current_speed, self.target_speed, self.acceleration * dt);
        } else {
            self.current_speed = move_towards(self.current_speed, 0.0, self.deceleration * dt);
        }
        self.current_speed
    }
}

impl Default for ServerVehicle {
    fn default() -> Self {
        ServerVehicle::new(ServerVehicleConfig::default())
    }
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}
