//! Experiment server - operator command surface
//!
//! Owns the authoritative condition machine and the AV speed model, and
//! turns operator commands into broadcast messages. Commands are
//! fire-and-forget: invalid input is logged and ignored, the caller gets
//! no failure signal beyond the logs.

use tracing::info;

use crossway_core::Condition;
use crossway_state::{ConditionMachine, ServerVehicle, ServerVehicleConfig};
use crossway_wire::{ConditionMessage, DrivingStateMessage, Message, SpeedMessage};

use crate::OperationLog;

/// Server-side experiment state and the operator control surface
pub struct ExperimentServer {
    condition: ConditionMachine,
    vehicle: ServerVehicle,
    log: Option<OperationLog>,
}

impl ExperimentServer {
    pub fn new(log: Option<OperationLog>) -> Self {
        let mut server = ExperimentServer {
            condition: ConditionMachine::new(),
            vehicle: ServerVehicle::new(ServerVehicleConfig::default()),
            log,
        };
        server.log_line("Server started.");
        server
    }

    pub fn condition(&self) -> Option<Condition> {
        self.condition.current()
    }

    pub fn is_driving(&self) -> bool {
        self.vehicle.is_driving()
    }

    /// Operator command: select the experiment condition. Returns the
    /// broadcast to send to every client, or `None` if the input was
    /// rejected (state unchanged, nothing broadcast).
    pub fn set_condition(&mut self, n: i32) -> Option<Message> {
        match self.condition.set_condition(n) {
            Some(condition) => {
                self.log_line(&format!("Broadcasted condition: {}", condition));
                Some(Message::Condition(ConditionMessage {
                    condition_num: condition.number(),
                }))
            }
            None => {
                self.log_line(&format!("Invalid condition number: {}", n));
                None
            }
        }
    }

    /// Operator command: start the AV. Returns the driving-state broadcast.
    pub fn start_driving(&mut self) -> Message {
        self.vehicle.start_driving();
        self.log_line("Vehicle started driving.");
        Message::DrivingState(DrivingStateMessage { is_driving: true })
    }

    /// Operator command: stop the AV. Returns the driving-state broadcast.
    pub fn stop_driving(&mut self) -> Message {
        self.vehicle.stop_driving();
        self.log_line("Vehicle stopped driving.");
        Message::DrivingState(DrivingStateMessage { is_driving: false })
    }

    /// Advance the speed model by one tick. The returned speed broadcast
    /// goes to every client, every tick.
    pub fn tick(&mut self, dt: f32) -> Message {
        let speed = self.vehicle.tick(dt);
        Message::Speed(SpeedMessage { speed })
    }

    fn log_line(&mut self, line: &str) {
        info!("{}", line);
        if let Some(log) = &mut self.log {
            log.append(line);
        }
    }
}
