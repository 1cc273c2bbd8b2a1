//! Crossway Session - Per-participant tick loop and collaborator seams
//!
//! A session owns one locally-controlled participant: it integrates local
//! input into the root pose, samples the pose tree once per tick, and
//! emits wire messages. Received messages flow out through the PoseSink
//! and DisplaySink traits; rendering, input devices, and UI live on the
//! far side of those seams.

pub mod ehmi;
pub mod session;
pub mod traits;

pub use ehmi::*;
pub use session::*;
pub use traits::*;
