//! Session lifecycle and registry
//!
//! This module tracks which users currently have a live device session and
//! wires each one into the capture machinery:
//! - `SessionRegistry` maps user → live `DeviceSession` handle
//! - `SessionCoordinator` is the start/stop lifecycle called by the
//!   hosting platform layer

mod coordinator;
mod registry;

pub use coordinator::SessionCoordinator;
pub use registry::SessionRegistry;
