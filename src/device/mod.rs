//! Wearable device session boundary
//!
//! The relay never talks to device hardware directly. Everything it needs
//! from a connected pair of glasses goes through the `DeviceSession` trait:
//! - request a photo from the camera
//! - speak text / play a remote audio file
//! - show a transient text notice on the display
//! - subscribe to hardware button events
//!
//! The hosting platform layer owns the actual transport and hands the relay
//! one `Arc<dyn DeviceSession>` per connected user.

mod session;
mod sim;

pub use session::{ButtonEvent, DeviceSession, PhotoData, PressType};
pub use sim::SimulatedSession;
