//! Capture trigger
//!
//! Turns user input into photo requests. Two paths converge on the same
//! capture routine: a short button press fires one manual capture, and a
//! per-user ticker fires automatic captures while streaming mode is on,
//! gated by the cooldown in `StreamingStore`.

mod trigger;

pub use trigger::{CaptureTrigger, TriggerConfig};
