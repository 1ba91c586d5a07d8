//! In-memory per-user state
//!
//! Two keyed stores, both latest-wins and both safe for concurrent use:
//! - `PhotoStore`: the single most recent captured photo (plus derived
//!   audio) per user
//! - `StreamingStore`: per-user auto-capture mode and capture cooldown
//!
//! Both follow the same shape: an outer map guarded only long enough to
//! fetch a per-user slot, then the slot's own lock for the actual
//! read-modify-write. Operations on different users never contend.

mod photos;
mod streaming;

pub use photos::{CapturedPhoto, PhotoStore};
pub use streaming::{StreamMode, StreamingStore};
