pub mod annotate;
pub mod capture;
pub mod config;
pub mod device;
pub mod http;
pub mod session;
pub mod store;

pub use annotate::{AnnotationPipeline, PipelineConfig};
pub use capture::{CaptureTrigger, TriggerConfig};
pub use config::Config;
pub use device::{ButtonEvent, DeviceSession, PhotoData, PressType, SimulatedSession};
pub use http::{create_router, AppState, USER_ID_HEADER};
pub use session::{SessionCoordinator, SessionRegistry};
pub use store::{CapturedPhoto, PhotoStore, StreamMode, StreamingStore};
