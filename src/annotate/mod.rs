//! External annotation boundary
//!
//! Captured photos are enriched out of band by an external process that
//! turns an image into a spoken description (image → text → speech). The
//! relay only knows the process contract: hand it an image path, expect an
//! MP3 artifact next to a predictable name, treat exit codes and stderr as
//! failure. Everything here is best-effort; a capture is complete before
//! annotation even starts.

mod pipeline;

pub use pipeline::{AnnotationPipeline, PipelineConfig};
