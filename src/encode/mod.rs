//! Background image writing.
//!
//! Rendered frames are handed to [`writer::ImageWritePipeline`], which flips (and optionally
//! un-premultiplies) them on a worker thread and persists them through an [`sink::ImageSink`].

/// Image sinks (file and in-memory).
pub mod sink;
/// Bounded queue + worker thread.
pub mod writer;
