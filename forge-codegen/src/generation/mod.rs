//! Code generation outputs and file management.
//!
//! - [`FileRegistry`] - Declarative file registration, preview and writing

mod registry;

pub use registry::{FileCategory, FileEntry, FileRegistry, PreviewEntry, WriteStats};
