//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod check;
mod edit;
mod generate;
mod info;
mod output;
mod permissions;
mod status;

pub use check::{CheckReport, PipelineOverview};
pub use edit::EditReport;
pub use generate::{GenerateReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};
pub use info::{HostInfo, InfoReport, Stats};
pub use output::{Report, TerminalOutput};
pub use permissions::{PermissionsReport, ResourcePermissions};
pub use status::StatusReport;
