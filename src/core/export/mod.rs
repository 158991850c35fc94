//! Export orchestration
//!
//! This module provides the export lifecycle for one library section:
//! - Destination and run-log path resolution
//! - Selection of the job created by a submission
//! - The workflow orchestrator and its lifecycle stages
//! - Summary reporting

pub mod destination;
pub mod locator;
pub mod stage;
pub mod summary;
pub mod workflow;

pub use destination::{resolve_destination, run_log_path};
pub use locator::{find_job, select_latest_pending};
pub use stage::WorkflowStage;
pub use summary::ExportSummary;
pub use workflow::{ExportWorkflow, WorkflowOptions};
