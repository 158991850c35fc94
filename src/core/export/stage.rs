//! Workflow lifecycle stages

use std::fmt;

/// Where a run is in the export lifecycle
///
/// `Idle → Submitted → Located → Polling → Downloaded → Deleted → Done`.
/// Any step can move the run to `Failed`. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Idle,
    Submitted,
    Located,
    Polling,
    Downloaded,
    Deleted,
    Done,
    Failed,
}

impl WorkflowStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStage::Done | WorkflowStage::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Idle => "idle",
            WorkflowStage::Submitted => "submitted",
            WorkflowStage::Located => "located",
            WorkflowStage::Polling => "polling",
            WorkflowStage::Downloaded => "downloaded",
            WorkflowStage::Deleted => "deleted",
            WorkflowStage::Done => "done",
            WorkflowStage::Failed => "failed",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_stages() {
        assert!(WorkflowStage::Done.is_terminal());
        assert!(WorkflowStage::Failed.is_terminal());
        assert!(!WorkflowStage::Polling.is_terminal());
        assert!(!WorkflowStage::Idle.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkflowStage::Downloaded.to_string(), "downloaded");
    }
}
