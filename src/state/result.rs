// Test outcome records as observed from the host framework

use serde::{Deserialize, Serialize};

/// Execution phase a record was captured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
}

/// Raw outcome reported by the host for one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

/// Marker attached to tests the author declared as expected to fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XfailMarker {
    /// Free-text reason, may be empty
    pub reason: String,
}

impl XfailMarker {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// One observation of a single test's result for one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub test_id: String,
    pub phase: Phase,
    pub outcome: Outcome,
    pub xfail: Option<XfailMarker>,
    /// Traceback text, already formatted by the host
    pub longrepr: Option<String>,
    /// Skip reason, already extracted from the host representation
    pub skip_reason: Option<String>,
}

impl OutcomeRecord {
    /// Create a call-phase record with no optional fields set
    pub fn call(test_id: impl Into<String>, outcome: Outcome) -> Self {
        Self::new(test_id, Phase::Call, outcome)
    }

    pub fn new(test_id: impl Into<String>, phase: Phase, outcome: Outcome) -> Self {
        Self {
            test_id: test_id.into(),
            phase,
            outcome,
            xfail: None,
            longrepr: None,
            skip_reason: None,
        }
    }

    pub fn passed(test_id: impl Into<String>) -> Self {
        Self::call(test_id, Outcome::Passed)
    }

    pub fn failed(test_id: impl Into<String>, longrepr: impl Into<String>) -> Self {
        Self::call(test_id, Outcome::Failed).with_longrepr(longrepr)
    }

    pub fn skipped(test_id: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            skip_reason: reason,
            ..Self::call(test_id, Outcome::Skipped)
        }
    }

    pub fn with_longrepr(mut self, longrepr: impl Into<String>) -> Self {
        self.longrepr = Some(longrepr.into());
        self
    }

    pub fn with_xfail(mut self, reason: impl Into<String>) -> Self {
        self.xfail = Some(XfailMarker::new(reason));
        self
    }
}

/// Raw collect-phase report from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectReport {
    pub node_id: Option<String>,
    pub fs_path: Option<String>,
    pub outcome: Outcome,
    pub longrepr: Option<String>,
}

/// Failure to construct a test before it could run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionErrorRecord {
    pub node_id: Option<String>,
    pub fs_path: Option<String>,
    pub longrepr: Option<String>,
}

impl CollectionErrorRecord {
    /// Heading label: node id, then file path, then a generic label
    pub fn label(&self) -> &str {
        self.node_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.fs_path.as_deref().filter(|p| !p.is_empty()))
            .unwrap_or("Collection Error")
    }
}

impl From<CollectReport> for CollectionErrorRecord {
    fn from(report: CollectReport) -> Self {
        Self {
            node_id: report.node_id,
            fs_path: report.fs_path,
            longrepr: report.longrepr,
        }
    }
}
