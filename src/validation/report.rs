use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the simulation
    Error,
    /// Suspicious but runnable
    Warning,
    Info,
}

/// What a validation issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    TooManyProducts,
    TooManyOperations,
    HorizonOutOfRange,
    TooManyBundles,
    InvalidOperation,
    InvalidDemand,
    DuplicateStep,
    StepGap,
    DemandWithoutOperations,
    OperationsWithoutDemand,
    SimilarMachineNames,
    MixShareSum,
    DemandModeMismatch,
    InvalidBreakdown,
    UnusedBreakdown,
    DuplicateBreakdown,
    InvalidSchedule,
    EmptyShift,
    CapacityShortfall,
    SharedResource,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_tool: Option<String>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            product: None,
            machine_tool: None,
        }
    }

    pub fn error(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, message)
    }

    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, message)
    }

    pub fn info(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, kind, message)
    }

    pub fn for_product(mut self, product: &str) -> Self {
        self.product = Some(product.to_string());
        self
    }

    pub fn for_machine(mut self, machine_tool: &str) -> Self {
        self.machine_tool = Some(machine_tool.to_string());
        self
    }
}

/// Outcome of validating a config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub info: Vec<ValidationIssue>,
    pub product_count: usize,
    pub operation_count: usize,
    pub machine_count: usize,
    /// No errors and no warnings
    pub is_valid: bool,
    /// No errors; the simulator may run
    pub can_proceed: bool,
}

impl ValidationReport {
    /// Create an empty, passing report
    pub fn new(product_count: usize, operation_count: usize, machine_count: usize) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            product_count,
            operation_count,
            machine_count,
            is_valid: true,
            can_proceed: true,
        }
    }

    /// File an issue under its severity and refresh the verdict
    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
            Severity::Info => self.info.push(issue),
        }
        self.can_proceed = self.errors.is_empty();
        self.is_valid = self.can_proceed && self.warnings.is_empty();
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        for issue in issues {
            self.push(issue);
        }
    }

    /// Whether any issue of `kind` was reported
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues().any(|issue| issue.kind == kind)
    }

    /// All issues, errors first
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.info.iter())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_tracks_severity() {
        let mut report = ValidationReport::default();
        assert!(report.is_valid && report.can_proceed);

        report.push(ValidationIssue::info(IssueKind::Summary, "ok"));
        assert!(report.is_valid);

        report.push(ValidationIssue::warning(IssueKind::EmptyShift, "shift 2"));
        assert!(!report.is_valid);
        assert!(report.can_proceed);

        report.push(ValidationIssue::error(IssueKind::StepGap, "gap"));
        assert!(!report.can_proceed);
        assert_eq!(report.issues().count(), 3);
        assert!(report.has_issue(IssueKind::StepGap));
    }
}
