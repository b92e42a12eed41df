//! Structural and business-rule checks run before a simulation.
//!
//! Every check appends issues to one report; nothing short-circuits, so the
//! caller sees all problems at once.

pub mod report;
pub mod similarity;

pub use report::{IssueKind, Severity, ValidationIssue, ValidationReport};
pub use similarity::similarity_ratio;

use crate::config::{DemandMode, DemandQuantity, SimulationConfig};
use crate::core::simulation_engine::bundle_count;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Ceilings and tolerances applied by the validator
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationLimits {
    pub max_products: usize,
    pub max_operations_per_product: usize,
    pub max_horizon_days: u32,
    /// Ceiling on bundles generated over the whole horizon
    pub max_bundles: u64,
    /// Machine names more similar than this (and not equal) are flagged
    pub similarity_threshold: f64,
    /// Allowed distance of the mix-share sum from 100
    pub mix_tolerance_pct: f64,
}

impl ValidationLimits {
    pub fn new() -> Self {
        Self {
            max_products: 50,
            max_operations_per_product: 100,
            max_horizon_days: 31,
            max_bundles: 100_000,
            similarity_threshold: 0.85,
            mix_tolerance_pct: 0.5,
        }
    }

    pub fn with_max_products(mut self, max_products: usize) -> Self {
        self.max_products = max_products;
        self
    }

    pub fn with_max_operations_per_product(mut self, max_operations: usize) -> Self {
        self.max_operations_per_product = max_operations;
        self
    }

    pub fn with_max_horizon_days(mut self, max_horizon_days: u32) -> Self {
        self.max_horizon_days = max_horizon_days;
        self
    }

    pub fn with_max_bundles(mut self, max_bundles: u64) -> Self {
        self.max_bundles = max_bundles;
        self
    }
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self::new()
    }
}

/// Config validation entry points
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate with default limits
    pub fn validate(config: &SimulationConfig) -> ValidationReport {
        Self::validate_with(config, &ValidationLimits::default())
    }

    /// Validate against explicit limits
    pub fn validate_with(config: &SimulationConfig, limits: &ValidationLimits) -> ValidationReport {
        let products = config.products_with_operations();
        let machines: BTreeSet<&str> = config
            .operations
            .iter()
            .map(|op| op.machine_tool.as_str())
            .collect();
        let mut report =
            ValidationReport::new(products.len(), config.operations.len(), machines.len());

        report.extend(Self::check_limits(config, limits));
        report.extend(Self::check_operation_fields(config));
        report.extend(Self::check_step_sequences(config));
        report.extend(Self::check_demand_fields(config));
        report.extend(Self::check_product_symmetry(config));
        report.extend(Self::check_machine_names(config, limits));
        report.extend(Self::check_demand_mode(config, limits));
        report.extend(Self::check_breakdowns(config));
        report.extend(Self::check_schedule(config));
        report.extend(Self::check_capacity(config));
        report.extend(Self::describe(config, &report));

        debug!(
            "Validated config: {} error(s), {} warning(s), {} info",
            report.errors.len(),
            report.warnings.len(),
            report.info.len()
        );
        report
    }

    /// Product count, operations per product and horizon ceilings
    pub fn check_limits(
        config: &SimulationConfig,
        limits: &ValidationLimits,
    ) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let products = config.products_with_operations();
        if products.len() > limits.max_products {
            issues.push(ValidationIssue::error(
                IssueKind::TooManyProducts,
                format!(
                    "{} products configured, maximum is {}",
                    products.len(),
                    limits.max_products
                ),
            ));
        }
        for product in products {
            let count = config.operations.iter().filter(|op| op.product == product).count();
            if count > limits.max_operations_per_product {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::TooManyOperations,
                        format!(
                            "Product '{}' has {} operations, maximum is {}",
                            product, count, limits.max_operations_per_product
                        ),
                    )
                    .for_product(product),
                );
            }
        }
        if config.horizon_days == 0 || config.horizon_days > limits.max_horizon_days {
            issues.push(ValidationIssue::error(
                IssueKind::HorizonOutOfRange,
                format!(
                    "Horizon of {} day(s) is outside 1..={}",
                    config.horizon_days, limits.max_horizon_days
                ),
            ));
        }

        let mut seen = BTreeSet::new();
        let bundles: u64 = config
            .demands
            .iter()
            .filter(|d| seen.insert(d.product.as_str()))
            .map(|d| bundle_count(config.horizon_pieces_for(&d.product), d.bundle_size))
            .fold(0u64, u64::saturating_add);
        if bundles > limits.max_bundles {
            issues.push(ValidationIssue::error(
                IssueKind::TooManyBundles,
                format!(
                    "Demand needs {} bundles over the horizon, maximum is {}",
                    bundles, limits.max_bundles
                ),
            ));
        }
        issues
    }

    /// Per-operation numeric ranges
    pub fn check_operation_fields(config: &SimulationConfig) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for op in &config.operations {
            let label = format!("'{}' step {} ({})", op.product, op.step, op.name);
            let mut problems = Vec::new();
            if op.step == 0 {
                problems.push("step must be at least 1".to_string());
            }
            if !(op.sam > 0.0) {
                problems.push(format!("sam must be positive, got {}", op.sam));
            }
            if op.operators == 0 {
                problems.push("operators must be at least 1".to_string());
            }
            if op.machine_tool.trim().is_empty() {
                problems.push("machine_tool cannot be empty".to_string());
            }
            for (field, value) in [
                ("rework_pct", op.rework_pct),
                ("grade_pct", op.grade_pct),
                ("fpd_pct", op.fpd_pct),
            ] {
                if !is_percentage(value) {
                    problems.push(format!("{} must be within 0..=100, got {}", field, value));
                }
            }
            for problem in problems {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::InvalidOperation,
                        format!("Operation {}: {}", label, problem),
                    )
                    .for_product(&op.product),
                );
            }
        }
        issues
    }

    /// Steps within a product must be unique and contiguous
    pub fn check_step_sequences(config: &SimulationConfig) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut steps_by_product: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
        for op in &config.operations {
            steps_by_product.entry(op.product.as_str()).or_default().push(op.step);
        }

        for (product, mut steps) in steps_by_product {
            steps.sort_unstable();
            let mut duplicates = BTreeSet::new();
            for pair in steps.windows(2) {
                if pair[0] == pair[1] {
                    duplicates.insert(pair[0]);
                }
            }
            for step in &duplicates {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::DuplicateStep,
                        format!("Product '{}' defines step {} more than once", product, step),
                    )
                    .for_product(product),
                );
            }

            steps.dedup();
            let missing: Vec<String> = steps
                .windows(2)
                .flat_map(|pair| (pair[0] + 1)..pair[1])
                .map(|step| step.to_string())
                .collect();
            if !missing.is_empty() {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::StepGap,
                        format!("Product '{}' is missing step(s) {}", product, missing.join(", ")),
                    )
                    .for_product(product),
                );
            }
        }
        issues
    }

    /// Bundle sizes and demand magnitudes
    pub fn check_demand_fields(config: &SimulationConfig) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut seen = BTreeSet::new();
        for demand in &config.demands {
            if !seen.insert(demand.product.as_str()) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::InvalidDemand,
                        format!("Product '{}' has more than one demand entry", demand.product),
                    )
                    .for_product(&demand.product),
                );
            }
            if demand.bundle_size == 0 {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::InvalidDemand,
                        format!("Product '{}': bundle_size must be at least 1", demand.product),
                    )
                    .for_product(&demand.product),
                );
            }
            let value = match demand.quantity {
                DemandQuantity::Daily(v)
                | DemandQuantity::Weekly(v)
                | DemandQuantity::MixShare(v) => v,
            };
            if !(value >= 0.0) || !value.is_finite() {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::InvalidDemand,
                        format!(
                            "Product '{}': demand must be non-negative, got {}",
                            demand.product, value
                        ),
                    )
                    .for_product(&demand.product),
                );
            }
        }
        issues
    }

    /// Demand products need operations; operated products should have demand
    pub fn check_product_symmetry(config: &SimulationConfig) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let with_ops = config.products_with_operations();
        let with_demand = config.products_with_demand();

        for product in with_demand.difference(&with_ops) {
            issues.push(
                ValidationIssue::error(
                    IssueKind::DemandWithoutOperations,
                    format!("Product '{}' has demand but no operations", product),
                )
                .for_product(product),
            );
        }
        for product in with_ops.difference(&with_demand) {
            issues.push(
                ValidationIssue::warning(
                    IssueKind::OperationsWithoutDemand,
                    format!(
                        "Product '{}' has operations but no demand and will not be simulated",
                        product
                    ),
                )
                .for_product(product),
            );
        }
        issues
    }

    /// Flag machine/tool names that look like typos of each other
    pub fn check_machine_names(
        config: &SimulationConfig,
        limits: &ValidationLimits,
    ) -> Vec<ValidationIssue> {
        let names: Vec<&str> = config
            .operations
            .iter()
            .map(|op| op.machine_tool.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut issues = Vec::new();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                let ratio = similarity_ratio(&normalize(a), &normalize(b));
                if ratio > limits.similarity_threshold {
                    issues.push(
                        ValidationIssue::warning(
                            IssueKind::SimilarMachineNames,
                            format!(
                                "Machine names '{}' and '{}' are {:.0}% similar; they will be separate resources",
                                a,
                                b,
                                ratio * 100.0
                            ),
                        )
                        .for_machine(a),
                    );
                }
            }
        }
        issues
    }

    /// Demand quantities must match the mode; mix shares must total 100
    pub fn check_demand_mode(
        config: &SimulationConfig,
        limits: &ValidationLimits,
    ) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        match &config.mode {
            DemandMode::DemandDriven => {
                for demand in &config.demands {
                    if let DemandQuantity::MixShare(_) = demand.quantity {
                        issues.push(
                            ValidationIssue::error(
                                IssueKind::DemandModeMismatch,
                                format!(
                                    "Product '{}' uses a mix share but the config is demand-driven",
                                    demand.product
                                ),
                            )
                            .for_product(&demand.product),
                        );
                    }
                }
            }
            DemandMode::MixDriven { total_demand } => {
                if !(*total_demand > 0.0) {
                    issues.push(ValidationIssue::error(
                        IssueKind::InvalidDemand,
                        format!("Mix-driven total_demand must be positive, got {}", total_demand),
                    ));
                }
                let mut total_share = 0.0;
                for demand in &config.demands {
                    match demand.quantity {
                        DemandQuantity::MixShare(pct) => {
                            total_share += pct;
                            if !is_percentage(pct) {
                                issues.push(
                                    ValidationIssue::error(
                                        IssueKind::InvalidDemand,
                                        format!(
                                            "Product '{}': mix share {} is outside 0..=100",
                                            demand.product, pct
                                        ),
                                    )
                                    .for_product(&demand.product),
                                );
                            }
                        }
                        _ => issues.push(
                            ValidationIssue::error(
                                IssueKind::DemandModeMismatch,
                                format!(
                                    "Product '{}' uses an absolute quantity but the config is mix-driven",
                                    demand.product
                                ),
                            )
                            .for_product(&demand.product),
                        ),
                    }
                }
                if (total_share - 100.0).abs() > limits.mix_tolerance_pct {
                    issues.push(ValidationIssue::error(
                        IssueKind::MixShareSum,
                        format!("Mix shares sum to {:.2}%, expected 100%", total_share),
                    ));
                }
            }
        }
        issues
    }

    /// Breakdown ranges and references
    pub fn check_breakdowns(config: &SimulationConfig) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let pools = config.pooled_operators();
        let mut seen = BTreeSet::new();
        for rule in &config.breakdowns {
            let machine = rule.machine_tool.as_str();
            if !is_percentage(rule.probability_pct) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::InvalidBreakdown,
                        format!(
                            "Breakdown on '{}': probability {} is outside 0..=100",
                            machine, rule.probability_pct
                        ),
                    )
                    .for_machine(machine),
                );
            }
            if !(rule.delay_minutes >= 0.0) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::InvalidBreakdown,
                        format!("Breakdown on '{}': delay must be non-negative", machine),
                    )
                    .for_machine(machine),
                );
            }
            if !pools.contains_key(machine) {
                issues.push(
                    ValidationIssue::warning(
                        IssueKind::UnusedBreakdown,
                        format!("Breakdown rule references '{}', which no operation uses", machine),
                    )
                    .for_machine(machine),
                );
            }
            if !seen.insert(machine) {
                issues.push(
                    ValidationIssue::warning(
                        IssueKind::DuplicateBreakdown,
                        format!(
                            "Machine '{}' has more than one breakdown rule; the first applies",
                            machine
                        ),
                    )
                    .for_machine(machine),
                );
            }
        }
        issues
    }

    /// Shift count, hours and work days
    pub fn check_schedule(config: &SimulationConfig) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let schedule = &config.schedule;

        let enabled = schedule.enabled_shifts();
        if schedule.shifts.len() > 3 || enabled == 0 {
            issues.push(ValidationIssue::error(
                IssueKind::InvalidSchedule,
                format!(
                    "Schedule needs 1 to 3 enabled shifts, found {} of {}",
                    enabled,
                    schedule.shifts.len()
                ),
            ));
        }
        for (index, shift) in schedule.shifts.iter().enumerate() {
            if !(0.0..=24.0).contains(&shift.hours) {
                issues.push(ValidationIssue::error(
                    IssueKind::InvalidSchedule,
                    format!("Shift {} has {} hours, expected 0..=24", index + 1, shift.hours),
                ));
            } else if shift.enabled && shift.hours == 0.0 {
                issues.push(ValidationIssue::warning(
                    IssueKind::EmptyShift,
                    format!("Shift {} is enabled but has zero hours", index + 1),
                ));
            }
        }
        let daily = schedule.daily_planned_hours();
        if enabled > 0 && daily <= 0.0 {
            issues.push(ValidationIssue::error(
                IssueKind::InvalidSchedule,
                "Enabled shifts provide no working hours".to_string(),
            ));
        }
        if daily > 24.0 {
            issues.push(ValidationIssue::error(
                IssueKind::InvalidSchedule,
                format!("Enabled shifts total {} hours per day, maximum is 24", daily),
            ));
        }
        if !(1..=7).contains(&schedule.work_days) {
            issues.push(ValidationIssue::error(
                IssueKind::InvalidSchedule,
                format!("work_days must be within 1..=7, got {}", schedule.work_days),
            ));
        }
        if let Some(overtime) = &schedule.overtime {
            if overtime.hours_per_day < 0.0 || daily + overtime.hours_per_day > 24.0 {
                issues.push(ValidationIssue::error(
                    IssueKind::InvalidSchedule,
                    format!("Overtime of {} hours does not fit in the day", overtime.hours_per_day),
                ));
            }
            if overtime.days_per_week > 7 {
                issues.push(ValidationIssue::error(
                    IssueKind::InvalidSchedule,
                    format!("Overtime days must be within 0..=7, got {}", overtime.days_per_week),
                ));
            }
        }
        issues
    }

    /// Coarse feasibility: adjusted SAM times daily demand against daily hours per resource
    pub fn check_capacity(config: &SimulationConfig) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let available_minutes = config.schedule.daily_planned_hours() * 60.0;
        if available_minutes <= 0.0 {
            return issues;
        }

        let mut required: BTreeMap<&str, f64> = BTreeMap::new();
        for op in &config.operations {
            let demand = config.daily_demand_for(&op.product);
            *required.entry(op.machine_tool.as_str()).or_insert(0.0) += op.adjusted_sam() * demand;
        }

        for (machine, operators) in config.pooled_operators() {
            let needed = required.get(machine).copied().unwrap_or(0.0);
            let capacity = available_minutes * operators as f64;
            if needed > capacity {
                issues.push(
                    ValidationIssue::warning(
                        IssueKind::CapacityShortfall,
                        format!(
                            "Resource '{}' needs {:.0} min/day but {} operator(s) provide {:.0} min/day ({:.0}% load)",
                            machine,
                            needed,
                            operators,
                            capacity,
                            needed / capacity * 100.0
                        ),
                    )
                    .for_machine(machine),
                );
            }
        }
        issues
    }

    fn describe(config: &SimulationConfig, report: &ValidationReport) -> Vec<ValidationIssue> {
        let mut issues = vec![ValidationIssue::info(
            IssueKind::Summary,
            format!(
                "{} product(s), {} operation(s), {} machine/tool resource(s), {} day horizon",
                report.product_count,
                report.operation_count,
                report.machine_count,
                config.horizon_days
            ),
        )];

        let mut users: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for op in &config.operations {
            users.entry(op.machine_tool.as_str()).or_default().insert(op.product.as_str());
        }
        let pools = config.pooled_operators();
        for (machine, products) in users {
            if products.len() > 1 {
                let operators = pools.get(machine).copied().unwrap_or(0);
                issues.push(
                    ValidationIssue::info(
                        IssueKind::SharedResource,
                        format!(
                            "Resource '{}' is shared by {} with {} pooled operator(s)",
                            machine,
                            products.into_iter().collect::<Vec<_>>().join(", "),
                            operators
                        ),
                    )
                    .for_machine(machine),
                );
            }
        }
        issues
    }
}

fn is_percentage(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
