use serde::{Deserialize, Serialize};

/// How processing time varies around the adjusted SAM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variability {
    /// Every piece takes exactly the adjusted SAM
    Deterministic,
    /// A symmetric triangular factor is added to every piece
    Triangular,
}

impl Default for Variability {
    fn default() -> Self {
        Variability::Deterministic
    }
}

fn default_grade_pct() -> f64 {
    100.0
}

/// One step of a product's routing, bound to a pooled machine/tool resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Product this operation belongs to
    pub product: String,
    /// Position in the product routing, 1-based and contiguous
    pub step: u32,
    /// Human label shown in reports
    pub name: String,
    /// Resource key; operations naming the same key share one pool
    pub machine_tool: String,
    /// Standard allowed minutes per piece
    pub sam: f64,
    /// Operators assigned to this operation
    pub operators: u32,
    #[serde(default)]
    pub variability: Variability,
    /// Probability (percent) that a piece needs one rework pass
    #[serde(default)]
    pub rework_pct: f64,
    /// Operator skill; 100 means no penalty
    #[serde(default = "default_grade_pct")]
    pub grade_pct: f64,
    /// Fixed process delay as a percentage of SAM
    #[serde(default)]
    pub fpd_pct: f64,
}

impl Operation {
    /// Create a deterministic operation with neutral adjustment factors
    pub fn new(
        product: &str,
        step: u32,
        name: &str,
        machine_tool: &str,
        sam: f64,
        operators: u32,
    ) -> Self {
        Self {
            product: product.to_string(),
            step,
            name: name.to_string(),
            machine_tool: machine_tool.to_string(),
            sam,
            operators,
            variability: Variability::Deterministic,
            rework_pct: 0.0,
            grade_pct: 100.0,
            fpd_pct: 0.0,
        }
    }

    pub fn with_variability(mut self, variability: Variability) -> Self {
        self.variability = variability;
        self
    }

    pub fn with_rework_pct(mut self, rework_pct: f64) -> Self {
        self.rework_pct = rework_pct;
        self
    }

    pub fn with_grade_pct(mut self, grade_pct: f64) -> Self {
        self.grade_pct = grade_pct;
        self
    }

    pub fn with_fpd_pct(mut self, fpd_pct: f64) -> Self {
        self.fpd_pct = fpd_pct;
        self
    }

    /// Multiplier applied to SAM before variability: fixed delay plus skill penalty
    pub fn adjustment_factor(&self) -> f64 {
        1.0 + self.fpd_pct / 100.0 + (100.0 - self.grade_pct) / 100.0
    }

    /// Expected minutes per piece including the average rework load
    ///
    /// Used by the coarse capacity feasibility check, not by the simulator.
    pub fn adjusted_sam(&self) -> f64 {
        self.sam * self.adjustment_factor() * (1.0 + self.rework_pct / 100.0)
    }
}
