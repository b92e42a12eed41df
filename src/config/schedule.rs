use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// A single shift in the working day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub hours: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Shift {
    pub fn new(hours: f64) -> Self {
        Self { hours, enabled: true }
    }

    pub fn disabled(hours: f64) -> Self {
        Self { hours, enabled: false }
    }
}

/// Optional overtime on top of the regular shifts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overtime {
    pub hours_per_day: f64,
    pub days_per_week: u32,
}

/// Working pattern of the line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Up to three shifts; only enabled ones contribute hours
    pub shifts: Vec<Shift>,
    pub work_days: u32,
    #[serde(default)]
    pub overtime: Option<Overtime>,
}

impl Schedule {
    /// Create a schedule of `shifts` identical shifts
    pub fn new(shifts: usize, hours_per_shift: f64, work_days: u32) -> Self {
        Self {
            shifts: (0..shifts).map(|_| Shift::new(hours_per_shift)).collect(),
            work_days,
            overtime: None,
        }
    }

    pub fn with_overtime(mut self, hours_per_day: f64, days_per_week: u32) -> Self {
        self.overtime = Some(Overtime {
            hours_per_day,
            days_per_week,
        });
        self
    }

    /// Number of shifts that are switched on
    pub fn enabled_shifts(&self) -> usize {
        self.shifts.iter().filter(|s| s.enabled).count()
    }

    /// Regular hours per working day; overtime is not part of the simulated day
    pub fn daily_planned_hours(&self) -> f64 {
        self.shifts
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.hours)
            .sum()
    }

    /// Regular hours across the week plus any overtime
    pub fn weekly_total_hours(&self) -> f64 {
        let overtime = self
            .overtime
            .as_ref()
            .map(|ot| ot.hours_per_day * ot.days_per_week as f64)
            .unwrap_or(0.0);
        self.daily_planned_hours() * self.work_days as f64 + overtime
    }

    /// Simulated minutes covered by `horizon_days` working days
    pub fn horizon_minutes(&self, horizon_days: u32) -> f64 {
        self.daily_planned_hours() * 60.0 * horizon_days as f64
    }
}
