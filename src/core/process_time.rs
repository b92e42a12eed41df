use crate::config::{Operation, Variability};
use rand::Rng;
use rand_distr::{Distribution, Triangular};

/// Floor for any single processing draw, in minutes
pub const MIN_PROCESS_TIME: f64 = 0.01;

/// Draws per-piece processing times
///
/// `actual = max(min, sam * (1 + variability + fpd/100 + (100 - grade)/100))`
/// where variability is zero for deterministic operations and a symmetric
/// triangular draw in `[-spread, spread]` (mode 0) otherwise.
#[derive(Debug, Clone)]
pub struct ProcessTimeModel {
    min_process_time: f64,
    triangular: Option<Triangular<f64>>,
}

impl ProcessTimeModel {
    /// Create a model with the given triangular half-width and floor
    pub fn new(spread: f64, min_process_time: f64) -> Self {
        let triangular = if spread > 0.0 {
            Triangular::new(-spread, spread, 0.0).ok()
        } else {
            None
        };
        Self {
            min_process_time,
            triangular,
        }
    }

    /// Variability term for one piece
    pub fn variability_factor<R: Rng + ?Sized>(
        &self,
        variability: Variability,
        rng: &mut R,
    ) -> f64 {
        match (variability, &self.triangular) {
            (Variability::Triangular, Some(dist)) => dist.sample(rng),
            _ => 0.0,
        }
    }

    /// Minutes one piece of `op` takes
    pub fn sample<R: Rng + ?Sized>(&self, op: &Operation, rng: &mut R) -> f64 {
        let variability = self.variability_factor(op.variability, rng);
        let raw = op.sam * (variability + op.adjustment_factor());
        raw.max(self.min_process_time)
    }
}

impl Default for ProcessTimeModel {
    fn default() -> Self {
        Self::new(0.10, MIN_PROCESS_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_deterministic_is_exact() {
        let model = ProcessTimeModel::default();
        let mut rng = StdRng::seed_from_u64(7);
        let op = Operation::new("P", 1, "Sew", "M", 3.5, 1);
        for _ in 0..10 {
            assert_eq!(model.sample(&op, &mut rng), 3.5);
        }
    }

    #[test]
    fn test_penalties_applied() {
        let model = ProcessTimeModel::default();
        let mut rng = StdRng::seed_from_u64(7);
        let op = Operation::new("P", 1, "Sew", "M", 2.0, 1)
            .with_grade_pct(90.0)
            .with_fpd_pct(5.0);
        assert!((model.sample(&op, &mut rng) - 2.3).abs() < 1e-12);
    }

    #[test]
    fn test_triangular_stays_within_spread() {
        let model = ProcessTimeModel::new(0.2, MIN_PROCESS_TIME);
        let mut rng = StdRng::seed_from_u64(42);
        let op =
            Operation::new("P", 1, "Sew", "M", 10.0, 1).with_variability(Variability::Triangular);
        let draws: Vec<f64> = (0..500).map(|_| model.sample(&op, &mut rng)).collect();
        assert!(draws.iter().all(|t| (8.0..=12.0).contains(t)));
        assert!(draws.iter().any(|t| (t - 10.0).abs() > 1e-9));
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!((mean - 10.0).abs() < 0.2, "mean was {}", mean);
    }

    #[test]
    fn test_floor_applies() {
        let model = ProcessTimeModel::default();
        let mut rng = StdRng::seed_from_u64(1);
        let op = Operation::new("P", 1, "Tiny", "M", 0.001, 1);
        assert_eq!(model.sample(&op, &mut rng), MIN_PROCESS_TIME);
    }

    #[test]
    fn test_same_seed_same_draws() {
        let model = ProcessTimeModel::default();
        let op =
            Operation::new("P", 1, "Sew", "M", 4.0, 1).with_variability(Variability::Triangular);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(model.sample(&op, &mut a), model.sample(&op, &mut b));
        }
    }
}
