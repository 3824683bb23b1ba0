use crate::domain::types::IterationRecord;

/// Append-only per-iteration history, for plotting and for caller-side
/// stopping decisions.
#[derive(Debug, Clone, Default)]
pub struct ConvergenceTracker {
    records: Vec<IterationRecord>,
}

impl ConvergenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: IterationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best cost over every recorded iteration.
    pub fn best_cost(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.best_cost)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Iterations recorded since the best-so-far cost last dropped.
    pub fn iterations_since_improvement(&self) -> usize {
        let mut best = f64::INFINITY;
        let mut last_improvement = 0;
        for (idx, record) in self.records.iter().enumerate() {
            if record.best_cost < best {
                best = record.best_cost;
                last_improvement = idx + 1;
            }
        }
        self.records.len() - last_improvement
    }
}
