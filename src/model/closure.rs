use std::collections::BTreeSet;

/// Unordered pair of frame indices, stored with the smaller index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosurePair {
    i: u32,
    j: u32,
}

impl ClosurePair {
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self { i: a, j: b }
        } else {
            Self { i: b, j: a }
        }
    }
}

/// Raw predicted closure. `a`/`b` keep the order they were read in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedClosure {
    pub a: u32,
    pub b: u32,
    pub score: f64,
}

impl PredictedClosure {
    pub fn pair(&self) -> ClosurePair {
        ClosurePair::new(self.a, self.b)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroundTruthSet {
    closures: BTreeSet<ClosurePair>,
    records_read: usize,
}

impl GroundTruthSet {
    /// Keeps pairs whose overlap is strictly above `cutoff`.
    pub fn from_records(
        records: impl IntoIterator<Item = ((u32, u32), f64)>,
        cutoff: f64,
    ) -> Self {
        let mut closures = BTreeSet::new();
        let mut records_read = 0usize;
        for ((a, b), overlap) in records {
            records_read += 1;
            if overlap > cutoff {
                closures.insert(ClosurePair::new(a, b));
            }
        }
        Self {
            closures,
            records_read,
        }
    }

    pub fn len(&self) -> usize {
        self.closures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closures.is_empty()
    }

    pub fn records_read(&self) -> usize {
        self.records_read
    }

    pub fn contains(&self, pair: &ClosurePair) -> bool {
        self.closures.contains(pair)
    }
}

/// Canonical set of predictions scoring strictly above `threshold`.
pub fn select_above(predictions: &[PredictedClosure], threshold: f64) -> BTreeSet<ClosurePair> {
    predictions
        .iter()
        .filter(|p| p.score > threshold)
        .map(PredictedClosure::pair)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/closure.rs"]
mod tests;
