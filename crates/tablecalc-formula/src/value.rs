//! Flattened numeric values

/// Numbers produced by a range or gathered as function arguments
///
/// Cells of a range that lie outside the cell source read as zero. They are counted in
/// [`ValueList::zeros`] rather than stored, so a range reaching far past the grid costs
/// no more than the part inside it. Stored values keep source order: arguments left to
/// right, range cells row by row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueList {
    values: Vec<f64>,
    zeros: u64,
}

impl ValueList {
    /// List of explicit values
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, zeros: 0 }
    }

    /// List of explicit values followed by `zeros` implicit zeros
    pub fn with_zeros(values: Vec<f64>, zeros: u64) -> Self {
        Self { values, zeros }
    }

    /// Explicitly stored values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of implicit zeros
    pub fn zeros(&self) -> u64 {
        self.zeros
    }

    /// Total number of values, implicit zeros included
    pub fn len(&self) -> u64 {
        (self.values.len() as u64).saturating_add(self.zeros)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.zeros == 0
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Append another list
    pub fn append(&mut self, other: ValueList) {
        self.values.extend(other.values);
        self.zeros = self.zeros.saturating_add(other.zeros);
    }

    /// Sum of all values
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Smallest value, `None` when empty
    pub fn min(&self) -> Option<f64> {
        self.all_distinct().reduce(f64::min)
    }

    /// Largest value, `None` when empty
    pub fn max(&self) -> Option<f64> {
        self.all_distinct().reduce(f64::max)
    }

    /// Stored values plus a single zero standing in for the implicit ones
    fn all_distinct(&self) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .copied()
            .chain((self.zeros > 0).then_some(0.0))
    }
}

impl From<Vec<f64>> for ValueList {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
