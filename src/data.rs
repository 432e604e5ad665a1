//! Dataset metadata views.

/// Read-only view over the dataset fields an objective needs.
///
/// `Metadata` does not own its buffers. The label and weight slices are
/// borrowed from the dataset store and must remain valid and unchanged
/// for as long as any objective is bound to them.
#[derive(Debug, Clone, Copy)]
pub struct Metadata<'a> {
    label: &'a [f64],
    weight: Option<&'a [f64]>,
}

impl<'a> Metadata<'a> {
    /// Create a view with uniform example weights.
    pub fn new(label: &'a [f64]) -> Self {
        Metadata { label, weight: None }
    }

    /// Create a view with per-example weights.
    ///
    /// Weights are expected to be non-negative; a zero weight removes the
    /// example from tree fitting without being an error.
    pub fn with_weight(label: &'a [f64], weight: &'a [f64]) -> Self {
        Metadata {
            label,
            weight: Some(weight),
        }
    }

    /// Ground-truth target for each example.
    pub fn label(&self) -> &'a [f64] {
        self.label
    }

    /// Per-example weights, `None` means uniform weight 1.0.
    pub fn weights(&self) -> Option<&'a [f64]> {
        self.weight
    }
}
