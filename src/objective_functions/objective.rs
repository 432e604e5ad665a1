use crate::{
    constants::NO_LINK_TRANSFORM,
    data::Metadata,
    errors::ObjectiveError,
    objective_functions::{FairLoss, SquaredLoss},
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Contract every loss kind satisfies.
///
/// Lifecycle: `init` binds the objective to a dataset once (re-calling
/// rebinds), then `get_gradients` runs once per boosting round with the
/// current score vector. All per-example outputs are pure functions of
/// `(score[i], label[i], weight[i])`, so the gradient loop is computed
/// in parallel with no cross-example coupling.
pub trait ObjectiveFunction<'data>: Send + Sync {
    /// Bind the objective to a dataset.
    ///
    /// `metadata` must expose `num_data` labels, and `num_data` weights
    /// when weights are present.
    fn init(&mut self, metadata: &Metadata<'data>, num_data: usize) -> Result<(), ObjectiveError>;

    /// Fill `gradients` and `hessians` with the first and second
    /// derivatives of the loss at `score`.
    ///
    /// All three slices must have length `num_data`; every index is
    /// written exactly once.
    fn get_gradients(
        &self,
        score: &[f64],
        gradients: &mut [f32],
        hessians: &mut [f32],
    ) -> Result<(), ObjectiveError>;

    /// Per-example loss values at `score`.
    fn loss(&self, score: &[f64]) -> Result<Vec<f32>, ObjectiveError>;

    /// Starting prediction for the ensemble.
    fn initial_value(&self) -> Result<f64, ObjectiveError>;

    /// Steepness of the sigmoid transform raw scores need before they are
    /// on the objective's natural scale. Negative means no transform, which
    /// is the case for every regression loss in this crate.
    fn link_transform(&self) -> f64 {
        NO_LINK_TRANSFORM
    }
}

/// Dataset state captured by `init`, shared by all loss kinds.
///
/// Holds non-owning views, the dataset store outlives the binding.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DatasetBinding<'a> {
    pub(crate) label: &'a [f64],
    pub(crate) weight: Option<&'a [f64]>,
    pub(crate) num_data: usize,
}

impl<'a> DatasetBinding<'a> {
    pub(crate) fn bind(metadata: &Metadata<'a>, num_data: usize) -> Result<Self, ObjectiveError> {
        let label = metadata.label();
        if label.len() != num_data {
            return Err(ObjectiveError::LengthMismatch(
                "label".to_string(),
                num_data,
                label.len(),
            ));
        }
        let weight = metadata.weights();
        if let Some(weight) = weight {
            if weight.len() != num_data {
                return Err(ObjectiveError::LengthMismatch(
                    "weight".to_string(),
                    num_data,
                    weight.len(),
                ));
            }
            let n_zero = weight.iter().filter(|w| **w == 0.0).count();
            if n_zero > 0 {
                warn!(
                    "{} of {} examples have zero weight and will not contribute to tree fitting.",
                    n_zero, num_data
                );
            }
        }
        debug!(
            "Objective bound to {} examples, weighted: {}.",
            num_data,
            weight.is_some()
        );
        Ok(DatasetBinding {
            label,
            weight,
            num_data,
        })
    }

    pub(crate) fn check_score(&self, score: &[f64]) -> Result<(), ObjectiveError> {
        if score.len() != self.num_data {
            return Err(ObjectiveError::LengthMismatch(
                "score".to_string(),
                self.num_data,
                score.len(),
            ));
        }
        Ok(())
    }

    pub(crate) fn check_buffers(
        &self,
        score: &[f64],
        gradients: &[f32],
        hessians: &[f32],
    ) -> Result<(), ObjectiveError> {
        self.check_score(score)?;
        if gradients.len() != self.num_data {
            return Err(ObjectiveError::LengthMismatch(
                "gradients".to_string(),
                self.num_data,
                gradients.len(),
            ));
        }
        if hessians.len() != self.num_data {
            return Err(ObjectiveError::LengthMismatch(
                "hessians".to_string(),
                self.num_data,
                hessians.len(),
            ));
        }
        Ok(())
    }
}

/// Configuration-time selector for the loss to train with.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub enum Objective {
    SquaredLoss,
    /// Fair loss. `c` is the scale of the robustness region, defaults to 2.0.
    FairLoss { c: Option<f64> },
}

impl Objective {
    /// Construct the loss strategy this configuration selects.
    pub fn as_function<'data>(&self) -> Box<dyn ObjectiveFunction<'data> + 'data> {
        match self {
            Objective::SquaredLoss => Box::new(SquaredLoss::default()),
            Objective::FairLoss { c } => Box::new(FairLoss::new(*c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_dataset(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut rng = StdRng::seed_from_u64(1903);
        let label = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
        let score = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
        let weight = (0..n).map(|_| rng.gen_range(0.0..2.0)).collect();
        (label, score, weight)
    }

    #[test]
    fn test_link_transform_sentinel() {
        let y = vec![1.0];
        let metadata = Metadata::new(&y);
        for objective in [Objective::SquaredLoss, Objective::FairLoss { c: None }] {
            let mut function = objective.as_function();
            function.init(&metadata, 1).unwrap();
            assert!(function.link_transform() < 0.0);
        }
    }

    #[test]
    fn test_objective_serde_round_trip() {
        for objective in [
            Objective::SquaredLoss,
            Objective::FairLoss { c: None },
            Objective::FairLoss { c: Some(4.0) },
        ] {
            let json = serde_json::to_string(&objective).unwrap();
            let parsed: Objective = serde_json::from_str(&json).unwrap();
            assert_eq!(objective, parsed);
        }
    }

    #[test]
    fn test_get_gradients_deterministic() {
        let (label, score, weight) = random_dataset(4096);
        for objective in [Objective::SquaredLoss, Objective::FairLoss { c: None }] {
            let mut function = objective.as_function();
            function
                .init(&Metadata::with_weight(&label, &weight), label.len())
                .unwrap();

            let mut g1 = vec![0.0_f32; label.len()];
            let mut h1 = vec![0.0_f32; label.len()];
            function.get_gradients(&score, &mut g1, &mut h1).unwrap();

            let mut g2 = vec![0.0_f32; label.len()];
            let mut h2 = vec![0.0_f32; label.len()];
            function.get_gradients(&score, &mut g2, &mut h2).unwrap();

            assert_eq!(g1, g2);
            assert_eq!(h1, h2);
        }
    }

    // The parallel loop must agree index for index with a plain serial
    // evaluation of the formulas, regardless of how rayon partitions the
    // range.
    #[test]
    fn test_parallel_matches_serial() {
        let (label, score, weight) = random_dataset(10_000);
        let n = label.len();

        let mut function = Objective::SquaredLoss.as_function();
        function.init(&Metadata::with_weight(&label, &weight), n).unwrap();
        let mut g = vec![0.0_f32; n];
        let mut h = vec![0.0_f32; n];
        function.get_gradients(&score, &mut g, &mut h).unwrap();
        for i in 0..n {
            assert_eq!(g[i], ((score[i] - label[i]) * weight[i]) as f32);
            assert_eq!(h[i], weight[i] as f32);
        }

        let mut function = Objective::FairLoss { c: None }.as_function();
        function.init(&Metadata::with_weight(&label, &weight), n).unwrap();
        function.get_gradients(&score, &mut g, &mut h).unwrap();
        for i in 0..n {
            let d = score[i] - label[i];
            let r = 1.0 + d.abs() / 2.0;
            assert_eq!(g[i], (weight[i] * d / r) as f32);
            assert_eq!(h[i], (weight[i] / (r * r)) as f32);
        }
    }

    #[test]
    fn test_uninitialized_use_fails() {
        let score = vec![1.0];
        let mut g = vec![0.0_f32];
        let mut h = vec![0.0_f32];
        for objective in [Objective::SquaredLoss, Objective::FairLoss { c: None }] {
            let function = objective.as_function();
            assert!(matches!(
                function.get_gradients(&score, &mut g, &mut h),
                Err(ObjectiveError::NotInitialized)
            ));
            assert!(matches!(function.loss(&score), Err(ObjectiveError::NotInitialized)));
            assert!(matches!(
                function.initial_value(),
                Err(ObjectiveError::NotInitialized)
            ));
        }
    }

    #[test]
    fn test_length_mismatch_fails() {
        let y = vec![1.0, 2.0];
        let w = vec![1.0];
        let mut function = Objective::SquaredLoss.as_function();
        assert!(matches!(
            function.init(&Metadata::new(&y), 3),
            Err(ObjectiveError::LengthMismatch(_, 3, 2))
        ));
        assert!(matches!(
            function.init(&Metadata::with_weight(&y, &w), 2),
            Err(ObjectiveError::LengthMismatch(_, 2, 1))
        ));

        function.init(&Metadata::new(&y), 2).unwrap();
        let mut g = vec![0.0_f32; 2];
        let mut h = vec![0.0_f32; 2];
        assert!(function.get_gradients(&[1.0], &mut g, &mut h).is_err());
        assert!(function.get_gradients(&[1.0, 2.0], &mut g[..1], &mut h).is_err());
        assert!(function.get_gradients(&[1.0, 2.0], &mut g, &mut h[..1]).is_err());
        assert!(function.loss(&[1.0]).is_err());
    }

    #[test]
    fn test_rebind_replaces_dataset() {
        let y1 = vec![0.0];
        let y2 = vec![1.0];
        let mut function = Objective::SquaredLoss.as_function();
        function.init(&Metadata::new(&y1), 1).unwrap();
        function.init(&Metadata::new(&y2), 1).unwrap();

        let mut g = vec![0.0_f32];
        let mut h = vec![0.0_f32];
        function.get_gradients(&[1.0], &mut g, &mut h).unwrap();
        assert_eq!(g, vec![0.0]);
    }
}
