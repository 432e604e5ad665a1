//! Fair loss for robust regression.
//!
//! A pseudo-Huber style loss: quadratic near zero residual, linear for
//! large residuals, so gradient magnitude stays bounded and outliers
//! cannot dominate a boosting round the way they do under squared error.
//!
//! Known quirk, kept on purpose: the unweighted formulas carry a fixed
//! multiplier of 100 that the weighted formulas do not, so a weight of
//! 1.0 is not equivalent to passing no weights. Training pipelines have
//! been tuned against this behavior, see `test_weight_one_differs_from_unweighted`.
use crate::{
    constants::{DEFAULT_FAIR_C, FAIR_UNWEIGHTED_SCALE},
    data::Metadata,
    errors::ObjectiveError,
    objective_functions::objective::{DatasetBinding, ObjectiveFunction},
    utils::fast_sum,
};
use rayon::prelude::*;

/// Fair loss, with residual `d = s - y` and `r = 1 + |d|/c`:
/// gradient `d / r`, hessian `1 / r²`, times the example weight, or
/// times 100 when no weights are present.
#[derive(Debug, Default, Clone)]
pub struct FairLoss<'data> {
    c: Option<f64>,
    data: Option<DatasetBinding<'data>>,
}

impl<'data> FairLoss<'data> {
    /// `c` scales the residual region treated as quadratic, defaults to 2.0.
    pub fn new(c: Option<f64>) -> Self {
        FairLoss { c, data: None }
    }

    fn c(&self) -> f64 {
        self.c.unwrap_or(DEFAULT_FAIR_C)
    }
}

impl<'data> ObjectiveFunction<'data> for FairLoss<'data> {
    fn init(&mut self, metadata: &Metadata<'data>, num_data: usize) -> Result<(), ObjectiveError> {
        let c = self.c();
        if !(c > 0.0) {
            return Err(ObjectiveError::InvalidParameter(
                "c".to_string(),
                "a value greater than 0".to_string(),
                format!("{}", c),
            ));
        }
        self.data = Some(DatasetBinding::bind(metadata, num_data)?);
        Ok(())
    }

    #[inline]
    fn get_gradients(
        &self,
        score: &[f64],
        gradients: &mut [f32],
        hessians: &mut [f32],
    ) -> Result<(), ObjectiveError> {
        let data = self.data.as_ref().ok_or(ObjectiveError::NotInitialized)?;
        data.check_buffers(score, gradients, hessians)?;
        let c = self.c();

        match data.weight {
            Some(weight) => {
                gradients
                    .par_iter_mut()
                    .zip(hessians.par_iter_mut())
                    .enumerate()
                    .for_each(|(i, (g, h))| {
                        let d = score[i] - data.label[i];
                        let r = 1.0 + d.abs() / c;
                        *g = (weight[i] * d / r) as f32;
                        *h = (weight[i] / (r * r)) as f32;
                    });
            }
            None => {
                gradients
                    .par_iter_mut()
                    .zip(hessians.par_iter_mut())
                    .enumerate()
                    .for_each(|(i, (g, h))| {
                        let d = score[i] - data.label[i];
                        let r = 1.0 + d.abs() / c;
                        *g = (FAIR_UNWEIGHTED_SCALE * d / r) as f32;
                        *h = (FAIR_UNWEIGHTED_SCALE / (r * r)) as f32;
                    });
            }
        }
        Ok(())
    }

    #[inline]
    fn loss(&self, score: &[f64]) -> Result<Vec<f32>, ObjectiveError> {
        let data = self.data.as_ref().ok_or(ObjectiveError::NotInitialized)?;
        data.check_score(score)?;
        let c = self.c();

        // Antiderivative of the gradient, branch for branch, so the loss
        // carries the same unweighted 100 multiplier.
        let values = match data.weight {
            Some(weight) => data
                .label
                .iter()
                .zip(score)
                .zip(weight)
                .map(|((y_, s_), w_)| {
                    let a = (*s_ - *y_).abs();
                    (*w_ * c * c * (a / c - (1.0 + a / c).ln())) as f32
                })
                .collect(),
            None => data
                .label
                .iter()
                .zip(score)
                .map(|(y_, s_)| {
                    let a = (*s_ - *y_).abs();
                    (FAIR_UNWEIGHTED_SCALE * c * c * (a / c - (1.0 + a / c).ln())) as f32
                })
                .collect(),
        };
        Ok(values)
    }

    fn initial_value(&self) -> Result<f64, ObjectiveError> {
        let data = self.data.as_ref().ok_or(ObjectiveError::NotInitialized)?;
        let label = data.label;
        if label.is_empty() {
            return Ok(f64::NAN);
        }

        // Weighted median of the labels, the minimizer of the robust loss.
        let mut idxs = (0..label.len()).collect::<Vec<_>>();
        idxs.sort_by(|&i, &j| label[i].total_cmp(&label[j]));

        let total_w = data.weight.map(fast_sum).unwrap_or(label.len() as f64);
        let target = total_w * 0.5;
        let mut cum = 0.0_f64;
        for &i in &idxs {
            cum += data.weight.map_or(1.0, |w| w[i]);
            if cum >= target {
                return Ok(label[i]);
            }
        }
        Ok(label[idxs[label.len() / 2]])
    }
}
