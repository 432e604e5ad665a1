//! Squared Error loss for regression.
use crate::{
    data::Metadata,
    errors::ObjectiveError,
    objective_functions::objective::{DatasetBinding, ObjectiveFunction},
    utils::fast_sum,
};
use rayon::prelude::*;

/// Squared Error loss, `L(s, y) = (s - y)² / 2`, optionally weighted.
///
/// The hessian is constant, 1.0 per example (the weight when weighted),
/// so it is always strictly positive for non-degenerate weights.
#[derive(Debug, Default, Clone)]
pub struct SquaredLoss<'data> {
    data: Option<DatasetBinding<'data>>,
}

impl<'data> ObjectiveFunction<'data> for SquaredLoss<'data> {
    fn init(&mut self, metadata: &Metadata<'data>, num_data: usize) -> Result<(), ObjectiveError> {
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

        match data.weight {
            Some(weight) => {
                gradients
                    .par_iter_mut()
                    .zip(hessians.par_iter_mut())
                    .enumerate()
                    .for_each(|(i, (g, h))| {
                        *g = ((score[i] - data.label[i]) * weight[i]) as f32;
                        *h = weight[i] as f32;
                    });
            }
            None => {
                gradients
                    .par_iter_mut()
                    .zip(hessians.par_iter_mut())
                    .enumerate()
                    .for_each(|(i, (g, h))| {
                        *g = (score[i] - data.label[i]) as f32;
                        *h = 1.0;
                    });
            }
        }
        Ok(())
    }

    #[inline]
    fn loss(&self, score: &[f64]) -> Result<Vec<f32>, ObjectiveError> {
        let data = self.data.as_ref().ok_or(ObjectiveError::NotInitialized)?;
        data.check_score(score)?;

        let values = match data.weight {
            Some(weight) => data
                .label
                .iter()
                .zip(score)
                .zip(weight)
                .map(|((y_, s_), w_)| {
                    let d = *s_ - *y_;
                    (0.5 * d * d * *w_) as f32
                })
                .collect(),
            None => data
                .label
                .iter()
                .zip(score)
                .map(|(y_, s_)| {
                    let d = *s_ - *y_;
                    (0.5 * d * d) as f32
                })
                .collect(),
        };
        Ok(values)
    }

    fn initial_value(&self) -> Result<f64, ObjectiveError> {
        let data = self.data.as_ref().ok_or(ObjectiveError::NotInitialized)?;
        match data.weight {
            Some(weight) => {
                let mut ytot: f64 = 0.;
                let mut ntot: f64 = 0.;
                for i in 0..data.num_data {
                    ytot += weight[i] * data.label[i];
                    ntot += weight[i];
                }
                Ok(ytot / ntot)
            }
            None => Ok(fast_sum(data.label) / data.num_data as f64),
        }
    }
}
