use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{PolicyError, Result};

/// Standard deviation of a unit normal truncated to [-2, 2].
const TRUNCATED_UNIT_STD: f64 = 0.879_625_661_034_239_8;

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightInit {
    /// He/Kaiming normal initialization (for ReLU), truncated at two standard deviations
    HeNormal,

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Initialize a `(fan_in, fan_out)` weight matrix from the caller's generator.
    pub fn initialize_weights<R: Rng + ?Sized>(
        &self,
        shape: (usize, usize),
        rng: &mut R,
    ) -> Result<Array2<f64>> {
        let (fan_in, _fan_out) = shape;

        match self {
            WeightInit::HeNormal => {
                let std = (2.0 / fan_in as f64).sqrt() / TRUNCATED_UNIT_STD;
                let dist = TruncatedNormal::new(std)?;
                Ok(Array2::random_using(shape, dist, rng))
            }

            WeightInit::Zeros => Ok(Array2::zeros(shape)),
        }
    }

    /// Initialize biases for a layer. Both strategies start biases at zero.
    pub fn initialize_biases(&self, size: usize) -> Array1<f64> {
        Array1::zeros(size)
    }
}

/// Zero-mean normal distribution, resampled outside two standard deviations.
#[derive(Debug, Clone, Copy)]
pub struct TruncatedNormal {
    normal: Normal<f64>,
    bound: f64,
}

impl TruncatedNormal {
    pub fn new(std: f64) -> Result<Self> {
        let normal = Normal::new(0.0, std).map_err(|e| {
            PolicyError::invalid_parameter("std".to_string(), e.to_string())
        })?;
        Ok(TruncatedNormal { normal, bound: 2.0 * std })
    }
}

impl Distribution<f64> for TruncatedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        loop {
            let v = self.normal.sample(rng);
            if v.abs() <= self.bound {
                return v;
            }
        }
    }
}
