use ndarray::{linalg, prelude::*};

use crate::{MlErr, Result, arch::activations::ActFn};

/// A fully connected layer holding trained weights, `z = x · w + b`, optionally followed by an
/// activation function.
#[derive(Clone, Debug)]
pub struct Dense {
    w: Array2<f32>,
    b: Array1<f32>,
    act_fn: Option<ActFn>,
}

impl Dense {
    /// Creates a new `Dense` from already shaped parameters.
    ///
    /// # Arguments
    /// * `w` - The weights, one row per input and one column per output.
    /// * `b` - The biases, one per output.
    /// * `act_fn` - The activation applied after the affine transformation, if any.
    ///
    /// # Returns
    /// A new `Dense` or an error if the biases don't match the weights' output width.
    pub fn new(w: Array2<f32>, b: Array1<f32>, act_fn: Option<ActFn>) -> Result<Self> {
        if b.len() != w.ncols() {
            return Err(MlErr::SizeMismatch {
                what: "dense biases",
                got: b.len(),
                expected: w.ncols(),
            });
        }

        Ok(Self { w, b, act_fn })
    }

    /// Creates a new `Dense` from flat parameter buffers.
    ///
    /// # Arguments
    /// * `dim` - The `(input, output)` dimensions of the layer.
    /// * `weights` - The weights in row-major order, `input * output` of them.
    /// * `biases` - The biases, `output` of them.
    /// * `act_fn` - The activation applied after the affine transformation, if any.
    ///
    /// # Returns
    /// A new `Dense` or an error if the buffers don't match the dimensions.
    pub fn from_raw(
        dim: (usize, usize),
        weights: Vec<f32>,
        biases: Vec<f32>,
        act_fn: Option<ActFn>,
    ) -> Result<Self> {
        let w_size = dim.0 * dim.1;
        if weights.len() != w_size {
            return Err(MlErr::SizeMismatch {
                what: "dense weights",
                got: weights.len(),
                expected: w_size,
            });
        }

        let w = Array2::from_shape_vec(dim, weights).map_err(|_| MlErr::SizeMismatch {
            what: "dense weights",
            got: w_size,
            expected: w_size,
        })?;

        Self::new(w, Array1::from_vec(biases), act_fn)
    }

    /// Returns the `(input, output)` dimensions of this layer.
    pub fn dim(&self) -> (usize, usize) {
        self.w.dim()
    }

    /// Makes a forward pass through this layer.
    ///
    /// # Arguments
    /// * `x` - The input batch, one row per sample.
    ///
    /// # Returns
    /// The layer's output for every sample or an error if the input width is wrong.
    pub fn forward(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        if x.ncols() != self.w.nrows() {
            return Err(MlErr::SizeMismatch {
                what: "dense input",
                got: x.ncols(),
                expected: self.w.nrows(),
            });
        }

        let mut z = Array2::zeros((x.nrows(), self.w.ncols()));
        linalg::general_mat_mul(1.0, &x, &self.w, 0.0, &mut z);
        z += &self.b;

        if let Some(ref act_fn) = self.act_fn {
            z.mapv_inplace(|z| act_fn.f(z));
        }

        Ok(z)
    }
}
