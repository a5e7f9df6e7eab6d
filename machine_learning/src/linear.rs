use ndarray::{Array1, Array2, ArrayView2};

use crate::{
    Classifier, MlErr, Result,
    arch::activations::Sigmoid,
    classifier::{binary_proba, check_input},
};

/// A binary logistic regression, `P(1) = σ(x · coef + intercept)`.
#[derive(Clone, Debug)]
pub struct LogisticRegression {
    coef: Array1<f32>,
    intercept: f32,
}

impl LogisticRegression {
    pub fn new(coef: Vec<f32>, intercept: f32) -> Result<Self> {
        if coef.is_empty() {
            return Err(MlErr::EmptyModel);
        }

        Ok(Self {
            coef: Array1::from_vec(coef),
            intercept,
        })
    }

    /// Returns the raw decision value of every row of `x`.
    pub fn decision_function(&self, x: ArrayView2<f32>) -> Result<Array1<f32>> {
        check_input(&x, self.n_features())?;
        Ok(x.dot(&self.coef) + self.intercept)
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict_proba(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let sigmoid = Sigmoid::default();
        let p = self.decision_function(x)?.mapv_into(|z| sigmoid.f(z));
        Ok(binary_proba(p))
    }
}
