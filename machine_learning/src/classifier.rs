use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::{LogisticRegression, MlErr, Result, arch::Sequential};

/// A trained binary classifier.
///
/// Labels are `0` and `1`; probability rows are `[P(0), P(1)]`.
pub trait Classifier {
    /// Returns the amount of features each input row must have.
    fn n_features(&self) -> usize;

    /// Estimates the probability of each label for every row of `x`.
    ///
    /// # Returns
    /// An `(x.nrows(), 2)` array whose rows sum up to one.
    fn predict_proba(&self, x: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Classifies every row of `x` as the label with the highest probability, ties going to `0`.
    fn predict(&self, x: ArrayView2<f32>) -> Result<Array1<u8>> {
        let proba = self.predict_proba(x)?;

        if proba.ncols() != 2 {
            return Err(MlErr::SizeMismatch {
                what: "probabilities",
                got: proba.ncols(),
                expected: 2,
            });
        }

        Ok(proba
            .axis_iter(Axis(0))
            .map(|row| label(row[0], row[1]))
            .collect())
    }
}

/// The label with the highest probability, ties going to `0`.
pub fn label(p0: f32, p1: f32) -> u8 {
    u8::from(p1 > p0)
}

/// The classifiers an artifact can describe.
#[derive(Clone, Debug)]
pub enum Model {
    Logistic(LogisticRegression),
    Sequential(Sequential),
}

impl Classifier for Model {
    fn n_features(&self) -> usize {
        match self {
            Model::Logistic(m) => m.n_features(),
            Model::Sequential(m) => m.n_features(),
        }
    }

    fn predict_proba(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        match self {
            Model::Logistic(m) => m.predict_proba(x),
            Model::Sequential(m) => m.predict_proba(x),
        }
    }
}

/// A network ending in one unit outputs `P(1)` directly, one ending in two units outputs a score
/// per label that gets normalized with a softmax.
impl Classifier for Sequential {
    fn n_features(&self) -> usize {
        self.input_size()
    }

    fn predict_proba(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        check_input(&x, self.n_features())?;
        let y = self.forward(x)?;

        match y.ncols() {
            1 => Ok(binary_proba(y.column(0).mapv(|p| p.clamp(0., 1.)))),
            2 => Ok(softmax_rows(y)),
            got => Err(MlErr::SizeMismatch {
                what: "network outputs",
                got,
                expected: 2,
            }),
        }
    }
}

/// Validates the shape and values of a classifier's input batch.
pub(crate) fn check_input(x: &ArrayView2<f32>, n_features: usize) -> Result<()> {
    if x.ncols() != n_features {
        return Err(MlErr::SizeMismatch {
            what: "input features",
            got: x.ncols(),
            expected: n_features,
        });
    }

    match x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), _)) => Err(MlErr::NonFiniteInput { row, col }),
        None => Ok(()),
    }
}

/// Turns `P(1)` for every row into `[P(0), P(1)]` rows.
pub(crate) fn binary_proba(p: Array1<f32>) -> Array2<f32> {
    Array2::from_shape_fn((p.len(), 2), |(i, j)| if j == 1 { p[i] } else { 1. - p[i] })
}

fn softmax_rows(mut y: Array2<f32>) -> Array2<f32> {
    for mut row in y.axis_iter_mut(Axis(0)) {
        let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }

    y
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::arch::{activations::ActFn, layers::Dense};

    fn identity_net(outputs: usize) -> Sequential {
        let mut weights = vec![0.0; 2 * outputs];
        weights[0] = 1.0;
        if outputs > 1 {
            weights[outputs + 1] = 1.0;
        }

        Sequential::new([Dense::from_raw((2, outputs), weights, vec![0.0; outputs], None).unwrap()])
            .unwrap()
    }

    #[test]
    fn single_output_network_is_probability_of_positive_label() {
        let net = Sequential::new([Dense::from_raw(
            (2, 1),
            vec![1.0, 1.0],
            vec![0.0],
            Some(ActFn::sigmoid(1.)),
        )
        .unwrap()])
        .unwrap();

        let x = array![[0.0, 0.0], [5.0, 5.0], [-5.0, -5.0]];
        let proba = net.predict_proba(x.view()).unwrap();

        assert_eq!(proba.dim(), (3, 2));
        assert_eq!(proba.row(0), array![0.5, 0.5]);
        for row in proba.axis_iter(Axis(0)) {
            assert!((row.sum() - 1.0).abs() < 1e-6);
        }

        // A tie goes to the negative label.
        assert_eq!(net.predict(x.view()).unwrap(), array![0, 1, 0]);
    }

    #[test]
    fn single_output_is_clamped() {
        let net = identity_net(1);
        let proba = net.predict_proba(array![[3.0, 0.0], [-2.0, 0.0]].view()).unwrap();
        assert_eq!(proba, array![[0.0, 1.0], [1.0, 0.0]]);
    }

    #[test]
    fn two_output_network_is_softmaxed() {
        let net = identity_net(2);
        let proba = net.predict_proba(array![[0.0, 0.0], [0.0, 2.0]].view()).unwrap();

        assert_eq!(proba.row(0), array![0.5, 0.5]);
        assert!((proba[[1, 1]] - 0.880_797).abs() < 1e-5);
        assert!((proba.row(1).sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn wider_outputs_are_not_binary() {
        let net = identity_net(3);
        let err = net.predict_proba(array![[0.0, 0.0]].view()).unwrap_err();
        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                what: "network outputs",
                got: 3,
                ..
            }
        ));
    }

    struct OneColumn;

    impl Classifier for OneColumn {
        fn n_features(&self) -> usize {
            2
        }

        fn predict_proba(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
            Ok(Array2::zeros((x.nrows(), 1)))
        }
    }

    #[test]
    fn predict_rejects_non_binary_probabilities() {
        let err = OneColumn.predict(array![[1.0, 2.0]].view()).unwrap_err();
        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                what: "probabilities",
                got: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn rejects_bad_inputs() {
        let net = identity_net(1);

        let err = net.predict_proba(array![[1.0, 2.0, 3.0]].view()).unwrap_err();
        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                what: "input features",
                got: 3,
                expected: 2
            }
        ));

        let err = net.predict(array![[1.0, f32::NAN]].view()).unwrap_err();
        assert!(matches!(err, MlErr::NonFiniteInput { row: 0, col: 1 }));
    }
}
