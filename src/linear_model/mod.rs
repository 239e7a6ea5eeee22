//! Linear classifiers.
//!
//! This module provides:
//! - `LogisticRegression`: L2-regularized logistic regression, binary, one-vs-rest or multinomial
//! - `Perceptron`: the classic mistake-driven linear classifier
//!
//! # Examples
//!
//! ## Logistic Regression
//! ```rust
//! use linclass::{LogisticRegression, MultiClass};
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0], [4.0]];
//! let y = array![0, 0, 1, 1];
//!
//! let mut model = LogisticRegression::new().c(1e5).max_iter(10_000);
//! model.fit(&x, &y).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! let probabilities = model.predict_proba(&x).unwrap();
//! assert_eq!(probabilities.ncols(), 2);
//!
//! let mut softmax = LogisticRegression::new().multi_class(MultiClass::Multinomial);
//! softmax.fit(&x, &y).unwrap();
//! ```
//!
//! ## Perceptron
//! ```rust
//! use linclass::Perceptron;
//! use ndarray::array;
//!
//! let x = array![[1.0, 1.0], [2.0, 1.0], [6.0, 5.0], [7.0, 6.0]];
//! let y = array![0, 0, 1, 1];
//!
//! let mut model = Perceptron::new();
//! model.fit(&x, &y).unwrap();
//! let accuracy = model.score(&x, &y).unwrap();
//! ```

mod logistic_regression;
mod perceptron;

pub use logistic_regression::{LogisticRegression, MultiClass, Solver};
pub use perceptron::Perceptron;

pub(crate) use logistic_regression::{sigmoid, softmax_rows};
