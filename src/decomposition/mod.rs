//! Supervised dimensionality reduction.
//!
//! - `LDA`: Fisher's Linear Discriminant, which doubles as a Gaussian classifier
//!   with a shared covariance matrix
//!
//! # Examples
//!
//! ```rust
//! use linclass::LDA;
//! use ndarray::array;
//!
//! let x = array![
//!     [1.0, 2.0],
//!     [2.0, 1.5],
//!     [1.5, 3.0],
//!     [8.0, 9.0],
//!     [9.0, 8.5],
//!     [8.5, 10.0]
//! ];
//! let y = array![0, 0, 0, 1, 1, 1];
//!
//! let mut lda = LDA::new().n_components(1);
//! let projected = lda.fit_transform(&x, &y).unwrap();
//! assert_eq!(projected.ncols(), 1);
//!
//! // Make predictions on new data
//! let predictions = lda.predict(&x).unwrap();
//! ```

mod lda;

pub use lda::LDA;
