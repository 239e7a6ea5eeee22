//! Limited-memory BFGS minimizer with Armijo backtracking, used to fit the
//! smooth convex objectives of logistic regression.

use std::collections::VecDeque;

use tracing::trace;

use crate::Vector;
use crate::error::{ClassifyError, Result};

const ARMIJO_C1: f64 = 1e-4;
const BACKTRACK_FACTOR: f64 = 0.5;
const MAX_BACKTRACKS: usize = 60;

#[derive(Clone, Debug)]
pub struct Lbfgs {
    pub max_iter: usize,
    /// Number of correction pairs kept for the inverse-Hessian estimate.
    pub history: usize,
    /// Stop once the largest absolute gradient component falls below this.
    pub gtol: f64,
    /// Stop once the relative decrease of the objective falls below this.
    pub ftol: f64,
}

#[derive(Clone, Debug)]
pub struct Minimum {
    pub x: Vector,
    pub value: f64,
    pub n_iter: usize,
    pub converged: bool,
}

impl Lbfgs {
    pub fn new(max_iter: usize, gtol: f64) -> Self {
        Self {
            max_iter,
            history: 10,
            gtol,
            ftol: 64.0 * f64::EPSILON,
        }
    }

    /// Minimizes `objective`, which returns the value and gradient at a point.
    pub fn minimize<F>(&self, x0: Vector, mut objective: F) -> Result<Minimum>
    where
        F: FnMut(&Vector) -> (f64, Vector),
    {
        let mut x = x0;
        let (mut fx, mut grad) = objective(&x);
        if !fx.is_finite() {
            return Err(ClassifyError::NoConvergence(
                "objective is not finite at the starting point".to_string(),
            ));
        }

        let mut s_history: VecDeque<Vector> = VecDeque::with_capacity(self.history);
        let mut y_history: VecDeque<Vector> = VecDeque::with_capacity(self.history);

        for iter in 0..self.max_iter {
            if max_abs(&grad) <= self.gtol {
                return Ok(Minimum { x, value: fx, n_iter: iter, converged: true });
            }

            let mut direction = two_loop_direction(&grad, &s_history, &y_history);
            let mut slope = grad.dot(&direction);
            if slope >= 0.0 {
                s_history.clear();
                y_history.clear();
                direction = -&grad;
                slope = grad.dot(&direction);
            }

            let mut step = if s_history.is_empty() {
                (1.0 / l2_norm(&grad)).min(1.0)
            } else {
                1.0
            };

            let mut accepted = None;
            for _ in 0..MAX_BACKTRACKS {
                let candidate = &x + &(&direction * step);
                let (f_new, g_new) = objective(&candidate);
                if f_new.is_finite() && f_new <= fx + ARMIJO_C1 * step * slope {
                    accepted = Some((candidate, f_new, g_new));
                    break;
                }
                step *= BACKTRACK_FACTOR;
            }

            let Some((x_new, f_new, g_new)) = accepted else {
                trace!(iter, value = fx, "line search made no progress");
                return Ok(Minimum { x, value: fx, n_iter: iter, converged: false });
            };

            let s = &x_new - &x;
            let y = &g_new - &grad;
            if s.dot(&y) > 1e-10 * y.dot(&y).max(f64::MIN_POSITIVE) {
                if s_history.len() == self.history {
                    s_history.pop_front();
                    y_history.pop_front();
                }
                s_history.push_back(s);
                y_history.push_back(y);
            }

            let decrease = (fx - f_new) / fx.abs().max(f_new.abs()).max(1.0);
            x = x_new;
            fx = f_new;
            grad = g_new;

            if decrease <= self.ftol {
                trace!(iter, value = fx, "relative decrease below ftol");
                return Ok(Minimum { x, value: fx, n_iter: iter + 1, converged: true });
            }
        }

        let converged = max_abs(&grad) <= self.gtol;
        Ok(Minimum { x, value: fx, n_iter: self.max_iter, converged })
    }
}

impl Default for Lbfgs {
    fn default() -> Self {
        Self::new(100, 1e-4)
    }
}

/// Two-loop recursion: returns `-H·grad` for the current inverse-Hessian estimate.
fn two_loop_direction(grad: &Vector, s_history: &VecDeque<Vector>, y_history: &VecDeque<Vector>) -> Vector {
    let mut q = -grad;
    if s_history.is_empty() {
        return q;
    }

    let k = s_history.len();
    let mut alpha = vec![0.0; k];
    let rho: Vec<f64> = s_history
        .iter()
        .zip(y_history.iter())
        .map(|(s, y)| 1.0 / y.dot(s))
        .collect();

    for i in (0..k).rev() {
        alpha[i] = rho[i] * s_history[i].dot(&q);
        q.scaled_add(-alpha[i], &y_history[i]);
    }

    let (s_last, y_last) = (&s_history[k - 1], &y_history[k - 1]);
    let gamma = s_last.dot(y_last) / y_last.dot(y_last);
    let mut r = q * gamma;

    for i in 0..k {
        let beta = rho[i] * y_history[i].dot(&r);
        r.scaled_add(alpha[i] - beta, &s_history[i]);
    }

    r
}

fn max_abs(v: &Vector) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

fn l2_norm(v: &Vector) -> f64 {
    v.dot(v).sqrt()
}
