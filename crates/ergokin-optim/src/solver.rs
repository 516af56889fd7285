//! Bound-projected gradient descent with finite-difference gradients.
//!
//! Default [`BoundedMinimizer`] used when no external solver is wired in.
//! Gradients are estimated by forward differences with the caller's `eps`
//! step, switching to backward differences at the upper bound; steps are
//! projected back onto the bounds box after each update.

use ergokin_core::config::SolverConfig;
use ergokin_core::traits::{BoundedMinimizer, MinimizeOutcome};

/// Bounded local minimizer: steepest descent with projection and
/// backtracking line search.
pub struct ProjectedGradientSolver {
    config: SolverConfig,
}

impl ProjectedGradientSolver {
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl Default for ProjectedGradientSolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn project(x: &mut [f64], bounds: &[(f64, f64)]) {
    for (v, &(low, high)) in x.iter_mut().zip(bounds) {
        *v = v.clamp(low, high);
    }
}

impl BoundedMinimizer for ProjectedGradientSolver {
    fn minimize<F: Fn(&[f64]) -> f64>(
        &self,
        objective: F,
        x0: &[f64],
        bounds: &[(f64, f64)],
        eps: f64,
    ) -> MinimizeOutcome {
        let mut x = x0.to_vec();
        project(&mut x, bounds);
        let mut fx = objective(&x);
        let n = x.len();
        let mut grad = vec![0.0; n];

        for iteration in 0..self.config.max_iterations {
            for i in 0..n {
                let (low, high) = bounds[i];
                let xi = x[i];
                if xi + eps <= high {
                    x[i] = xi + eps;
                    grad[i] = (objective(&x) - fx) / eps;
                } else if xi - eps >= low {
                    x[i] = xi - eps;
                    grad[i] = (fx - objective(&x)) / eps;
                } else {
                    // Interval narrower than the step; treat as flat.
                    grad[i] = 0.0;
                }
                x[i] = xi;
            }

            let grad_norm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
            if grad_norm < self.config.gradient_tolerance {
                return MinimizeOutcome {
                    x,
                    converged: true,
                    iterations: iteration,
                    cost: fx,
                };
            }

            // Backtracking line search along the projected descent direction.
            let mut alpha = 1.0;
            let mut improved = false;
            while alpha > 1e-12 {
                let mut candidate: Vec<f64> = x
                    .iter()
                    .zip(&grad)
                    .map(|(xi, gi)| xi - alpha * gi)
                    .collect();
                project(&mut candidate, bounds);
                let fc = objective(&candidate);
                if fc < fx {
                    let drop = fx - fc;
                    x = candidate;
                    fx = fc;
                    improved = true;
                    if drop < self.config.cost_tolerance {
                        return MinimizeOutcome {
                            x,
                            converged: true,
                            iterations: iteration + 1,
                            cost: fx,
                        };
                    }
                    break;
                }
                alpha *= 0.5;
            }

            if !improved {
                // No descent step at any scale: locally optimal up to eps.
                return MinimizeOutcome {
                    x,
                    converged: true,
                    iterations: iteration,
                    cost: fx,
                };
            }
        }

        MinimizeOutcome {
            x,
            converged: false,
            iterations: self.config.max_iterations,
            cost: fx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WIDE: (f64, f64) = (-10.0, 10.0);

    #[test]
    fn converges_on_bounded_quadratic() {
        let solver = ProjectedGradientSolver::with_defaults();
        let objective = |q: &[f64]| (q[0] - 1.5).powi(2) + (q[1] + 0.5).powi(2);
        let result = solver.minimize(objective, &[0.0, 0.0], &[WIDE, WIDE], 1e-6);
        assert!(result.converged);
        assert_relative_eq!(result.x[0], 1.5, epsilon = 1e-3);
        assert_relative_eq!(result.x[1], -0.5, epsilon = 1e-3);
        assert!(result.cost < 1e-5);
    }

    #[test]
    fn minimum_outside_bounds_lands_on_boundary() {
        let solver = ProjectedGradientSolver::with_defaults();
        let objective = |q: &[f64]| (q[0] - 5.0).powi(2);
        let result = solver.minimize(objective, &[0.0], &[(-1.0, 1.0)], 1e-6);
        assert!(result.converged);
        assert_relative_eq!(result.x[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn start_outside_bounds_is_projected() {
        let solver = ProjectedGradientSolver::with_defaults();
        let objective = |q: &[f64]| q[0] * q[0];
        let result = solver.minimize(objective, &[7.0], &[(-1.0, 2.0)], 1e-6);
        assert!(result.x[0] >= -1.0 && result.x[0] <= 2.0);
        assert_relative_eq!(result.x[0], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn flat_objective_converges_immediately() {
        let solver = ProjectedGradientSolver::with_defaults();
        let result = solver.minimize(|_| 3.0, &[0.2, -0.4], &[WIDE, WIDE], 1e-6);
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.cost, 3.0);
        assert_eq!(result.x, vec![0.2, -0.4]);
    }

    #[test]
    fn iteration_starved_run_reports_non_convergence() {
        let solver = ProjectedGradientSolver::new(SolverConfig {
            max_iterations: 2,
            cost_tolerance: 1e-300,
            gradient_tolerance: 1e-300,
        });
        // Constant slope: every iteration improves, none satisfies the
        // (unreachably tight) tolerances.
        let objective = |q: &[f64]| -q[0];
        let result = solver.minimize(objective, &[0.0], &[(-1e6, 1e6)], 1e-6);
        assert!(!result.converged);
        assert_eq!(result.iterations, 2);
    }
}
