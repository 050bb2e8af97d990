const ARMIJO: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;
// First step is capped at this share of the interval width.
const INITIAL_RADIUS_FRACTION: f64 = 1.0 / 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedMinimizer {
    lower: f64,
    upper: f64,
    max_iterations: usize,
    x_tolerance: f64,
    f_tolerance: f64,
    probe_step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub x: f64,
    pub value: f64,
    pub converged: bool,
    pub iterations: usize,
    pub evaluations: usize,
}

impl BoundedMinimizer {
    /// Projected quasi-Newton search on `[lower, upper]`; assumes `lower < upper`.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            max_iterations: 100,
            x_tolerance: 1e-8,
            f_tolerance: 1e-9,
            probe_step: 1e-6,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerances(mut self, x_tolerance: f64, f_tolerance: f64) -> Self {
        self.x_tolerance = x_tolerance;
        self.f_tolerance = f_tolerance;
        self
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn minimize<F>(&self, mut objective: F, start: f64) -> Minimum
    where
        F: FnMut(f64) -> f64,
    {
        let mut evaluations = 0;
        let mut eval = |x: f64| {
            evaluations += 1;
            objective(x)
        };

        let mut x = self.project(start);
        let mut fx = eval(x);
        let mut iterations = 0;
        let mut converged = false;
        let width = self.upper - self.lower;
        let mut radius = width * INITIAL_RADIUS_FRACTION;

        while fx.is_finite() && iterations < self.max_iterations {
            iterations += 1;

            let (slope, curvature) = self.probe(&mut eval, x, fx);
            if !slope.is_finite() {
                break;
            }
            if self.is_stationary(x, slope) {
                converged = true;
                break;
            }

            // Capped at the radius; the radius doubles after each full-length step.
            let newton = if curvature > 0.0 && curvature.is_finite() {
                -slope / curvature
            } else {
                -slope.signum() * radius
            };
            let mut delta = newton.clamp(-radius, radius);
            let mut full_length = delta.abs() >= radius;

            let mut accepted = None;
            for _ in 0..MAX_BACKTRACKS {
                let trial = self.project(x + delta);
                if (trial - x).abs() < self.x_tolerance {
                    break;
                }
                let f_trial = eval(trial);
                if f_trial.is_finite() && f_trial <= fx - ARMIJO * (slope * (trial - x)).abs() {
                    accepted = Some((trial, f_trial));
                    break;
                }
                delta *= 0.5;
                full_length = false;
            }

            match accepted {
                Some((trial, f_trial)) => {
                    let moved = (trial - x).abs();
                    let improved = fx - f_trial;
                    x = trial;
                    fx = f_trial;
                    if full_length {
                        radius = (radius * 2.0).min(width);
                    }
                    if moved < self.x_tolerance || improved < self.f_tolerance * (1.0 + fx.abs()) {
                        converged = true;
                        break;
                    }
                }
                None => {
                    // No descent left at the probe resolution.
                    converged = true;
                    break;
                }
            }
        }

        Minimum {
            x,
            value: fx,
            converged,
            iterations,
            evaluations,
        }
    }

    fn project(&self, x: f64) -> f64 {
        x.clamp(self.lower, self.upper)
    }

    fn is_stationary(&self, x: f64, slope: f64) -> bool {
        slope == 0.0
            || (x <= self.lower && slope > 0.0)
            || (x >= self.upper && slope < 0.0)
    }

    fn probe<F>(&self, eval: &mut F, x: f64, fx: f64) -> (f64, f64)
    where
        F: FnMut(f64) -> f64,
    {
        let below = self.project(x - self.probe_step);
        let above = self.project(x + self.probe_step);
        let f_below = if below < x { eval(below) } else { fx };
        let f_above = if above > x { eval(above) } else { fx };

        let slope = (f_above - f_below) / (above - below);
        let curvature = if below < x && x < above {
            2.0 * ((f_above - fx) / (above - x) - (fx - f_below) / (x - below)) / (above - below)
        } else {
            0.0
        };

        (slope, curvature)
    }
}
