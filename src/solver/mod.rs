//! Real root finding built on Sturm chains.
//!
//! The [`Solver`] counts roots with cached Sturm chains, isolates them into
//! half-open intervals holding exactly one root each, and refines every
//! interval with either Sturm bisection or Newton-Raphson. Degrees 1 and 2
//! are solved in closed form.
//!
//! A solver owns its chain cache and random number generator, so every
//! operation takes `&mut self`. Share one across threads behind a `Mutex`.

mod cache;
mod config;

use std::sync::Arc;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use config::{Refinement, SolverConfig};

use cache::{ChainCache, Lookup};

use crate::error::{Error, Result};
use crate::structures::interval::{Interval, Point};
use crate::structures::poly::Polynomial;
use crate::structures::sturm::SturmChain;

/// Counters describing the work a [`Solver`] has done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverStats {
    /// Chain lookups served from the cache
    pub cache_hits: usize,
    /// Chains built and inserted
    pub cache_misses: usize,
    /// Lookups whose id belonged to a different polynomial
    pub cache_collisions: usize,
    /// Number of Sturm root counts
    pub sturm_evaluations: usize,
    /// Number of bisection steps during refinement
    pub bisection_steps: usize,
    /// Isolating intervals produced
    pub intervals_generated: usize,
    /// Newton runs that ended outside their interval and were resampled
    pub newton_restarts: usize,
    /// Newton refinements that gave up and bisected
    pub newton_fallbacks: usize,
}

/// Root finder with a per-instance Sturm chain cache.
///
/// # Example
///
/// ```
/// use realroot::{Polynomial, Solver};
///
/// let mut solver = Solver::default();
/// let p = Polynomial::new(vec![0.0, -1.0, 0.0, 1.0]).unwrap(); // x^3 - x
///
/// assert_eq!(solver.count_roots_within(&p, -5.0, 5.0).unwrap(), 3);
///
/// let roots = solver.find_roots_within(&p, -5.0, 5.0).unwrap();
/// for (got, want) in roots.iter().zip([-1.0, 0.0, 1.0]) {
///     assert!((got - want).abs() < 1e-5);
/// }
/// ```
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    cache: ChainCache,
    rng: StdRng,
    stats: SolverStats,
}

impl Default for Solver {
    fn default() -> Self {
        Self::with_valid_config(SolverConfig::default())
    }
}

impl Solver {
    /// Create a solver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the configuration fails
    /// [`SolverConfig::validate`].
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SolverConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            cache: ChainCache::default(),
            rng,
            stats: SolverStats::default(),
        }
    }

    /// The configuration this solver was built with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Counters accumulated since construction or the last reset.
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Zero every counter in [`stats`](Self::stats).
    pub fn reset_stats(&mut self) {
        self.stats = SolverStats::default();
    }

    /// Number of chains currently cached.
    pub fn cached_chains(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached Sturm chains.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// The Sturm chain of `p`, built on first use and cached by content.
    pub fn sturm_chain(&mut self, p: &Polynomial) -> Arc<SturmChain> {
        let (chain, lookup) = self.cache.get_or_build(p);
        match lookup {
            Lookup::Hit => {
                self.stats.cache_hits += 1;
                debug!("reusing cached Sturm chain for {}", p);
            }
            Lookup::Miss => {
                self.stats.cache_misses += 1;
                debug!("built Sturm chain of length {} for {}", chain.len(), p);
            }
            Lookup::Collision => self.stats.cache_collisions += 1,
        }
        chain
    }

    /// Number of distinct real roots of `p` in `(a, b]`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInterval`] if `a > b` or a bound is not finite.
    /// - [`Error::InfiniteSolutions`] if `p` is the zero polynomial.
    pub fn count_roots_within(&mut self, p: &Polynomial, a: f64, b: f64) -> Result<usize> {
        let interval = Interval::new(a, b)?;
        if p.is_zero() {
            return Err(Error::InfiniteSolutions);
        }
        let chain = self.sturm_chain(p);
        Ok(self.count_with(&chain, interval))
    }

    /// Sturm count with negative noise clamped to zero.
    fn count_with(&mut self, chain: &SturmChain, interval: Interval) -> usize {
        self.stats.sturm_evaluations += 1;
        let raw = chain.variation_difference(interval.left(), interval.right());
        if raw < 0 {
            debug!(
                "clamped negative Sturm count {} on ({}, {}]",
                raw,
                interval.left(),
                interval.right()
            );
            return 0;
        }
        raw as usize
    }

    /// Split `(a, b]` into subintervals holding one root of `p` each.
    ///
    /// Intervals are returned left to right. An interval still holding
    /// several roots when it can no longer be halved in floating point is
    /// returned as-is with a warning.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInterval`] if `a > b` or a bound is not finite.
    /// - [`Error::InfiniteSolutions`] if `p` is the zero polynomial.
    pub fn isolate_roots_within(
        &mut self,
        p: &Polynomial,
        a: f64,
        b: f64,
    ) -> Result<Vec<Interval>> {
        let full = Interval::new(a, b)?;
        if p.is_zero() {
            return Err(Error::InfiniteSolutions);
        }

        let chain = self.sturm_chain(p);
        let mut isolated = Vec::new();
        let mut worklist = vec![full];

        while let Some(interval) = worklist.pop() {
            match self.count_with(&chain, interval) {
                0 => {}
                1 => isolated.push(interval),
                count => match interval.split() {
                    Some((left, right)) => {
                        // Right half first so the left half is popped next.
                        worklist.push(right);
                        worklist.push(left);
                    }
                    None => {
                        warn!(
                            "cannot split ({}, {}] holding {} roots of {}",
                            interval.left(),
                            interval.right(),
                            count,
                            p
                        );
                        isolated.push(interval);
                    }
                },
            }
        }

        self.stats.intervals_generated += isolated.len();
        Ok(isolated)
    }

    /// Shrink a single-root interval by Sturm bisection.
    ///
    /// Stops once the bracket is no wider than `bisect_precision` (or cannot
    /// be halved further) and returns its midpoint.
    pub fn refine_bisect(&mut self, p: &Polynomial, interval: Interval) -> f64 {
        let chain = self.sturm_chain(p);
        let mut current = interval;

        while current.width() > self.config.bisect_precision {
            let Some((left, right)) = current.split() else {
                break;
            };
            self.stats.bisection_steps += 1;
            current = if self.count_with(&chain, left) == 1 {
                left
            } else {
                right
            };
        }

        current.midpoint()
    }

    /// Refine a single-root interval with Newton-Raphson.
    ///
    /// Starting points are drawn uniformly from the interval. A run counts
    /// only if it ends inside the interval with its final step no larger
    /// than `bisect_precision`. Otherwise it is retried from a fresh point,
    /// at most `newton_max_restarts` times, after which the interval is
    /// bisected.
    pub fn refine_newton(&mut self, p: &Polynomial, interval: Interval) -> f64 {
        let dp = p.derivative();
        let mut restarts = 0;

        loop {
            // t is in [0, 1), so the start lies in (left, right].
            let t = self.rng.gen::<f64>();
            let start = t * interval.left() + (1.0 - t) * interval.right();
            let run = newton_steps(
                p,
                &dp,
                start,
                self.config.newton_iterations,
                self.config.bisect_precision,
            );
            if run.converged && interval.contains(run.root) {
                return run.root;
            }

            if restarts == self.config.newton_max_restarts {
                break;
            }
            restarts += 1;
            self.stats.newton_restarts += 1;
        }

        debug!(
            "Newton failed in ({}, {}] {} times for {}, falling back to bisection",
            interval.left(),
            interval.right(),
            restarts + 1,
            p
        );
        self.stats.newton_fallbacks += 1;
        self.refine_bisect(p, interval)
    }

    fn refine(&mut self, p: &Polynomial, interval: Interval) -> f64 {
        match self.config.refinement {
            Refinement::Bisection => self.refine_bisect(p, interval),
            Refinement::Newton => self.refine_newton(p, interval),
        }
    }

    /// All distinct real roots of `p` in `(a, b]`, ascending.
    ///
    /// Degrees 1 and 2 are solved in closed form; higher degrees are
    /// isolated and refined with the configured [`Refinement`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInterval`] if `a > b` or a bound is not finite.
    /// - [`Error::InfiniteSolutions`] if `p` is the zero polynomial.
    pub fn find_roots_within(&mut self, p: &Polynomial, a: f64, b: f64) -> Result<Vec<f64>> {
        let interval = Interval::new(a, b)?;
        if p.is_zero() {
            return Err(Error::InfiniteSolutions);
        }

        let mut roots = match p.degree() {
            0 => Vec::new(),
            1 => vec![-p.coeff(0) / p.coeff(1)],
            2 => solve_quadratic(p.coeff(2), p.coeff(1), p.coeff(0)),
            _ => {
                let isolated = self.isolate_roots_within(p, a, b)?;
                isolated.into_iter().map(|iv| self.refine(p, iv)).collect()
            }
        };

        roots.retain(|&r| interval.contains(r));
        roots.sort_by(f64::total_cmp);
        Ok(roots)
    }

    /// Leftmost real root of `p` in `(a, b]`.
    ///
    /// # Errors
    ///
    /// As [`find_roots_within`](Self::find_roots_within), plus
    /// [`Error::NoSolutionInRange`] when there is no root.
    pub fn find_root_within(&mut self, p: &Polynomial, a: f64, b: f64) -> Result<f64> {
        self.find_roots_within(p, a, b)?
            .first()
            .copied()
            .ok_or(Error::NoSolutionInRange { left: a, right: b })
    }

    /// All distinct real roots of `p`, searched within Cauchy's bound.
    ///
    /// # Errors
    ///
    /// - [`Error::InfiniteSolutions`] if `p` is the zero polynomial.
    /// - [`Error::InvalidInput`] for any other constant.
    pub fn find_roots(&mut self, p: &Polynomial) -> Result<Vec<f64>> {
        if p.is_zero() {
            return Err(Error::InfiniteSolutions);
        }
        let bound = p.cauchy_bound()?;
        self.find_roots_within(p, -bound, bound)
    }

    /// Points where `p` and `q` meet with `x` in `(a, b]`, ascending in `x`.
    ///
    /// # Errors
    ///
    /// Same as [`find_roots_within`](Self::find_roots_within) applied to
    /// `p - q`; identical polynomials give [`Error::InfiniteSolutions`].
    pub fn find_intersections_within(
        &mut self,
        p: &Polynomial,
        q: &Polynomial,
        a: f64,
        b: f64,
    ) -> Result<Vec<Point>> {
        let diff = p - q;
        let roots = self.find_roots_within(&diff, a, b)?;
        Ok(roots.into_iter().map(|x| Point::new(x, p.eval(x))).collect())
    }

    /// Leftmost intersection of `p` and `q` with `x` in `(a, b]`.
    ///
    /// # Errors
    ///
    /// As [`find_intersections_within`](Self::find_intersections_within),
    /// plus [`Error::NoSolutionInRange`] when the curves do not meet.
    pub fn find_intersection_within(
        &mut self,
        p: &Polynomial,
        q: &Polynomial,
        a: f64,
        b: f64,
    ) -> Result<Point> {
        self.find_intersections_within(p, q, a, b)?
            .first()
            .copied()
            .ok_or(Error::NoSolutionInRange { left: a, right: b })
    }

    /// All intersections of `p` and `q`.
    ///
    /// # Errors
    ///
    /// Same as [`find_roots`](Self::find_roots) applied to `p - q`.
    pub fn find_intersections(&mut self, p: &Polynomial, q: &Polynomial) -> Result<Vec<Point>> {
        let diff = p - q;
        let roots = self.find_roots(&diff)?;
        Ok(roots.into_iter().map(|x| Point::new(x, p.eval(x))).collect())
    }
}

/// Run `iterations` Newton steps on `p` from `guess`.
///
/// Stops early when the derivative vanishes or the step no longer moves
/// the estimate. The result may lie anywhere, or be NaN.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `iterations` is zero.
///
/// # Example
///
/// ```
/// use realroot::{solve_newton_raphson, Polynomial};
///
/// let p = Polynomial::new(vec![-2.0, 0.0, 1.0]).unwrap(); // x^2 - 2
/// let root = solve_newton_raphson(&p, 1.0, 50).unwrap();
/// assert!((root - 2f64.sqrt()).abs() < 1e-12);
/// ```
pub fn solve_newton_raphson(p: &Polynomial, guess: f64, iterations: usize) -> Result<f64> {
    if iterations == 0 {
        return Err(Error::invalid_input("Newton iteration count must be at least 1"));
    }
    Ok(newton_steps(p, &p.derivative(), guess, iterations, 0.0).root)
}

struct NewtonRun {
    root: f64,
    /// The final step was within tolerance, or `root` is an exact zero.
    converged: bool,
}

fn newton_steps(
    p: &Polynomial,
    dp: &Polynomial,
    guess: f64,
    iterations: usize,
    tolerance: f64,
) -> NewtonRun {
    let mut x = guess;
    let mut last_step = f64::INFINITY;
    for _ in 0..iterations {
        let slope = dp.eval(x);
        if slope == 0.0 || !slope.is_finite() {
            return NewtonRun {
                root: x,
                converged: p.eval(x) == 0.0,
            };
        }
        let step = p.eval(x) / slope;
        if step == 0.0 {
            return NewtonRun {
                root: x,
                converged: true,
            };
        }
        x -= step;
        last_step = step;
    }
    NewtonRun {
        root: x,
        converged: last_step.abs() <= tolerance,
    }
}

/// Real roots of `a x^2 + b x + c` with `a != 0`, possibly unsorted.
///
/// Uses the cancellation-free form `q = -(b + sign(b) sqrt(d)) / 2`,
/// roots `q / a` and `c / q`.
fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    if discriminant == 0.0 {
        return vec![-b / (2.0 * a)];
    }

    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    vec![q / a, c / q]
}
