//! Real-coefficient polynomials and their real roots.
//!
//! [`Polynomial`] provides dense arithmetic with an FFT product for large
//! operands. [`Solver`] counts, isolates and refines real roots with Sturm
//! chains, and finds intersections of two polynomials.

pub mod error;
pub mod solver;
pub mod structures;
pub mod utils;

pub use error::{Error, Result};

pub use solver::{solve_newton_raphson, Refinement, Solver, SolverConfig, SolverStats};
pub use structures::fft;
pub use structures::interval::{Interval, Point};
pub use structures::poly::{PolyId, Polynomial};
pub use structures::sturm::SturmChain;
pub use utils::{approx_eq, sign};
