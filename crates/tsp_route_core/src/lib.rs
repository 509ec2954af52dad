//! Minimum-cost closed tours over a cost matrix.
//! Small problems are solved exactly with Held-Karp, larger ones with a
//! nearest-neighbor pass; batches run in parallel on rayon.

mod algo;
mod constants;
mod error;
mod geo;
mod io;
pub mod logging;
mod mask;
mod matrix;
mod tour;
pub mod utils;

pub(crate) use io::options;

pub use algo::dispatch::{Algorithm, Problem, Solution, Solver, Strategy, solve, solve_rows};
pub use algo::exact::solve_exact;
pub use algo::heuristic::solve_nearest_neighbor;
pub use constants::{DEFAULT_EXACT_THRESHOLD, DEFAULT_SPIKE_FACTOR, MAX_EXACT_POINTS};
pub use error::{Error, Result};
pub use geo::point::GeoPoint;
pub use io::input::SolverInput;
pub use io::options::{InputFormat, LogFormat, LogLevel, SolverOptions};
pub use io::output::{write_solution, write_solution_to};
pub use mask::VisitMask;
pub use matrix::CostMatrix;
pub use tour::{Tour, TourMetrics};
