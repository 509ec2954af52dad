use std::fmt;

use rayon::prelude::*;
use tsp_route_derive::CliValue;

use crate::{
    CostMatrix, Error, Result, SolverOptions,
    algo::{exact::solve_exact, heuristic::solve_nearest_neighbor},
    constants::{DEFAULT_EXACT_THRESHOLD, MAX_EXACT_POINTS},
    tour::{TourMetrics, route_metrics},
    utils::format_cost,
};

/// Which solver the dispatcher may use.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, CliValue)]
#[cli_value(option = "algorithm")]
pub enum Strategy {
    /// Exact up to the threshold, heuristic beyond.
    #[default]
    Auto,
    #[cli(alias = "held-karp")]
    Exact,
    #[cli(alias = "nearest-neighbor")]
    Heuristic,
}

/// The solver that actually produced a [`Solution`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Algorithm {
    Exact,
    Heuristic,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// `n + 1` indices, starting and ending at the start index.
    pub route: Vec<usize>,
    pub distance: f64,
    pub algorithm: Algorithm,
}

impl Solution {
    pub fn metrics(&self, matrix: &CostMatrix, threshold_factor: f64) -> TourMetrics {
        route_metrics(&self.route, matrix, threshold_factor)
    }
}

/// One independent problem for [`Solver::solve_many`].
#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
    pub matrix: CostMatrix,
    pub start: usize,
}

impl Problem {
    pub fn new(matrix: CostMatrix, start: usize) -> Self {
        Self { matrix, start }
    }
}

/// Picks exact or heuristic per problem. Holds only configuration, so one
/// solver can be shared across threads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Solver {
    exact_threshold: usize,
    strategy: Strategy,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            strategy: Strategy::Auto,
        }
    }
}

impl Solver {
    pub fn new(exact_threshold: usize, strategy: Strategy) -> Result<Self> {
        validate_exact_threshold(exact_threshold)?;
        Ok(Self {
            exact_threshold,
            strategy,
        })
    }

    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        Self::new(options.exact_threshold, options.algorithm)
    }

    pub fn exact_threshold(&self) -> usize {
        self.exact_threshold
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Solver used for a problem of `n` points.
    pub fn select(&self, n: usize) -> Algorithm {
        match self.strategy {
            Strategy::Exact => Algorithm::Exact,
            Strategy::Heuristic => Algorithm::Heuristic,
            Strategy::Auto if n <= self.exact_threshold => Algorithm::Exact,
            Strategy::Auto => Algorithm::Heuristic,
        }
    }

    #[tsp_route_derive::timer()]
    pub fn solve(&self, matrix: &CostMatrix, start: usize) -> Result<Solution> {
        let n = matrix.n();
        matrix.check_start(start)?;

        let algorithm = self.select(n);
        log::info!(
            "solve: n={n} start={start} algorithm={algorithm} strategy={} exact_threshold={}",
            self.strategy,
            self.exact_threshold
        );

        let tour = match algorithm {
            Algorithm::Exact => solve_exact(matrix, start)?,
            Algorithm::Heuristic => solve_nearest_neighbor(matrix, start)?,
        };

        log::info!(
            "solve: done n={n} algorithm={algorithm} distance={}",
            format_cost(tour.distance)
        );

        Ok(Solution {
            route: tour.route,
            distance: tour.distance,
            algorithm,
        })
    }

    /// Solves every problem on the rayon pool. Results keep input order and
    /// one failure does not affect the others.
    #[tsp_route_derive::timer()]
    pub fn solve_many(&self, problems: &[Problem]) -> Vec<Result<Solution>> {
        log::info!("solve_many: problems={}", problems.len());
        problems
            .par_iter()
            .map(|problem| self.solve(&problem.matrix, problem.start))
            .collect()
    }
}

pub(crate) fn validate_exact_threshold(exact_threshold: usize) -> Result<()> {
    if exact_threshold > MAX_EXACT_POINTS {
        return Err(Error::invalid_input(format!(
            "exact_threshold must be <= {MAX_EXACT_POINTS}, got {exact_threshold}"
        )));
    }
    Ok(())
}

/// Solves with the default threshold and automatic strategy.
pub fn solve(matrix: &CostMatrix, start: usize) -> Result<Solution> {
    Solver::default().solve(matrix, start)
}

/// Validates raw rows into a [`CostMatrix`], then [`solve`]s.
pub fn solve_rows(rows: Vec<Vec<f64>>, start: usize) -> Result<Solution> {
    let matrix = CostMatrix::new(rows)?;
    solve(&matrix, start)
}
