use std::fmt;

use crate::{Error, Result, geo::point::GeoPoint};

/// Square table of travel costs, row-major. `cost(i, j)` is the cost of going
/// from `i` directly to `j`.
///
/// Every constructor validates: the matrix is non-empty and square, every
/// entry is finite and non-negative, and the diagonal is zero. Symmetry is not
/// required.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    n: usize,
    costs: Vec<f64>,
}

impl CostMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if let Some((row_idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(Error::invalid_matrix(format!(
                "row {row_idx} has {} entries, expected {n}",
                row.len()
            )));
        }

        Self::from_flat(n, rows.into_iter().flatten().collect())
    }

    /// `costs` is row-major with `n * n` entries.
    pub fn from_flat(n: usize, costs: Vec<f64>) -> Result<Self> {
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if costs.len() != n * n {
            return Err(Error::invalid_matrix(format!(
                "expected {} entries for {n}x{n}, got {}",
                n * n,
                costs.len()
            )));
        }

        let matrix = Self { n, costs };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Symmetric haversine matrix in kilometers.
    pub fn from_points(points: &[GeoPoint]) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyInput);
        }
        if let Some((idx, point)) = points.iter().enumerate().find(|(_, p)| !p.is_valid()) {
            return Err(Error::invalid_input(format!(
                "point {idx} has invalid lat/lng: {point}"
            )));
        }

        let n = points.len();
        let mut costs = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].haversine_km(&points[j]);
                costs[i * n + j] = d;
                costs[j * n + i] = d;
            }
        }
        Ok(Self { n, costs })
    }

    fn validate(&self) -> Result<()> {
        for i in 0..self.n {
            for j in 0..self.n {
                let c = self.cost(i, j);
                if !c.is_finite() {
                    return Err(Error::invalid_matrix(format!(
                        "cost[{i}][{j}] is not finite: {c}"
                    )));
                }
                if c < 0.0 {
                    return Err(Error::invalid_matrix(format!(
                        "cost[{i}][{j}] is negative: {c}"
                    )));
                }
                if i == j && c != 0.0 {
                    return Err(Error::invalid_matrix(format!(
                        "diagonal cost[{i}][{i}] must be 0, got {c}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of points.
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.costs[from * self.n + to]
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.costs[from * self.n..(from + 1) * self.n]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| ((i + 1)..self.n).all(|j| self.cost(i, j) == self.cost(j, i)))
    }

    pub fn check_start(&self, start: usize) -> Result<()> {
        if start >= self.n {
            return Err(Error::InvalidStartIndex { start, n: self.n });
        }
        Ok(())
    }

    /// Sum of `cost(route[k], route[k + 1])` over consecutive pairs.
    pub fn route_cost(&self, route: &[usize]) -> f64 {
        route.windows(2).map(|w| self.cost(w[0], w[1])).sum()
    }
}

impl fmt::Display for CostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.n, self.n)
    }
}
