use crate::{CostMatrix, Error, Result, utils::format_cost};

/// A closed tour: `route[0] == route[n] == start`, every other index exactly once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
    pub route: Vec<usize>,
    pub distance: f64,
}

impl Tour {
    pub fn new(route: Vec<usize>, distance: f64) -> Self {
        Self { route, distance }
    }

    /// Checks the tour shape against a problem of `n` points starting at `start`.
    pub fn validate(&self, n: usize, start: usize) -> Result<()> {
        if self.route.len() != n + 1 {
            return Err(Error::other(format!(
                "tour has {} stops, expected {}",
                self.route.len(),
                n + 1
            )));
        }
        if self.route.first() != Some(&start) || self.route.last() != Some(&start) {
            return Err(Error::other(format!(
                "tour must start and end at {start}: {:?}",
                self.route
            )));
        }

        let mut seen = vec![false; n];
        for &idx in &self.route[..n] {
            if idx >= n || seen[idx] {
                return Err(Error::other(format!(
                    "tour visits {idx} twice or out of range: {:?}",
                    self.route
                )));
            }
            seen[idx] = true;
        }
        Ok(())
    }

    /// Edge statistics along the route. See [`route_metrics`].
    pub fn metrics(&self, matrix: &CostMatrix, threshold_factor: f64) -> TourMetrics {
        route_metrics(&self.route, matrix, threshold_factor)
    }
}

/// Spikes are edges longer than `average * threshold_factor`.
pub fn route_metrics(route: &[usize], matrix: &CostMatrix, threshold_factor: f64) -> TourMetrics {
    let edges = route.len().saturating_sub(1);

    if edges == 0 {
        log::info!("metrics: no edges so there's nothing to report");
        return TourMetrics::default();
    }

    let distances: Vec<f64> = route.windows(2).map(|w| matrix.cost(w[0], w[1])).collect();
    let total: f64 = distances.iter().sum();
    let average = total / edges as f64;
    let threshold = average * threshold_factor;
    let outliers = distances.iter().filter(|d| **d > threshold).count();
    let longest = distances.iter().copied().fold(0.0_f64, f64::max);

    log::info!(
        "metrics: edges={edges} total={} longest={} avg={} spike_threshold={} spikes={outliers}",
        format_cost(total),
        format_cost(longest),
        format_cost(average),
        format_cost(threshold),
    );

    TourMetrics {
        longest,
        outliers,
        total,
        average,
        threshold,
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub longest: f64,
    pub outliers: usize,
    pub total: f64,
    pub average: f64,
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::{Tour, TourMetrics};
    use crate::CostMatrix;

    fn line_matrix() -> CostMatrix {
        // points on a line at 0, 1, 2, 12
        let xs = [0.0_f64, 1.0, 2.0, 12.0];
        CostMatrix::new(
            xs.iter()
                .map(|a| xs.iter().map(|b| (a - b).abs()).collect())
                .collect(),
        )
        .expect("valid matrix")
    }

    #[test]
    fn validate_accepts_closed_permutation() {
        let tour = Tour::new(vec![2, 0, 1, 3, 2], 0.0);
        tour.validate(4, 2).expect("valid tour");
    }

    #[test]
    fn validate_rejects_wrong_length_or_endpoints() {
        assert!(Tour::new(vec![0, 1, 0], 0.0).validate(3, 0).is_err());
        assert!(Tour::new(vec![0, 1, 2, 1], 0.0).validate(3, 0).is_err());
        assert!(Tour::new(vec![1, 0, 2, 1], 0.0).validate(3, 0).is_err());
    }

    #[test]
    fn validate_rejects_repeats() {
        let err = Tour::new(vec![0, 1, 1, 0], 0.0)
            .validate(3, 0)
            .expect_err("repeat should fail");
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn single_point_tour_is_valid() {
        Tour::new(vec![0, 0], 0.0).validate(1, 0).expect("valid");
    }

    #[test]
    fn metrics_report_longest_average_and_spikes() {
        let m = line_matrix();
        let tour = Tour::new(vec![0, 1, 2, 3, 0], 24.0);
        let metrics = tour.metrics(&m, 1.5);
        assert_eq!(metrics.total, 24.0);
        assert_eq!(metrics.longest, 12.0);
        assert_eq!(metrics.average, 6.0);
        assert_eq!(metrics.threshold, 9.0);
        assert_eq!(metrics.outliers, 2);
    }

    #[test]
    fn metrics_for_empty_route_are_default() {
        let m = line_matrix();
        assert_eq!(Tour::default().metrics(&m, 2.0), TourMetrics::default());
    }
}
