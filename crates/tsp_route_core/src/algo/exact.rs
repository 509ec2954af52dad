//! Held-Karp subset dynamic programming.
//!
//! `best_cost(mask, pos)` is the cheapest way to leave `pos`, visit every index
//! in `mask` exactly once, and return to the start. Each memo entry also keeps
//! the next city that achieved it, so the optimal route is read back by
//! following those pointers instead of re-comparing costs.

use crate::{
    CostMatrix, Error, Result, Tour, constants::MAX_EXACT_POINTS, mask::VisitMask,
    utils::format_cost,
};

#[derive(Clone, Copy, Debug)]
struct MemoEntry {
    cost: f64,
    next: usize,
}

/// `(mask, pos) -> MemoEntry` for one solve. Masks never contain the start, so
/// the start bit is squeezed out of the key and the table holds
/// `2^(n-1) * n` slots.
struct MemoTable {
    n: usize,
    start: usize,
    entries: Vec<Option<MemoEntry>>,
    filled: usize,
}

impl MemoTable {
    fn new(n: usize, start: usize) -> Self {
        let masks = 1usize << (n - 1);
        Self {
            n,
            start,
            entries: vec![None; masks * n],
            filled: 0,
        }
    }

    fn slot(&self, mask: VisitMask, pos: usize) -> usize {
        let bits = mask.bits() as usize;
        let low = bits & ((1usize << self.start) - 1);
        let high = (bits >> (self.start + 1)) << self.start;
        (low | high) * self.n + pos
    }

    fn get(&self, mask: VisitMask, pos: usize) -> Option<MemoEntry> {
        self.entries[self.slot(mask, pos)]
    }

    fn insert(&mut self, mask: VisitMask, pos: usize, entry: MemoEntry) {
        let slot = self.slot(mask, pos);
        self.entries[slot] = Some(entry);
        self.filled += 1;
    }
}

struct HeldKarp<'a> {
    matrix: &'a CostMatrix,
    start: usize,
    memo: MemoTable,
}

impl<'a> HeldKarp<'a> {
    fn new(matrix: &'a CostMatrix, start: usize) -> Self {
        Self {
            matrix,
            start,
            memo: MemoTable::new(matrix.n(), start),
        }
    }

    fn best_cost(&mut self, mask: VisitMask, pos: usize) -> f64 {
        if mask.is_empty() {
            return self.matrix.cost(pos, self.start);
        }
        if let Some(entry) = self.memo.get(mask, pos) {
            return entry.cost;
        }

        let mut best = MemoEntry {
            cost: f64::INFINITY,
            next: usize::MAX,
        };
        // Ascending scan + strict `<` keeps the lowest index on ties.
        for city in mask {
            let cost = self.matrix.cost(pos, city) + self.best_cost(mask.without(city), city);
            if cost < best.cost {
                best = MemoEntry { cost, next: city };
            }
        }

        self.memo.insert(mask, pos, best);
        best.cost
    }

    fn reconstruct(&self) -> Result<Vec<usize>> {
        let n = self.matrix.n();
        let mut route = Vec::with_capacity(n + 1);
        route.push(self.start);

        let mut mask = VisitMask::full_except(n, self.start);
        let mut pos = self.start;
        while !mask.is_empty() {
            let entry = self.memo.get(mask, pos).ok_or_else(|| {
                Error::other(format!(
                    "exact: memo has no entry for mask={mask} pos={pos}"
                ))
            })?;
            route.push(entry.next);
            mask = mask.without(entry.next);
            pos = entry.next;
        }

        route.push(self.start);
        Ok(route)
    }
}

/// Optimal closed tour from `start` through every point.
///
/// Fails with [`Error::ExactLimitExceeded`] above [`MAX_EXACT_POINTS`].
#[tsp_route_derive::timer()]
pub fn solve_exact(matrix: &CostMatrix, start: usize) -> Result<Tour> {
    let n = matrix.n();
    matrix.check_start(start)?;
    if n > MAX_EXACT_POINTS {
        return Err(Error::ExactLimitExceeded {
            n,
            max: MAX_EXACT_POINTS,
        });
    }

    let mut held_karp = HeldKarp::new(matrix, start);
    let optimum = held_karp.best_cost(VisitMask::full_except(n, start), start);
    let route = held_karp.reconstruct()?;
    let distance = matrix.route_cost(&route);

    log::debug!(
        "exact: done n={n} start={start} cost={} memo_entries={}",
        format_cost(optimum),
        held_karp.memo.filled
    );
    debug_assert!((distance - optimum).abs() <= 1e-9 * optimum.abs().max(1.0));

    Ok(Tour::new(route, distance))
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::{MemoTable, solve_exact};
    use crate::{CostMatrix, Error, constants::MAX_EXACT_POINTS, mask::VisitMask};

    fn matrix(rows: &[&[f64]]) -> CostMatrix {
        CostMatrix::new(rows.iter().map(|r| r.to_vec()).collect()).expect("valid matrix")
    }

    fn random_matrix(rng: &mut StdRng, n: usize, symmetric: bool) -> CostMatrix {
        let mut rows = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j || (symmetric && j < i) {
                    continue;
                }
                let c = rng.random_range(1..100u32) as f64;
                rows[i][j] = c;
                if symmetric {
                    rows[j][i] = c;
                }
            }
        }
        CostMatrix::new(rows).expect("valid random matrix")
    }

    /// Minimum over every ordering of the non-start points.
    fn brute_force(matrix: &CostMatrix, start: usize) -> f64 {
        fn permute(
            matrix: &CostMatrix,
            start: usize,
            pos: usize,
            remaining: &mut Vec<usize>,
            acc: f64,
            best: &mut f64,
        ) {
            if remaining.is_empty() {
                *best = best.min(acc + matrix.cost(pos, start));
                return;
            }
            for i in 0..remaining.len() {
                let city = remaining.remove(i);
                permute(matrix, start, city, remaining, acc + matrix.cost(pos, city), best);
                remaining.insert(i, city);
            }
        }

        let mut remaining: Vec<usize> = (0..matrix.n()).filter(|&i| i != start).collect();
        let mut best = f64::INFINITY;
        permute(matrix, start, start, &mut remaining, 0.0, &mut best);
        best
    }

    #[test]
    fn single_point_is_start_twice_with_zero_cost() {
        let tour = solve_exact(&matrix(&[&[0.0]]), 0).expect("solve");
        assert_eq!(tour.route, vec![0, 0]);
        assert_eq!(tour.distance, 0.0);
    }

    #[test]
    fn two_points_go_there_and_back() {
        let m = matrix(&[&[0.0, 3.0], &[5.0, 0.0]]);
        let tour = solve_exact(&m, 1).expect("solve");
        assert_eq!(tour.route, vec![1, 0, 1]);
        assert_eq!(tour.distance, 8.0);
    }

    #[test]
    fn unit_square_follows_the_perimeter() {
        let d = 2.0_f64.sqrt();
        let m = matrix(&[
            &[0.0, 1.0, d, 1.0],
            &[1.0, 0.0, 1.0, d],
            &[d, 1.0, 0.0, 1.0],
            &[1.0, d, 1.0, 0.0],
        ]);
        let tour = solve_exact(&m, 0).expect("solve");
        assert_eq!(tour.distance, 4.0);
        // both perimeter directions cost 4; the lowest next index wins
        assert_eq!(tour.route, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn ties_break_towards_lowest_index() {
        // every tour costs 4
        let m = matrix(&[
            &[0.0, 1.0, 1.0, 1.0],
            &[1.0, 0.0, 1.0, 1.0],
            &[1.0, 1.0, 0.0, 1.0],
            &[1.0, 1.0, 1.0, 0.0],
        ]);
        assert_eq!(solve_exact(&m, 0).expect("solve").route, vec![0, 1, 2, 3, 0]);
        assert_eq!(solve_exact(&m, 2).expect("solve").route, vec![2, 0, 1, 3, 2]);
    }

    #[test]
    fn asymmetric_costs_pick_the_cheap_direction() {
        let m = matrix(&[
            &[0.0, 1.0, 10.0],
            &[10.0, 0.0, 1.0],
            &[1.0, 10.0, 0.0],
        ]);
        let tour = solve_exact(&m, 0).expect("solve");
        assert_eq!(tour.route, vec![0, 1, 2, 0]);
        assert_eq!(tour.distance, 3.0);
    }

    #[test]
    fn matches_brute_force_for_every_start_up_to_three_points() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in 1..=3 {
            for _ in 0..20 {
                let m = random_matrix(&mut rng, n, false);
                for start in 0..n {
                    let tour = solve_exact(&m, start).expect("solve");
                    assert_eq!(tour.distance, brute_force(&m, start));
                    tour.validate(n, start).expect("valid tour");
                }
            }
        }
    }

    #[test]
    fn matches_brute_force_on_random_matrices() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 4..=7 {
            for round in 0..6 {
                let m = random_matrix(&mut rng, n, round % 2 == 0);
                let start = round % n;
                let tour = solve_exact(&m, start).expect("solve");
                tour.validate(n, start).expect("valid tour");
                assert!(
                    (tour.distance - brute_force(&m, start)).abs() < 1e-9,
                    "n={n} start={start}"
                );
                assert_eq!(tour.distance, m.route_cost(&tour.route));
            }
        }
    }

    #[test]
    fn repeated_solves_are_identical() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = random_matrix(&mut rng, 9, true);
        let first = solve_exact(&m, 4).expect("solve");
        let second = solve_exact(&m, 4).expect("solve");
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_out_of_range_start() {
        let err = solve_exact(&matrix(&[&[0.0, 1.0], &[1.0, 0.0]]), 2).expect_err("bad start");
        assert!(matches!(err, Error::InvalidStartIndex { start: 2, n: 2 }));
    }

    #[test]
    fn rejects_problems_above_the_exact_limit() {
        let n = MAX_EXACT_POINTS + 1;
        let m = CostMatrix::new(
            (0..n)
                .map(|i| (0..n).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
                .collect(),
        )
        .expect("valid matrix");
        let err = solve_exact(&m, 0).expect_err("too large");
        assert!(matches!(err, Error::ExactLimitExceeded { n: 21, max: 20 }));
    }

    #[test]
    fn memo_slots_are_dense_and_distinct() {
        let (n, start) = (4, 2);
        let memo = MemoTable::new(n, start);
        assert_eq!(memo.entries.len(), 8 * n);

        let mut slots: Vec<usize> = (0u32..16)
            .map(VisitMask::from_bits)
            .filter(|mask| !mask.contains(start))
            .flat_map(|mask| (0..n).map(move |pos| (mask, pos)))
            .map(|(mask, pos)| memo.slot(mask, pos))
            .collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..8 * n).collect::<Vec<_>>());
    }
}
