use crate::{CostMatrix, Result, Tour, utils::format_cost};

/// Nearest-neighbor tour: always step to the cheapest unvisited point, lowest
/// index on ties, then return to `start`. Single pass, no backtracking.
#[tsp_route_derive::timer()]
pub fn solve_nearest_neighbor(matrix: &CostMatrix, start: usize) -> Result<Tour> {
    matrix.check_start(start)?;
    let n = matrix.n();

    let mut visited = vec![false; n];
    visited[start] = true;
    let mut route = Vec::with_capacity(n + 1);
    route.push(start);

    let mut current = start;
    let mut distance = 0.0;
    for _ in 1..n {
        let Some((next, cost)) = nearest_unvisited(matrix.row(current), &visited) else {
            break;
        };
        visited[next] = true;
        route.push(next);
        distance += cost;
        current = next;
    }

    route.push(start);
    distance += matrix.cost(current, start);

    log::debug!(
        "heuristic: done n={n} start={start} cost={}",
        format_cost(distance)
    );

    Ok(Tour::new(route, distance))
}

fn nearest_unvisited(row: &[f64], visited: &[bool]) -> Option<(usize, f64)> {
    let mut nearest: Option<(usize, f64)> = None;
    for (idx, &cost) in row.iter().enumerate() {
        if visited[idx] {
            continue;
        }
        if nearest.is_none_or(|(_, best)| cost < best) {
            nearest = Some((idx, cost));
        }
    }
    nearest
}
