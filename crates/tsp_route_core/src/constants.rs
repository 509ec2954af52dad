/// Largest problem handed to the exact solver by default.
pub const DEFAULT_EXACT_THRESHOLD: usize = 15;

/// Hard ceiling for the exact solver. The memo holds `2^(n-1) * n` entries, so
/// 20 points is already ~10.5M entries (~250 MB).
pub const MAX_EXACT_POINTS: usize = 20;

/// Spike edges are those longer than `average * DEFAULT_SPIKE_FACTOR`.
pub const DEFAULT_SPIKE_FACTOR: f64 = 10.0;

pub const EARTH_RADIUS_KM: f64 = 6_371.0;
