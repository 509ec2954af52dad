pub mod dispatch;
pub mod exact;
pub mod heuristic;
