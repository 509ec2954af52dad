use std::time::Instant;

/// Logs how long a scope took when dropped. Opened by `#[timer()]`.
pub struct ScopeTimer {
    label: &'static str,
    started: Instant,
}

impl ScopeTimer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
        }
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        log::debug!(
            "timer: {} secs={:.4}",
            self.label,
            self.started.elapsed().as_secs_f64()
        );
    }
}

/// Shortest round-trip representation, e.g. `4` -> `4.0`, `0.1` -> `0.1`.
pub fn format_cost(value: f64) -> String {
    let mut buffer = ryu::Buffer::new();
    buffer.format(value).to_owned()
}
