use std::mem::{discriminant, Discriminant};
use std::time::{Duration, Instant};

use roiwall_core::EngineError;

/// Frames between debug timing lines.
const REPORT_EVERY: u64 = 600;

/// Per-instance frame counter and interval for debug logs.
#[derive(Debug, Default)]
pub struct FrameClock {
    frames: u64,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Record a frame; returns the interval since the previous one.
    pub fn tick(&mut self, plugin: &str) -> Option<Duration> {
        self.tick_at(plugin, Instant::now())
    }

    fn tick_at(&mut self, plugin: &str, now: Instant) -> Option<Duration> {
        let dt = self.last.map(|prev| now.saturating_duration_since(prev));
        self.last = Some(now);
        self.frames += 1;
        if let Some(dt) = dt {
            if self.frames % REPORT_EVERY == 0 {
                tracing::debug!(plugin, frames = self.frames, ?dt, "frame interval");
            }
        }
        dt
    }
}

/// Tracks a run of skipped frames so a persistent failure is logged once.
#[derive(Debug, Default)]
pub struct SkipLatch {
    kind: Option<Discriminant<EngineError>>,
    skipped: u64,
}

impl SkipLatch {
    /// Record a skipped frame. True when the failure kind changed and should be logged.
    pub fn skip(&mut self, err: &EngineError) -> bool {
        let kind = discriminant(err);
        self.skipped += 1;
        if self.kind == Some(kind) {
            return false;
        }
        self.kind = Some(kind);
        true
    }

    /// Record a drawn frame. Returns the length of the run it ends, if any.
    pub fn recover(&mut self) -> Option<u64> {
        self.kind.take()?;
        Some(std::mem::take(&mut self.skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistent_failure_is_reported_once() {
        let mut l = SkipLatch::default();
        let inverted = |r: f32| EngineError::InvalidRect(format!("right ({r}) < left (0.75)"));

        assert!(l.skip(&inverted(0.25)));
        for i in 0..120 {
            assert!(!l.skip(&inverted(0.25 + i as f32 * 1e-3)));
        }
        assert_eq!(l.recover(), Some(121));
        assert_eq!(l.recover(), None);
    }

    #[test]
    fn a_different_failure_is_reported_again() {
        let mut l = SkipLatch::default();
        assert!(l.skip(&EngineError::InvalidRect("x".into())));
        assert!(l.skip(&EngineError::InvalidImage { width: 0, height: 0 }));
        assert!(!l.skip(&EngineError::InvalidImage { width: 0, height: 4 }));
    }

    #[test]
    fn failure_after_recovery_is_reported_again() {
        let mut l = SkipLatch::default();
        let e = EngineError::allocation("framebuffer incomplete");
        assert!(l.skip(&e));
        assert_eq!(l.recover(), Some(1));
        assert!(l.skip(&e));
    }

    #[test]
    fn first_tick_has_no_interval() {
        let mut c = FrameClock::default();
        let t0 = Instant::now();
        assert_eq!(c.tick_at("t", t0), None);
        assert_eq!(
            c.tick_at("t", t0 + Duration::from_millis(16)),
            Some(Duration::from_millis(16))
        );
        assert_eq!(c.frames(), 2);
    }
}
