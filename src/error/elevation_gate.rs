/// Elevation gate - stops asking for administrator rights once refused
///
/// A circuit breaker with no half-open state: the first refusal opens it for
/// the rest of the run and every later privileged strategy fails fast. Each
/// run owns its own gate.
use crate::EngineError;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct ElevationGate {
    /// Why the gate was opened
    reason: Option<String>,

    /// When the gate was opened
    opened_at: Option<Instant>,

    /// Privileged attempts skipped since opening
    skipped: u32,
}

impl ElevationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ok while elevation is still allowed, `ElevationRefused` after a trip.
    pub fn check(&mut self) -> Result<(), EngineError> {
        match (&self.reason, self.opened_at) {
            (Some(reason), Some(opened_at)) => {
                let err = EngineError::ElevationRefused(format!(
                    "{} ({} ago)",
                    reason,
                    humantime::format_duration(opened_at.elapsed())
                ));
                self.skipped += 1;
                Err(err)
            }
            _ => Ok(()),
        }
    }

    /// Opens the gate. Later trips keep the first reason.
    pub fn trip(&mut self, reason: impl Into<String>) {
        if self.reason.is_some() {
            return;
        }
        let reason = reason.into();
        tracing::warn!(reason = %reason, "Elevation refused, skipping remaining privileged strategies");
        self.reason = Some(reason);
        self.opened_at = Some(Instant::now());
    }

    pub fn skipped(&self) -> u32 {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_closed() {
        let mut gate = ElevationGate::new();
        assert!(gate.check().is_ok());
        assert_eq!(gate.skipped(), 0);
    }

    #[test]
    fn test_gate_fails_fast_after_trip() {
        let mut gate = ElevationGate::new();
        gate.trip("User canceled. (-128)");

        for _ in 0..3 {
            let err = gate.check().unwrap_err();
            assert!(matches!(err, EngineError::ElevationRefused(_)));
            assert!(err.to_string().contains("User canceled"));
        }
        assert_eq!(gate.skipped(), 3);
    }

    #[test]
    fn test_first_reason_is_kept() {
        let mut gate = ElevationGate::new();
        gate.trip("first");
        gate.trip("second");
        let err = gate.check().unwrap_err().to_string();
        assert!(err.contains("first"));
        assert!(!err.contains("second"));
    }
}
