//! Self-looping breathing cycle.
//!
//! Inhale, optional hold, exhale, then back to inhale, one step per tick
//! boundary, until closed. It never finishes on its own.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{Command, Guided};
use crate::error::SequenceError;
use crate::events::Event;
use crate::routine::{BreathPattern, BreathStep};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathSnapshot {
    pub step: BreathStep,
    pub label: String,
    pub seconds_remaining: u64,
    pub elapsed_secs: u64,
    pub cycles_completed: u64,
    /// Seconds left of the "prepare to breathe" countdown; 0 once breathing.
    pub lead_in_remaining: u64,
    pub closed: bool,
}

#[derive(Debug, Clone)]
pub struct BreathingCycle {
    pattern: BreathPattern,
    step: BreathStep,
    elapsed_in_step: u64,
    cycles_completed: u64,
    lead_in_remaining: u64,
    closed: bool,
}

impl BreathingCycle {
    /// # Errors
    /// Returns [`SequenceError::InvalidPhase`] if inhale or exhale is zero.
    pub fn new(pattern: BreathPattern) -> Result<Self, SequenceError> {
        pattern.validate().map_err(|reason| SequenceError::InvalidPhase {
            index: 0,
            label: "Breathing".into(),
            reason,
        })?;
        Ok(Self::from_valid(pattern))
    }

    pub(crate) fn from_valid(pattern: BreathPattern) -> Self {
        Self {
            pattern,
            step: BreathStep::Inhale,
            elapsed_in_step: 0,
            cycles_completed: 0,
            lead_in_remaining: 0,
            closed: false,
        }
    }

    /// Count down `secs` ticks before the first inhale.
    pub fn with_lead_in(mut self, secs: u64) -> Self {
        self.lead_in_remaining = secs;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pattern(&self) -> BreathPattern {
        self.pattern
    }

    pub fn step(&self) -> BreathStep {
        self.step
    }

    pub fn elapsed_in_step(&self) -> u64 {
        self.elapsed_in_step
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.pattern
            .step_secs(self.step)
            .saturating_sub(self.elapsed_in_step)
    }

    pub fn snapshot(&self) -> BreathSnapshot {
        BreathSnapshot {
            step: self.step,
            label: self.step.label().to_string(),
            seconds_remaining: self.seconds_remaining(),
            elapsed_secs: self.elapsed_in_step,
            cycles_completed: self.cycles_completed,
            lead_in_remaining: self.lead_in_remaining,
            closed: self.closed,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance one second. Returns an event when the breath step changes.
    pub fn tick(&mut self) -> Option<Event> {
        if self.closed {
            return None;
        }

        if self.lead_in_remaining > 0 {
            self.lead_in_remaining -= 1;
            return (self.lead_in_remaining == 0).then(|| self.step_event());
        }

        self.elapsed_in_step += 1;
        if self.elapsed_in_step < self.pattern.step_secs(self.step) {
            return None;
        }

        if self.step == BreathStep::Exhale {
            self.cycles_completed += 1;
        }
        self.step = self.pattern.next_step(self.step);
        self.elapsed_in_step = 0;
        tracing::trace!(step = ?self.step, cycles = self.cycles_completed, "breath step");
        Some(self.step_event())
    }

    /// Stop for good. Idempotent.
    pub fn close(&mut self) -> Option<Event> {
        if self.closed {
            return None;
        }
        self.closed = true;
        Some(Event::SessionClosed { at: Utc::now() })
    }

    fn step_event(&self) -> Event {
        Event::BreathStepChanged {
            step: self.step,
            seconds: self.pattern.step_secs(self.step),
            cycles_completed: self.cycles_completed,
            at: Utc::now(),
        }
    }
}

impl Guided for BreathingCycle {
    type Snapshot = BreathSnapshot;

    fn handle(&mut self, command: Command) -> Vec<Event> {
        match command {
            Command::Tick => self.tick().into_iter().collect(),
            Command::Close => self.close().into_iter().collect(),
            // A free-running cycle has nothing to step through.
            Command::Advance | Command::GoBack | Command::Restart => Vec::new(),
        }
    }

    fn snapshot(&self) -> BreathSnapshot {
        BreathingCycle::snapshot(self)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_returns_to_inhale() {
        let mut cycle = BreathingCycle::new(BreathPattern::new(4, 6)).unwrap();
        for _ in 0..4 {
            assert_eq!(cycle.step(), BreathStep::Inhale);
            cycle.tick();
        }
        assert_eq!(cycle.step(), BreathStep::Exhale);
        assert_eq!(cycle.elapsed_in_step(), 0);
        for _ in 0..6 {
            cycle.tick();
        }
        assert_eq!(cycle.step(), BreathStep::Inhale);
        assert_eq!(cycle.elapsed_in_step(), 0);
        assert_eq!(cycle.cycles_completed(), 1);
    }

    #[test]
    fn hold_step_is_visited() {
        let mut cycle = BreathingCycle::new(BreathPattern::with_hold(4, 4, 6)).unwrap();
        let steps: Vec<_> = (0..14).filter_map(|_| cycle.tick()).collect();
        let visited: Vec<_> = steps
            .iter()
            .map(|e| match e {
                Event::BreathStepChanged { step, .. } => *step,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(visited, vec![BreathStep::Hold, BreathStep::Exhale, BreathStep::Inhale]);
    }

    #[test]
    fn countdown_tracks_remaining_seconds() {
        let mut cycle = BreathingCycle::new(BreathPattern::new(4, 6)).unwrap();
        assert_eq!(cycle.seconds_remaining(), 4);
        cycle.tick();
        assert_eq!(cycle.seconds_remaining(), 3);
    }

    #[test]
    fn lead_in_delays_first_inhale() {
        let mut cycle = BreathingCycle::new(BreathPattern::new(4, 6)).unwrap().with_lead_in(2);
        assert!(cycle.tick().is_none());
        assert!(matches!(
            cycle.tick(),
            Some(Event::BreathStepChanged { step: BreathStep::Inhale, .. })
        ));
        assert_eq!(cycle.elapsed_in_step(), 0);
        cycle.tick();
        assert_eq!(cycle.elapsed_in_step(), 1);
    }

    #[test]
    fn close_is_idempotent_and_freezes() {
        let mut cycle = BreathingCycle::new(BreathPattern::new(1, 1)).unwrap();
        assert!(cycle.close().is_some());
        assert!(cycle.close().is_none());
        let before = cycle.snapshot();
        assert!(cycle.tick().is_none());
        assert_eq!(cycle.snapshot(), before);
    }

    #[test]
    fn rejects_zero_exhale() {
        assert!(BreathingCycle::new(BreathPattern::new(4, 0)).is_err());
    }
}
