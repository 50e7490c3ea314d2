//! Phase sequencer implementation.
//!
//! The sequencer is a tick-driven state machine. It does not use internal
//! threads - the owner calls `tick()` once per second (see
//! [`GuidedSession`](super::GuidedSession) for a tokio driver).
//!
//! ## State Transitions
//!
//! ```text
//! Running(0) -> Running(i) -> ... -> Finished
//!      \______________________________/
//!                  close() -> Closed
//! ```
//!
//! A phase becomes ready (`can_advance`) once it has been shown for its
//! duration. The phase timer then stops; only `advance()` moves on, unless
//! the phase is marked `auto_advance`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut seq = PhaseSequencer::new(routine.sequence);
//! // Once per second:
//! seq.tick();
//! // On "Next":
//! seq.advance();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::breathing::{BreathSnapshot, BreathingCycle};
use super::{Command, Guided};
use crate::error::SequenceError;
use crate::events::Event;
use crate::routine::{Phase, Sequence};

/// Everything a presentation layer needs to draw the current phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerSnapshot {
    pub run_id: Uuid,
    pub sequence_id: String,
    pub phase_index: usize,
    pub phase_count: usize,
    pub label: String,
    pub instruction_text: String,
    pub sub_instruction: String,
    pub seconds_remaining: u64,
    pub elapsed_secs: u64,
    pub can_advance: bool,
    pub finished: bool,
    pub closed: bool,
    pub is_last_phase: bool,
    /// 0.0 .. 1.0, phases completed over total.
    pub progress: f64,
    pub breath: Option<BreathSnapshot>,
}

#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    run_id: Uuid,
    sequence: Sequence,
    current_index: usize,
    elapsed_in_phase: u64,
    can_advance: bool,
    finished: bool,
    closed: bool,
    /// Phase timer running. Cleared once the phase is ready.
    armed: bool,
    breath: Option<BreathingCycle>,
}

impl PhaseSequencer {
    /// Start a run of `sequence` at its first phase with the timer armed.
    pub fn new(sequence: Sequence) -> Self {
        let breath = Self::breath_for(sequence.phases().first());
        let seq = Self {
            run_id: Uuid::new_v4(),
            sequence,
            current_index: 0,
            elapsed_in_phase: 0,
            can_advance: false,
            finished: false,
            closed: false,
            armed: true,
            breath,
        };
        tracing::debug!(run_id = %seq.run_id, sequence = seq.sequence.id(), "sequencer created");
        seq
    }

    /// Build the sequence and the sequencer in one step.
    ///
    /// # Errors
    /// Returns [`SequenceError`] for an empty or malformed phase list.
    pub fn from_phases(id: impl Into<String>, phases: Vec<Phase>) -> Result<Self, SequenceError> {
        let id = id.into();
        let sequence = Sequence::new(id.clone(), id, phases)?;
        Ok(Self::new(sequence))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_phase(&self) -> &Phase {
        // current_index is kept in bounds by every transition.
        &self.sequence.phases()[self.current_index]
    }

    pub fn elapsed_in_phase(&self) -> u64 {
        self.elapsed_in_phase
    }

    pub fn can_advance(&self) -> bool {
        self.can_advance
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_ticking(&self) -> bool {
        self.armed && !self.finished && !self.closed
    }

    pub fn is_last_phase(&self) -> bool {
        self.current_index + 1 == self.sequence.len()
    }

    pub fn breath(&self) -> Option<&BreathingCycle> {
        self.breath.as_ref()
    }

    /// Seconds until "Next" unlocks. 0 once the phase is ready.
    pub fn seconds_remaining(&self) -> u64 {
        if self.can_advance {
            return 0;
        }
        self.current_phase()
            .required_ticks()
            .saturating_sub(self.elapsed_in_phase)
    }

    /// Text to show for the current phase. Breathing phases with rotating
    /// phrases show one phrase per completed breath.
    pub fn instruction_text(&self) -> &str {
        let phase = self.current_phase();
        match (&self.breath, phase.rotating_phrases.is_empty()) {
            (Some(cycle), false) => {
                let i = (cycle.cycles_completed() as usize) % phase.rotating_phrases.len();
                &phase.rotating_phrases[i]
            }
            _ => &phase.instruction,
        }
    }

    pub fn snapshot(&self) -> SequencerSnapshot {
        let phase = self.current_phase();
        SequencerSnapshot {
            run_id: self.run_id,
            sequence_id: self.sequence.id().to_string(),
            phase_index: self.current_index,
            phase_count: self.sequence.len(),
            label: phase.label.clone(),
            instruction_text: self.instruction_text().to_string(),
            sub_instruction: phase.sub_instruction.clone(),
            seconds_remaining: self.seconds_remaining(),
            elapsed_secs: self.elapsed_in_phase,
            can_advance: self.can_advance,
            finished: self.finished,
            closed: self.closed,
            is_last_phase: self.is_last_phase(),
            progress: if self.finished {
                1.0
            } else {
                self.current_index as f64 / self.sequence.len() as f64
            },
            breath: self.breath.as_ref().map(BreathingCycle::snapshot),
        }
    }

    /// Event announcing the run; emitted by drivers when they take over.
    pub fn started_event(&self) -> Event {
        Event::SequenceStarted {
            run_id: self.run_id,
            sequence_id: self.sequence.id().to_string(),
            phase_count: self.sequence.len(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Call once per second.
    ///
    /// Ticks the inner breathing cycle while the run is live and counts the
    /// phase timer while it is armed. Returns the events produced.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.finished || self.closed {
            return events;
        }

        if let Some(cycle) = self.breath.as_mut() {
            events.extend(cycle.tick());
        }

        if !self.armed {
            return events;
        }

        self.elapsed_in_phase += 1;
        let phase = self.current_phase();
        if self.elapsed_in_phase >= phase.required_ticks() {
            let auto = phase.auto_advance;
            self.armed = false;
            self.can_advance = true;
            if auto {
                events.extend(self.advance());
            } else {
                tracing::debug!(phase = self.current_index, "phase ready");
                events.push(Event::PhaseReady {
                    run_id: self.run_id,
                    phase_index: self.current_index,
                    at: Utc::now(),
                });
            }
        }
        events
    }

    /// Move to the next phase, or finish after the last one.
    ///
    /// No-op while the current phase is not ready, after finishing and after
    /// closing.
    pub fn advance(&mut self) -> Option<Event> {
        if !self.can_advance || self.finished || self.closed {
            return None;
        }

        if self.is_last_phase() {
            self.finished = true;
            self.can_advance = false;
            self.armed = false;
            tracing::debug!(run_id = %self.run_id, "sequence finished");
            return Some(Event::SequenceFinished {
                run_id: self.run_id,
                sequence_id: self.sequence.id().to_string(),
                at: Utc::now(),
            });
        }

        self.enter(self.current_index + 1, false);
        let phase = self.current_phase();
        Some(Event::PhaseEntered {
            run_id: self.run_id,
            phase_index: self.current_index,
            label: phase.label.clone(),
            duration_secs: phase.duration_secs,
            at: Utc::now(),
        })
    }

    /// Return to the previous phase. It is immediately ready again.
    pub fn go_back(&mut self) -> Option<Event> {
        if self.current_index == 0 || self.finished || self.closed {
            return None;
        }
        let from = self.current_index;
        self.enter(from - 1, true);
        Some(Event::SteppedBack {
            run_id: self.run_id,
            from_phase: from,
            to_phase: self.current_index,
            at: Utc::now(),
        })
    }

    /// Stop ticking for good. Safe to call any number of times.
    pub fn close(&mut self) -> Option<Event> {
        if self.closed {
            return None;
        }
        self.closed = true;
        self.armed = false;
        if let Some(cycle) = self.breath.as_mut() {
            cycle.close();
        }
        tracing::debug!(run_id = %self.run_id, "sequencer closed");
        Some(Event::SessionClosed { at: Utc::now() })
    }

    /// Start a fresh run of the same sequence from phase 0.
    pub fn restart(&mut self) -> Option<Event> {
        if self.closed {
            return None;
        }
        self.run_id = Uuid::new_v4();
        self.finished = false;
        self.enter(0, false);
        Some(self.started_event())
    }

    /// Swap in a new sequence and start a fresh run at its first phase.
    /// Reopens a closed sequencer.
    pub fn set_sequence(&mut self, sequence: Sequence) -> Event {
        self.sequence = sequence;
        self.run_id = Uuid::new_v4();
        self.finished = false;
        self.closed = false;
        self.enter(0, false);
        tracing::debug!(run_id = %self.run_id, sequence = self.sequence.id(), "sequence replaced");
        self.started_event()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, index: usize, ready: bool) {
        self.current_index = index;
        self.elapsed_in_phase = 0;
        self.can_advance = ready;
        self.armed = !ready;
        self.breath = Self::breath_for(self.sequence.phase(index));
        tracing::debug!(phase = index, ready, "phase entered");
    }

    fn breath_for(phase: Option<&Phase>) -> Option<BreathingCycle> {
        phase
            .and_then(Phase::breath_pattern)
            .map(BreathingCycle::from_valid)
    }
}

impl Guided for PhaseSequencer {
    type Snapshot = SequencerSnapshot;

    fn begin(&mut self) -> Vec<Event> {
        vec![self.started_event()]
    }

    fn handle(&mut self, command: Command) -> Vec<Event> {
        match command {
            Command::Tick => self.tick(),
            Command::Advance => self.advance().into_iter().collect(),
            Command::GoBack => self.go_back().into_iter().collect(),
            Command::Close => self.close().into_iter().collect(),
            Command::Restart => self.restart().into_iter().collect(),
        }
    }

    fn snapshot(&self) -> SequencerSnapshot {
        PhaseSequencer::snapshot(self)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn is_idle(&self) -> bool {
        self.finished || self.closed
    }
}
