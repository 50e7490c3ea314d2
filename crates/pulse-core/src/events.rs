use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routine::BreathStep;

/// Every state change in the system produces an Event.
/// Presentation layers render from snapshots and use events for
/// one-off reactions (haptics, sounds, logging).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SequenceStarted {
        run_id: Uuid,
        sequence_id: String,
        phase_count: usize,
        at: DateTime<Utc>,
    },
    PhaseEntered {
        run_id: Uuid,
        phase_index: usize,
        label: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The phase has been shown long enough; "Next" is now available.
    PhaseReady {
        run_id: Uuid,
        phase_index: usize,
        at: DateTime<Utc>,
    },
    SteppedBack {
        run_id: Uuid,
        from_phase: usize,
        to_phase: usize,
        at: DateTime<Utc>,
    },
    SequenceFinished {
        run_id: Uuid,
        sequence_id: String,
        at: DateTime<Utc>,
    },
    SessionClosed {
        at: DateTime<Utc>,
    },
    BreathStepChanged {
        step: BreathStep,
        seconds: u64,
        cycles_completed: u64,
        at: DateTime<Utc>,
    },
    MoodLogged {
        date: String,
        score: u8,
        at: DateTime<Utc>,
    },
    MoodCleared {
        date: String,
        at: DateTime<Utc>,
    },
    SoundStarted {
        sound_id: String,
        at: DateTime<Utc>,
    },
    SoundStopped {
        sound_id: Option<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name of the variant, e.g. `"phase_ready"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SequenceStarted { .. } => "sequence_started",
            Event::PhaseEntered { .. } => "phase_entered",
            Event::PhaseReady { .. } => "phase_ready",
            Event::SteppedBack { .. } => "stepped_back",
            Event::SequenceFinished { .. } => "sequence_finished",
            Event::SessionClosed { .. } => "session_closed",
            Event::BreathStepChanged { .. } => "breath_step_changed",
            Event::MoodLogged { .. } => "mood_logged",
            Event::MoodCleared { .. } => "mood_cleared",
            Event::SoundStarted { .. } => "sound_started",
            Event::SoundStopped { .. } => "sound_stopped",
        }
    }
}
