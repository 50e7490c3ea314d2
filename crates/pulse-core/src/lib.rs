//! # Pulse Core Library
//!
//! This library provides the core logic for Pulse, a guided wellness
//! companion. Every operation is available through the standalone
//! `pulse-cli` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Sequencer**: A tick-driven state machine that walks a sequence of
//!   timed phases and gates "Next" until each phase has been shown long enough
//! - **Breathing**: A self-looping inhale / hold / exhale cycle
//! - **Session**: A tokio driver that owns a machine, ticks it and applies
//!   commands, publishing snapshots and events
//! - **Mood**: Daily 1-5 scores, weekly insight and a month calendar
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`PhaseSequencer`]: Guided phase state machine
//! - [`BreathingCycle`]: Breathing step state machine
//! - [`GuidedSession`]: Async driver for either of the above
//! - [`MoodStore`]: Persisted mood log
//! - [`MoodInsightEngine`]: Weekday pattern analysis
//! - [`Database`]: Key-value persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod mood;
pub mod random;
pub mod routine;
pub mod sequencer;
pub mod sounds;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, SequenceError, ValidationError};
pub use events::Event;
pub use mood::{MonthGrid, MoodEntries, MoodInsight, MoodInsightEngine, MoodScore, MoodStore};
pub use random::{Chooser, FixedChooser, RngChooser};
pub use routine::{BreathPattern, BreathStep, Phase, PhaseKind, Routine, RoutineId, Sequence};
pub use sequencer::{
    BreathSnapshot, BreathingCycle, Command, Guided, GuidedSession, PhaseSequencer, SequencerSnapshot,
};
pub use sounds::{AudioSink, LoggingSink, SoundPicker};
pub use storage::{data_dir, Config, Database, KvStore, MemoryKv};
