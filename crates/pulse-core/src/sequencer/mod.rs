//! Guided phase sequencing.
//!
//! [`PhaseSequencer`] walks a [`Sequence`](crate::routine::Sequence) one phase
//! at a time; [`BreathingCycle`] is the free-running inhale/exhale loop.
//! Both are plain state machines driven by [`Command`]s, and
//! [`GuidedSession`] runs either of them on a tokio ticker.

mod breathing;
mod engine;
mod session;

use serde::{Deserialize, Serialize};

use crate::events::Event;

pub use breathing::{BreathSnapshot, BreathingCycle};
pub use engine::{PhaseSequencer, SequencerSnapshot};
pub use session::GuidedSession;

/// Input accepted by a guided state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// One second elapsed.
    Tick,
    Advance,
    GoBack,
    Close,
    Restart,
}

/// A state holder that reacts to commands and exposes an immutable snapshot.
pub trait Guided: Send + 'static {
    type Snapshot: Clone + PartialEq + Send + Sync + 'static;

    /// Events to publish when a driver takes ownership.
    fn begin(&mut self) -> Vec<Event> {
        Vec::new()
    }

    fn handle(&mut self, command: Command) -> Vec<Event>;

    fn snapshot(&self) -> Self::Snapshot;

    fn is_closed(&self) -> bool;

    /// Ticks would change nothing. Drivers stop their timer until a command
    /// wakes the machine up again.
    fn is_idle(&self) -> bool {
        self.is_closed()
    }
}
