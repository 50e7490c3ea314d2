//! Tokio driver for guided state machines.
//!
//! One task owns the machine. It ticks it once per period and applies
//! commands in arrival order, so no two mutations ever overlap. Snapshots go
//! out on a `watch` channel, events on an unbounded `mpsc`.
//!
//! The timer pauses while the machine is idle (a finished run) and resumes
//! one full period after a command wakes it.
//!
//! Dropping the session aborts the task: no tick can fire after the owner
//! is gone.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{Command, Guided};
use crate::events::Event;

pub struct GuidedSession<M: Guided> {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<M::Snapshot>,
    events: mpsc::UnboundedReceiver<Event>,
    task: Option<JoinHandle<()>>,
}

impl<M: Guided> GuidedSession<M> {
    /// Spawn the driver task. The first tick fires one `period` after spawn.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(mut machine: M, period: Duration) -> Self {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        for event in machine.begin() {
            let _ = event_tx.send(event);
        }

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut idle = machine.is_idle();

            loop {
                let command = tokio::select! {
                    biased;
                    received = command_rx.recv() => received.unwrap_or(Command::Close),
                    _ = interval.tick(), if !idle => Command::Tick,
                };

                for event in machine.handle(command) {
                    let _ = event_tx.send(event);
                }

                let next = machine.snapshot();
                snapshot_tx.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });

                if machine.is_closed() {
                    tracing::debug!("guided session closed");
                    break;
                }

                let now_idle = machine.is_idle();
                if idle && !now_idle {
                    interval.reset();
                }
                if now_idle && !idle {
                    tracing::debug!("guided session idle");
                }
                idle = now_idle;
            }
        });

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_rx,
            task: Some(task),
        }
    }

    /// Queue a command. Returns false once the session has ended.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn advance(&self) -> bool {
        self.send(Command::Advance)
    }

    pub fn go_back(&self) -> bool {
        self.send(Command::GoBack)
    }

    pub fn restart(&self) -> bool {
        self.send(Command::Restart)
    }

    /// Ask the machine to close. Safe to call repeatedly and after the
    /// session has ended.
    pub fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> M::Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver for observers that want their own change notifications.
    pub fn subscribe(&self) -> watch::Receiver<M::Snapshot> {
        self.snapshots.clone()
    }

    /// Wait for the next snapshot change. `None` once the driver has stopped
    /// and every change has been seen.
    pub async fn changed(&mut self) -> Option<M::Snapshot> {
        self.snapshots.changed().await.ok()?;
        Some(self.snapshots.borrow_and_update().clone())
    }

    /// Wait for the next event. `None` once the driver has stopped and the
    /// queue is drained.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Close and wait for the driver task to stop.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl<M: Guided> Drop for GuidedSession<M> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::{BreathPattern, BreathStep, Phase};
    use crate::sequencer::{BreathingCycle, PhaseSequencer};

    const SECOND: Duration = Duration::from_secs(1);

    async fn wait_for<M, F>(session: &mut GuidedSession<M>, pred: F) -> M::Snapshot
    where
        M: Guided,
        F: Fn(&M::Snapshot) -> bool,
    {
        loop {
            let snap = session.snapshot();
            if pred(&snap) {
                return snap;
            }
            session.changed().await.expect("driver stopped before condition held");
        }
    }

    fn sequencer() -> PhaseSequencer {
        PhaseSequencer::from_phases(
            "t",
            vec![Phase::instructional("A", "", 3), Phase::instructional("B", "", 2)],
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let session = GuidedSession::spawn(sequencer(), SECOND);
        time::sleep(Duration::from_millis(2500)).await;
        let snap = session.snapshot();
        assert_eq!(snap.elapsed_secs, 2);
        assert!(!snap.can_advance);
    }

    #[tokio::test(start_paused = true)]
    async fn advance_after_ready() {
        let mut session = GuidedSession::spawn(sequencer(), SECOND);
        time::sleep(Duration::from_millis(3500)).await;
        assert!(session.snapshot().can_advance);

        assert!(session.advance());
        let snap = wait_for(&mut session, |s| s.phase_index == 1).await;
        assert!(!snap.can_advance);
        assert_eq!(snap.elapsed_secs, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_start_and_ready_events() {
        let mut session = GuidedSession::spawn(sequencer(), SECOND);
        assert!(matches!(session.next_event().await, Some(Event::SequenceStarted { phase_count: 2, .. })));
        assert!(matches!(session.next_event().await, Some(Event::PhaseReady { phase_index: 0, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn close_stops_the_driver() {
        let mut session = GuidedSession::spawn(sequencer(), SECOND);
        time::sleep(Duration::from_millis(1500)).await;
        session.close();
        session.close();
        let snap = wait_for(&mut session, |s| s.closed).await;
        assert_eq!(snap.elapsed_secs, 1);

        time::sleep(Duration::from_secs(5)).await;
        assert!(!session.is_running());
        assert_eq!(session.snapshot().elapsed_secs, 1);
        assert!(!session.advance());
    }

    /// Counts ticks and goes idle after `limit` of them.
    struct TickCounter {
        ticks: u64,
        limit: u64,
        closed: bool,
    }

    impl Guided for TickCounter {
        type Snapshot = u64;

        fn handle(&mut self, command: Command) -> Vec<Event> {
            match command {
                Command::Tick => self.ticks += 1,
                Command::Restart => self.ticks = 0,
                Command::Close => self.closed = true,
                Command::Advance | Command::GoBack => {}
            }
            Vec::new()
        }

        fn snapshot(&self) -> u64 {
            self.ticks
        }

        fn is_closed(&self) -> bool {
            self.closed
        }

        fn is_idle(&self) -> bool {
            self.closed || self.ticks >= self.limit
        }
    }

    #[tokio::test(start_paused = true)]
    async fn idle_machine_is_not_ticked() {
        let counter = TickCounter {
            ticks: 0,
            limit: 3,
            closed: false,
        };
        let session = GuidedSession::spawn(counter, SECOND);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.snapshot(), 3);
        assert!(session.is_running());

        // Waking up restarts the timer one full period later.
        assert!(session.restart());
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(session.snapshot(), 0);
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(session.snapshot(), 1);
        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn finished_sequencer_can_restart_through_the_session() {
        let seq = PhaseSequencer::from_phases("one", vec![Phase::instructional("Only", "", 1)]).unwrap();
        let mut session = GuidedSession::spawn(seq, SECOND);
        time::sleep(Duration::from_millis(1500)).await;
        assert!(session.advance());
        wait_for(&mut session, |s| s.finished).await;
        time::sleep(Duration::from_secs(30)).await;
        assert!(session.is_running());

        assert!(session.restart());
        let snap = wait_for(&mut session, |s| !s.finished).await;
        assert_eq!(snap.elapsed_secs, 0);
        time::sleep(Duration::from_millis(1500)).await;
        assert!(session.snapshot().can_advance);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_aborts_the_task() {
        let session = GuidedSession::spawn(sequencer(), SECOND);
        let mut observer = session.subscribe();
        drop(session);
        // The sender lives in the aborted task; the channel closes.
        assert!(observer.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drives_a_breathing_cycle() {
        let cycle = BreathingCycle::new(BreathPattern::new(4, 6)).unwrap();
        let session = GuidedSession::spawn(cycle, SECOND);
        time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(session.snapshot().step, BreathStep::Exhale);
        time::sleep(Duration::from_secs(6)).await;
        let snap = session.snapshot();
        assert_eq!(snap.step, BreathStep::Inhale);
        assert_eq!(snap.cycles_completed, 1);
        session.shutdown().await;
    }
}
