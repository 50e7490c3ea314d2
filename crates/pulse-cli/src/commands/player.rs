//! Runs a guided session in the terminal.
//!
//! Events are printed to stdout as JSON lines. Human-readable prompts go to
//! stderr. In interactive mode stdin lines drive the session: empty or `n`
//! advances, `b` steps back, `r` restarts, `q` quits.

use std::time::Duration;

use pulse_core::{BreathStep, BreathingCycle, Event, Guided, GuidedSession, PhaseSequencer, Sequence};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type StdinLines = Lines<BufReader<Stdin>>;

pub struct PlayOptions {
    pub tick: Duration,
    /// Advance as soon as each phase is ready instead of waiting for input.
    pub auto: bool,
}

/// Run `fut` on a fresh current-thread runtime. The runtime is shut down in
/// the background so a pending stdin read cannot keep the process alive.
fn block_on<F: std::future::Future>(fut: F) -> std::io::Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let output = rt.block_on(fut);
    rt.shutdown_background();
    Ok(output)
}

fn print_event(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

async fn next_line(lines: &mut Option<StdinLines>) -> std::io::Result<Option<String>> {
    match lines {
        Some(lines) => lines.next_line().await,
        None => std::future::pending().await,
    }
}

fn prompt(sequence: &Sequence, index: usize) {
    if let Some(phase) = sequence.phase(index) {
        eprintln!("[{}/{}] {}: {}", index + 1, sequence.len(), phase.label, phase.instruction);
        if !phase.sub_instruction.is_empty() {
            eprintln!("        {}", phase.sub_instruction);
        }
    }
}

fn apply_input<M: Guided>(session: &GuidedSession<M>, line: &str) {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "n" | "next" => {
            session.advance();
        }
        "b" | "back" => {
            session.go_back();
        }
        "r" | "restart" => {
            session.restart();
        }
        "q" | "quit" => session.close(),
        other => eprintln!("unknown input '{other}' (n = next, b = back, r = restart, q = quit)"),
    }
}

/// Play `sequence` until it finishes or the user quits.
pub fn play_sequence(sequence: Sequence, options: PlayOptions) -> Result<(), Box<dyn std::error::Error>> {
    block_on(drive_sequence(sequence, options))?
}

async fn drive_sequence(sequence: Sequence, options: PlayOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = GuidedSession::spawn(PhaseSequencer::new(sequence.clone()), options.tick);
    let mut input = (!options.auto).then(|| BufReader::new(tokio::io::stdin()).lines());
    tracing::debug!(sequence = sequence.id(), auto = options.auto, "playing sequence");

    loop {
        tokio::select! {
            event = session.next_event() => {
                let Some(event) = event else { break };
                print_event(&event)?;
                match event {
                    Event::SequenceStarted { .. } => prompt(&sequence, 0),
                    Event::PhaseEntered { phase_index, .. } => prompt(&sequence, phase_index),
                    Event::SteppedBack { to_phase, .. } => prompt(&sequence, to_phase),
                    Event::PhaseReady { .. } if options.auto => {
                        session.advance();
                    }
                    Event::PhaseReady { .. } => eprintln!("        (press enter to continue)"),
                    Event::SequenceFinished { .. } => session.close(),
                    Event::SessionClosed { .. } => break,
                    _ => {}
                }
            }
            line = next_line(&mut input) => match line? {
                Some(line) => apply_input(&session, &line),
                None => {
                    input = None;
                    session.close();
                }
            },
        }
    }

    session.shutdown().await;
    Ok(())
}

/// Run a breathing cycle for `cycles` full breaths (until `q` or end of
/// input when `None`).
pub fn play_breathing(
    cycle: BreathingCycle,
    tick: Duration,
    cycles: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    block_on(drive_breathing(cycle, tick, cycles))?
}

async fn drive_breathing(
    cycle: BreathingCycle,
    tick: Duration,
    cycles: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = GuidedSession::spawn(cycle, tick);
    let mut input = Some(BufReader::new(tokio::io::stdin()).lines());

    loop {
        tokio::select! {
            event = session.next_event() => {
                let Some(event) = event else { break };
                print_event(&event)?;
                match event {
                    Event::BreathStepChanged { step, cycles_completed, .. } => {
                        if step == BreathStep::Inhale && cycles.is_some_and(|n| cycles_completed >= n) {
                            session.close();
                        } else {
                            eprintln!("{}", step.label());
                        }
                    }
                    Event::SessionClosed { .. } => break,
                    _ => {}
                }
            }
            line = next_line(&mut input) => match line? {
                Some(line) if matches!(line.trim(), "q" | "quit") => session.close(),
                Some(_) => {}
                // Input is optional while a cycle count bounds the run.
                None if cycles.is_some() => input = None,
                None => session.close(),
            },
        }
    }

    session.shutdown().await;
    Ok(())
}
