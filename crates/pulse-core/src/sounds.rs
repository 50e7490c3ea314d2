//! Ambient sound selection.
//!
//! At most one sound plays at a time. The picker decides what should play;
//! an [`AudioSink`] does the actual output. `lastPlayedSound` and
//! `currentSound` are kept in the key-value store so repeat avoidance and
//! status survive between processes.

use chrono::Utc;

use crate::error::Result;
use crate::events::Event;
use crate::random::Chooser;
use crate::routine::{sound, Sound, SOUNDS};
use crate::storage::KvStore;

pub const LAST_PLAYED_KEY: &str = "lastPlayedSound";
pub const CURRENT_SOUND_KEY: &str = "currentSound";

/// Audio output collaborator.
pub trait AudioSink {
    /// Start looping `sound`, replacing whatever played before.
    ///
    /// # Errors
    /// Returns an error if the output cannot start.
    fn play(&mut self, sound: &Sound) -> Result<()>;

    fn stop(&mut self);
}

/// Sink that records intent instead of producing audio.
#[derive(Debug, Default)]
pub struct LoggingSink {
    pub log: Vec<String>,
}

impl AudioSink for LoggingSink {
    fn play(&mut self, sound: &Sound) -> Result<()> {
        tracing::info!(sound = sound.id, file = ?sound.filename, "play ambient sound");
        self.log.push(format!("play {}", sound.id));
        Ok(())
    }

    fn stop(&mut self) {
        tracing::info!("stop ambient sound");
        self.log.push("stop".to_string());
    }
}

pub struct SoundPicker<S: AudioSink> {
    sink: S,
    current: Option<&'static Sound>,
    last_played: Option<&'static Sound>,
    avoid_repeat: bool,
}

impl<S: AudioSink> SoundPicker<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
            last_played: None,
            avoid_repeat: true,
        }
    }

    pub fn avoid_repeat(mut self, avoid: bool) -> Self {
        self.avoid_repeat = avoid;
        self
    }

    /// Restore `currentSound` / `lastPlayedSound`. Empty or unknown ids are
    /// ignored.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn restore(mut self, kv: &impl KvStore) -> Result<Self> {
        let lookup = |key: &str| -> Result<Option<&'static Sound>> {
            Ok(kv.kv_get(key)?.filter(|id| !id.is_empty()).and_then(|id| {
                sound(&id)
                    .map_err(|e| tracing::warn!(error = %e, key, "ignoring stored sound"))
                    .ok()
            }))
        };
        self.last_played = lookup(LAST_PLAYED_KEY)?;
        self.current = lookup(CURRENT_SOUND_KEY)?;
        Ok(self)
    }

    /// Write `currentSound` / `lastPlayedSound` back.
    ///
    /// # Errors
    /// Returns an error if the store rejects the write.
    pub fn save(&self, kv: &impl KvStore) -> Result<()> {
        kv.kv_set(CURRENT_SOUND_KEY, self.current.map_or("", |s| s.id))?;
        kv.kv_set(LAST_PLAYED_KEY, self.last_played.map_or("", |s| s.id))
    }

    pub fn current(&self) -> Option<&'static Sound> {
        self.current
    }

    pub fn last_played(&self) -> Option<&'static Sound> {
        self.last_played
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Play `id`, replacing the current sound.
    ///
    /// # Errors
    /// Returns an error for an unknown id or when the sink fails.
    pub fn play(&mut self, id: &str) -> Result<Event> {
        let next = sound(id)?;
        self.start(next)
    }

    /// Stop `id` if it is the one playing, otherwise play it.
    ///
    /// # Errors
    /// See [`SoundPicker::play`].
    pub fn toggle(&mut self, id: &str) -> Result<Event> {
        let target = sound(id)?;
        if self.current.is_some_and(|s| s.id == target.id) {
            Ok(self.halt())
        } else {
            self.start(target)
        }
    }

    /// Stop playback. `None` if nothing was playing.
    pub fn stop(&mut self) -> Option<Event> {
        self.current.is_some().then(|| self.halt())
    }

    /// Play a random sound, avoiding the last played one when there is a
    /// choice.
    ///
    /// # Errors
    /// Returns an error when the sink fails.
    pub fn play_random(&mut self, chooser: &mut dyn Chooser) -> Result<Event> {
        let avoid = if self.avoid_repeat {
            self.current.or(self.last_played).map(|s| s.id)
        } else {
            None
        };
        let candidates: Vec<&'static Sound> = SOUNDS.iter().filter(|s| Some(s.id) != avoid).collect();
        let pool = if candidates.is_empty() {
            SOUNDS.iter().collect()
        } else {
            candidates
        };
        let index = chooser.choose(pool.len()).unwrap_or(0);
        self.start(pool[index.min(pool.len() - 1)])
    }

    /// Stop if anything plays, otherwise start a random sound.
    ///
    /// # Errors
    /// See [`SoundPicker::play_random`].
    pub fn toggle_random(&mut self, chooser: &mut dyn Chooser) -> Result<Event> {
        if self.is_playing() {
            Ok(self.halt())
        } else {
            self.play_random(chooser)
        }
    }

    fn start(&mut self, next: &'static Sound) -> Result<Event> {
        self.sink.play(next)?;
        self.current = Some(next);
        self.last_played = Some(next);
        tracing::debug!(sound = next.id, "sound started");
        Ok(Event::SoundStarted {
            sound_id: next.id.to_string(),
            at: Utc::now(),
        })
    }

    fn halt(&mut self) -> Event {
        self.sink.stop();
        let stopped = self.current.take();
        Event::SoundStopped {
            sound_id: stopped.map(|s| s.id.to_string()),
            at: Utc::now(),
        }
    }
}
