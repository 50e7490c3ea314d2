//! Persisted mood log.
//!
//! The whole log lives under one key as a flat JSON object
//! (`{"2026-01-05": 2, ...}`). It is read once on load and rewritten on
//! every change, before the call returns.

use chrono::{Local, NaiveDate, Utc};

use super::entries::{date_key, MoodEntries, MoodScore};
use super::insight::{MoodInsight, MoodInsightEngine};
use crate::error::Result;
use crate::events::Event;
use crate::storage::KvStore;

pub const MOOD_KEY: &str = "moodEntries";

pub struct MoodStore<K: KvStore> {
    kv: K,
    entries: MoodEntries,
    engine: MoodInsightEngine,
}

impl<K: KvStore> MoodStore<K> {
    /// Read the stored log. Missing, unreadable or malformed data starts an
    /// empty log; this never fails.
    pub fn load(kv: K) -> Self {
        let entries = match kv.kv_get(MOOD_KEY) {
            Ok(Some(json)) => MoodEntries::from_json(&json),
            Ok(None) => MoodEntries::new(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read mood entries; starting empty");
                MoodEntries::new()
            }
        };
        tracing::debug!(count = entries.len(), "mood entries loaded");
        Self {
            kv,
            entries,
            engine: MoodInsightEngine::new(),
        }
    }

    /// Record `score` for `date` and persist.
    ///
    /// # Errors
    /// Returns an error if the write fails; the in-memory log is left as it
    /// was before the call.
    pub fn set_mood(&mut self, date: NaiveDate, score: MoodScore) -> Result<Event> {
        let previous = self.entries.set(date, score);
        if let Err(err) = self.persist() {
            match previous {
                Some(old) => self.entries.set(date, old),
                None => self.entries.remove(date),
            };
            return Err(err);
        }
        tracing::debug!(date = %date, score = score.value(), "mood logged");
        Ok(Event::MoodLogged {
            date: date_key(date),
            score: score.value(),
            at: Utc::now(),
        })
    }

    /// Forget the score for `date`. `Ok(None)` if nothing was logged.
    ///
    /// # Errors
    /// Returns an error if the write fails; the entry is restored.
    pub fn remove_mood(&mut self, date: NaiveDate) -> Result<Option<Event>> {
        let Some(previous) = self.entries.remove(date) else {
            return Ok(None);
        };
        if let Err(err) = self.persist() {
            self.entries.set(date, previous);
            return Err(err);
        }
        Ok(Some(Event::MoodCleared {
            date: date_key(date),
            at: Utc::now(),
        }))
    }

    pub fn mood(&self, date: NaiveDate) -> Option<MoodScore> {
        self.entries.get(date)
    }

    /// Score for the local calendar day.
    pub fn today_mood(&self) -> Option<MoodScore> {
        self.mood(Local::now().date_naive())
    }

    pub fn entries(&self) -> &MoodEntries {
        &self.entries
    }

    pub fn insight(&self) -> Option<MoodInsight> {
        self.engine.analyze(&self.entries)
    }

    pub fn weekly_insight(&self) -> String {
        self.engine.weekly_insight(&self.entries)
    }

    fn persist(&self) -> Result<()> {
        let json = self.entries.to_json()?;
        self.kv.kv_set(MOOD_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, DatabaseError};
    use crate::mood::entries::parse_date;
    use crate::mood::insight::DEFAULT_INSIGHT;
    use crate::storage::MemoryKv;

    struct ReadOnlyKv(MemoryKv);

    impl KvStore for ReadOnlyKv {
        fn kv_get(&self, key: &str) -> Result<Option<String>> {
            self.0.kv_get(key)
        }

        fn kv_set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(CoreError::Database(DatabaseError::Locked))
        }
    }

    fn score(v: i64) -> MoodScore {
        MoodScore::new(v).unwrap()
    }

    #[test]
    fn set_persists_before_returning() {
        let kv = MemoryKv::new();
        let mut store = MoodStore::load(&kv);
        let date = parse_date("2026-01-05").unwrap();
        let event = store.set_mood(date, score(2)).unwrap();
        assert!(matches!(event, Event::MoodLogged { score: 2, .. }));
        assert_eq!(kv.kv_get(MOOD_KEY).unwrap().as_deref(), Some(r#"{"2026-01-05":2}"#));

        let reloaded = MoodStore::load(&kv);
        assert_eq!(reloaded.mood(date), Some(score(2)));
    }

    #[test]
    fn malformed_data_loads_empty() {
        let kv = MemoryKv::new().with(MOOD_KEY, "{oops");
        let store = MoodStore::load(&kv);
        assert!(store.entries().is_empty());
        assert_eq!(store.weekly_insight(), DEFAULT_INSIGHT);
    }

    #[test]
    fn failed_write_rolls_back() {
        let kv = ReadOnlyKv(MemoryKv::new().with(MOOD_KEY, r#"{"2026-01-05":3}"#));
        let mut store = MoodStore::load(kv);
        let date = parse_date("2026-01-05").unwrap();
        assert!(store.set_mood(date, score(5)).is_err());
        assert_eq!(store.mood(date), Some(score(3)));

        let other = parse_date("2026-01-06").unwrap();
        assert!(store.set_mood(other, score(1)).is_err());
        assert_eq!(store.mood(other), None);

        assert!(store.remove_mood(date).is_err());
        assert_eq!(store.mood(date), Some(score(3)));
    }

    #[test]
    fn remove_clears_a_day() {
        let kv = MemoryKv::new();
        let mut store = MoodStore::load(&kv);
        let date = parse_date("2026-01-05").unwrap();
        assert!(store.remove_mood(date).unwrap().is_none());
        store.set_mood(date, score(4)).unwrap();
        assert!(matches!(store.remove_mood(date).unwrap(), Some(Event::MoodCleared { .. })));
        assert!(MoodStore::load(&kv).entries().is_empty());
    }

    #[test]
    fn today_uses_local_date() {
        let mut store = MoodStore::load(MemoryKv::new());
        store.set_mood(Local::now().date_naive(), score(1)).unwrap();
        assert_eq!(store.today_mood(), Some(score(1)));
    }
}
