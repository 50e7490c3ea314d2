use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Self-reported mood, 1 (best) to 5 (worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodScore(u8);

impl MoodScore {
    pub const BEST: MoodScore = MoodScore(1);
    pub const WORST: MoodScore = MoodScore(5);

    /// # Errors
    /// Returns [`ValidationError::MoodOutOfRange`] outside 1..=5.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::MoodOutOfRange(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MoodScore {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        MoodScore::new(value)
    }
}

impl From<MoodScore> for u8 {
    fn from(score: MoodScore) -> Self {
        score.0
    }
}

impl fmt::Display for MoodScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical `yyyy-MM-dd` key for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// # Errors
/// Returns [`ValidationError::InvalidDate`] when `s` is not `yyyy-MM-dd`.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

/// Date-keyed mood log, at most one score per day.
///
/// Keys are kept as strings exactly as stored so that foreign or damaged
/// keys survive a load/save cycle; readers that need dates parse and skip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodEntries(BTreeMap<String, MoodScore>);

impl MoodEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `score` for `date`, replacing any earlier score for that day.
    pub fn set(&mut self, date: NaiveDate, score: MoodScore) -> Option<MoodScore> {
        self.0.insert(date_key(date), score)
    }

    /// Insert under an arbitrary key. Used when importing stored data.
    pub fn insert_raw(&mut self, key: impl Into<String>, score: MoodScore) -> Option<MoodScore> {
        self.0.insert(key.into(), score)
    }

    pub fn get(&self, date: NaiveDate) -> Option<MoodScore> {
        self.0.get(&date_key(date)).copied()
    }

    pub fn remove(&mut self, date: NaiveDate) -> Option<MoodScore> {
        self.0.remove(&date_key(date))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw `(key, score)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MoodScore)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries whose key parses as a date, in date order.
    pub fn dated(&self) -> impl Iterator<Item = (NaiveDate, MoodScore)> + '_ {
        self.0
            .iter()
            .filter_map(|(k, v)| NaiveDate::parse_from_str(k, DATE_FORMAT).ok().map(|d| (d, *v)))
    }

    /// Decode the persisted JSON object.
    ///
    /// Structurally malformed input yields an empty log. Individual scores
    /// outside 1..=5 are dropped.
    pub fn from_json(json: &str) -> Self {
        let raw: BTreeMap<String, serde_json::Value> = match serde_json::from_str(json) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "stored mood entries are malformed; starting empty");
                return Self::default();
            }
        };

        let mut entries = Self::default();
        for (key, value) in raw {
            match value.as_i64().map(MoodScore::new) {
                Some(Ok(score)) => {
                    entries.0.insert(key, score);
                }
                _ => tracing::warn!(key = %key, value = %value, "dropping invalid stored mood"),
            }
        }
        entries
    }

    /// # Errors
    /// Serialization of a string map cannot realistically fail; the error is
    /// propagated for completeness.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl FromIterator<(NaiveDate, MoodScore)> for MoodEntries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, MoodScore)>>(iter: T) -> Self {
        let mut entries = Self::default();
        for (date, score) in iter {
            entries.set(date, score);
        }
        entries
    }
}
