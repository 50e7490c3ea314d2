//! Weekly mood insight.
//!
//! Groups mood entries by ISO weekday (Monday first) and turns the most
//! notable weekday into one sentence. Weekdays need at least
//! [`MIN_SAMPLES`] entries before they count.
//!
//! Buckets, by mean score (1 = best, 5 = worst):
//! - negative: mean >= 3.5, strongest is the highest mean
//! - positive: mean <= 2.5, strongest is the lowest mean
//! - neutral: anything between, strongest is the closest to 3.0
//!
//! Negative wins over positive, positive over neutral. Equal means keep the
//! earlier weekday in Monday..Sunday order.

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use super::entries::MoodEntries;

pub const MIN_SAMPLES: usize = 2;
pub const NEGATIVE_THRESHOLD: f64 = 3.5;
pub const POSITIVE_THRESHOLD: f64 = 2.5;
pub const NEUTRAL_CENTER: f64 = 3.0;

pub const DEFAULT_INSIGHT: &str = "Keep logging your mood to discover your weekly patterns.";

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightBucket {
    Negative,
    Positive,
    Neutral,
}

impl InsightBucket {
    pub fn classify(mean: f64) -> Self {
        if mean >= NEGATIVE_THRESHOLD {
            InsightBucket::Negative
        } else if mean <= POSITIVE_THRESHOLD {
            InsightBucket::Positive
        } else {
            InsightBucket::Neutral
        }
    }
}

/// Per-weekday aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdayStats {
    pub weekday: Weekday,
    pub count: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodInsight {
    pub bucket: InsightBucket,
    pub weekday: Weekday,
    pub mean: f64,
    pub samples: usize,
    pub message: String,
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn message_for(bucket: InsightBucket, day: Weekday) -> String {
    let name = weekday_name(day);
    match bucket {
        InsightBucket::Negative => {
            format!("{name}s tend to feel heavier for you. Plan something gentle for that day.")
        }
        InsightBucket::Positive => {
            format!("You usually feel your best on {name}s. Notice what makes them different.")
        }
        InsightBucket::Neutral => format!("{name}s are usually steady for you."),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoodInsightEngine;

impl MoodInsightEngine {
    pub fn new() -> Self {
        Self
    }

    /// Count and mean per weekday, Monday first, weekdays without entries
    /// omitted. Keys that are not `yyyy-MM-dd` are skipped.
    pub fn weekday_stats(&self, entries: &MoodEntries) -> Vec<WeekdayStats> {
        let mut sums = [0u32; 7];
        let mut counts = [0usize; 7];
        for (date, score) in entries.dated() {
            let i = date.weekday().num_days_from_monday() as usize;
            sums[i] += u32::from(score.value());
            counts[i] += 1;
        }

        WEEK.iter()
            .enumerate()
            .filter(|(i, _)| counts[*i] > 0)
            .map(|(i, day)| WeekdayStats {
                weekday: *day,
                count: counts[i],
                mean: f64::from(sums[i]) / counts[i] as f64,
            })
            .collect()
    }

    /// The most notable weekday, if any weekday has enough samples.
    pub fn analyze(&self, entries: &MoodEntries) -> Option<MoodInsight> {
        let mut negative: Option<WeekdayStats> = None;
        let mut positive: Option<WeekdayStats> = None;
        let mut neutral: Option<WeekdayStats> = None;

        for stats in self.weekday_stats(entries) {
            if stats.count < MIN_SAMPLES {
                continue;
            }
            match InsightBucket::classify(stats.mean) {
                InsightBucket::Negative => {
                    if negative.map_or(true, |best| stats.mean > best.mean) {
                        negative = Some(stats);
                    }
                }
                InsightBucket::Positive => {
                    if positive.map_or(true, |best| stats.mean < best.mean) {
                        positive = Some(stats);
                    }
                }
                InsightBucket::Neutral => {
                    let distance = (stats.mean - NEUTRAL_CENTER).abs();
                    if neutral.map_or(true, |best| distance < (best.mean - NEUTRAL_CENTER).abs()) {
                        neutral = Some(stats);
                    }
                }
            }
        }

        let (bucket, stats) = negative
            .map(|s| (InsightBucket::Negative, s))
            .or_else(|| positive.map(|s| (InsightBucket::Positive, s)))
            .or_else(|| neutral.map(|s| (InsightBucket::Neutral, s)))?;

        Some(MoodInsight {
            bucket,
            weekday: stats.weekday,
            mean: stats.mean,
            samples: stats.count,
            message: message_for(bucket, stats.weekday),
        })
    }

    /// One sentence, falling back to [`DEFAULT_INSIGHT`].
    pub fn weekly_insight(&self, entries: &MoodEntries) -> String {
        self.analyze(entries)
            .map(|insight| insight.message)
            .unwrap_or_else(|| DEFAULT_INSIGHT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::entries::{parse_date, MoodScore};

    // 2026-01-05 is a Monday.
    fn log(pairs: &[(&str, i64)]) -> MoodEntries {
        pairs
            .iter()
            .map(|(d, s)| (parse_date(d).unwrap(), MoodScore::new(*s).unwrap()))
            .collect()
    }

    #[test]
    fn negative_has_priority() {
        let entries = log(&[
            ("2026-01-05", 1),
            ("2026-01-12", 2),
            ("2026-01-06", 5),
            ("2026-01-13", 4),
            ("2026-01-07", 3),
        ]);
        let insight = MoodInsightEngine::new().analyze(&entries).unwrap();
        assert_eq!(insight.bucket, InsightBucket::Negative);
        assert_eq!(insight.weekday, Weekday::Tue);
        assert_eq!(insight.mean, 4.5);
        assert!(insight.message.contains("Tuesday"));
    }

    #[test]
    fn single_samples_are_ignored() {
        let entries = log(&[("2026-01-05", 5), ("2026-01-06", 5), ("2026-01-07", 1)]);
        assert_eq!(MoodInsightEngine::new().weekly_insight(&entries), DEFAULT_INSIGHT);
    }

    #[test]
    fn empty_log_gives_default() {
        assert_eq!(MoodInsightEngine::new().weekly_insight(&MoodEntries::new()), DEFAULT_INSIGHT);
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(InsightBucket::classify(3.5), InsightBucket::Negative);
        assert_eq!(InsightBucket::classify(2.5), InsightBucket::Positive);
        assert_eq!(InsightBucket::classify(3.0), InsightBucket::Neutral);
        assert_eq!(InsightBucket::classify(3.49), InsightBucket::Neutral);
    }

    #[test]
    fn positive_picks_lowest_mean() {
        // Mon 2.5, Thu 1.5
        let entries = log(&[
            ("2026-01-05", 2),
            ("2026-01-12", 3),
            ("2026-01-08", 1),
            ("2026-01-15", 2),
        ]);
        let insight = MoodInsightEngine::new().analyze(&entries).unwrap();
        assert_eq!(insight.bucket, InsightBucket::Positive);
        assert_eq!(insight.weekday, Weekday::Thu);
    }

    #[test]
    fn neutral_picks_closest_to_three() {
        // Wed 3.0 (after 2 + 4), Fri 3.0 tie, Sat ~3.33
        let entries = log(&[
            ("2026-01-10", 3),
            ("2026-01-17", 3),
            ("2026-01-24", 4),
            ("2026-01-09", 3),
            ("2026-01-16", 3),
            ("2026-01-07", 2),
            ("2026-01-14", 4),
        ]);
        let insight = MoodInsightEngine::new().analyze(&entries).unwrap();
        assert_eq!(insight.bucket, InsightBucket::Neutral);
        // Tie between Wednesday and Friday: Monday-first order keeps Wednesday.
        assert_eq!(insight.weekday, Weekday::Wed);
    }

    #[test]
    fn negative_tie_keeps_earlier_weekday() {
        let entries = log(&[
            ("2026-01-10", 4),
            ("2026-01-17", 4),
            ("2026-01-06", 4),
            ("2026-01-13", 4),
        ]);
        let insight = MoodInsightEngine::new().analyze(&entries).unwrap();
        assert_eq!(insight.weekday, Weekday::Tue);
    }

    #[test]
    fn unparseable_keys_are_skipped() {
        let mut entries = log(&[("2026-01-05", 1), ("2026-01-12", 1)]);
        entries.insert_raw("someday", MoodScore::WORST);
        entries.insert_raw("2026-02-30", MoodScore::WORST);
        let stats = MoodInsightEngine::new().weekday_stats(&entries);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count, 2);
        let insight = MoodInsightEngine::new().analyze(&entries).unwrap();
        assert_eq!(insight.bucket, InsightBucket::Positive);
        assert_eq!(insight.weekday, Weekday::Mon);
    }
}
