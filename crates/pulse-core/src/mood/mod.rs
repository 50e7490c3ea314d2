mod calendar;
mod entries;
mod insight;
mod store;

pub use calendar::{parse_month, DayCell, MonthGrid};
pub use entries::{date_key, parse_date, MoodEntries, MoodScore, DATE_FORMAT};
pub use insight::{
    weekday_name, InsightBucket, MoodInsight, MoodInsightEngine, WeekdayStats, DEFAULT_INSIGHT,
    MIN_SAMPLES,
};
pub use store::{MoodStore, MOOD_KEY};
