use chrono::{Datelike, Local, NaiveDate};
use clap::Subcommand;
use pulse_core::mood::{parse_date, parse_month, MonthGrid, MoodInsightEngine};
use pulse_core::{Database, MoodScore, MoodStore, ValidationError};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Log a mood score (1 = great, 5 = awful)
    Set {
        /// Score from 1 to 5
        score: i64,
        /// Date as yyyy-MM-dd (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the score for a day
    Get {
        /// Date as yyyy-MM-dd (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove the score for a day
    Clear {
        /// Date as yyyy-MM-dd (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Print every logged score as JSON
    List,
    /// Weekly pattern insight
    Insight {
        /// Include per-weekday statistics
        #[arg(long)]
        stats: bool,
    },
    /// Month calendar of logged moods
    Calendar {
        /// Month as yyyy-MM (defaults to the current month)
        #[arg(long)]
        month: Option<String>,
        /// Print the grid as JSON
        #[arg(long)]
        json: bool,
    },
}

fn resolve_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    date.map_or(Ok(today), parse_date)
}

fn render_calendar(grid: &MonthGrid) -> String {
    let mut out = format!("{:^20}\nMo Tu We Th Fr Sa Su\n", grid.title);
    let mut column = grid.leading_blanks;
    out.push_str(&"   ".repeat(column as usize));
    for cell in &grid.days {
        let mark = match cell.mood {
            Some(score) => format!(" {score}"),
            None if cell.is_today => " *".to_string(),
            None if cell.is_future => "  ".to_string(),
            None => " .".to_string(),
        };
        out.push_str(&mark);
        column += 1;
        if column % 7 == 0 {
            out.push('\n');
        } else {
            out.push(' ');
        }
    }
    out.trim_end().to_string()
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut store = MoodStore::load(&db);
    let today = Local::now().date_naive();

    match action {
        MoodAction::Set { score, date } => {
            let date = resolve_date(date.as_deref(), today)?;
            if date > today {
                return Err(ValidationError::InvalidValue {
                    field: "date".into(),
                    message: format!("{date} is in the future"),
                }
                .into());
            }
            let event = store.set_mood(date, MoodScore::new(score)?)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        MoodAction::Get { date } => {
            let date = resolve_date(date.as_deref(), today)?;
            let value = serde_json::json!({
                "date": pulse_core::mood::date_key(date),
                "score": store.mood(date),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        MoodAction::Clear { date } => {
            let date = resolve_date(date.as_deref(), today)?;
            match store.remove_mood(date)? {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("no mood logged for {date}"),
            }
        }
        MoodAction::List => {
            println!("{}", serde_json::to_string_pretty(store.entries())?);
        }
        MoodAction::Insight { stats } => {
            let engine = MoodInsightEngine::new();
            let insight = store.insight();
            let mut value = serde_json::json!({
                "message": store.weekly_insight(),
                "insight": insight,
            });
            if stats {
                value["weekdays"] = serde_json::to_value(engine.weekday_stats(store.entries()))?;
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        MoodAction::Calendar { month, json } => {
            let (year, month) = match month.as_deref() {
                Some(s) => parse_month(s)?,
                None => (today.year(), today.month()),
            };
            let grid = MonthGrid::new(year, month, today, store.entries())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                println!("{}", render_calendar(&grid));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::MoodEntries;

    #[test]
    fn calendar_rows_start_on_monday() {
        let today = parse_date("2026-01-15").unwrap();
        let mut entries = MoodEntries::new();
        entries.set(parse_date("2026-01-05").unwrap(), MoodScore::new(2).unwrap());
        let grid = MonthGrid::new(2026, 1, today, &entries).unwrap();
        let text = render_calendar(&grid);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0].trim(), "January 2026");
        assert_eq!(lines[1], "Mo Tu We Th Fr Sa Su");
        // Jan 1st is a Thursday: three blank cells first.
        assert!(lines[2].starts_with("          . "));
        // Monday the 5th carries its score.
        assert!(lines[3].starts_with(" 2 "));
    }

    #[test]
    fn resolve_date_defaults_to_today() {
        let today = parse_date("2026-01-15").unwrap();
        assert_eq!(resolve_date(None, today).unwrap(), today);
        assert!(resolve_date(Some("tomorrow"), today).is_err());
    }
}
