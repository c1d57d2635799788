//! Grouping daily totals by weekday and by season

use crate::dataset::DailyTotal;
use chrono::{Datelike, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days of the week in report order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Hemisphere, used to map calendar months to seasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

/// Meteorological season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Season of a calendar month (1-12)
    ///
    /// Northern: DJF winter, MAM spring, JJA summer, SON autumn.
    /// Southern hemisphere flips each season.
    pub fn from_month(month: u32, hemisphere: Hemisphere) -> Self {
        let north = match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        };

        match hemisphere {
            Hemisphere::North => north,
            Hemisphere::South => north.opposite(),
        }
    }

    fn opposite(self) -> Self {
        match self {
            Season::Winter => Season::Summer,
            Season::Spring => Season::Autumn,
            Season::Summer => Season::Winter,
            Season::Autumn => Season::Spring,
        }
    }

    fn index(self) -> usize {
        match self {
            Season::Winter => 0,
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Autumn => 3,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        };
        f.write_str(name)
    }
}

/// Full English name of a weekday
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

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Seven groups, Monday first; groups may be empty
pub fn group_by_weekday(days: &[DailyTotal]) -> Vec<Vec<f64>> {
    let mut groups = vec![Vec::new(); WEEKDAYS.len()];
    for day in days {
        groups[day.date.weekday().num_days_from_monday() as usize].push(day.steps);
    }
    groups
}

/// Four groups in [`Season::ALL`] order; groups may be empty
pub fn group_by_season(days: &[DailyTotal], hemisphere: Hemisphere) -> Vec<Vec<f64>> {
    let mut groups = vec![Vec::new(); Season::ALL.len()];
    for day in days {
        let season = Season::from_month(day.date.month(), hemisphere);
        groups[season.index()].push(day.steps);
    }
    groups
}

/// (weekday totals, weekend totals)
pub fn split_weekend(days: &[DailyTotal]) -> (Vec<f64>, Vec<f64>) {
    let (weekend, weekday): (Vec<&DailyTotal>, Vec<&DailyTotal>) =
        days.iter().partition(|d| is_weekend(d.date.weekday()));

    (
        weekday.iter().map(|d| d.steps).collect(),
        weekend.iter().map(|d| d.steps).collect(),
    )
}

/// Drop empty groups before running a test
pub fn non_empty(groups: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    groups.into_iter().filter(|g| !g.is_empty()).collect()
}
