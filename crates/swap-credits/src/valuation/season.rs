use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Demand bucket a stay falls into, keyed off its first night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Off,
    Shoulder,
    Peak,
}

impl Season {
    /// Fixed valuation multiplier for the bucket. Not admin-tunable.
    pub fn index(self) -> f64 {
        match self {
            Season::Peak => 1.30,
            Season::Shoulder => 1.05,
            Season::Off => 0.90,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Off => "off",
            Season::Shoulder => "shoulder",
            Season::Peak => "peak",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Month-to-season table. January is index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCalendar {
    months: [Season; 12],
}

impl SeasonCalendar {
    /// Northern-hemisphere heuristic: summer peak, spring/autumn shoulder, winter off.
    pub fn standard() -> Self {
        use Season::{Off, Peak, Shoulder};
        Self {
            months: [
                Off, Off, Shoulder, Shoulder, Shoulder, Peak, Peak, Peak, Shoulder, Shoulder, Off,
                Off,
            ],
        }
    }

    pub fn from_months(months: [Season; 12]) -> Self {
        Self { months }
    }

    pub fn classify(&self, date: NaiveDate) -> Season {
        self.months[date.month0() as usize]
    }
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        Self::standard()
    }
}

/// Classify with the standard calendar.
pub fn classify_season(date: NaiveDate) -> Season {
    SeasonCalendar::standard().classify(date)
}
