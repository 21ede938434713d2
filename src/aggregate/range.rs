use chrono::{Days, Months, NaiveDate};

/// Named look-back windows for date filtering, ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum DateRange {
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl DateRange {
    pub(crate) fn all() -> &'static [DateRange] {
        &[Self::Day, Self::Week, Self::Month, Self::Year, Self::All]
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" | "today" => Some(Self::Day),
            "week" | "w" => Some(Self::Week),
            "month" | "m" => Some(Self::Month),
            "year" | "y" => Some(Self::Year),
            "all" | "a" => Some(Self::All),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }

    /// The earliest date inside the window, or `None` for `All`.
    pub(crate) fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => today.checked_sub_days(Days::new(1)),
            Self::Week => today.checked_sub_days(Days::new(7)),
            Self::Month => today.checked_sub_months(Months::new(1)),
            Self::Year => today.checked_sub_months(Months::new(12)),
            Self::All => None,
        }
    }

    pub(crate) fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|r| r == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub(crate) fn prev(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|r| r == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
