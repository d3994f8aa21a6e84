use chrono::{Days, NaiveDate};

use crate::models::Trip;

/// Criteria for the public trip search.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSearch {
    pub from: String,
    pub to: String,
    pub date: Option<NaiveDate>,
    /// Days on each side of `date` that still match. Zero means exact date.
    pub flexible_days: u32,
}

impl TripSearch {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            date: None,
            flexible_days: 0,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn flexible(mut self, days: u32) -> Self {
        self.flexible_days = days;
        self
    }

    /// Inclusive date bounds, or `None` when the search is not date-restricted.
    pub fn date_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        let date = self.date?;
        let days = Days::new(u64::from(self.flexible_days));
        let start = date.checked_sub_days(days).unwrap_or(NaiveDate::MIN);
        let end = date.checked_add_days(days).unwrap_or(NaiveDate::MAX);
        Some((start, end))
    }

    /// In-process equivalent of the SQL filter, used by the in-memory store.
    pub fn matches(&self, trip: &Trip) -> bool {
        if trip.from.to_lowercase() != self.from.to_lowercase()
            || trip.to.to_lowercase() != self.to.to_lowercase()
        {
            return false;
        }

        match self.date_window() {
            Some((start, end)) => trip.date >= start && trip.date <= end,
            None => true,
        }
    }
}
