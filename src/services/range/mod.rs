//! Query-range resolution for the active view.
//!
//! The remote store is always queried for a whole calendar-day window;
//! this module derives that window from the view mode and anchor date.

use chrono::{Days, NaiveDate};

use crate::models::view_context::{ViewContext, ViewMode};
use crate::utils::date::{first_of_month, last_of_month, monday_on_or_before};

/// An inclusive calendar-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Resolve the window to query for a view mode and anchor date.
///
/// An explicit override range wins unconditionally. Weeks are Monday-first
/// and always exactly seven days; a Sunday anchor falls in the week that
/// *ends* on that Sunday, never the one starting the next day.
pub fn resolve_range(
    view_mode: ViewMode,
    anchor: NaiveDate,
    explicit: Option<(NaiveDate, NaiveDate)>,
) -> DateRange {
    if let Some((start, end)) = explicit {
        return DateRange::new(start, end);
    }

    match view_mode {
        ViewMode::Day => DateRange::new(anchor, anchor),
        ViewMode::Week => {
            let monday = monday_on_or_before(anchor);
            DateRange::new(monday, monday + Days::new(6))
        }
        ViewMode::Month => DateRange::new(first_of_month(anchor), last_of_month(anchor)),
    }
}

/// Resolve the window for a full view context.
pub fn resolve_context_range(ctx: &ViewContext) -> DateRange {
    resolve_range(ctx.view_mode, ctx.anchor, ctx.explicit_range)
}
