// View context module
// Which slice of the calendar is on screen, and how it may be edited

use chrono::{Days, Months, NaiveDate};

/// Calendar view modes offered by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Day,
    Week,
    Month,
}

impl ViewMode {
    /// Month view is read-only: no dragging, resizing, or slot selection.
    /// This is a hard precondition, not a cosmetic affordance.
    pub fn allows_editing(&self) -> bool {
        !matches!(self, ViewMode::Month)
    }
}

/// Scope appointments to one doctor, or show everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorFilter {
    All,
    Doctor(i64),
}

impl DoctorFilter {
    pub fn doctor_id(&self) -> Option<i64> {
        match self {
            DoctorFilter::All => None,
            DoctorFilter::Doctor(id) => Some(*id),
        }
    }
}

/// The active view: mode, anchor date, optional explicit override range,
/// and doctor scoping. Owned by the scheduler; mutated only through
/// explicit navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContext {
    pub view_mode: ViewMode,
    pub anchor: NaiveDate,
    pub explicit_range: Option<(NaiveDate, NaiveDate)>,
    pub doctor_filter: DoctorFilter,
}

impl ViewContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view_mode: ViewMode::Day,
            anchor: today,
            explicit_range: None,
            doctor_filter: DoctorFilter::All,
        }
    }

    /// Advance the anchor by one day, week, or month per the view mode.
    pub fn step_forward(&mut self) {
        self.anchor = match self.view_mode {
            ViewMode::Day => self.anchor + Days::new(1),
            ViewMode::Week => self.anchor + Days::new(7),
            ViewMode::Month => self
                .anchor
                .checked_add_months(Months::new(1))
                .unwrap_or(self.anchor),
        };
    }

    /// Move the anchor back by one day, week, or month per the view mode.
    pub fn step_backward(&mut self) {
        self.anchor = match self.view_mode {
            ViewMode::Day => self.anchor - Days::new(1),
            ViewMode::Week => self.anchor - Days::new(7),
            ViewMode::Month => self
                .anchor
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.anchor),
        };
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.anchor = date;
    }
}
