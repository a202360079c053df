use chrono::NaiveDate;
use crate::models::TravelPlan;

/// Inclusive calendar-date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Build a window, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// A single-day trip
    pub fn point(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// Window with either bound optional; a missing bound is unbounded
    pub fn open_ended(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        Self::new(
            start.unwrap_or(NaiveDate::MIN),
            end.unwrap_or(NaiveDate::MAX),
        )
    }

    /// Inclusive overlap: any shared day counts
    #[inline]
    pub fn overlaps(&self, other: &DateWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    #[inline]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// End date used for overlap; a trip without one lasts a single day
#[inline]
pub fn effective_end(start: NaiveDate, end: Option<NaiveDate>) -> NaiveDate {
    end.unwrap_or(start)
}

/// Date window of a plan.
///
/// `None` when the plan has no start date or its dates are inverted.
#[inline]
pub fn plan_window(plan: &TravelPlan) -> Option<DateWindow> {
    let start = plan.start_date?;
    DateWindow::new(start, effective_end(start, plan.end_date))
}

/// Whether the trip has not yet ended as of `today`.
///
/// Uses `endDate`, falling back to `startDate`; a plan with neither is
/// never upcoming.
#[inline]
pub fn is_upcoming(plan: &TravelPlan, today: NaiveDate) -> bool {
    plan.end_date
        .or(plan.start_date)
        .map(|last_day| last_day >= today)
        .unwrap_or(false)
}
