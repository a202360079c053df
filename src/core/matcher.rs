use chrono::NaiveDate;
use thiserror::Error;
use crate::core::{
    dates::{plan_window, DateWindow},
    filters::{
        destination_contains, destination_equals, is_foreign_owner, is_matchable,
        normalize_destination, not_expired, overlaps_window, travel_type_matches,
    },
};
use crate::models::{FilterCriteria, TravelPlan, TravelTypeFilter};

/// Errors raised before matching runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Invalid reference plan {plan_id}: {reason}")]
    InvalidReferencePlan { plan_id: String, reason: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// What candidates are matched against
#[derive(Debug, Clone, Copy)]
pub enum MatchReference<'a> {
    /// One of the requester's own plans (dashboard)
    Plan(&'a TravelPlan),
    /// An ad hoc filter set (explore)
    Filter(&'a FilterCriteria),
}

impl<'a> From<&'a TravelPlan> for MatchReference<'a> {
    fn from(plan: &'a TravelPlan) -> Self {
        MatchReference::Plan(plan)
    }
}

impl<'a> From<&'a FilterCriteria> for MatchReference<'a> {
    fn from(criteria: &'a FilterCriteria) -> Self {
        MatchReference::Filter(criteria)
    }
}

#[derive(Debug)]
enum DestinationRule {
    Any,
    Exact(String),
    Contains(String),
}

/// A reference reduced to one predicate shape shared by both modes
#[derive(Debug)]
struct Criteria<'a> {
    exclude_owner: Option<&'a str>,
    destination: DestinationRule,
    window: Option<DateWindow>,
    not_before: Option<NaiveDate>,
    travel_type: TravelTypeFilter,
}

impl<'a> Criteria<'a> {
    fn from_plan(plan: &'a TravelPlan) -> Result<Self, MatchError> {
        let invalid = |reason: &str| MatchError::InvalidReferencePlan {
            plan_id: plan.id.clone(),
            reason: reason.to_string(),
        };

        if plan.start_date.is_none() {
            return Err(invalid("missing startDate"));
        }
        let window = plan_window(plan).ok_or_else(|| invalid("startDate is after endDate"))?;

        Ok(Self {
            exclude_owner: Some(plan.owner_id.as_str()),
            destination: DestinationRule::Exact(normalize_destination(&plan.destination)),
            window: Some(window),
            not_before: None,
            travel_type: TravelTypeFilter::Any,
        })
    }

    fn from_filter(filter: &'a FilterCriteria) -> Result<Self, MatchError> {
        let destination = filter
            .destination
            .as_deref()
            .map(normalize_destination)
            .filter(|d| !d.is_empty())
            .map(DestinationRule::Contains)
            .unwrap_or(DestinationRule::Any);

        let window = match (filter.start_date, filter.end_date) {
            (None, None) => None,
            (start, end) => Some(DateWindow::open_ended(start, end).ok_or(
                MatchError::InvalidDateRange {
                    start: start.unwrap_or(NaiveDate::MIN),
                    end: end.unwrap_or(NaiveDate::MAX),
                },
            )?),
        };

        Ok(Self {
            exclude_owner: filter.requester_id.as_deref(),
            destination,
            window,
            not_before: filter.not_before,
            travel_type: filter.travel_type,
        })
    }

    #[inline]
    fn accepts(&self, candidate: &TravelPlan) -> bool {
        // Self and own-plan exclusion
        if let Some(owner) = self.exclude_owner {
            if !is_foreign_owner(candidate, owner) {
                return false;
            }
        }

        if !is_matchable(candidate) {
            return false;
        }

        let destination_ok = match &self.destination {
            DestinationRule::Any => true,
            DestinationRule::Exact(reference) => destination_equals(candidate, reference),
            DestinationRule::Contains(needle) => destination_contains(candidate, needle),
        };
        if !destination_ok {
            return false;
        }

        if let Some(window) = &self.window {
            if !overlaps_window(candidate, window) {
                return false;
            }
        }

        if let Some(today) = self.not_before {
            if !not_expired(candidate, today) {
                return false;
            }
        }

        travel_type_matches(candidate, &self.travel_type)
    }
}

/// Trip-matching engine.
///
/// Pure and stateless: the pool is always passed in, the engine never
/// fetches, caches, or reorders. Output keeps the pool's order.
///
/// # Predicate
/// 1. Candidate owner differs from the reference owner
/// 2. Candidate is PUBLIC
/// 3. Destination equal (plan mode) or contained (filter mode)
/// 4. Inclusive date-window overlap
/// 5. Travel type, when filtered
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Check a reference without running it, so callers can reject bad
    /// input before fetching a pool
    pub fn validate<'a, R>(&self, reference: R) -> Result<(), MatchError>
    where
        R: Into<MatchReference<'a>>,
    {
        match reference.into() {
            MatchReference::Plan(plan) => Criteria::from_plan(plan).map(|_| ()),
            MatchReference::Filter(filter) => Criteria::from_filter(filter).map(|_| ()),
        }
    }

    /// Find all candidates in `pool` matching `reference`
    ///
    /// # Errors
    /// `MatchError::InvalidReferencePlan` when a reference plan has no
    /// usable start date, `MatchError::InvalidDateRange` when a filter's
    /// explicit range is inverted.
    pub fn find_matches<'a, R>(
        &self,
        reference: R,
        pool: &[TravelPlan],
    ) -> Result<Vec<TravelPlan>, MatchError>
    where
        R: Into<MatchReference<'a>>,
    {
        let criteria = match reference.into() {
            MatchReference::Plan(plan) => Criteria::from_plan(plan)?,
            MatchReference::Filter(filter) => Criteria::from_filter(filter)?,
        };

        let matches: Vec<TravelPlan> = pool
            .iter()
            .filter(|candidate| criteria.accepts(candidate))
            .cloned()
            .collect();

        tracing::trace!(
            "Matched {} of {} candidates ({:?})",
            matches.len(),
            pool.len(),
            criteria.destination
        );

        Ok(matches)
    }
}
