use chrono::NaiveDate;
use crate::core::dates::{is_upcoming, plan_window, DateWindow};
use crate::models::{TravelPlan, TravelTypeFilter};

/// Normalize a destination for comparison: trimmed and lowercased
#[inline]
pub fn normalize_destination(destination: &str) -> String {
    destination.trim().to_lowercase()
}

/// Candidate is hosted by someone other than `owner_id`
#[inline]
pub fn is_foreign_owner(candidate: &TravelPlan, owner_id: &str) -> bool {
    candidate.owner_id != owner_id
}

/// Only PUBLIC plans take part in cross-user matching
#[inline]
pub fn is_matchable(candidate: &TravelPlan) -> bool {
    candidate.is_public()
}

/// Read access for plan listings: PRIVATE plans are visible to their owner only
#[inline]
pub fn is_visible_to(plan: &TravelPlan, requester_id: Option<&str>) -> bool {
    plan.is_public() || requester_id.is_some_and(|id| id == plan.owner_id)
}

/// Exact destination match against an already-normalized reference
#[inline]
pub fn destination_equals(candidate: &TravelPlan, normalized: &str) -> bool {
    normalize_destination(&candidate.destination) == normalized
}

/// Substring destination match against an already-normalized needle
#[inline]
pub fn destination_contains(candidate: &TravelPlan, normalized: &str) -> bool {
    normalized.is_empty() || normalize_destination(&candidate.destination).contains(normalized)
}

/// Candidate's trip shares at least one day with `window`.
///
/// Candidates without a usable date window never overlap.
#[inline]
pub fn overlaps_window(candidate: &TravelPlan, window: &DateWindow) -> bool {
    plan_window(candidate).is_some_and(|own| own.overlaps(window))
}

#[inline]
pub fn travel_type_matches(candidate: &TravelPlan, filter: &TravelTypeFilter) -> bool {
    filter.accepts(candidate.travel_type)
}

/// Candidate's trip has not ended before `today`
#[inline]
pub fn not_expired(candidate: &TravelPlan, today: NaiveDate) -> bool {
    is_upcoming(candidate, today)
}
