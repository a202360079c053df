//! TripMate Match - trip-matching service for the TripMate travel-companion platform
//!
//! Finds other travelers' public plans whose destination and dates overlap
//! a reference plan or an ad hoc filter, and aggregates the results per plan
//! for the dashboard and explore surfaces.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{dedupe_by_counterpart, group_by_plan, upcoming_plans, DateWindow, MatchError, Matcher, MatchesByPlan};
pub use crate::models::{FilterCriteria, Host, MatchResult, TravelPlan, TravelType, TravelTypeFilter, Visibility};
