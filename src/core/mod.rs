// Core algorithm exports
pub mod aggregator;
pub mod dates;
pub mod filters;
pub mod matcher;

pub use aggregator::{dedupe_by_counterpart, group_by_plan, upcoming_plans, MatchesByPlan};
pub use dates::{effective_end, is_upcoming, plan_window, DateWindow};
pub use filters::{is_visible_to, normalize_destination};
pub use matcher::{MatchError, MatchReference, Matcher};
