// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{FilterCriteria, Host, MatchResult, TravelPlan, TravelType, TravelTypeFilter, Visibility};
pub use requests::{ExploreQuery, PlanListQuery, SuggestedQuery};
pub use responses::{
    DashboardResponse, ErrorResponse, HealthResponse, HostSummary, MatchListResponse, MatchedPlan,
    PageMeta, PlanListResponse, PlanResponse, NO_MATCHES_MESSAGE,
};
