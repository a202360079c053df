use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use crate::models::{PageMeta, TravelPlan, TravelType, Visibility};

/// Errors that can occur when reading from the plan repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Plan repository unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Pool fetch parameters
///
/// `destination`, `travel_type` and `ends_on_or_after` are pre-filters
/// only; the matching engine re-applies its own predicate to whatever
/// comes back. `ends_on_or_after` compares against the plan's end date,
/// or its start date when it has none.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanQuery {
    pub page: u32,
    pub limit: u32,
    pub destination: Option<String>,
    pub travel_type: Option<TravelType>,
    pub visibility: Option<Visibility>,
    pub owner_id: Option<String>,
    pub ends_on_or_after: Option<NaiveDate>,
}

impl PlanQuery {
    /// First page of public plans
    pub fn public(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            destination: None,
            travel_type: None,
            visibility: Some(Visibility::Public),
            owner_id: None,
            ends_on_or_after: None,
        }
    }

    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn ends_on_or_after(mut self, date: NaiveDate) -> Self {
        self.ends_on_or_after = Some(date);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn offset(&self) -> u64 {
        (self.page.max(1) as u64 - 1) * self.limit as u64
    }
}

impl Default for PlanQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 100,
            destination: None,
            travel_type: None,
            visibility: None,
            owner_id: None,
            ends_on_or_after: None,
        }
    }
}

/// One page of plans in repository order (newest first)
#[derive(Debug, Clone)]
pub struct PlanPage {
    pub data: Vec<TravelPlan>,
    pub meta: PageMeta,
}

/// Storage of travel plans and their hosts.
///
/// Implementations return plans in their natural order; callers never
/// re-sort.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Plans matching `query`, paginated
    async fn list_plans(&self, query: &PlanQuery) -> Result<PlanPage, RepositoryError>;

    /// Every plan hosted by `owner_id`, any visibility
    async fn plans_by_owner(&self, owner_id: &str) -> Result<Vec<TravelPlan>, RepositoryError>;

    /// A single plan, `None` when absent
    async fn get_plan(&self, plan_id: &str) -> Result<Option<TravelPlan>, RepositoryError>;

    async fn health_check(&self) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PlanQuery::public(8).offset(), 0);
        assert_eq!(PlanQuery::public(8).page(3).offset(), 16);
        assert_eq!(PlanQuery::public(8).page(0).offset(), 0);
    }

    #[test]
    fn test_builder_pre_filters() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let query = PlanQuery::public(50).destination("sajek").ends_on_or_after(date);

        assert_eq!(query.destination.as_deref(), Some("sajek"));
        assert_eq!(query.ends_on_or_after, Some(date));
        assert_eq!(query.visibility, Some(Visibility::Public));
        assert_eq!(PlanQuery::default().ends_on_or_after, None);
    }
}
