use async_trait::async_trait;
use std::path::Path;
use crate::core::{is_upcoming, normalize_destination};
use crate::models::{PageMeta, TravelPlan};
use crate::services::repository::{PlanPage, PlanQuery, PlanRepository, RepositoryError};

/// Plan repository held in memory, in insertion order.
///
/// Backs local development (seeded from a JSON array of plans) and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanRepository {
    plans: Vec<TravelPlan>,
}

impl InMemoryPlanRepository {
    pub fn new(plans: Vec<TravelPlan>) -> Self {
        Self { plans }
    }

    /// Load plans from a JSON file containing an array of plan documents
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::Unavailable(format!("Cannot read seed file {}: {}", path.display(), e))
        })?;

        let plans: Vec<TravelPlan> = serde_json::from_str(&raw)
            .map_err(|e| RepositoryError::InvalidResponse(format!("Invalid seed file: {}", e)))?;

        let plans: Vec<TravelPlan> = plans
            .into_iter()
            .map(TravelPlan::with_owner_from_host)
            .filter(|plan| match plan.check_budget() {
                Ok(()) => true,
                Err(reason) => {
                    tracing::warn!("Skipping seed plan {} with invalid budget: {}", plan.id, reason);
                    false
                }
            })
            .collect();

        tracing::info!("Loaded {} seed plans from {}", plans.len(), path.display());

        Ok(Self::new(plans))
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    fn matches_query(plan: &TravelPlan, query: &PlanQuery, destination: Option<&str>) -> bool {
        destination.map_or(true, |d| normalize_destination(&plan.destination).contains(d))
            && query.travel_type.map_or(true, |t| plan.travel_type == t)
            && query.visibility.map_or(true, |v| plan.visibility == v)
            && query.owner_id.as_deref().map_or(true, |o| plan.owner_id == o)
            && query.ends_on_or_after.map_or(true, |day| is_upcoming(plan, day))
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn list_plans(&self, query: &PlanQuery) -> Result<PlanPage, RepositoryError> {
        let destination = query
            .destination
            .as_deref()
            .map(normalize_destination)
            .filter(|d| !d.is_empty());

        let filtered: Vec<&TravelPlan> = self
            .plans
            .iter()
            .filter(|plan| Self::matches_query(plan, query, destination.as_deref()))
            .collect();

        let total = filtered.len() as u64;
        let data = filtered
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(PlanPage {
            data,
            meta: PageMeta::new(query.page.max(1), query.limit, total),
        })
    }

    async fn plans_by_owner(&self, owner_id: &str) -> Result<Vec<TravelPlan>, RepositoryError> {
        Ok(self
            .plans
            .iter()
            .filter(|plan| plan.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_plan(&self, plan_id: &str) -> Result<Option<TravelPlan>, RepositoryError> {
        Ok(self.plans.iter().find(|plan| plan.id == plan_id).cloned())
    }

    async fn health_check(&self) -> Result<bool, RepositoryError> {
        Ok(true)
    }
}
