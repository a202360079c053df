use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use crate::core::{
    dedupe_by_counterpart, group_by_plan, normalize_destination, upcoming_plans, MatchError, Matcher,
    MatchesByPlan,
};
use crate::models::{ExploreQuery, MatchResult, TravelPlan, Visibility};
use crate::services::repository::{PlanQuery, PlanRepository, RepositoryError};

/// Errors surfaced by the match adapters
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Pool and display limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    pub pool_page_size: u32,
    pub max_pool_page_size: u32,
    pub suggestion_limit: usize,
    pub max_suggestion_limit: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            pool_page_size: 100,
            max_pool_page_size: 500,
            suggestion_limit: 6,
            max_suggestion_limit: 50,
        }
    }
}

/// The requester's upcoming plans with their matches
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub upcoming_plans: Vec<TravelPlan>,
    pub matches_by_plan: MatchesByPlan,
}

/// Entry point for both match call sites.
///
/// Each operation fetches a fresh pool from the repository, then hands it
/// to the engine. Nothing is cached between requests.
#[derive(Clone)]
pub struct MatchService {
    repository: Arc<dyn PlanRepository>,
    matcher: Matcher,
    limits: MatchLimits,
}

impl MatchService {
    pub fn new(repository: Arc<dyn PlanRepository>, limits: MatchLimits) -> Self {
        Self {
            repository,
            matcher: Matcher::new(),
            limits,
        }
    }

    pub fn repository(&self) -> &Arc<dyn PlanRepository> {
        &self.repository
    }

    pub fn limits(&self) -> MatchLimits {
        self.limits
    }

    /// Every plan matching `query`, walking pages until the repository runs out
    async fn collect_pool(&self, query: PlanQuery) -> Result<Vec<TravelPlan>, RepositoryError> {
        let mut pool = Vec::new();
        let mut page = 1;

        loop {
            let result = self.repository.list_plans(&query.clone().page(page)).await?;
            let fetched = result.data.len();
            pool.extend(result.data);

            if fetched == 0 || page >= result.meta.total_pages {
                break;
            }
            page += 1;
        }

        Ok(pool)
    }

    /// Explore: match an ad hoc filter set against one page of public,
    /// still-running plans
    pub async fn explore(
        &self,
        query: &ExploreQuery,
        requester_id: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<TravelPlan>, ServiceError> {
        let criteria = query.to_criteria(requester_id, today);
        self.matcher.validate(&criteria)?;

        // Candidates must still be running today and reach the filter's start
        let ends_on_or_after = criteria.start_date.map_or(today, |start| start.max(today));

        let pool_query = PlanQuery {
            page: query.page.unwrap_or(1).max(1),
            limit: query
                .limit
                .unwrap_or(self.limits.pool_page_size)
                .clamp(1, self.limits.max_pool_page_size),
            destination: criteria.destination.clone(),
            travel_type: query.travel_type(),
            visibility: Some(Visibility::Public),
            owner_id: None,
            ends_on_or_after: Some(ends_on_or_after),
        };

        let pool = self.repository.list_plans(&pool_query).await?;
        let matches = self.matcher.find_matches(&criteria, &pool.data)?;

        tracing::info!(
            "Explore returned {} matches from {} pooled plans (destination: {:?})",
            matches.len(),
            pool.data.len(),
            criteria.destination
        );

        Ok(matches)
    }

    /// Dashboard: match each of the requester's upcoming plans
    pub async fn dashboard(&self, user_id: &str, today: NaiveDate) -> Result<Dashboard, ServiceError> {
        let own_plans = self.repository.plans_by_owner(user_id).await?;
        let upcoming = upcoming_plans(&own_plans, today);

        // Reject bad reference plans before fetching the pool
        for plan in &upcoming {
            self.matcher.validate(plan)?;
        }

        if upcoming.is_empty() {
            tracing::debug!("User {} has no upcoming plans", user_id);
            return Ok(Dashboard {
                upcoming_plans: upcoming,
                matches_by_plan: MatchesByPlan::new(),
            });
        }

        // Reference plans sharing a destination share one candidate pool
        let mut by_destination: Vec<(String, Vec<TravelPlan>)> = Vec::new();
        for plan in &upcoming {
            let destination = normalize_destination(&plan.destination);
            match by_destination.iter_mut().find(|(d, _)| *d == destination) {
                Some((_, references)) => references.push(plan.clone()),
                None => by_destination.push((destination, vec![plan.clone()])),
            }
        }

        let mut grouped: Vec<(String, MatchesByPlan)> = Vec::with_capacity(by_destination.len());
        for (destination, references) in by_destination {
            let mut query = PlanQuery::public(self.limits.pool_page_size);
            if !destination.is_empty() {
                query = query.destination(destination.clone());
            }
            if let Some(earliest) = references.iter().filter_map(|p| p.start_date).min() {
                query = query.ends_on_or_after(earliest);
            }

            let pool = self.collect_pool(query).await?;
            tracing::debug!("Pooled {} candidates for destination '{}'", pool.len(), destination);

            let matches = group_by_plan(&self.matcher, &references, &pool)?;
            grouped.push((destination, matches));
        }

        let mut matches_by_plan = MatchesByPlan::new();
        for plan in &upcoming {
            let destination = normalize_destination(&plan.destination);
            let matches = grouped
                .iter()
                .find(|(d, _)| *d == destination)
                .and_then(|(_, matches)| matches.get(&plan.id))
                .map(<[MatchResult]>::to_vec)
                .unwrap_or_default();
            matches_by_plan.insert(plan.id.clone(), matches);
        }

        tracing::info!(
            "Dashboard for {}: {} upcoming plans, {} matches",
            user_id,
            upcoming.len(),
            matches_by_plan.total_matches()
        );

        Ok(Dashboard {
            upcoming_plans: upcoming,
            matches_by_plan,
        })
    }

    /// Suggested buddies: dashboard matches with one entry per host
    pub async fn suggested(
        &self,
        user_id: &str,
        limit: Option<usize>,
        today: NaiveDate,
    ) -> Result<Vec<MatchResult>, ServiceError> {
        let dashboard = self.dashboard(user_id, today).await?;
        let limit = limit
            .unwrap_or(self.limits.suggestion_limit)
            .min(self.limits.max_suggestion_limit);

        Ok(dedupe_by_counterpart(&dashboard.matches_by_plan, limit))
    }
}
