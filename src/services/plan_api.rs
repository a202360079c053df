use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use crate::models::{PageMeta, TravelPlan};
use crate::services::repository::{PlanPage, PlanQuery, PlanRepository, RepositoryError};

/// Upper bound on pages walked when collecting one owner's plans
const MAX_OWNER_PAGES: u32 = 20;
const OWNER_PAGE_SIZE: u32 = 100;

/// Client for the platform's travel-plan REST API
///
/// Reads plans through:
/// - `GET /travel-plans` (filters, pagination)
/// - `GET /travel-plans/{id}`
///
/// Responses use the `{ success, message?, data, meta? }` envelope.
pub struct PlanApiClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl PlanApiClient {
    /// Create a new plan API client
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, RepositoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Read the envelope, failing on `success: false`
    async fn read_envelope(response: reqwest::Response, what: &str) -> Result<Value, RepositoryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Plan API error while fetching {}: {} - {}", what, status, body);
            return Err(RepositoryError::Unavailable(format!(
                "Failed to fetch {}: {}",
                what, status
            )));
        }

        let json: Value = response.json().await?;

        if json.get("success").and_then(Value::as_bool) == Some(false) {
            let message = json
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("request rejected");
            return Err(RepositoryError::Unavailable(format!(
                "Failed to fetch {}: {}",
                what, message
            )));
        }

        Ok(json)
    }
}

/// Parse one plan document, skipping (with a warning) anything malformed
fn parse_plan(doc: &Value) -> Option<TravelPlan> {
    let id = doc.get("id").and_then(serde_json::Value::as_str).unwrap_or("<no id>");

    let plan = match serde_json::from_value::<TravelPlan>(doc.clone()) {
        Ok(plan) => plan.with_owner_from_host(),
        Err(e) => {
            tracing::warn!("Skipping malformed plan document {}: {}", id, e);
            return None;
        }
    };

    match plan.check_budget() {
        Ok(()) => Some(plan),
        Err(reason) => {
            tracing::warn!("Skipping plan document {} with invalid budget: {}", id, reason);
            None
        }
    }
}

fn parse_page(json: &Value, query: &PlanQuery) -> Result<PlanPage, RepositoryError> {
    let documents = json
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| RepositoryError::InvalidResponse("Missing data array".into()))?;

    let data: Vec<TravelPlan> = documents.iter().filter_map(parse_plan).collect();

    let meta = match json.get("meta") {
        Some(meta) => serde_json::from_value(meta.clone())
            .map_err(|e| RepositoryError::InvalidResponse(format!("Failed to parse meta: {}", e)))?,
        None => PageMeta::new(query.page, query.limit, data.len() as u64),
    };

    Ok(PlanPage { data, meta })
}

#[async_trait]
impl PlanRepository for PlanApiClient {
    async fn list_plans(&self, query: &PlanQuery) -> Result<PlanPage, RepositoryError> {
        let mut params: Vec<(&str, String)> = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(destination) = &query.destination {
            params.push(("destination", destination.clone()));
        }
        if let Some(travel_type) = query.travel_type {
            params.push(("travelType", travel_type.to_string()));
        }
        if let Some(visibility) = query.visibility {
            params.push(("visibility", visibility.as_str().to_string()));
        }
        if let Some(owner_id) = &query.owner_id {
            params.push(("hostId", owner_id.clone()));
        }
        if let Some(day) = query.ends_on_or_after {
            params.push(("endsOnOrAfter", day.format("%Y-%m-%d").to_string()));
        }

        let url = self.url("/travel-plans");
        tracing::debug!("Fetching plans from {} with {:?}", url, params);

        let response = self.get(&url).query(&params).send().await?;
        let json = Self::read_envelope(response, "travel plans").await?;
        let page = parse_page(&json, query)?;

        tracing::debug!(
            "Fetched {} plans (page {} of {}, total {})",
            page.data.len(),
            page.meta.page,
            page.meta.total_pages,
            page.meta.total
        );

        Ok(page)
    }

    async fn plans_by_owner(&self, owner_id: &str) -> Result<Vec<TravelPlan>, RepositoryError> {
        let mut plans = Vec::new();
        let mut query = PlanQuery {
            limit: OWNER_PAGE_SIZE,
            owner_id: Some(owner_id.to_string()),
            ..Default::default()
        };

        for page in 1..=MAX_OWNER_PAGES {
            query = query.page(page);
            let result = self.list_plans(&query).await?;
            let fetched = result.data.len();

            // A remote that ignores hostId must not leak others' plans in
            plans.extend(result.data.into_iter().filter(|p| p.owner_id == owner_id));

            if fetched == 0 || page >= result.meta.total_pages {
                break;
            }
        }

        tracing::debug!("Owner {} has {} plans", owner_id, plans.len());

        Ok(plans)
    }

    async fn get_plan(&self, plan_id: &str) -> Result<Option<TravelPlan>, RepositoryError> {
        let url = self.url(&format!("/travel-plans/{}", urlencoding::encode(plan_id)));

        let response = self.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let json = Self::read_envelope(response, "travel plan").await?;
        let doc = json
            .get("data")
            .ok_or_else(|| RepositoryError::InvalidResponse("Missing data object".into()))?;

        if doc.is_null() {
            return Ok(None);
        }

        let plan = serde_json::from_value::<TravelPlan>(doc.clone())
            .map(TravelPlan::with_owner_from_host)
            .map_err(|e| RepositoryError::InvalidResponse(format!("Failed to parse plan: {}", e)))?;
        plan.check_budget().map_err(RepositoryError::InvalidResponse)?;

        Ok(Some(plan))
    }

    async fn health_check(&self) -> Result<bool, RepositoryError> {
        let query = PlanQuery {
            limit: 1,
            ..Default::default()
        };
        self.list_plans(&query).await.map(|_| true)
    }
}
