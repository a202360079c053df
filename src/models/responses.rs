use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::MatchesByPlan;
use crate::models::domain::{Host, MatchResult, TravelPlan, TravelType};

pub const NO_MATCHES_MESSAGE: &str = "No matches found";

/// Host fields shown next to a matched plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSummary {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(rename = "profileImage")]
    pub profile_image: Option<String>,
    #[serde(rename = "isVerifiedBadge")]
    pub is_verified_badge: bool,
}

impl From<Host> for HostSummary {
    fn from(host: Host) -> Self {
        Self {
            id: host.id,
            full_name: host.full_name,
            profile_image: host.profile_image,
            is_verified_badge: host.is_verified_badge,
        }
    }
}

/// A matched plan as rendered by explore and dashboard surfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPlan {
    #[serde(rename = "referencePlanId", skip_serializing_if = "Option::is_none", default)]
    pub reference_plan_id: Option<String>,
    pub id: String,
    pub title: Option<String>,
    pub destination: String,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "travelType")]
    pub travel_type: TravelType,
    pub host: HostSummary,
}

impl From<&TravelPlan> for MatchedPlan {
    fn from(plan: &TravelPlan) -> Self {
        Self {
            reference_plan_id: None,
            id: plan.id.clone(),
            title: plan.title.clone(),
            destination: plan.destination.clone(),
            start_date: plan.start_date,
            end_date: plan.end_date,
            travel_type: plan.travel_type,
            host: plan.host_or_owner().into(),
        }
    }
}

impl From<&MatchResult> for MatchedPlan {
    fn from(result: &MatchResult) -> Self {
        Self {
            reference_plan_id: Some(result.reference_plan_id.clone()),
            ..MatchedPlan::from(&result.candidate_plan)
        }
    }
}

/// Response for explore and suggested-buddies endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MatchListResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub matches: Vec<MatchedPlan>,
}

impl MatchListResponse {
    pub fn new(matches: Vec<MatchedPlan>) -> Self {
        Self {
            success: true,
            message: matches.is_empty().then(|| NO_MATCHES_MESSAGE.to_string()),
            matches,
        }
    }
}

/// Response for the dashboard endpoint
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "upcomingPlans")]
    pub upcoming_plans: Vec<TravelPlan>,
    #[serde(rename = "matchesByPlan")]
    pub matches_by_plan: MatchesByPlan<MatchedPlan>,
}

/// Pagination metadata of a plan listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl PageMeta {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit as u64) as u32,
        }
    }
}

/// Response for plan listings
#[derive(Debug, Clone, Serialize)]
pub struct PlanListResponse {
    pub success: bool,
    pub data: Vec<TravelPlan>,
    pub meta: PageMeta,
}

/// Response for a single plan
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub success: bool,
    pub data: TravelPlan,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Visibility;

    #[test]
    fn test_empty_match_list_is_success_with_message() {
        let response = MatchListResponse::new(vec![]);

        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some(NO_MATCHES_MESSAGE));
    }

    #[test]
    fn test_matched_plan_falls_back_to_owner_host() {
        let plan = TravelPlan {
            id: "p1".to_string(),
            owner_id: "u7".to_string(),
            title: Some("Tea gardens".to_string()),
            destination: "Sylhet".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            end_date: None,
            travel_type: TravelType::Couple,
            visibility: Visibility::Public,
            budget_min: Some(100.0),
            budget_max: Some(300.0),
            host: None,
            created_at: None,
        };

        let view = MatchedPlan::from(&plan);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["host"]["id"], "u7");
        assert_eq!(json["host"]["isVerifiedBadge"], false);
        assert_eq!(json["startDate"], "2025-06-01");
        assert_eq!(json["travelType"], "COUPLE");
        assert!(json.get("referencePlanId").is_none());
    }

    #[test]
    fn test_page_meta_total_pages() {
        assert_eq!(PageMeta::new(1, 8, 17).total_pages, 3);
        assert_eq!(PageMeta::new(1, 8, 0).total_pages, 0);
        assert_eq!(PageMeta::new(1, 8, 16).total_pages, 2);
    }
}
