use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use validator::Validate;
use crate::error::ApiError;
use crate::models::{
    DashboardResponse, ExploreQuery, HealthResponse, MatchListResponse, MatchedPlan, SuggestedQuery,
    NO_MATCHES_MESSAGE,
};
use crate::routes::auth::AuthenticatedUser;
use crate::services::MatchService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MatchService,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/travel-plans/match", web::get().to(explore))
        .route("/dashboard/user", web::get().to(dashboard))
        .route("/matches/suggested", web::get().to(suggested));
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = match state.service.repository().health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Plan repository health check failed: {}", e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Explore endpoint
///
/// GET /api/v1/travel-plans/match?destination=&startDate=&endDate=&travelType=&page=&limit=
///
/// Identity is optional; a signed-in requester never sees their own plans.
async fn explore(
    state: web::Data<AppState>,
    query: web::Query<ExploreQuery>,
    user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let requester = user.as_ref().map(|u| u.user_id.as_str());
    let matches = state.service.explore(&query, requester, today()).await?;

    let views: Vec<MatchedPlan> = matches.iter().map(MatchedPlan::from).collect();

    Ok(HttpResponse::Ok().json(MatchListResponse::new(views)))
}

/// Dashboard endpoint
///
/// GET /api/v1/dashboard/user
///
/// Returns the requester's upcoming plans and, per plan, its matches.
async fn dashboard(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let dashboard = state.service.dashboard(&user.user_id, today()).await?;

    let message = (dashboard.matches_by_plan.total_matches() == 0)
        .then(|| NO_MATCHES_MESSAGE.to_string());

    Ok(HttpResponse::Ok().json(DashboardResponse {
        success: true,
        message,
        matches_by_plan: dashboard.matches_by_plan.map(|m| MatchedPlan::from(m)),
        upcoming_plans: dashboard.upcoming_plans,
    }))
}

/// Suggested buddies endpoint
///
/// GET /api/v1/matches/suggested?limit=6
async fn suggested(
    state: web::Data<AppState>,
    query: web::Query<SuggestedQuery>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let matches = state
        .service
        .suggested(&user.user_id, query.limit, today())
        .await?;

    let views: Vec<MatchedPlan> = matches.iter().map(MatchedPlan::from).collect();

    Ok(HttpResponse::Ok().json(MatchListResponse::new(views)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TravelPlan, TravelType, Visibility};
    use crate::routes::auth::JwtVerifier;
    use crate::services::{InMemoryPlanRepository, MatchLimits};
    use actix_web::{http::StatusCode, test, App};
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::Value;
    use std::sync::Arc;

    const SECRET: &str = "test-secret";

    fn create_plan(id: &str, owner: &str, destination: &str, offset_days: i64) -> TravelPlan {
        let start = today() + Duration::days(offset_days);
        TravelPlan {
            id: id.to_string(),
            owner_id: owner.to_string(),
            title: Some(format!("Trip {}", id)),
            destination: destination.to_string(),
            description: None,
            start_date: Some(start),
            end_date: Some(start + Duration::days(4)),
            travel_type: TravelType::Friends,
            visibility: Visibility::Public,
            budget_min: None,
            budget_max: None,
            host: None,
            created_at: None,
        }
    }

    fn bearer(user_id: &str) -> String {
        let claims = serde_json::json!({
            "userId": user_id,
            "exp": Utc::now().timestamp() + 3600,
        });
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();
        format!("Bearer {}", token)
    }

    fn state(plans: Vec<TravelPlan>) -> AppState {
        let repository = Arc::new(InMemoryPlanRepository::new(plans));
        AppState {
            service: MatchService::new(repository, MatchLimits::default()),
        }
    }

    #[actix_web::test]
    async fn test_dashboard_requires_identity() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(vec![])))
                .app_data(web::Data::new(JwtVerifier::new(SECRET, "accessToken")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/dashboard/user").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_dashboard_groups_by_plan() {
        let plans = vec![
            create_plan("mine-1", "me", "Sajek", 10),
            create_plan("mine-2", "me", "Sylhet", 10),
            create_plan("theirs", "u2", "sajek", 12),
        ];
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(plans)))
                .app_data(web::Data::new(JwtVerifier::new(SECRET, "accessToken")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/dashboard/user")
            .insert_header(("Authorization", bearer("me")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["upcomingPlans"].as_array().unwrap().len(), 2);
        assert_eq!(body["matchesByPlan"]["mine-1"][0]["id"], "theirs");
        assert_eq!(body["matchesByPlan"]["mine-1"][0]["host"]["id"], "u2");
        assert_eq!(body["matchesByPlan"]["mine-2"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_explore_empty_is_success() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(vec![create_plan("1", "u2", "Sajek", 3)])))
                .app_data(web::Data::new(JwtVerifier::new(SECRET, "accessToken")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/travel-plans/match?destination=Bandarban")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], NO_MATCHES_MESSAGE);
        assert_eq!(body["matches"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_explore_excludes_signed_in_requester() {
        let plans = vec![
            create_plan("1", "me", "Sajek", 3),
            create_plan("2", "u2", "Sajek", 3),
        ];
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(plans)))
                .app_data(web::Data::new(JwtVerifier::new(SECRET, "accessToken")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/travel-plans/match?travelType=all")
            .insert_header(("Authorization", bearer("me")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["id"], "2");
    }

    #[actix_web::test]
    async fn test_explore_inverted_range_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(vec![])))
                .app_data(web::Data::new(JwtVerifier::new(SECRET, "accessToken")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/travel-plans/match?startDate=2025-06-10&endDate=2025-06-01")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
