use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::core::is_visible_to;
use crate::error::ApiError;
use crate::models::{PlanListQuery, PlanListResponse, PlanResponse, Visibility};
use crate::routes::{auth::AuthenticatedUser, matches::AppState};
use crate::services::PlanQuery;

/// Configure plan read routes. Registered after the match routes so that
/// `/travel-plans/match` wins over `/travel-plans/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/travel-plans", web::get().to(list_plans))
        .route("/travel-plans/my", web::get().to(my_plans))
        .route("/travel-plans/{id}", web::get().to(get_plan));
}

/// GET /api/v1/travel-plans?page=1&limit=8&destination=&travelType=
async fn list_plans(
    state: web::Data<AppState>,
    query: web::Query<PlanListQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;
    let travel_type = query.travel_type().map_err(ApiError::BadRequest)?;
    let limits = state.service.limits();

    let plan_query = PlanQuery {
        page: query.page.unwrap_or(1).max(1),
        limit: query
            .limit
            .unwrap_or(limits.pool_page_size)
            .clamp(1, limits.max_pool_page_size),
        destination: query.destination.clone(),
        travel_type,
        visibility: Some(Visibility::Public),
        owner_id: None,
        ends_on_or_after: None,
    };

    let mut page = state.service.repository().list_plans(&plan_query).await?;
    page.data.retain(|plan| is_visible_to(plan, None));

    Ok(HttpResponse::Ok().json(PlanListResponse {
        success: true,
        data: page.data,
        meta: page.meta,
    }))
}

/// GET /api/v1/travel-plans/my
async fn my_plans(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let plans = state.service.repository().plans_by_owner(&user.user_id).await?;
    let meta = crate::models::PageMeta::new(1, plans.len().max(1) as u32, plans.len() as u64);

    Ok(HttpResponse::Ok().json(PlanListResponse {
        success: true,
        data: plans,
        meta,
    }))
}

/// GET /api/v1/travel-plans/{id}
///
/// Another owner's PRIVATE plan answers exactly like a missing one.
async fn get_plan(
    state: web::Data<AppState>,
    path: web::Path<String>,
    user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, ApiError> {
    let plan_id = path.into_inner();
    let requester = user.as_ref().map(|u| u.user_id.as_str());

    let plan = state
        .service
        .repository()
        .get_plan(&plan_id)
        .await?
        .filter(|plan| is_visible_to(plan, requester))
        .ok_or_else(|| ApiError::NotFound(format!("Travel plan {} not found", plan_id)))?;

    Ok(HttpResponse::Ok().json(PlanResponse {
        success: true,
        data: plan,
    }))
}
