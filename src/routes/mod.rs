// Route exports
pub mod auth;
pub mod matches;
pub mod plans;

use actix_web::web;

pub use auth::{AuthenticatedUser, JwtVerifier};
pub use matches::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(plans::configure),
    );
}
