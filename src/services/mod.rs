// Service exports
pub mod matching;
pub mod memory;
pub mod plan_api;
pub mod postgres;
pub mod repository;

pub use matching::{Dashboard, MatchLimits, MatchService, ServiceError};
pub use memory::InMemoryPlanRepository;
pub use plan_api::PlanApiClient;
pub use postgres::PostgresPlanRepository;
pub use repository::{PlanPage, PlanQuery, PlanRepository, RepositoryError};
