use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tripmate_match::config::{RepositoryBackend, Settings};
use tripmate_match::error::ApiError;
use tripmate_match::routes::{self, AppState, JwtVerifier};
use tripmate_match::services::{
    InMemoryPlanRepository, MatchService, PlanApiClient, PlanRepository, PostgresPlanRepository,
    RepositoryError,
};

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}

async fn build_repository(settings: &Settings) -> Result<Arc<dyn PlanRepository>, RepositoryError> {
    match settings.repository.backend {
        RepositoryBackend::Api => {
            let api = settings.plan_api.as_ref().ok_or_else(|| {
                RepositoryError::Unavailable("plan_api settings are required for the api backend".into())
            })?;
            let client = PlanApiClient::new(
                api.endpoint.clone(),
                api.api_key.clone(),
                api.timeout_secs.unwrap_or(10),
            )?;
            info!("Plan API client initialized ({})", api.endpoint);
            Ok(Arc::new(client))
        }
        RepositoryBackend::Postgres => {
            let db = settings.database.as_ref().ok_or_else(|| {
                RepositoryError::Unavailable("database settings are required for the postgres backend".into())
            })?;
            let repository = PostgresPlanRepository::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await?;
            info!("PostgreSQL plan repository initialized (max: {} connections)", db.max_connections.unwrap_or(10));
            Ok(Arc::new(repository))
        }
        RepositoryBackend::Memory => {
            let repository = match &settings.repository.seed_path {
                Some(path) => InMemoryPlanRepository::from_json_file(path)?,
                None => InMemoryPlanRepository::default(),
            };
            info!("In-memory plan repository initialized ({} plans)", repository.len());
            Ok(Arc::new(repository))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting TripMate match service...");
    info!("Configuration loaded (backend: {:?})", settings.repository.backend);

    let repository = build_repository(&settings).await.map_err(|e| {
        error!("Failed to initialize plan repository: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let limits = settings.match_limits();
    info!("Matching limits: {:?}", limits);

    let app_state = AppState {
        service: MatchService::new(repository, limits),
    };
    let verifier = web::Data::new(JwtVerifier::new(
        &settings.auth.jwt_secret,
        settings.auth.cookie_name.clone(),
    ));

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(verifier.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
