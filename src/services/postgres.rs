use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;
use crate::models::{Host, PageMeta, TravelPlan};
use crate::services::repository::{PlanPage, PlanQuery, PlanRepository, RepositoryError};

const PLAN_COLUMNS: &str = r#"
    p.id, p.host_id, p.title, p.destination, p.description,
    p.start_date, p.end_date, p.travel_type, p.visibility,
    p.budget_min, p.budget_max, p.created_at,
    u.full_name, u.profile_image, u.is_verified_badge, u.is_premium
"#;

/// PostgreSQL-backed plan repository
///
/// Reads the `travel_plans` and `users` tables; newest plans first.
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    /// Create a new repository from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new repository from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, RepositoryError> {
        tracing::info!("Connecting to PostgreSQL plan store");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }
}

fn plan_from_row(row: &PgRow) -> Result<TravelPlan, RepositoryError> {
    let id: Uuid = row.try_get("id")?;
    let host_id: Uuid = row.try_get("host_id")?;
    let travel_type: String = row.try_get("travel_type")?;
    let visibility: String = row.try_get("visibility")?;

    let host = Host {
        id: host_id.to_string(),
        full_name: row.try_get("full_name")?,
        profile_image: row.try_get("profile_image")?,
        is_verified_badge: row.try_get::<Option<bool>, _>("is_verified_badge")?.unwrap_or(false),
        is_premium: row.try_get::<Option<bool>, _>("is_premium")?.unwrap_or(false),
    };

    Ok(TravelPlan {
        id: id.to_string(),
        owner_id: host_id.to_string(),
        title: row.try_get("title")?,
        destination: row.try_get("destination")?,
        description: row.try_get("description")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        travel_type: travel_type.parse().map_err(RepositoryError::InvalidResponse)?,
        visibility: visibility.parse().map_err(RepositoryError::InvalidResponse)?,
        budget_min: row.try_get("budget_min")?,
        budget_max: row.try_get("budget_max")?,
        host: Some(host),
        created_at: row.try_get("created_at")?,
    })
}

/// Owner ids that are not UUIDs cannot exist in this store
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn list_plans(&self, query: &PlanQuery) -> Result<PlanPage, RepositoryError> {
        let owner = match &query.owner_id {
            Some(raw) => match parse_id(raw) {
                Some(id) => Some(id),
                None => {
                    return Ok(PlanPage {
                        data: vec![],
                        meta: PageMeta::new(query.page, query.limit, 0),
                    })
                }
            },
            None => None,
        };

        let filters = r#"
            WHERE ($1::text IS NULL OR p.destination ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR p.travel_type = $2)
              AND ($3::text IS NULL OR p.visibility = $3)
              AND ($4::uuid IS NULL OR p.host_id = $4)
              AND ($5::date IS NULL OR COALESCE(p.end_date, p.start_date) >= $5)
        "#;

        let destination = query.destination.as_deref().map(str::trim).filter(|d| !d.is_empty());
        let travel_type = query.travel_type.map(|t| t.as_str());
        let visibility = query.visibility.map(|v| v.as_str());

        let count_sql = format!("SELECT COUNT(*) AS total FROM travel_plans p {}", filters);
        let total: i64 = sqlx::query(&count_sql)
            .bind(destination)
            .bind(travel_type)
            .bind(visibility)
            .bind(owner)
            .bind(query.ends_on_or_after)
            .fetch_one(&self.pool)
            .await?
            .try_get("total")?;

        let list_sql = format!(
            r#"
            SELECT {}
            FROM travel_plans p
            JOIN users u ON u.id = p.host_id
            {}
            ORDER BY p.created_at DESC, p.id
            LIMIT $6 OFFSET $7
            "#,
            PLAN_COLUMNS, filters
        );

        let rows = sqlx::query(&list_sql)
            .bind(destination)
            .bind(travel_type)
            .bind(visibility)
            .bind(owner)
            .bind(query.ends_on_or_after)
            .bind(query.limit as i64)
            .bind(query.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let data = rows.iter().map(plan_from_row).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} plans (total: {})", data.len(), total);

        Ok(PlanPage {
            data,
            meta: PageMeta::new(query.page, query.limit, total.max(0) as u64),
        })
    }

    async fn plans_by_owner(&self, owner_id: &str) -> Result<Vec<TravelPlan>, RepositoryError> {
        let Some(owner) = parse_id(owner_id) else {
            return Ok(vec![]);
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM travel_plans p
            JOIN users u ON u.id = p.host_id
            WHERE p.host_id = $1
            ORDER BY p.created_at DESC, p.id
            "#,
            PLAN_COLUMNS
        );

        let rows = sqlx::query(&sql).bind(owner).fetch_all(&self.pool).await?;

        rows.iter().map(plan_from_row).collect()
    }

    async fn get_plan(&self, plan_id: &str) -> Result<Option<TravelPlan>, RepositoryError> {
        let Some(id) = parse_id(plan_id) else {
            return Ok(None);
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM travel_plans p
            JOIN users u ON u.id = p.host_id
            WHERE p.id = $1
            "#,
            PLAN_COLUMNS
        );

        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        row.as_ref().map(plan_from_row).transpose()
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
