//! TacticSphere API server.

use std::sync::Arc;

use anyhow::Context;
use tacticsphere::adapters::http::{api_router, with_server_layers, AnalyticsAppState, SurveyAppState};
use tacticsphere::adapters::postgres::{
    PostgresAnalyticsReader, PostgresAssignmentRepository, PostgresAuditLog, PostgresCatalogReader,
    PostgresProgressReader, PostgresQuestionnaireRepository, PostgresResponseRepository,
};
use tacticsphere::adapters::{JwtSessionValidator, TracingAuditLogger};
use tacticsphere::config::AppConfig;
use tacticsphere::ports::AuditLogger;
use tacticsphere::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    config.validate().context("validating configuration")?;
    telemetry::init(&config.server)?;

    tracing::info!(environment = ?config.server.environment, "starting tacticsphere");

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("connecting to database")?;
    tracing::info!("Database connection established");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running database migrations")?;
        tracing::info!("Database migrations completed");
    }

    let audit_log = Arc::new(PostgresAuditLog::new(pool.clone()));
    let audit: Arc<dyn AuditLogger> = Arc::new(TracingAuditLogger::forwarding_to(audit_log.clone()));

    let survey = SurveyAppState {
        assignments: Arc::new(PostgresAssignmentRepository::new(pool.clone())),
        questionnaires: Arc::new(PostgresQuestionnaireRepository::new(pool.clone())),
        catalog: Arc::new(PostgresCatalogReader::new(pool.clone())),
        responses: Arc::new(PostgresResponseRepository::new(pool.clone())),
        progress: Arc::new(PostgresProgressReader::new(pool.clone())),
        audit: audit.clone(),
        auto_window: config.survey.auto_assignment_window(),
    };
    let analytics = AnalyticsAppState {
        reader: Arc::new(PostgresAnalyticsReader::new(pool.clone())),
        audit,
        audit_reader: audit_log,
    };
    let validator = Arc::new(JwtSessionValidator::from_config(&config.auth));

    let app = with_server_layers(api_router(survey, analytics, validator), &config.server);

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
