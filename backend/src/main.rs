//! Service entry-point: connects the three stores, composes the user service
//! decorators and serves the HTTP API.

mod server;

use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use tristore::domain::ports::{IdGenerator, UserService, UserServiceMetrics};
#[cfg(not(feature = "metrics"))]
use tristore::domain::ports::NoOpUserServiceMetrics;
use tristore::domain::{InstrumentedUserService, LoggingUserService, UserOrchestrator};
use tristore::inbound::http::health::HealthState;
use tristore::inbound::http::state::HttpState;
use tristore::inbound::http::validation::RequestValidator;
use tristore::outbound::cache::{RedisConfig, RedisPool, RedisUserStore};
use tristore::outbound::documents::{MongoConfig, MongoUserStore, connect_collection};
use tristore::outbound::ids::RandomIdGenerator;
#[cfg(feature = "metrics")]
use tristore::outbound::metrics::PrometheusUserServiceMetrics;
use tristore::outbound::persistence::{DbPool, DieselUserStore, PoolConfig};
use tristore::settings::AppSettings;

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    let bind_addr = settings.bind_addr()?;
    let mode = settings.mode()?;

    #[cfg(feature = "metrics")]
    let prometheus = make_metrics()?;
    #[cfg(feature = "metrics")]
    let metrics: Arc<dyn UserServiceMetrics> = Arc::new(
        PrometheusUserServiceMetrics::new(&prometheus.registry)
            .wrap_err("registering user service metrics")?,
    );
    #[cfg(not(feature = "metrics"))]
    let metrics: Arc<dyn UserServiceMetrics> = Arc::new(NoOpUserServiceMetrics);

    let users = build_user_service(&settings, metrics).await?;
    let http_state = HttpState::new(users, RequestValidator::new(settings.max_name_length()))
        .with_request_timeout(settings.request_timeout());

    let config = ServerConfig::new(bind_addr, mode);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(prometheus);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, web::Data::new(http_state), config)
        .wrap_err_with(|| format!("binding {bind_addr}"))?;
    info!(%bind_addr, ?mode, "listening");
    server.await.wrap_err("server terminated")?;
    Ok(())
}

/// Connect every store and wrap the orchestrator in the metrics and logging
/// decorators, logging outermost.
async fn build_user_service(
    settings: &AppSettings,
    metrics: Arc<dyn UserServiceMetrics>,
) -> Result<Arc<dyn UserService>> {
    let ids: Arc<dyn IdGenerator> = Arc::new(RandomIdGenerator);

    let db_pool = DbPool::connect(
        PoolConfig::new(settings.database_url()?).with_max_size(settings.database_pool_size()),
    )
    .await
    .wrap_err("connecting to PostgreSQL")?;
    let sql = DieselUserStore::new(db_pool).with_strategy(settings.sql_id_strategy()?);

    let redis_pool = RedisPool::connect(RedisConfig::new(settings.redis_url()?))
        .await
        .wrap_err("connecting to Redis")?;
    let kv = RedisUserStore::new(redis_pool, ids.clone());

    let collection = connect_collection(
        &MongoConfig::new(settings.mongo_uri()?)
            .with_database(settings.mongo_database())
            .with_collection(settings.mongo_collection()),
    )
    .await
    .wrap_err("connecting to MongoDB")?;
    let docs = MongoUserStore::new(collection, ids);

    info!("connected to all stores");

    let orchestrator = UserOrchestrator::new(Arc::new(sql), Arc::new(kv), Arc::new(docs));
    let instrumented = InstrumentedUserService::new(orchestrator, metrics);
    Ok(Arc::new(LoggingUserService::new(instrumented)))
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("tristore")
        .endpoint("/metrics")
        .build()
        .map_err(|e| eyre!("configure Prometheus metrics: {e}"))
}
