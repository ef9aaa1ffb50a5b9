//! Apply the embedded schema migrations to `TRISTORE_DATABASE_URL`.

use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use tristore::outbound::persistence::run_migrations;
use tristore::settings::AppSettings;

fn main() -> Result<()> {
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
    let applied =
        run_migrations(settings.database_url()?).wrap_err("failed to apply migrations")?;

    if applied.is_empty() {
        info!("schema already up to date");
    }
    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(())
}
