//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tasklist_core` linkage and process bootstrap: config, logging,
//!   store open + migrations, credential setup.
//! - Keep output deterministic for quick local sanity checks.

use log::info;
use std::process::ExitCode;
use tasklist_core::db::migrations::latest_version;
use tasklist_core::db::open_db;
use tasklist_core::{init_logging, CredentialService, ServiceConfig, SqliteStore};

fn main() -> ExitCode {
    println!("tasklist_core ping={}", tasklist_core::ping());
    println!("tasklist_core version={}", tasklist_core::core_version());

    match bootstrap() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("tasklist_cli error={message}");
            ExitCode::FAILURE
        }
    }
}

fn bootstrap() -> Result<(), String> {
    let config = ServiceConfig::from_env().map_err(|err| err.to_string())?;
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    CredentialService::new(config.jwt_secret.as_bytes(), config.password)
        .map_err(|err| err.to_string())?;

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    SqliteStore::try_new(conn).map_err(|err| err.to_string())?;

    info!(
        "event=cli_bootstrap module=cli status=ok access_policy={}",
        config.access_policy.as_str()
    );
    println!("tasklist_core db={}", config.db_path.display());
    println!("tasklist_core schema_version={}", latest_version());
    println!(
        "tasklist_core access_policy={}",
        config.access_policy.as_str()
    );
    Ok(())
}
