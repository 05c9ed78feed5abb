//! `albums` entry point.
//!
//! Reads configuration from `ALBUMS_*` environment variables, opens the
//! catalog database and runs the CRUD walkthrough. Any error is fatal.

use albums_cli::run_demo;
use albums_core::{
    core_version, init_logging, open_db_with_config, seed_sample_albums, AlbumService, AppConfig,
    SqliteAlbumRepository,
};
use log::{error, info};
use std::error::Error;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let code = match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=demo_run module=cli status=error error={err}");
            eprintln!("albums: {err}");
            ExitCode::FAILURE
        }
    };
    log::logger().flush();
    code
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_logging(&config.log_level, &config.log_dir)?;
    info!(
        "event=demo_start module=cli status=start core_version={} db_path={}",
        core_version(),
        config.db_path.display()
    );

    let mut conn = open_db_with_config(&config)?;
    if config.seed_sample_data {
        seed_sample_albums(&mut conn)?;
    }
    println!("Connected!");

    let service = AlbumService::new(SqliteAlbumRepository::try_new(&conn)?);
    let report = run_demo(&service, &mut io::stdout().lock())?;

    info!(
        "event=demo_run module=cli status=ok inserted_id={} updated_rows={} deleted_rows={}",
        report.inserted_id, report.updated_rows, report.deleted_rows
    );
    Ok(())
}
