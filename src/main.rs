mod aggregate;
mod categorize;
mod config;
mod csv_io;
mod db;
mod ledger;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let dirs = config::Dirs::discover()?;
    let app_config = config::AppConfig::load(&dirs)?;

    let interactive = args.len() == 1;
    if interactive {
        logging::init_file(&app_config.log_filter, &dirs.log_path())?;
    } else {
        logging::init_stderr(&app_config.log_filter)?;
    }

    let db = db::Database::open(&dirs.database_path(&app_config))?;
    let mut session = run::Session::new(db, app_config)?;

    if interactive {
        run::as_tui(&mut session)
    } else {
        run::as_cli(&args, &mut session)
    }
}
