use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use gifts::auth::{self, require_uid};
use gifts::cli::{self, Cli, CliContext, Commands};
use gifts::{Config, Database, Profile};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev switches to a separate config and database
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(Path::new(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    if let Err(e) = gifts::logging::init(&config) {
        eprintln!("Warning: could not open log file: {}", e);
    }

    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| eyre!("Database path contains invalid UTF-8"))?,
    )?;

    let auth = auth::from_config(&config)?;
    let ctx = CliContext {
        db: &db,
        auth: auth.as_ref(),
        config: &config,
    };

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let uid = require_uid(auth.as_ref())?;
            let label = auth
                .current_user()
                .map(|u| u.display_name().to_string())
                .unwrap_or_default();
            let app = gifts::tui::App::new(config.clone(), db, uid, label)?;
            gifts::tui::run_event_loop(app)?;
        }
        Commands::Login { email, password } => cli::handle_login(&email, &password, auth.as_ref())?,
        Commands::Logout => cli::handle_logout(auth.as_ref())?,
        Commands::Whoami => cli::handle_whoami(auth.as_ref())?,
        Commands::Person(command) => cli::handle_person(command, &ctx)?,
        Commands::Occasion(command) => cli::handle_occasion(command, &ctx)?,
        Commands::Idea(command) => cli::handle_idea(command, &ctx)?,
        Commands::Gift(command) => cli::handle_gift(command, &ctx)?,
        Commands::Share(command) => cli::handle_share(command, &ctx)?,
        Commands::Suggest { person_id, adopt } => cli::handle_suggest(person_id, adopt, &ctx)?,
    }

    Ok(())
}
