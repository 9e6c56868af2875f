use anyhow::Result;
use tokio::io::BufReader;

use skycards_ui::{AppServices, Shell};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skycards_core::init()?;

    // Create and initialize application
    let mut app = skycards_core::App::new()?;
    app.initialize()?;

    for warning in app.warnings() {
        eprintln!("config: {}: {}", warning.field, warning.message);
    }

    let services = AppServices::init(app.shared_config())?;
    tracing::info!("SkyCards started");

    let term = console::Term::stdout();
    let mut shell = Shell::new(&services, term.clone()).clear_between_frames(term.is_term());

    tokio::select! {
        result = shell.run(BufReader::new(tokio::io::stdin())) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
    }

    // Graceful shutdown
    services.shutdown();
    app.shutdown()?;

    Ok(())
}
