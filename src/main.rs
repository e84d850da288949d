//! chathubd - console front end for the chathub message hub.
//!
//! Reads commands from stdin and prints deliveries to stdout. Takes an
//! optional path to a TOML config file as its only argument.

mod console;

use chathub::config::{self, Config};
use chathub::{Hub, HubOptions, telemetry};
use console::{Console, Roster};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    telemetry::init(&config.log.filter);

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s), refusing to start",
            errors.len()
        ));
    }

    info!(
        config = config_path.as_deref().unwrap_or("<defaults>"),
        ephemeral_prefix = %config.hub.ephemeral_prefix,
        delivery = %config.hub.delivery,
        "Starting chathubd"
    );

    let roster = Arc::new(Roster::new());
    let hub = Arc::new(Hub::with_options(
        Arc::clone(&roster) as Arc<dyn chathub::MembershipAuthority>,
        HubOptions::from(&config.hub),
    ));

    let out = Arc::new(Mutex::new(std::io::stdout()));
    let mut console = Console::new(Arc::clone(&hub), roster, out);
    console.run(std::io::stdin().lock())?;

    let stats = hub.stats();
    info!(
        global_messages = stats.global_messages,
        groups = stats.groups,
        "Shutting down"
    );
    Ok(())
}
