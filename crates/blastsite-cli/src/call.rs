//! Tracked call command.

use std::sync::Arc;

use blastsite_client::{CallButton, CallContext};
use blastsite_core::AppConfig;

use crate::head::build_client;

/// Log a call from `location` and print the dial link.
///
/// The log is posted in the background exactly as a button click would; the
/// command waits for it only so the process does not exit first. A failed log
/// is reported by the logger, not as a command error.
///
/// # Errors
///
/// Returns an error if the site profile cannot be loaded, the client cannot be
/// built, or the background task panics.
pub(crate) async fn run_call(config: &AppConfig, location: &str, referrer: &str) -> anyhow::Result<()> {
    let profile = blastsite_core::load_site_profile(&config.site_path)?;
    let client = Arc::new(build_client(config)?);
    let button = CallButton::new(client, profile.business.telephone.clone(), location);

    let (action, logged) = button.click(CallContext {
        user_agent: config.user_agent.clone(),
        referrer: referrer.to_string(),
    });
    println!("{}", action.href);

    logged.await?;
    Ok(())
}
