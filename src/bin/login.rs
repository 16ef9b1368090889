// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interactive "Sign in with Google" from the terminal.
//!
//! Prints the consent URL, waits for the browser to come back to the
//! loopback callback, provisions the profile, then signs out again.

use property_session::{
    config::Config,
    services::{FirebaseServices, LoopbackConsent},
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("property_session=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let consent = LoopbackConsent::new(Arc::new(|url: &str| {
        eprintln!("Open this URL in your browser to sign in:\n\n  {url}\n");
    }));
    let services = FirebaseServices::initialize(&config, consent).await?;
    let session = services.session();

    let identity = session.login_with_google().await?;
    println!(
        "Signed in as {} <{}> (uid {})",
        identity.display_name.as_deref().unwrap_or("(no name)"),
        identity.email.as_deref().unwrap_or("no email"),
        identity.uid
    );

    if let Some(profile) = services.db().get_user(&identity.uid).await? {
        println!("Profile role: {}, created {}", profile.role, profile.created_at);
    }

    session.logout().await?;
    println!("Signed out.");
    Ok(())
}
