mod error;
mod server;
mod session;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fitsupp_advisor::advisor::Advisor;
use fitsupp_advisor::config::AdvisorConfig;
use fitsupp_core::catalog::Catalog;
use fitsupp_core::recommend::Recommender;

use server::FitSuppServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting fitsupp MCP server");

    let catalog = Catalog::builtin();
    catalog.validate()?;
    let recommender = Recommender::new(&catalog)?;
    info!(supplements = catalog.len(), "supplement catalog loaded");

    let config = AdvisorConfig::from_env();
    match &config.client {
        Some(client) => info!(
            base_url = %client.base_url,
            model = %config.model,
            timeout_ms = client.timeout.as_millis(),
            max_retries = client.max_retries,
            "copilot chat client configured"
        ),
        None => warn!("OPENAI_API_KEY not set, copilot answers come from offline rules"),
    }
    let advisor = Arc::new(Advisor::new(config)?);

    let server = FitSuppServer::new(Arc::new(catalog), Arc::new(recommender), advisor);

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
