use blogwright_adapters::config::BlogSettings;
use blogwright_service::{BlogService, build_state, tracing::init_tracing};
use color_eyre::eyre::Result;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = BlogSettings::load()?;
    let state = build_state(&settings).await?;

    let listener = TcpListener::bind(settings.application.address()).await?;
    tracing::info!("Starting blog at {}", settings.application.public_url);

    BlogService::new(state).run_standalone(listener).await?;

    Ok(())
}
