use ftrack_api::setup;
use ftrack_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Initialize the application (logging, database, services, routes)
    let (state, router) = setup::initialize_app(&config).await?;

    setup::server::start_server(&config, router, state.pool.clone()).await?;

    Ok(())
}
