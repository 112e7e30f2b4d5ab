use pustaka_core::Config;

// Use mimalloc as the global allocator for lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Database, upload store and routes
    let (state, router) = pustaka_api::setup::initialize_app(config.clone()).await?;

    pustaka_api::setup::server::start_server(&config, router, &state).await?;

    Ok(())
}
