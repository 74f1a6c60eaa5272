//! `sommelier serve`: start the HTTP chat server.

use tracing::debug;

pub async fn run(
    port_override: Option<u16>,
    host_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }

    debug!(?config, "Effective configuration");

    println!("🍷 Sommelier Wine Concierge");
    println!("   Winery:    {}", config.winery_name);
    println!("   Listening: http://{}:{}", config.gateway.host, config.gateway.port);
    if !config.has_api_key() {
        println!("   ⚠️  OPENAI_API_KEY is not set; chat requests will return 503");
    }

    sommelier_gateway::start(config).await?;

    Ok(())
}
