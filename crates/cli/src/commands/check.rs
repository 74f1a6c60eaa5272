//! `sommelier check`: probe each collaborator on its own.
//!
//! Uses the typed tool APIs so a failure shows up as a failure here instead
//! of the apology text the concierge would see.

use sommelier_config::AppConfig;
use sommelier_tools::{KnowledgeStore, SearchClient, WeatherClient};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    println!("🩺 Sommelier Check");
    println!("==================\n");

    let mut issues = 0;

    // Knowledge document
    let path = &config.knowledge.path;
    if path.is_file() {
        let info = KnowledgeStore::load(path).full_info();
        println!("  ✅ Knowledge file loaded ({} characters)", info.chars().count());
    } else {
        println!("  ❌ Knowledge file not found at {}", path.display());
        issues += 1;
    }

    // Weather
    if config.weather.api_key.is_none() {
        println!("  ⚠️  OPENWEATHER_API_KEY is not set");
        issues += 1;
    }
    let weather = WeatherClient::from_config(&config)?;
    match weather.reading(&weather.primary_location()).await {
        Ok(reading) => println!("  ✅ Weather: {}", reading.summary()),
        Err(e) => {
            println!("  ❌ Weather: {e}");
            issues += 1;
        }
    }

    // Web search
    let search = SearchClient::from_config(&config)?;
    match search.hits("Napa Valley wine", search.max_results()).await {
        Ok(hits) if !hits.is_empty() => println!("  ✅ Web search: {} results", hits.len()),
        Ok(_) => println!("  ⚠️  Web search: no results"),
        Err(e) => {
            println!("  ❌ Web search: {e}");
            issues += 1;
        }
    }

    // Completion API
    issues += check_completion(&config).await;

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed! Run `sommelier serve` and visit http://{}:{}",
            config.gateway.host, config.gateway.port);
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

async fn check_completion(config: &AppConfig) -> usize {
    let provider = match sommelier_providers::build_from_config(config) {
        Ok(provider) => provider,
        Err(e) => {
            println!("  ❌ Completion API: {e}");
            return 1;
        }
    };

    match provider.health_check().await {
        Ok(true) => {
            println!("  ✅ Completion API reachable ({})", provider.name());
            0
        }
        Ok(false) => {
            println!("  ❌ Completion API rejected the key ({})", provider.name());
            1
        }
        Err(e) => {
            println!("  ❌ Completion API: {e}");
            1
        }
    }
}
