//! `sommelier status`: show the effective configuration.

use sommelier_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    println!("🍷 Sommelier Status");
    println!("==================");
    print!("{}", render(&config));

    let config_path = std::env::var("SOMMELIER_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| AppConfig::default_path());
    if config_path.exists() {
        println!("\n  ✅ Config file: {}", config_path.display());
    } else {
        println!("\n  ℹ️  No config file at {}; using defaults and environment", config_path.display());
    }

    Ok(())
}

fn key_state(key: &Option<String>) -> &'static str {
    if key.is_some() { "set" } else { "missing" }
}

/// One line per setting. API keys are reported as set or missing, never shown.
pub(crate) fn render(config: &AppConfig) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        out.push_str(&format!("  {label:<14}{value}\n"));
    };

    line("Winery:", config.winery_name.clone());
    line("Model:", format!("{} ({})", config.provider.model, config.provider.base_url));
    line("Temperature:", config.provider.temperature.to_string());
    line("OpenAI key:", key_state(&config.provider.api_key).into());
    line("Weather key:", key_state(&config.weather.api_key).into());
    line(
        "Weather at:",
        format!(
            "{} ({}, {})",
            config.weather.primary_location,
            config.weather.primary_latitude,
            config.weather.primary_longitude
        ),
    );
    line("Search:", format!("{} (top {})", config.search.base_url, config.search.max_results));
    line("Knowledge:", config.knowledge.path.display().to_string());
    line("Gateway:", format!("{}:{}", config.gateway.host, config.gateway.port));
    line(
        "Timeouts:",
        format!(
            "tools {}s, completion {}s",
            config.timeouts.tool_secs, config.timeouts.completion_secs
        ),
    );
    out
}
