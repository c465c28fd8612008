use crate::clients::bluray::BluRayClient;
use crate::config::{Config, FallbackPolicy};
use crate::services::host::RatioLookup;

pub async fn cmd_lookup(config: &Config, title: &str, year: &str) -> anyhow::Result<()> {
    println!("Looking up: {title} ({year})");

    let client = BluRayClient::new(&config.scraper)?;

    match client.lookup(title, year).await {
        Ok(ratio) => println!("Aspect ratio: {:.2}:1", ratio.value()),
        Err(e) => {
            println!("No aspect ratio found: {e}");

            match config.autofit.fallback {
                FallbackPolicy::CategoryDefaults => {
                    println!("Playback would assume 2.39 for movies and 16:9 for everything else");
                }
                FallbackPolicy::None => {
                    println!("Fallback is disabled; playback would be left unchanged");
                }
            }
        }
    }

    Ok(())
}
