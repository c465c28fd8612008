use crate::clients::bluray::BluRayClient;
use crate::clients::kodi::KodiClient;
use crate::config::{Config, StartEvent};
use crate::services::adjuster::{AdjustmentOutcome, Adjuster};

pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    let adjuster = Adjuster::new(
        KodiClient::new(&config.kodi)?,
        BluRayClient::new(&config.scraper)?,
    );

    // Playback is already under way, so there is nothing to wait for.
    let mut settings = config.autofit.clone();
    settings.start_event = StartEvent::AvStart;

    match adjuster.on_playback_started(&settings).await {
        AdjustmentOutcome::Applied { view, acknowledged } => {
            println!(
                "Applied zoom {:.4}, pixel ratio {:.4}{}",
                view.zoom,
                view.pixel_ratio,
                if acknowledged { "" } else { " (not confirmed by Kodi)" }
            );
        }
        AdjustmentOutcome::NotNeeded { video, content } => {
            println!("No adjustment needed (container {video}, content {content})");
        }
        AdjustmentOutcome::NoContentRatio => {
            println!("No content ratio found; no adjustments made");
        }
        AdjustmentOutcome::Disabled => println!("Autofit is disabled in the config"),
        AdjustmentOutcome::Aborted(reason) => println!("Aborted: {reason}"),
    }

    Ok(())
}
