use crate::config::Config;
use crate::models::aspect::{AspectRatio, decide};

pub fn cmd_compute(
    config: &Config,
    width: u32,
    height: u32,
    content_ar: f64,
    screen_ar: Option<f64>,
) -> anyhow::Result<()> {
    let video = AspectRatio::from_dimensions(width, height)
        .ok_or_else(|| anyhow::anyhow!("Frame size must be non-zero, got {width}x{height}"))?;
    let content = AspectRatio::new(content_ar)
        .ok_or_else(|| anyhow::anyhow!("Content ratio must be positive, got {content_ar}"))?;
    let screen_value = screen_ar.unwrap_or_else(|| config.autofit.screen_ar());
    let screen = AspectRatio::new(screen_value)
        .ok_or_else(|| anyhow::anyhow!("Screen ratio must be positive, got {screen_value}"))?;

    println!("Container: {width}x{height} ({video})");
    println!("Content:   {content}");
    println!("Screen:    {screen}");
    println!("{:-<40}", "");

    match decide(video, content, screen) {
        Some(view) => {
            println!("Effective AR: {}", content.min(screen));
            println!("Zoom:         {:.4}", view.zoom);
            println!("Pixel ratio:  {:.4}", view.pixel_ratio);
        }
        None if !video.is_nominal_widescreen() => {
            println!("No adjustment: container is not 16:9");
        }
        None => println!("No adjustment: content is not wider than its container"),
    }

    Ok(())
}
