//! Interactive terminal front end for CropSight.
//!
//! Prompts for an image path, runs the detection pipeline against the
//! configured vision provider, and prints a readable report. Loops until the
//! user declines another analysis.

mod report;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::Secret;

use cropsight_core::config::AppConfig;
use cropsight_core::{media, CropDetector, Error};
use cropsight_vision::OpenAiVisionClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let api_key = config
        .vision
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok().map(Secret::new))
        .context("no API key configured; set OPENAI_API_KEY or vision.api_key")?;

    let client = OpenAiVisionClient::new(api_key, &config.vision);
    let detector = CropDetector::new(Arc::new(client));
    let theme = ColorfulTheme::default();

    println!("CropSight — crop disease detection");
    println!("Model: {}\n", config.vision.model);

    loop {
        let path: String = Input::with_theme(&theme)
            .with_prompt("Image path")
            .interact_text()
            .context("failed to read input")?;

        match analyze(&detector, &config, path.trim()).await {
            Ok(result) => {
                println!("\n{}", report::render(&result));
            }
            Err(e) => {
                eprintln!("\nError: {}\n", e);
            }
        }

        let again = Confirm::with_theme(&theme)
            .with_prompt("Analyze another image?")
            .default(true)
            .interact()
            .context("failed to read input")?;
        if !again {
            break;
        }
        println!();
    }

    Ok(())
}

async fn analyze(
    detector: &CropDetector,
    config: &AppConfig,
    path: &str,
) -> anyhow::Result<cropsight_core::CropDetectionResponse> {
    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::input(format!("not a file path: {}", path)))?;

    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read image file {}", path))?;
    let encoded = media::prepare_upload(filename, &bytes, &config.upload)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Analyzing image...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = detector.detect(&encoded).await;
    spinner.finish_and_clear();

    Ok(result?)
}
