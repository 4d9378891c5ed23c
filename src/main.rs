use std::sync::Arc;

use click_relay::config;
use click_relay::sender::EventSender;
use click_relay::sink::HttpEventSink;
use click_relay::throttle::Throttle;
use click_relay::walker;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Progress lines go to stdout, warnings and errors to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .or_else(std::io::stdout),
        )
        .init();

    let config = config::load_from_env()?;
    config.print_summary();

    // One throttle for the whole process; every delivery contends for it.
    let throttle = Arc::new(Throttle::new(config.rate_limit_interval()));
    let sink = HttpEventSink::new(&config)?;
    let sender = EventSender::new(sink, throttle, config.event_name.clone());

    match walker::process_directory(&config.input_dir, &sender, config.row_delay()).await {
        Ok(summary) => {
            tracing::info!(
                files_processed = summary.files_processed,
                files_skipped = summary.files_skipped,
                events_delivered = summary.events_delivered,
                events_failed = summary.events_failed,
                "run complete"
            );
        }
        // Directory-level failures end the run gracefully: logged, exit 0.
        Err(err) if err.is_directory_error() => {
            tracing::error!(error = %err, "input directory is not usable");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
