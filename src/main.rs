use earnings_alpha::config::Config;
use earnings_alpha::services::{analyze_batch, AnalysisJob};
use earnings_alpha::sources::{load_watchlist, JsonFileSource, SeriesSource};
use earnings_alpha::AppError;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "earnings_alpha=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    config.analysis.validate()?;

    let filter: Vec<String> = std::env::args().skip(1).map(|s| s.to_uppercase()).collect();
    let watchlist = load_watchlist(&config.watchlist_path)?;
    let source = JsonFileSource::new(&config.data_dir);

    let mut jobs = Vec::new();
    for entry in &watchlist.entries {
        if !filter.is_empty() && !filter.contains(&entry.symbol.to_uppercase()) {
            continue;
        }
        let events = entry.events();
        if events.is_empty() {
            warn!("{} has no earnings dates, skipping", entry.symbol);
            continue;
        }

        let series = match source.load(&entry.symbol) {
            Ok(series) => {
                let warmup = config.analysis.indicators.longest_lookback()
                    + config.analysis.windows.observation_before;
                if series.len() < warmup {
                    warn!(
                        "{}: {} bars, indicators need {} before the earliest window",
                        entry.symbol,
                        series.len(),
                        warmup
                    );
                }
                Arc::new(series)
            }
            Err(AppError::NotFound(msg)) => {
                warn!("{}: {}", entry.symbol, msg);
                continue;
            }
            Err(e) => {
                warn!("{}: failed to load series from {}: {}", entry.symbol, source.name(), e);
                continue;
            }
        };

        jobs.extend(
            events
                .into_iter()
                .map(|event| AnalysisJob::new(Arc::clone(&series), event)),
        );
    }

    info!("Analyzing {} earnings events", jobs.len());
    let outcomes = analyze_batch(jobs, Arc::new(config.analysis.clone())).await;

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    let high_probability = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref())
        .filter(|r| r.has_high_probability_day())
        .count();

    let report = if config.pretty {
        serde_json::to_string_pretty(&outcomes)?
    } else {
        serde_json::to_string(&outcomes)?
    };
    println!("{}", report);

    info!(
        "Done: {} analyzed, {} failed, {} with high-probability accumulation",
        succeeded,
        outcomes.len() - succeeded,
        high_probability
    );

    Ok(())
}
