use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use scout::config::ConfigLoader;
use scout::progress::{NullObserver, ProgressObserver, ProgressUpdate};
use scout::scheduler::FetchEngine;
use std::path::PathBuf;
use std::sync::Arc;
use validator::Validate;

#[derive(Parser)]
#[command(name = "scout")]
#[command(version = "0.1.0")]
#[command(about = "Concurrent URL fetcher with adaptive rate control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the configured URL list
    Run {
        /// Path to the configuration file (JSON/YAML/TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Show progress bar (stderr)
        #[arg(short, long, default_value_t = true)]
        progress: bool,

        /// Override the configured worker count
        #[arg(short, long)]
        workers: Option<usize>,

        /// Override the configured adaptive-throttle flag
        #[arg(long)]
        adaptive: Option<bool>,
    },
    /// Validate a configuration file
    Check {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

struct BarObserver {
    bar: ProgressBar,
}

impl ProgressObserver for BarObserver {
    fn on_progress(&self, update: ProgressUpdate) {
        self.bar.inc(1);
        self.bar.set_message(format!(
            "Done: {}, Fail: {}, Avg Lat: {:.2}s, Sleep: {:.2}s",
            update.completed,
            update.failures,
            update.avg_latency.as_secs_f64(),
            update.sleep_time.as_secs_f64()
        ));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe { std::env::set_var("RUST_LOG", "info") };
    }
    let cli = Cli::parse();
    let logger = env_logger::Builder::from_default_env().build();
    let multi = Arc::new(MultiProgress::new());

    match cli.command {
        Commands::Run {
            config,
            progress,
            workers,
            adaptive,
        } => {
            if progress {
                let multi_clone = multi.clone();
                indicatif_log_bridge::LogWrapper::new((*multi_clone).clone(), logger)
                    .try_init()
                    .unwrap();
            } else {
                log::set_boxed_logger(Box::new(logger)).unwrap();
                log::set_max_level(log::LevelFilter::Info);
            }

            log::info!("Loading config from {:?}", config);
            let mut run_config = ConfigLoader::load(&config)?;
            if let Some(workers) = workers {
                run_config.workers = workers;
            }
            if let Some(adaptive) = adaptive {
                run_config.adaptive = adaptive;
            }
            run_config.validate()?;

            log::info!(
                "Fetching {} URLs with {} workers (adaptive: {})",
                run_config.urls.len(),
                run_config.workers,
                run_config.adaptive
            );

            let mut sink = ConfigLoader::create_sink(&run_config, Some(multi.clone())).await?;
            let total = run_config.urls.len() as u64;
            let engine = FetchEngine::new(run_config);

            let summary = if progress {
                let bar = multi.add(ProgressBar::new(total));
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                        .progress_chars("#>-"),
                );
                let observer = BarObserver { bar: bar.clone() };
                let summary = engine.run(sink.as_mut(), &observer).await?;
                bar.finish_with_message(format!(
                    "Done: {}, Fail: {} - Completed",
                    summary.total_urls, summary.failures
                ));
                summary
            } else {
                engine.run(sink.as_mut(), &NullObserver).await?
            };

            println!(
                "\nFetched {} URLs with {} workers",
                summary.total_urls, summary.workers
            );
            println!(
                "Success: {}, Failures: {}",
                summary.successes, summary.failures
            );
            println!("Avg latency: {:.2}s", summary.avg_latency_secs);
        }
        Commands::Check { config } => match ConfigLoader::load(&config) {
            Ok(cfg) => {
                println!("✅ Config is valid:");
                println!("   Name: {}", cfg.name);
                println!("   URLs: {}", cfg.urls.len());
                println!("   Workers: {}", cfg.workers);
                println!("   Adaptive: {}", cfg.adaptive);
            }
            Err(e) => {
                eprintln!("❌ Config error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
