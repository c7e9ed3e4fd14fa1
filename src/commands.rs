//! Command-line surface: argument parsing and one handler per subcommand.

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::analysis::AnalysisService;
use crate::evaluation::{evaluate_model, load_dataset, render_results, save_results};
use crate::monitoring::{render_report, SentimentMonitor};
use crate::settings::Settings;

/// Sentiment prediction logging, evaluation and drift monitoring
#[derive(Debug, Parser)]
#[command(name = "sentimon")]
#[command(version)]
#[command(about = "Sentiment prediction logging, evaluation and drift monitoring")]
pub struct Cli {
    /// Settings file (defaults to ./sentimon.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Prediction log location, overriding the settings file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify one text and append it to the prediction log
    Analyze { text: String },
    /// Classify one text per line (file or stdin) without logging
    Batch { file: Option<PathBuf> },
    /// Totals, distribution and average confidence for one window
    Stats {
        #[arg(long, default_value_t = 24.0)]
        hours: f64,
        #[arg(long)]
        json: bool,
    },
    /// Dominant-sentiment counts for one window
    Distribution {
        #[arg(long, default_value_t = 24.0)]
        hours: f64,
    },
    /// Compare a recent window against a baseline window
    Shift {
        #[arg(long)]
        baseline_hours: Option<f64>,
        #[arg(long)]
        recent_hours: Option<f64>,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Full monitoring report
    Report {
        #[arg(long)]
        json: bool,
    },
    /// Score the classifier against a labelled CSV benchmark
    Evaluate {
        dataset: PathBuf,
        #[arg(long, default_value_t = 500)]
        max_samples: usize,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

pub fn execute(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(path) = cli.log_file {
        settings.store.path = path;
    }

    match cli.command {
        Commands::Analyze { text } => analyze(&settings, &text),
        Commands::Batch { file } => batch(&settings, file),
        Commands::Stats { hours, json } => stats(&settings, hours, json),
        Commands::Distribution { hours } => distribution(&settings, hours),
        Commands::Shift {
            baseline_hours,
            recent_hours,
            threshold,
        } => shift(&settings, baseline_hours, recent_hours, threshold),
        Commands::Report { json } => report(&settings, json),
        Commands::Evaluate {
            dataset,
            max_samples,
            output_dir,
        } => evaluate(&settings, dataset, max_samples, output_dir),
    }
}

fn analyze(settings: &Settings, text: &str) -> Result<()> {
    let store = settings.open_store()?;
    let service = AnalysisService::new(&settings.classifier, &*store);

    let prediction = service.analyze_text(text)?;
    for (label, probability) in prediction.iter() {
        println!("{label}: {probability:.4}");
    }
    Ok(())
}

fn batch(settings: &Settings, file: Option<PathBuf>) -> Result<()> {
    let texts = match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read texts from stdin")?;
            buf
        }
    };

    let store = settings.open_store()?;
    let service = AnalysisService::new(&settings.classifier, &*store);
    println!("{}", service.analyze_batch(&texts)?);
    Ok(())
}

fn stats(settings: &Settings, hours: f64, json: bool) -> Result<()> {
    let store = settings.open_store()?;
    let monitor = SentimentMonitor::new(&*store, &settings.monitor);
    let stats = monitor.statistics(hours)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Window: last {hours} hours");
        println!("Total predictions: {}", stats.total_predictions);
        println!("Average confidence: {:.2}%", stats.avg_confidence * 100.0);
        for (label, count) in stats.distribution.iter() {
            println!("  {label}: {count}");
        }
    }
    Ok(())
}

fn distribution(settings: &Settings, hours: f64) -> Result<()> {
    let store = settings.open_store()?;
    let monitor = SentimentMonitor::new(&*store, &settings.monitor);
    let counts = monitor.sentiment_distribution(hours)?;
    println!("{}", serde_json::to_string_pretty(&counts)?);
    Ok(())
}

fn shift(
    settings: &Settings,
    baseline_hours: Option<f64>,
    recent_hours: Option<f64>,
    threshold: Option<f64>,
) -> Result<()> {
    let store = settings.open_store()?;
    let monitor = SentimentMonitor::new(&*store, &settings.monitor);
    let config = monitor.config();

    let report = monitor.detect_shift(
        baseline_hours.unwrap_or(config.baseline_hours),
        recent_hours.unwrap_or(config.recent_hours),
        threshold.unwrap_or(config.shift_threshold),
    )?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn report(settings: &Settings, json: bool) -> Result<()> {
    let store = settings.open_store()?;
    let monitor = SentimentMonitor::new(&*store, &settings.monitor);
    let report = monitor.generate_report()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

fn evaluate(
    settings: &Settings,
    dataset: PathBuf,
    max_samples: usize,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let samples = load_dataset(&dataset)?;
    let results = evaluate_model(&settings.classifier, &samples, Some(max_samples))?;

    print!("{}", render_results(&results));
    let output_dir = output_dir.unwrap_or_else(|| settings.metrics_dir.clone());
    let path = save_results(&results, &output_dir)?;
    println!("\nResults saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_shift_overrides() {
        let cli = Cli::try_parse_from([
            "sentimon",
            "--log-file",
            "/tmp/p.jsonl",
            "shift",
            "--recent-hours",
            "12",
            "--threshold",
            "0.1",
        ])
        .unwrap();

        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/p.jsonl")));
        match cli.command {
            Commands::Shift {
                baseline_hours,
                recent_hours,
                threshold,
            } => {
                assert_eq!(baseline_hours, None);
                assert_eq!(recent_hours, Some(12.0));
                assert_eq!(threshold, Some(0.1));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn stats_defaults_to_one_day() {
        let cli = Cli::try_parse_from(["sentimon", "stats"]).unwrap();
        assert!(matches!(cli.command, Commands::Stats { hours, json: false } if hours == 24.0));
    }
}
