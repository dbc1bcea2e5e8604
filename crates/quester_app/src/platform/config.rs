//! Startup configuration: CLI flags layered over an optional RON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use engine_logging::{engine_info, LevelFilter, LogDestination};
use quester_core::{QueryCount, TimerSeconds, Volume};
use quester_engine::FetchSettings;
use serde::Deserialize;

const DEFAULT_CONFIG_FILENAME: &str = "quester.ron";
pub const LOG_FILENAME: &str = "quester.log";

#[derive(Debug, Clone, Parser)]
#[command(name = "quester")]
#[command(about = "Generate unique search queries and pace them with a countdown", long_about = None)]
pub struct Cli {
    /// Base URL of the trends backend.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Queries per batch (1-30).
    #[arg(long)]
    pub count: Option<i64>,
    /// Countdown length in seconds (1-300).
    #[arg(long)]
    pub timer: Option<i64>,
    /// Audio cue volume (0.0-1.0).
    #[arg(long)]
    pub volume: Option<f32>,
    /// Start with the audio cue muted.
    #[arg(long)]
    pub muted: bool,
    /// RON settings file. Defaults to ./quester.ron when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,
    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct FileSettings {
    base_url: Option<String>,
    count: Option<i64>,
    timer_seconds: Option<i64>,
    volume: Option<f32>,
    muted: Option<bool>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// Fully resolved settings, already clamped.
#[derive(Debug, Clone)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub count: QueryCount,
    pub timer: TimerSeconds,
    pub volume: Volume,
    pub muted: bool,
}

pub fn load(cli: &Cli) -> anyhow::Result<Settings> {
    let file = match &cli.config {
        Some(path) => read_settings_file(path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILENAME);
            if path.exists() {
                read_settings_file(path)?
            } else {
                FileSettings::default()
            }
        }
    };
    Ok(merge(cli, file))
}

fn read_settings_file(path: &Path) -> anyhow::Result<FileSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    let settings = ron::from_str(&content)
        .with_context(|| format!("parsing settings file {}", path.display()))?;
    engine_info!("Loaded settings from {:?}", path);
    Ok(settings)
}

fn merge(cli: &Cli, file: FileSettings) -> Settings {
    let defaults = FetchSettings::default();
    let fetch = FetchSettings {
        base_url: cli
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or(defaults.base_url),
        connect_timeout: file
            .connect_timeout_secs
            .map_or(defaults.connect_timeout, Duration::from_secs),
        request_timeout: file
            .request_timeout_secs
            .map_or(defaults.request_timeout, Duration::from_secs),
        max_bytes: defaults.max_bytes,
    };

    Settings {
        fetch,
        count: cli
            .count
            .or(file.count)
            .map_or_else(QueryCount::default, QueryCount::clamped),
        timer: cli
            .timer
            .or(file.timer_seconds)
            .map_or_else(TimerSeconds::default, TimerSeconds::clamped),
        volume: cli
            .volume
            .or(file.volume)
            .map_or_else(Volume::default, Volume::clamped),
        muted: cli.muted || file.muted.unwrap_or(false),
    }
}
