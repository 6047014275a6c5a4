use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::{DISPL_TOTAL_HEIGHT, DISPL_TOTAL_WIDTH};

pub const DEFAULT_FRAME_RATE_HZ: u32 = 30;
pub const MAX_FRAME_RATE_HZ: u32 = 240;
pub const DEFAULT_INPUT_TIMEOUT_MS: u64 = 10;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration. Every field is optional so layers can be merged.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,       // e.g., "info" | "debug"
    pub frame_rate_hz: Option<u32>,      // render loop rate
    pub frames: Option<u64>,             // stop after N frames, 0 = until signal
    pub input_timeout_ms: Option<u64>,   // bounded wait for producer contexts
    pub initial_gain: Option<f32>,
    pub demo: Option<bool>,              // run the synthetic producer
    pub snapshot: Option<PathBuf>,       // PPM written on exit
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub width: Option<u16>,
    pub height: Option<u16>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn frame_rate_hz(&self) -> u32 {
        self.frame_rate_hz.unwrap_or(DEFAULT_FRAME_RATE_HZ)
    }

    pub fn frames(&self) -> u64 {
        self.frames.unwrap_or(0)
    }

    pub fn input_timeout_ms(&self) -> u64 {
        self.input_timeout_ms.unwrap_or(DEFAULT_INPUT_TIMEOUT_MS)
    }

    pub fn initial_gain(&self) -> f32 {
        self.initial_gain.unwrap_or(1.0)
    }

    pub fn demo(&self) -> bool {
        self.demo.unwrap_or(false)
    }

    /// Panel size, defaulting to the layout size.
    pub fn display_size(&self) -> (u16, u16) {
        let d = self.display.as_ref();
        (
            d.and_then(|d| d.width).unwrap_or(DISPL_TOTAL_WIDTH),
            d.and_then(|d| d.height).unwrap_or(DISPL_TOTAL_HEIGHT),
        )
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "hmi-panel", about = "Front panel model and bar visualizer", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub frame_rate_hz: Option<u32>,
    /// stop after this many frames (0 = run until a signal)
    #[arg(long)]
    pub frames: Option<u64>,
    #[arg(long)]
    pub input_timeout_ms: Option<u64>,
    #[arg(long, allow_negative_numbers = true)]
    pub initial_gain: Option<f32>,
    /// drive the model with synthetic buttons and levels
    #[arg(long, action = ArgAction::Set)]
    pub demo: Option<bool>,
    /// write the last frame to this PPM file on exit
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,
    #[arg(long)]
    pub display_width: Option<u16>,
    #[arg(long)]
    pub display_height: Option<u16>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = resolve(&cli, find_config_file())?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML (explicit path or `found`) and CLI, then validate.
pub fn resolve(cli: &Cli, found: Option<PathBuf>) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = found {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/hmi-panel/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/hmi-panel/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/hmi-panel.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["hmi-panel.yaml", "config.yaml", "config/hmi-panel.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

pub fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()        { dst.log_level = src.log_level; }
    if src.frame_rate_hz.is_some()    { dst.frame_rate_hz = src.frame_rate_hz; }
    if src.frames.is_some()           { dst.frames = src.frames; }
    if src.input_timeout_ms.is_some() { dst.input_timeout_ms = src.input_timeout_ms; }
    if src.initial_gain.is_some()     { dst.initial_gain = src.initial_gain; }
    if src.demo.is_some()             { dst.demo = src.demo; }
    if src.snapshot.is_some()         { dst.snapshot = src.snapshot; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()  { dst.width = src.width; }
    if src.height.is_some() { dst.height = src.height; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()        { cfg.log_level = cli.log_level.clone(); }
    if cli.frame_rate_hz.is_some()    { cfg.frame_rate_hz = cli.frame_rate_hz; }
    if cli.frames.is_some()           { cfg.frames = cli.frames; }
    if cli.input_timeout_ms.is_some() { cfg.input_timeout_ms = cli.input_timeout_ms; }
    if cli.initial_gain.is_some()     { cfg.initial_gain = cli.initial_gain; }
    if cli.demo.is_some()             { cfg.demo = cli.demo; }
    if cli.snapshot.is_some()         { cfg.snapshot = cli.snapshot.clone(); }

    let any_display = cli.display_width.is_some() || cli.display_height.is_some();
    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.display_width.is_some()  { display.width = cli.display_width; }
        if cli.display_height.is_some() { display.height = cli.display_height; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let fps = cfg.frame_rate_hz();
    if fps == 0 || fps > MAX_FRAME_RATE_HZ {
        return Err(ConfigError::Validation(format!("frame_rate_hz must be 1..={MAX_FRAME_RATE_HZ}")));
    }
    if !cfg.initial_gain().is_finite() {
        return Err(ConfigError::Validation("initial_gain must be finite".into()));
    }
    let (w, h) = cfg.display_size();
    if w < DISPL_TOTAL_WIDTH || h < DISPL_TOTAL_HEIGHT {
        return Err(ConfigError::Validation(format!(
            "display must be at least {DISPL_TOTAL_WIDTH}x{DISPL_TOTAL_HEIGHT} to hold the panel layout"
        )));
    }
    Ok(())
}
