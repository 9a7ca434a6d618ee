//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/itd/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use tokio::process::Command;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use todo_summary_rs::scanner::Settings;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Minimum token length to apply masking (show first and last N characters).
const TOKEN_MASK_MIN_LENGTH: usize = 8;

/// Number of characters to show at start/end of a masked token.
const TOKEN_MASK_VISIBLE_CHARS: usize = 4;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# itd - inline todo CLI configuration
# https://github.com/luoandorder/inline-todo-rs

# Config schema version (do not modify)
version = 1

# Notes API token (can also use ITD_TOKEN env var)
# token = "your-api-token-here"

# Notes API base URL (can also use ITD_API_URL env var)
# api_url = "http://127.0.0.1:41184"

# Todo markup dialect: "metalist", "link", or "plain"
# dialect = "metalist"

# Scan pacing
[scan]
# burst_requests = 960       # Search pages fetched between rests
# burst_rest_secs = 11       # Rest length in seconds
# include_completed = false  # Also scan for completed todos

# Output preferences
[output]
# color = true               # Enable colors
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Notes API token (optional, can use env var instead).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Notes API base URL (optional, defaults to the local host app).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Todo markup dialect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,

    /// Scan settings.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            token: None,
            api_url: None,
            dialect: None,
            scan: ScanConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Resolves scanner settings, falling back to the scanner defaults
    /// for anything unset. The dialect id is not validated here; the
    /// lookup that turns it into a style reports unknown ids.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(ref dialect) = self.dialect {
            settings.dialect = dialect.clone();
        }
        if let Some(burst_requests) = self.scan.burst_requests {
            settings.burst_requests = burst_requests;
        }
        if let Some(burst_rest_secs) = self.scan.burst_rest_secs {
            settings.burst_rest_secs = burst_rest_secs;
        }
        if let Some(include_completed) = self.scan.include_completed {
            settings.include_completed = include_completed;
        }
        settings
    }
}

/// Scan configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Search pages fetched between rests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burst_requests: Option<u32>,

    /// Rest length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burst_rest_secs: Option<u64>,

    /// Also scan for completed todos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_completed: Option<bool>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/itd/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    // Check for override env var first
    if let Ok(path) = env::var("ITD_CONFIG") {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            return Ok(parent.to_path_buf());
        }
    }

    // Use XDG_CONFIG_HOME if set, otherwise ~/.config/itd
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("itd"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("itd"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    // Check for override env var first
    if let Ok(path) = env::var("ITD_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    // Migrate config if needed (stub for future migrations)
    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    // No migrations needed yet - version 1 is the initial version
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("Settings:");
            if let Some(ref token) = config.token {
                println!("  token: {}", mask_token(token));
            }
            if let Some(ref api_url) = config.api_url {
                println!("  api_url: {}", api_url);
            }
            if let Some(ref dialect) = config.dialect {
                println!("  dialect: {}", dialect);
            }

            println!("\n[scan]");
            if let Some(burst_requests) = config.scan.burst_requests {
                println!("  burst_requests: {}", burst_requests);
            }
            if let Some(burst_rest_secs) = config.scan.burst_rest_secs {
                println!("  burst_rest_secs: {}", burst_rest_secs);
            }
            if let Some(include_completed) = config.scan.include_completed {
                println!("  include_completed: {}", include_completed);
            }

            println!("\n[output]");
            if let Some(color) = config.output.color {
                println!("  color: {}", color);
            }
        } else {
            println!("(No config file exists. Run 'itd config edit' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config edit command.
pub async fn execute_edit(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    // Create default config if it doesn't exist
    if !path.exists() {
        fs::write(&path, DEFAULT_CONFIG)
            .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;

        if !ctx.quiet && !ctx.json_output {
            eprintln!("Created default config at: {}", path.display());
        }
    }

    // Get editor from environment
    let editor = env::var("EDITOR")
        .or_else(|_| env::var("VISUAL"))
        .unwrap_or_else(|_| "vi".to_string());

    if ctx.verbose {
        eprintln!("Opening {} with {}", path.display(), editor);
    }

    // Open editor (async to avoid blocking the tokio runtime)
    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .await
        .map_err(|e| CommandError::Config(format!("Failed to open editor '{}': {}", editor, e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": if status.success() { "success" } else { "error" },
            "editor": editor,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if status.success() {
            println!("Config saved.");
        } else {
            eprintln!("Editor exited with error");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    // Parse and set the value based on key
    let (section, field) = if opts.key.contains('.') {
        let parts: Vec<&str> = opts.key.splitn(2, '.').collect();
        (Some(parts[0]), parts[1])
    } else {
        (None, opts.key.as_str())
    };

    match (section, field) {
        (None, "token") => {
            config.token = Some(opts.value.clone());
        }
        (None, "api_url") => {
            config.api_url = Some(opts.value.clone());
        }
        (None, "dialect") => {
            if todo_summary_rs::style::dialect(&opts.value).is_none() {
                let valid: Vec<&str> = todo_summary_rs::style::dialects()
                    .iter()
                    .map(|d| d.id())
                    .collect();
                return Err(CommandError::Config(format!(
                    "Invalid dialect '{}'. Valid values: {}",
                    opts.value,
                    valid.join(", ")
                )));
            }
            config.dialect = Some(opts.value.clone());
        }
        (Some("scan"), "burst_requests") => {
            let value: u32 = opts.value.parse().map_err(|_| {
                CommandError::Config(format!(
                    "Invalid burst_requests value '{}'. Expected a positive integer",
                    opts.value
                ))
            })?;
            config.scan.burst_requests = Some(value);
        }
        (Some("scan"), "burst_rest_secs") => {
            let value: u64 = opts.value.parse().map_err(|_| {
                CommandError::Config(format!(
                    "Invalid burst_rest_secs value '{}'. Expected a number of seconds",
                    opts.value
                ))
            })?;
            config.scan.burst_rest_secs = Some(value);
        }
        (Some("scan"), "include_completed") => {
            let value = parse_bool(&opts.value)?;
            config.scan.include_completed = Some(value);
        }
        (Some("output"), "color") => {
            let value = parse_bool(&opts.value)?;
            config.output.color = Some(value);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: token, api_url, dialect, scan.burst_requests, scan.burst_rest_secs, scan.include_completed, output.color",
                opts.key
            )));
        }
    }

    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Masks a token for display, showing only the first and last N characters.
///
/// Uses character-based (not byte-based) indexing to safely handle
/// multi-byte UTF-8 characters.
fn mask_token(token: &str) -> String {
    let char_count = token.chars().count();
    if char_count > TOKEN_MASK_MIN_LENGTH {
        let prefix: String = token.chars().take(TOKEN_MASK_VISIBLE_CHARS).collect();
        let suffix: String = token
            .chars()
            .skip(char_count - TOKEN_MASK_VISIBLE_CHARS)
            .collect();
        format!("{}...{}", prefix, suffix)
    } else {
        "****".to_string()
    }
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}
