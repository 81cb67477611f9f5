use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use engine::{Currency, dashboard::DEFAULT_RECENT_LIMIT};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/spendboard.toml";
const ENV_PREFIX: &str = "SPENDBOARD";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub supabase_url: String,
    pub anon_key: String,
    pub currency: String,
    pub timezone: String,
    pub recent_limit: u64,
    pub start_view: String,
    pub log_file: String,
    pub log_level: String,
    pub demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            anon_key: String::new(),
            currency: Currency::Usd.code().to_string(),
            timezone: "UTC".to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            start_view: "dashboard".to_string(),
            log_file: "spendboard.log".to_string(),
            log_level: "info".to_string(),
            demo: false,
        }
    }
}

impl AppConfig {
    pub fn currency(&self) -> Result<Currency> {
        Currency::try_from(self.currency.as_str()).map_err(|err| AppError::Setting {
            key: "currency",
            message: err.to_string(),
        })
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|err| AppError::Setting {
                key: "timezone",
                message: err.to_string(),
            })
    }

    /// Calendar date in the configured timezone, used as the default form date.
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(Utc::now().with_timezone(&self.timezone()?).date_naive())
    }

    /// Connection settings, required unless running in demo mode.
    pub fn connection(&self) -> Result<(&str, &str)> {
        let url = self.supabase_url.trim();
        if url.is_empty() {
            return Err(AppError::Setting {
                key: "supabase_url",
                message: "required unless --demo is set".to_string(),
            });
        }
        let key = self.anon_key.trim();
        if key.is_empty() {
            return Err(AppError::Setting {
                key: "anon_key",
                message: "required unless --demo is set".to_string(),
            });
        }
        Ok((url, key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Check every backend table and view, print the results and exit.
    Check,
}

#[derive(Debug, Parser)]
#[command(name = "spendboard_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the project URL (e.g. https://xyz.supabase.co).
    #[arg(long)]
    supabase_url: Option<String>,
    /// Override the anonymous API key.
    #[arg(long)]
    anon_key: Option<String>,
    /// Override the display currency (USD or EUR).
    #[arg(long)]
    currency: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Use built-in sample data instead of the backend.
    #[arg(long)]
    demo: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug)]
pub struct Invocation {
    pub config: AppConfig,
    pub command: Option<Command>,
}

pub fn load() -> Result<Invocation> {
    resolve(Args::parse())
}

fn resolve(args: Args) -> Result<Invocation> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(url) = args.supabase_url {
        settings.supabase_url = url;
    }
    if let Some(key) = args.anon_key {
        settings.anon_key = key;
    }
    if let Some(currency) = args.currency {
        settings.currency = currency;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if args.demo {
        settings.demo = true;
    }

    Ok(Invocation {
        config: settings,
        command: args.command,
    })
}
