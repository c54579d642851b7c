use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Select};
use serde_json::json;
use vedur_core::{
    Config, ForecastOptions, Lang, ObservationOptions, TEXT_TYPES, TextOptions, VedurClient,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "vedur", version, about = "Icelandic weather forecasts and observations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively edit the configuration file.
    Configure,

    /// Station forecasts.
    Forecasts {
        /// Station ids separated by "," or ";", e.g. "1;422".
        stations: String,

        /// Response language, "is" or "en".
        #[arg(long)]
        lang: Option<Lang>,

        /// Include measurement descriptions.
        #[arg(long)]
        descriptions: bool,
    },

    /// Latest station observations.
    Observations {
        /// Station ids separated by "," or ";".
        stations: String,

        /// Response language, "is" or "en".
        #[arg(long)]
        lang: Option<Lang>,

        /// Include measurement descriptions.
        #[arg(long)]
        descriptions: bool,

        /// Observation interval.
        #[arg(long, value_parser = ["1h", "3h"])]
        time: Option<String>,

        /// Return the latest observation regardless of its age.
        #[arg(long, value_parser = ["0", "1"])]
        anytime: Option<String>,
    },

    /// Regional text bulletins.
    Texts {
        /// Bulletin ids separated by "," or ";", see `vedur catalog`.
        types: String,

        /// Response language, "is" or "en".
        #[arg(long)]
        lang: Option<Lang>,
    },

    /// List automatic weather stations.
    Stations,

    /// Print measurement labels and bulletin ids.
    Catalog {
        #[arg(long)]
        lang: Option<Lang>,
    },

    /// Describe the available operations.
    Info,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Forecasts { stations, lang, descriptions } => {
                let client = VedurClient::new(&config.client_config())?;
                let options = ForecastOptions {
                    lang: Some(resolve_lang(lang, &config)?.to_string()),
                    stations: Some(stations),
                    descriptions: descriptions || config.descriptions,
                };
                print_json(&client.forecasts(&options).await?)?;
            }
            Command::Observations { stations, lang, descriptions, time, anytime } => {
                let client = VedurClient::new(&config.client_config())?;
                let options = ObservationOptions {
                    lang: Some(resolve_lang(lang, &config)?.to_string()),
                    stations: Some(stations),
                    descriptions: descriptions || config.descriptions,
                    time,
                    anytime,
                };
                print_json(&client.observations(&options).await?)?;
            }
            Command::Texts { types, lang } => {
                let client = VedurClient::new(&config.client_config())?;
                let lang = resolve_lang(lang, &config)?;
                let options = TextOptions { lang: Some(lang.to_string()), types: Some(types) };
                print_json(&client.texts(&options).await?)?;
            }
            Command::Stations => {
                let client = VedurClient::new(&config.client_config())?;
                print_json(&client.available_stations().await?)?;
            }
            Command::Catalog { lang } => {
                let lang = resolve_lang(lang, &config)?;
                print_json(&json!({
                    "lang": lang,
                    "measurements": vedur_core::measurements(lang),
                    "text_types": TEXT_TYPES,
                }))?;
            }
            Command::Info => print_json(&vedur_core::info())?,
        }

        Ok(())
    }
}

/// Explicit `--lang` wins, then the configured default.
fn resolve_lang(arg: Option<Lang>, config: &Config) -> anyhow::Result<Lang> {
    match arg {
        Some(lang) => Ok(lang),
        None => Ok(config.default_lang()?),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{out}");
    Ok(())
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let current = config.default_lang().unwrap_or_default();
    let langs: Vec<Lang> = Lang::all().to_vec();
    let cursor = langs.iter().position(|l| *l == current).unwrap_or(0);

    let lang = Select::new("Default language:", langs).with_starting_cursor(cursor).prompt()?;
    config.set_default_lang(lang);

    config.descriptions = Confirm::new("Include measurement descriptions by default?")
        .with_default(config.descriptions)
        .prompt()?;

    let timeout = CustomType::<u64>::new("Request timeout in seconds (0 for none):")
        .with_default(config.timeout_secs.unwrap_or(0))
        .prompt()?;
    config.timeout_secs = (timeout > 0).then_some(timeout);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
