//! holocron - command-line entry point
//!
//! Looks up people, droids, planets and starships by name, prints the
//! normalized entity as JSON, and boards ships with crew and passengers.
//! Every remote response is kept in the cache document, so repeated runs
//! work offline for anything already seen.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use holocron_common::config::{load_config, resolve_cache_path};
use holocron_ingest::{
    load_records, CacheStore, IngestPipeline, MappingSpec, RawEntity, SchemaMapper,
    SupplementaryData, SwapiClient,
};

/// Command-line arguments for holocron
#[derive(Parser, Debug)]
#[command(name = "holocron")]
#[command(about = "Fetch, enrich and normalize Star Wars entities")]
#[command(version)]
struct Args {
    /// Config file (overrides HOLOCRON_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cache document (overrides HOLOCRON_CACHE and the config file)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Mapping document (built-in mapping otherwise)
    #[arg(long, global = true)]
    mappings: Option<PathBuf>,

    /// Supplementary people dataset (JSON array, or CSV by extension)
    #[arg(long, global = true)]
    people: Option<PathBuf>,

    /// Supplementary droid dataset (JSON array, or CSV by extension)
    #[arg(long, global = true)]
    droids: Option<PathBuf>,

    /// Supplementary planet dataset (JSON array, or CSV by extension)
    #[arg(long, global = true)]
    planets: Option<PathBuf>,

    /// Supplementary starship dataset (JSON array, or CSV by extension)
    #[arg(long, global = true)]
    starships: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a person
    Person { name: String },
    /// Look up a droid
    Droid { name: String },
    /// Look up a planet
    Planet { name: String },
    /// Look up a starship
    Starship { name: String },
    /// Board a starship with crew and passengers
    Board {
        /// Starship name
        #[arg(long)]
        ship: String,

        /// Crew assignment, repeatable
        #[arg(long = "crew", value_name = "POSITION=NAME")]
        crew: Vec<String>,

        /// Passenger name, repeatable
        #[arg(long = "passenger", value_name = "NAME")]
        passengers: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing; RUST_LOG wins over the configured level.
    // Logs go to stderr so stdout carries only the JSON result.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Remote resource: {}", config.base_url);

    let cache_path = resolve_cache_path(args.cache.as_deref(), &config);
    info!("Cache: {}", cache_path.display());

    let client = SwapiClient::from_config(&config).context("Failed to create HTTP client")?;
    let cache = CacheStore::load(cache_path, client).context("Failed to load cache")?;

    let spec = match args.mappings.as_deref().or(config.mapping_path.as_deref()) {
        Some(path) => MappingSpec::load(path)
            .with_context(|| format!("Failed to load mapping {}", path.display()))?,
        None => MappingSpec::standard().context("Built-in mapping is invalid")?,
    };
    let mapper = SchemaMapper::new(spec, config.none_values.clone());

    let supplementary = SupplementaryData {
        people: load_optional(args.people.as_deref())?,
        droids: load_optional(args.droids.as_deref())?,
        planets: load_optional(args.planets.as_deref())?,
        starships: load_optional(args.starships.as_deref())?,
    };

    let mut pipeline = IngestPipeline::new(cache, mapper, supplementary, config.base_url.clone());

    let output = match args.command {
        Command::Person { name } => Value::Object(pipeline.person(&name)?),
        Command::Droid { name } => Value::Object(pipeline.droid(&name)?),
        Command::Planet { name } => Value::Object(pipeline.planet(&name)?),
        Command::Starship { name } => Value::Object(pipeline.starship(&name)?.into_entity()),
        Command::Board {
            ship,
            crew,
            passengers,
        } => {
            let crew = crew
                .iter()
                .map(|assignment| parse_assignment(assignment))
                .collect::<Result<Vec<_>>>()?;
            let passengers = (!passengers.is_empty()).then_some(passengers.as_slice());

            let boarded = pipeline
                .board_ship(&ship, &crew, passengers)
                .with_context(|| format!("Failed to board {}", ship))?;
            Value::Object(boarded.into_entity())
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Load a supplementary dataset if a path was given
fn load_optional(path: Option<&Path>) -> Result<Vec<RawEntity>> {
    match path {
        Some(path) => load_records(path)
            .with_context(|| format!("Failed to load dataset {}", path.display())),
        None => Ok(Vec::new()),
    }
}

/// Split `POSITION=NAME`
fn parse_assignment(assignment: &str) -> Result<(String, String)> {
    match assignment.split_once('=') {
        Some((position, name)) if !position.trim().is_empty() && !name.trim().is_empty() => {
            Ok((position.trim().to_string(), name.trim().to_string()))
        }
        _ => bail!("Crew assignment must look like POSITION=NAME, got {:?}", assignment),
    }
}
