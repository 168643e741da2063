use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dynamic_search::entities::{DraftPurchaseInvoice, Product};
use dynamic_search::{
    Database, FieldRegistry, Operator, SearchConfig, SearchError, SearchRequest, Searchable,
};
use serde::Serialize;
use std::io::Read;
use std::process::ExitCode;
use strum::IntoEnumIterator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Run dynamic filter searches against the local database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a search request and print the paginated response as JSON
    Search {
        /// Entity to search
        #[arg(long)]
        entity: Entity,

        /// Path to a JSON search request, or "-" for stdin
        #[arg(long, default_value = "-")]
        request: String,

        /// Overrides DATABASE_URL
        #[arg(long)]
        database_url: Option<String>,
    },
    /// List the searchable fields of an entity and the supported operators
    Fields {
        #[arg(long)]
        entity: Entity,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Entity {
    DraftPurchaseInvoices,
    Products,
}

impl Entity {
    fn registry(self) -> &'static FieldRegistry {
        match self {
            Entity::DraftPurchaseInvoices => DraftPurchaseInvoice::registry(),
            Entity::Products => Product::registry(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            match e.downcast_ref::<SearchError>() {
                Some(search_error) if search_error.is_client_error() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search {
            entity,
            request,
            database_url,
        } => {
            let config = SearchConfig::from_env()?;
            let request = read_request(&request, config.default_limit)?;
            let url = database_url.unwrap_or(config.database_url);
            let db = Database::new(&url, config.max_connections).await?;
            tracing::info!("Searching {} in {}", entity.registry().entity(), url);
            match entity {
                Entity::DraftPurchaseInvoices => {
                    print_page::<DraftPurchaseInvoice>(&db, &request).await
                }
                Entity::Products => print_page::<Product>(&db, &request).await,
            }
        }
        Commands::Fields { entity } => {
            let registry = entity.registry();
            for name in registry.field_names() {
                let descriptor = registry.resolve(name)?;
                println!("{:<24} {:?}", name, descriptor.field_type);
            }
            let operators: Vec<String> = Operator::iter().map(|op| op.to_string()).collect();
            println!("operators: {}", operators.join(", "));
            Ok(())
        }
    }
}

async fn print_page<T>(db: &Database, request: &SearchRequest) -> Result<()>
where
    T: Searchable + Serialize,
{
    let response = db.search_paginated::<T>(request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Reads the request body; a missing `limit` takes the configured default.
fn read_request(source: &str, default_limit: i64) -> Result<SearchRequest> {
    let body = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read request file {}", source))?
    };

    let mut value: serde_json::Value =
        serde_json::from_str(&body).context("Request is not valid JSON")?;
    if let Some(object) = value.as_object_mut() {
        object
            .entry("limit")
            .or_insert_with(|| serde_json::Value::from(default_limit));
    }
    serde_json::from_value(value).context("Request does not match the search request format")
}
