//! metasearch CLI: aggregated search across local and external providers
//!
//! Credentials are read from the environment (`SERPAPI_API_KEY`,
//! `BING_SEARCH_API_KEY`); providers with no credential are simply skipped.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use metasearch::storage::{MemoryStore, SearchStore};
use metasearch::{Category, SearchConfig, SearchManager, SearchOptions};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "metasearch")]
#[command(about = "Aggregated multi-provider web search")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search across all available providers
    Search {
        /// Search query
        query: String,

        /// Category (web, images, news, videos, shopping, scholar)
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum number of merged results
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Aggregate suggestions for a partial query
    Suggest {
        /// Partial query
        partial: String,
    },
    /// List providers and their availability
    Providers,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG=metasearch=debug for provider-level diagnostics
    env_logger::init();

    let cli = Cli::parse();
    let config = SearchConfig::from_env();
    let store = Arc::new(MemoryStore::with_demo_data());
    let manager = SearchManager::new(&config, store.clone());

    match cli.command {
        Commands::Search {
            query,
            category,
            limit,
            format,
        } => {
            let options = SearchOptions {
                category: category.as_deref().map(Category::parse),
                limit: Some(limit),
                ..Default::default()
            };

            let results = manager.search(&query, &options).await;
            // Query log feeds future suggestions; failure here is not fatal
            if let Err(err) = store.record_search(&query).await {
                log::debug!("failed to record search: {err}");
            }

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
                OutputFormat::Text => {
                    if results.is_empty() {
                        println!("{}", "No results.".yellow());
                    }
                    for result in &results {
                        println!(
                            "{} {} {}",
                            format!("{}.", result.id).bold(),
                            result.title.green().bold(),
                            format!("[{}]", result.source).cyan()
                        );
                        println!("   {}", result.url.blue().underline());
                        if !result.description.is_empty() {
                            println!("   {}", result.description);
                        }
                        println!();
                    }
                }
            }
        }
        Commands::Suggest { partial } => {
            for suggestion in manager.suggestions(&partial).await {
                println!("{suggestion}");
            }
        }
        Commands::Providers => {
            println!("{}", "Providers:".bold());
            for provider in manager.available_providers() {
                println!("  {} {}", "✓".green(), provider.name());
            }
        }
    }

    Ok(())
}
