//! Search enumeration CLI
//!
//! Streams every record matching a search query as JSON lines, pulling pages
//! from the search service on demand.
//!
//! Usage:
//!   gds-search --endpoint http://localhost:3009 --param filter_format=guide [OPTIONS]

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gds_api::{ClientConfig, SearchApi, SearchQuery};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Enumerate search results page by page
#[derive(Parser, Debug)]
#[command(name = "gds-search")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config file (endpoint, timeout_secs, page_size, headers)
    #[arg(short, long, conflicts_with = "endpoint")]
    config: Option<PathBuf>,

    /// Search service base URL
    #[arg(short, long, env = "GDS_SEARCH_ENDPOINT")]
    endpoint: Option<String>,

    /// Query parameter as key=value; repeat a key to send an array
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Records per page (defaults to the configured page size)
    #[arg(short = 's', long)]
    page_size: Option<usize>,

    /// Stop after this many records
    #[arg(short, long)]
    limit: Option<usize>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let config = match (&args.config, &args.endpoint) {
        (Some(path), _) => ClientConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        (None, Some(endpoint)) => {
            let config = ClientConfig::new(endpoint.clone());
            config.validate()?;
            config
        }
        (None, None) => bail!("either --config or --endpoint (GDS_SEARCH_ENDPOINT) is required"),
    };
    Ok(config)
}

fn build_query(params: &[(String, String)]) -> SearchQuery {
    let mut query = SearchQuery::new();
    for (key, value) in params {
        let merged = match query.get(key) {
            None => Value::String(value.clone()),
            Some(Value::Array(existing)) => {
                let mut items = existing.clone();
                items.push(Value::String(value.clone()));
                Value::Array(items)
            }
            Some(existing) => Value::Array(vec![existing.clone(), Value::String(value.clone())]),
        };
        query = query.insert(key.clone(), merged);
    }
    query
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let page_size = args.page_size.unwrap_or(config.page_size);
    let api = SearchApi::new(&config).context("creating search client")?;
    let query = build_query(&args.params);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let records = api.search_enum(query, page_size)?;
    for record in records.take(args.limit.unwrap_or(usize::MAX)) {
        let record = record.context("fetching search page")?;
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if let Err(e) = run(args) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn test_repeated_params_become_arrays() {
        let params = vec![
            ("filter_topics".to_string(), "1".to_string()),
            ("q".to_string(), "tax".to_string()),
            ("filter_topics".to_string(), "2".to_string()),
            ("filter_topics".to_string(), "3".to_string()),
        ];
        let query = build_query(&params);
        assert_eq!(query.get("q"), Some(&json!("tax")));
        assert_eq!(query.get("filter_topics"), Some(&json!(["1", "2", "3"])));
    }
}
