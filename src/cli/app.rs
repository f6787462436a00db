use super::{Cli, Command, Source};
use anyhow::{Context, Result, anyhow, bail};
use paged_collection::{
    CollectionConfig, CollectionFactory, MemoryProvider, PageCountPolicy, PagedCollection,
    QueryParams, Value,
};
use std::fs;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: bool) {
    let default = if verbose { "paged_collection=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Page { source, page } => show_page(&source, page).await,
        Command::Drain { source } => drain(&source).await,
        Command::Count { source } => count(&source).await,
        Command::Find { source, key, value } => find(&source, &key, &value).await,
    }
}

async fn show_page(source: &Source, page: usize) -> Result<()> {
    let mut collection = open(source)?;
    collection.query(Some(criteria(source)?)).await?;

    if page != collection.page() {
        let total_pages = collection.total_pages();
        if collection.select_page(page, None).await?.is_none() {
            bail!("page {} is outside 1..={}", page, total_pages);
        }
    }

    print_items(&collection)?;
    print_summary(&collection);
    Ok(())
}

async fn drain(source: &Source) -> Result<()> {
    let mut collection = open(source)?;
    collection.query(Some(criteria(source)?)).await?;
    println!("-- batch 1: {} record(s)", collection.len());

    let mut batch = 1;
    while !collection.all_loaded() {
        let before = collection.len();
        collection.load_more(None).await?;
        batch += 1;
        println!("-- batch {}: {} record(s)", batch, collection.len() - before);
    }

    print_items(&collection)?;
    print_summary(&collection);
    Ok(())
}

async fn count(source: &Source) -> Result<()> {
    let mut collection = open(source)?;
    *collection.query_params_mut() = criteria(source)?;
    let response = collection.count().await?;
    println!("{}", response.count);
    print_summary(&collection);
    Ok(())
}

async fn find(source: &Source, key: &str, value: &str) -> Result<()> {
    let mut collection = open(source)?;
    collection.query(Some(criteria(source)?)).await?;
    while !collection.all_loaded() {
        collection.load_more(None).await?;
    }

    let record = collection
        .find_by_type(parse_value(value), key)
        .ok_or_else(|| anyhow!("no record with {} = {}", key, value))?;
    println!("{}", serde_json::to_string(record)?);
    Ok(())
}

fn open(source: &Source) -> Result<PagedCollection<MemoryProvider>> {
    let text = fs::read_to_string(&source.file)
        .with_context(|| format!("reading {}", source.file.display()))?;
    let provider = MemoryProvider::from_json(&text)
        .with_context(|| format!("loading records from {}", source.file.display()))?;

    let policy = if source.ceil {
        PageCountPolicy::Ceil
    } else {
        PageCountPolicy::Truncate
    };
    let config = CollectionConfig::new()
        .per_page(source.per_page)
        .page_count(policy);
    let factory = CollectionFactory::with_config(Arc::new(provider), config)?;
    Ok(factory.create(None, None))
}

fn criteria(source: &Source) -> Result<QueryParams> {
    source
        .filters
        .iter()
        .map(|filter| parse_filter(filter))
        .collect()
}

fn parse_filter(filter: &str) -> Result<(String, Value)> {
    let (key, value) = filter
        .split_once('=')
        .ok_or_else(|| anyhow!("filter '{}' must look like key=value", filter))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("filter '{}' has an empty key", filter);
    }
    Ok((key.to_string(), parse_value(value)))
}

/// Numbers and booleans are taken literally, anything else as text.
fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) if !json.is_object() && !json.is_array() => Value::from(&json),
        _ => Value::Text(raw.to_string()),
    }
}

fn print_items(collection: &PagedCollection<MemoryProvider>) -> Result<()> {
    for record in collection {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

fn print_summary(collection: &PagedCollection<MemoryProvider>) {
    println!(
        "-- page {}/{} | {} loaded | {} total{}",
        collection.page(),
        collection.total_pages(),
        collection.len(),
        collection.total_items(),
        if collection.end_reached() { " | end reached" } else { "" }
    );
}
