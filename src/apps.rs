use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::config::{CatalogConfig, CatalogKind, IndexTableConfig};
use crate::constants::index_table::DEFAULT_DELIMITER;
use crate::data::Catalog;
use crate::index_table::{IndexTableStats, load_index_definitions, write_index_table};
use crate::pipeline::{MergePipeline, MergeReport};
use crate::store::{CatalogStore, FileCatalogStore, load_batch};
use crate::summary::GroupSummary;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Recipes,
    Plants,
}

impl From<KindArg> for CatalogKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Recipes => CatalogKind::Recipes,
            KindArg::Plants => CatalogKind::Plants,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "merge_catalog",
    disable_help_subcommand = true,
    about = "Append a batch of records to a JSON catalog",
    long_about = "Load a JSON catalog, append a batch of new records, reject identifier collisions, report per-group counts, and write the merged catalog atomically.",
    after_help = "The batch may be a JSON file (array of objects or a single object) or a directory of JSON files read in sorted path order."
)]
struct MergeCatalogCli {
    #[arg(long, value_name = "PATH", help = "Existing catalog (JSON array of objects)")]
    catalog: PathBuf,
    #[arg(long, value_name = "PATH", help = "Batch file or directory of new records")]
    batch: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        help = "Output path; defaults to replacing the catalog in place"
    )]
    output: Option<PathBuf>,
    #[arg(
        long,
        value_enum,
        default_value = "recipes",
        help = "Record domain presetting the key and group fields"
    )]
    kind: KindArg,
    #[arg(long = "key-field", value_name = "FIELD", help = "Override the unique identifier field")]
    key_field: Option<String>,
    #[arg(long = "group-field", value_name = "FIELD", help = "Override the reporting field")]
    group_field: Option<String>,
    #[arg(
        long = "unknown-group",
        value_name = "NAME",
        help = "Bucket name for records missing the reporting field"
    )]
    unknown_group: Option<String>,
    #[arg(long = "dry-run", help = "Report the merge without writing output")]
    dry_run: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "emit_index_table",
    disable_help_subcommand = true,
    about = "Write database index definitions as a delimited table",
    long_about = "Read index definitions (JSON rows or objects) and write an eight-column table with a fixed header, one row per definition in input order."
)]
struct EmitIndexTableCli {
    #[arg(long, value_name = "PATH", help = "JSON array of index definitions")]
    definitions: PathBuf,
    #[arg(long, value_name = "PATH", help = "Output table path")]
    output: PathBuf,
    #[arg(
        long,
        value_name = "CHAR",
        value_parser = parse_delimiter_arg,
        default_value = ",",
        help = "Single-byte field delimiter (use 'tab' for tab-separated output)"
    )]
    delimiter: u8,
    #[arg(long = "no-bom", help = "Omit the UTF-8 byte order mark")]
    no_bom: bool,
}

/// Run the `merge_catalog` command with the given arguments (program name excluded).
pub fn run_merge_catalog<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();

    let Some(cli) = parse_cli::<MergeCatalogCli, _>(
        std::iter::once("merge_catalog".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let mut config = CatalogConfig::for_kind(cli.kind.into());
    if let Some(key_field) = cli.key_field {
        config = config.with_key_field(key_field.as_str());
    }
    if let Some(group_field) = cli.group_field {
        config = config.with_group_field(group_field.as_str());
    }
    if let Some(unknown_group) = cli.unknown_group {
        config = config.with_unknown_group(unknown_group);
    }
    let pipeline = MergePipeline::new(config)?;

    let source = FileCatalogStore::new(&cli.catalog);
    let destination = FileCatalogStore::new(cli.output.unwrap_or_else(|| cli.catalog.clone()));
    let batch = load_batch(&cli.batch)?;

    if cli.dry_run {
        let existing = source.load()?;
        let (merged, groups) = pipeline.prepare(&existing, &batch)?;
        print_counts(existing.len(), batch.len(), &merged);
        print_groups(pipeline.config().group_field.as_str(), &groups);
        println!();
        println!(
            "Dry run: {} was not written.",
            destination.path().display()
        );
        return Ok(());
    }

    let report = pipeline.run(&source, &batch, &destination)?;
    print_report(pipeline.config().group_field.as_str(), &report);
    Ok(())
}

/// Run the `emit_index_table` command with the given arguments (program name excluded).
pub fn run_emit_index_table<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();

    let Some(cli) = parse_cli::<EmitIndexTableCli, _>(
        std::iter::once("emit_index_table".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let config = IndexTableConfig::default()
        .with_delimiter(cli.delimiter)
        .with_bom(!cli.no_bom);
    let definitions = load_index_definitions(&cli.definitions)?;
    let stats = write_index_table(&definitions, &cli.output, &config)?;
    print_index_stats(&stats, &cli.output);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_report(group_field: &str, report: &MergeReport) {
    println!("existing records: {}", report.existing_records);
    println!("batch records:    {}", report.batch_records);
    println!("merged records:   {}", report.merged_records);
    print_groups(group_field, &report.groups);
    println!();
    println!(
        "Wrote {} records to {}",
        report.merged_records,
        report.destination.display()
    );
}

fn print_counts(existing: usize, batch: usize, merged: &Catalog) {
    println!("existing records: {}", existing);
    println!("batch records:    {}", batch);
    println!("merged records:   {}", merged.len());
}

fn print_groups(group_field: &str, groups: &GroupSummary) {
    println!();
    println!("[RECORDS PER {}]", group_field.to_uppercase());
    for (group, count) in groups.sorted() {
        println!("  {}: {}", group, count);
    }
}

fn print_index_stats(stats: &IndexTableStats, output: &std::path::Path) {
    println!("Index table written.");
    println!("  indexes:        {}", stats.indexes);
    println!("  collections:    {}", stats.collections);
    println!("  unique indexes: {}", stats.unique_indexes);
    println!();
    println!("Saved to {}", output.display());
}

fn parse_delimiter_arg(raw: &str) -> Result<u8, String> {
    match raw {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        "" => return Ok(DEFAULT_DELIMITER),
        _ => {}
    }
    let bytes = raw.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii() {
        return Err(format!(
            "--delimiter expects a single ASCII character, got '{}'",
            raw
        ));
    }
    if matches!(bytes[0], b'"' | b'\n' | b'\r') {
        return Err(format!("--delimiter cannot be '{}'", raw.escape_default()));
    }
    Ok(bytes[0])
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
