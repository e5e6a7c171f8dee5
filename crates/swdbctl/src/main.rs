//! swdbctl entry point.
//!
//! Operator tool around the schema loader and the warm-boot engine:
//! validate a schema document, inspect a snapshot's replay order, or
//! migrate a snapshot across a schema change.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use swdb_schema::{load_schema_file, ObjectClass, TraceConfig};
use swdb_warmboot::{dump, load};

/// Switch state store schema and snapshot tool
#[derive(Parser, Debug)]
#[command(name = "swdbctl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a schema document and print a model summary
    Validate {
        /// Schema document path
        schema: PathBuf,
    },
    /// Print the replay order of a snapshot
    ReplayOrder {
        /// Schema document path
        schema: PathBuf,
        /// Snapshot path
        snapshot: PathBuf,
    },
    /// Re-write a snapshot under the given schema, remapping identities
    Migrate {
        /// Schema document path
        schema: PathBuf,
        /// Snapshot to read
        input: PathBuf,
        /// Snapshot to write
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.parse().context("invalid log level")?)
        .init();

    match args.command {
        Command::Validate { schema } => validate(&schema),
        Command::ReplayOrder { schema, snapshot } => replay_order(&schema, &snapshot),
        Command::Migrate {
            schema,
            input,
            output,
        } => migrate(&schema, &input, &output),
    }
}

fn validate(schema: &PathBuf) -> Result<()> {
    let model = load_schema_file(schema)
        .with_context(|| format!("schema {} failed validation", schema.display()))?;

    println!(
        "schema v{}: {} object types, {} attributes",
        model.version(),
        model.num_types(),
        model.attrs().len()
    );
    for object in model.objects() {
        let class = match object.class {
            ObjectClass::User => "user",
            ObjectClass::Auto => "auto",
            ObjectClass::None => "none",
        };
        let refs: Vec<&str> = model
            .refs(object.id)
            .iter()
            .filter_map(|&t| model.object(t).map(|o| o.name.as_str()))
            .collect();
        println!(
            "  {} [{}] priority {} attrs {} refs [{}]",
            object.name,
            class,
            object.priority,
            object.attrs.len(),
            refs.join(", ")
        );
    }
    Ok(())
}

fn replay_order(schema: &PathBuf, snapshot: &PathBuf) -> Result<()> {
    let model = load_schema_file(schema).context("failed to load schema")?;
    let result = load(&model, &TraceConfig::new(), snapshot)
        .with_context(|| format!("failed to load snapshot {}", snapshot.display()))?;

    info!(
        "{} objects loaded, {} records dropped",
        result.loaded, result.skipped
    );
    for handle in &result.replay_order {
        let type_name = model.type_name_of(*handle).unwrap_or("<unknown>");
        println!("{handle}  {type_name}");
    }
    Ok(())
}

fn migrate(schema: &PathBuf, input: &PathBuf, output: &PathBuf) -> Result<()> {
    let model = load_schema_file(schema).context("failed to load schema")?;
    let result = load(&model, &TraceConfig::new(), input)
        .with_context(|| format!("failed to load snapshot {}", input.display()))?;
    dump(&result.store, &model, output)
        .with_context(|| format!("failed to write snapshot {}", output.display()))?;

    println!(
        "migrated {} objects ({} records dropped) -> {}",
        result.loaded,
        result.skipped,
        output.display()
    );
    Ok(())
}
