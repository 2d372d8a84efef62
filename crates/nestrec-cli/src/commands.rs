use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use nestrec_resolve::ReferenceResolver;
use nestrec_sdk::CodecConfig;
use nestrec_store::{InMemoryRecordStore, RecordStore};
use nestrec_types::{Record, RecordId, RecordSet};
use serde_json::json;
use tracing::warn;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Inspect(args) => cmd_inspect(args, &format),
        Command::Check(args) => cmd_check(args, &format),
        Command::Closure(args) => cmd_closure(args, &format).await,
        Command::Delete(args) => cmd_delete(args, &format),
    }
}

fn load_dump(path: &Path) -> anyhow::Result<RecordSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON record array", path.display()))?;
    let total = records.len();
    let set = RecordSet::from(records);
    if set.len() < total {
        warn!(duplicates = total - set.len(), "dump contains duplicate record names; keeping first");
    }
    Ok(set)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<CodecConfig> {
    match path {
        Some(path) => Ok(CodecConfig::from_file(path)?),
        None => Ok(CodecConfig::default()),
    }
}

fn root_id(root: &str, config: &CodecConfig) -> anyhow::Result<RecordId> {
    if root.contains('/') {
        Ok(RecordId::parse(root)?)
    } else {
        Ok(RecordId::in_zone(root, config.zone.clone()))
    }
}

fn write_json(path: &Path, records: &[Record]) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(records)?;
    std::fs::write(path, text).with_context(|| format!("cannot write {}", path.display()))
}

fn cmd_inspect(args: InspectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let set = load_dump(&args.dump)?;
    let records: Vec<&Record> = set
        .iter()
        .filter(|r| args.record_type.as_deref().map_or(true, |t| r.record_type == t))
        .collect();

    match format {
        OutputFormat::Json => {
            let summary: Vec<_> = records
                .iter()
                .map(|r| {
                    json!({
                        "type": r.record_type,
                        "id": r.id.to_string(),
                        "fields": r.len(),
                        "references": r.references().iter().map(|x| x.target.to_string()).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            for record in &records {
                println!(
                    "{} {} ({} fields)",
                    record.record_type.cyan(),
                    record.id.to_string().yellow(),
                    record.len()
                );
                for (field, value) in &record.fields {
                    for reference in value.references() {
                        println!(
                            "  {} → {} {}",
                            field,
                            reference.target_name().yellow(),
                            format!("{:?}", reference.action).dimmed()
                        );
                    }
                }
            }
            println!("{} record(s)", records.len().to_string().bold());
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let set = load_dump(&args.dump)?;
    let dangling = set.dangling_references();

    match format {
        OutputFormat::Json => {
            let targets: Vec<String> = dangling.iter().map(|r| r.target.to_string()).collect();
            println!("{}", json!({ "records": set.len(), "dangling": targets }));
        }
        OutputFormat::Text => {
            if dangling.is_empty() {
                println!("{} {} record(s), closed", "✓".green().bold(), set.len());
            }
            for reference in &dangling {
                println!("  {} {}", "missing:".red(), reference.target);
            }
        }
    }
    if !dangling.is_empty() {
        bail!("{} dangling reference(s)", dangling.len());
    }
    Ok(())
}

async fn cmd_closure(args: ClosureArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let set = load_dump(&args.dump)?;
    let root = root_id(&args.root, &config)?;

    let store = InMemoryRecordStore::new();
    store.save_batch(set.as_slice())?;
    let resolution = ReferenceResolver::new(config.resolver.clone())
        .resolve_id(&root, &store)
        .await?;

    match format {
        OutputFormat::Json => {
            let names: Vec<&str> = resolution.records.iter().map(Record::name).collect();
            println!(
                "{}",
                json!({ "root": root.to_string(), "rounds": resolution.rounds, "records": names })
            );
        }
        OutputFormat::Text => {
            println!(
                "{} {} reachable from {} in {} round(s)",
                "✓".green().bold(),
                resolution.records.len(),
                root.to_string().yellow(),
                resolution.rounds
            );
            for record in resolution.records.iter() {
                println!("  {} {}", record.record_type.cyan(), record.name());
            }
            if !resolution.records.is_closed() {
                println!("  {} some references were not found", "warning:".yellow());
            }
        }
    }
    if let Some(path) = &args.output {
        write_json(path, resolution.records.as_slice())?;
    }
    Ok(())
}

fn cmd_delete(args: DeleteArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let set = load_dump(&args.dump)?;
    let root = root_id(&args.root, &config)?;

    let store = InMemoryRecordStore::new();
    store.save_batch(set.as_slice())?;
    let removed = store.delete(&root)?;

    match format {
        OutputFormat::Json => {
            let ids: Vec<String> = removed.iter().map(|id| id.to_string()).collect();
            println!("{}", json!({ "removed": ids }));
        }
        OutputFormat::Text => {
            for id in &removed {
                println!("  {} {}", "deleted:".red(), id);
            }
            println!("{} {} record(s) removed", "✓".green().bold(), removed.len());
        }
    }
    if let Some(path) = &args.output {
        let gone: HashSet<&RecordId> = removed.iter().collect();
        let remaining: Vec<Record> = set
            .iter()
            .filter(|r| !gone.contains(&r.id))
            .cloned()
            .collect();
        write_json(path, &remaining)?;
    }
    Ok(())
}
