use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::Local;
use ruleguard_core::{
    read_dataset, CachedStatsSource, Dataset, HistoricalStatsSource, RuleEngine, ValidationReport,
};
use ruleguard_reports::{JsonFormatter, Reporter, StdOutFormatter};

use crate::{
    errors::CliError,
    parser::{parse_config, Config, Flow},
    writer::{resolve_file_path, write_report},
    Args, OutputFormat,
};

/// Runs the selected flows. Returns whether every rule passed.
pub fn run(args: &Args) -> Result<bool> {
    let config = parse_config(&args.config)?;
    let flows = config.select(args.flow.as_deref())?;
    let engine = build_engine(&config, args);
    let version = env!("CARGO_PKG_VERSION").to_string();

    match args.output {
        OutputFormat::Stdout => {
            let mut formatter = StdOutFormatter::new(version);
            formatter.on_start();
            let reports = run_flows(&engine, &flows, args.data.as_deref(), &mut formatter)?;
            let failed = reports.iter().filter(|r| !r.is_passed()).count();
            formatter.on_summary(reports.len() - failed, failed);
            Ok(failed == 0)
        }
        OutputFormat::Json => {
            let mut formatter = JsonFormatter::new(version);
            run_flows(&engine, &flows, args.data.as_deref(), &mut formatter)?;
            let json = formatter
                .to_json()
                .context("Failed to serialize validation report")?;
            if args.out_file.is_some() {
                let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
                let path = resolve_file_path(args.out_file.as_deref(), &timestamp)?;
                write_report(&path, &json)?;
            } else {
                println!("{}", json);
            }
            Ok(formatter.is_passed())
        }
    }
}

fn build_engine(config: &Config, args: &Args) -> RuleEngine {
    let stats: Arc<dyn HistoricalStatsSource> = if args.cache_stats {
        Arc::new(CachedStatsSource::new(config.stats_source()))
    } else {
        Arc::new(config.stats_source())
    };
    RuleEngine::new()
        .with_definitions(Arc::new(config.definitions()))
        .with_stats(stats)
        .with_parallelism(args.parallel)
}

fn run_flows<R: Reporter>(
    engine: &RuleEngine,
    flows: &[&Flow],
    data_override: Option<&str>,
    reporter: &mut R,
) -> Result<Vec<ValidationReport>> {
    // Flows sharing a data file read it once
    let mut datasets: HashMap<String, Dataset> = HashMap::new();
    let mut reports = Vec::with_capacity(flows.len());

    for flow in flows {
        let path = data_override
            .or(flow.data.as_deref())
            .ok_or_else(|| CliError::MissingData {
                flow_id: flow.id.clone(),
            })?;
        let dataset = match datasets.entry(path.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                reporter.on_loading(path);
                let dataset = read_dataset(path)
                    .with_context(|| format!("Failed to read data file: '{}'", path))?;
                reporter.on_dataset_loaded(dataset.num_rows(), dataset.num_columns());
                entry.insert(dataset)
            }
        };

        let definitions = engine
            .load(&flow.id)
            .with_context(|| format!("Failed to load rules of flow '{}'", flow.id))?;
        reporter.on_validation_start(&flow.id, definitions.len());
        let report = engine
            .report(&flow.id, dataset, &definitions)
            .map_err(|source| CliError::ValidationError {
                flow_id: flow.id.clone(),
                source,
            })?;
        reporter.on_flow_result(&report);
        reports.push(report);
    }
    Ok(reports)
}
