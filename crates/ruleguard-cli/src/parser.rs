use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use ruleguard_core::{HistoricalStat, InMemoryRuleSource, RuleDefinition, StaticStatsSource};
use serde::Deserialize;

use crate::errors::ConfigError;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub flow: Vec<Flow>,
    /// Historical aggregates keyed by the query string used as rule parameter.
    #[serde(default)]
    pub stats: HashMap<String, HistoricalStat>,
}

#[derive(Debug, Deserialize)]
pub struct Flow {
    pub id: String,
    /// Dataset validated by this flow, overridden by `--data`.
    pub data: Option<String>,
    #[serde(default)]
    pub rule: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
pub struct Rule {
    pub columns: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default)]
    pub parameter: String,
    pub error_message: String,
}

impl From<&Rule> for RuleDefinition {
    fn from(rule: &Rule) -> Self {
        RuleDefinition::new(
            rule.columns.as_str(),
            rule.rule_type.as_str(),
            rule.parameter.as_str(),
            rule.error_message.as_str(),
        )
    }
}

impl Config {
    fn check(&self) -> Result<(), ConfigError> {
        if self.flow.is_empty() {
            return Err(ConfigError::NoFlow);
        }
        let mut seen = Vec::with_capacity(self.flow.len());
        for flow in &self.flow {
            if seen.contains(&flow.id.as_str()) {
                return Err(ConfigError::DuplicateFlow {
                    flow_id: flow.id.clone(),
                });
            }
            seen.push(flow.id.as_str());
            if let Some(index) = flow.rule.iter().position(|r| r.columns.trim().is_empty()) {
                return Err(ConfigError::EmptyColumns {
                    flow_id: flow.id.clone(),
                    index: index + 1,
                });
            }
        }
        Ok(())
    }

    /// Flows to run: the one named, or all of them in file order.
    pub fn select(&self, flow_id: Option<&str>) -> Result<Vec<&Flow>, ConfigError> {
        match flow_id {
            None => Ok(self.flow.iter().collect()),
            Some(id) => self
                .flow
                .iter()
                .find(|f| f.id == id)
                .map(|f| vec![f])
                .ok_or_else(|| ConfigError::UnknownFlow {
                    flow_id: id.to_string(),
                    available: self
                        .flow
                        .iter()
                        .map(|f| f.id.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                }),
        }
    }

    pub fn definitions(&self) -> InMemoryRuleSource {
        self.flow.iter().fold(InMemoryRuleSource::new(), |source, flow| {
            source.with_flow(flow.id.clone(), flow.rule.iter().map(RuleDefinition::from).collect())
        })
    }

    pub fn stats_source(&self) -> StaticStatsSource {
        StaticStatsSource::from(self.stats.clone())
    }
}

pub fn parse_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(config_str.as_str())
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .check()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}
