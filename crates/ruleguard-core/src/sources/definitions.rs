use std::collections::HashMap;

use super::RuleDefinitionSource;
use crate::{errors::RuleError, types::RuleDefinition};

/// Rule definitions held in memory, keyed by flow id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRuleSource {
    flows: HashMap<String, Vec<RuleDefinition>>,
}

impl InMemoryRuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the definitions of a flow.
    pub fn insert(&mut self, flow_id: impl Into<String>, definitions: Vec<RuleDefinition>) {
        let _ = self.flows.insert(flow_id.into(), definitions);
    }

    pub fn with_flow(mut self, flow_id: impl Into<String>, definitions: Vec<RuleDefinition>) -> Self {
        self.insert(flow_id, definitions);
        self
    }

    pub fn flow_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.flows.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl RuleDefinitionSource for InMemoryRuleSource {
    fn fetch(&self, flow_id: &str) -> Result<Vec<RuleDefinition>, RuleError> {
        self.flows
            .get(flow_id)
            .cloned()
            .ok_or_else(|| RuleError::FlowNotFound(flow_id.to_string()))
    }
}
