//! Rule-type identifiers and the constructors behind them.

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use once_cell::sync::Lazy;

use crate::rules::{
    Average, ColumnSet, CustomFunction, HistoricalGreater, HistoricalLess, HistoricalStdDev,
    InRange, Maximum, Minimum, NotNull, RangeWithSecondary, RecordCount, RegexMatch, Rule,
    RuleContext, StdDev, Unique,
};

/// The closed set of built-in rule types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    NotNull,
    Unique,
    Regex,
    Minimum,
    Maximum,
    Range,
    RangeValue,
    RangeRange,
    Average,
    StdDev,
    RecordCount,
    CustomFunction,
    HistoricalGreater,
    HistoricalLess,
    HistoricalStdDev,
    Columns,
}

impl RuleType {
    pub const ALL: [RuleType; 16] = [
        RuleType::NotNull,
        RuleType::Unique,
        RuleType::Regex,
        RuleType::Minimum,
        RuleType::Maximum,
        RuleType::Range,
        RuleType::RangeValue,
        RuleType::RangeRange,
        RuleType::Average,
        RuleType::StdDev,
        RuleType::RecordCount,
        RuleType::CustomFunction,
        RuleType::HistoricalGreater,
        RuleType::HistoricalLess,
        RuleType::HistoricalStdDev,
        RuleType::Columns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::NotNull => "NOT_NULL",
            RuleType::Unique => "UNIQUE",
            RuleType::Regex => "REGEX",
            RuleType::Minimum => "MINIMUM",
            RuleType::Maximum => "MAXIMUM",
            RuleType::Range => "RANGE",
            RuleType::RangeValue => "RANGE_VALUE",
            RuleType::RangeRange => "RANGE_RANGE",
            RuleType::Average => "AVERAGE",
            RuleType::StdDev => "STD_DEV",
            RuleType::RecordCount => "RECORD_COUNT",
            RuleType::CustomFunction => "CUSTOM_FUNCTION",
            RuleType::HistoricalGreater => "HISTORICAL_GREATER",
            RuleType::HistoricalLess => "HISTORICAL_LESS",
            RuleType::HistoricalStdDev => "HISTORICAL_STD_DEV",
            RuleType::Columns => "COLUMNS",
        }
    }

    /// Builds the rule implementing this type.
    pub fn build(&self, context: &RuleContext) -> Box<dyn Rule> {
        match self {
            RuleType::NotNull => Box::new(NotNull::new()),
            RuleType::Unique => Box::new(Unique::new()),
            RuleType::Regex => Box::new(RegexMatch::new()),
            RuleType::Minimum => Box::new(Minimum::new()),
            RuleType::Maximum => Box::new(Maximum::new()),
            RuleType::Range => Box::new(InRange::new()),
            RuleType::RangeValue | RuleType::RangeRange => Box::new(RangeWithSecondary::new()),
            RuleType::Average => Box::new(Average::new()),
            RuleType::StdDev => Box::new(StdDev::new()),
            RuleType::RecordCount => Box::new(RecordCount::new()),
            RuleType::CustomFunction => Box::new(CustomFunction::new()),
            RuleType::HistoricalGreater => {
                Box::new(HistoricalGreater::new(Arc::clone(&context.stats)))
            }
            RuleType::HistoricalLess => Box::new(HistoricalLess::new(Arc::clone(&context.stats))),
            RuleType::HistoricalStdDev => {
                Box::new(HistoricalStdDev::new(Arc::clone(&context.stats)))
            }
            RuleType::Columns => Box::new(ColumnSet::new()),
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRuleType(pub String);

impl fmt::Display for UnknownRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown rule type '{}'", self.0)
    }
}

impl std::error::Error for UnknownRuleType {}

impl FromStr for RuleType {
    type Err = UnknownRuleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        RuleType::ALL
            .into_iter()
            .find(|t| t.as_str() == id)
            .ok_or_else(|| UnknownRuleType(id.to_string()))
    }
}

pub type RuleConstructor = Arc<dyn Fn(&RuleContext) -> Box<dyn Rule> + Send + Sync>;

static BUILTIN: Lazy<RuleRegistry> = Lazy::new(|| {
    let mut registry = RuleRegistry::empty();
    for rule_type in RuleType::ALL {
        registry.register(rule_type.as_str(), move |context: &RuleContext| {
            rule_type.build(context)
        });
    }
    registry
});

/// Maps rule-type identifiers to rule constructors.
///
/// Custom types are added with [`RuleRegistry::register`]; registering an existing
/// id replaces its constructor.
#[derive(Clone)]
pub struct RuleRegistry {
    constructors: HashMap<String, RuleConstructor>,
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// The shared registry of built-in rule types.
    pub fn builtin() -> &'static RuleRegistry {
        &BUILTIN
    }

    pub fn register<F>(&mut self, type_id: impl Into<String>, constructor: F)
    where
        F: Fn(&RuleContext) -> Box<dyn Rule> + Send + Sync + 'static,
    {
        let _ = self
            .constructors
            .insert(type_id.into(), Arc::new(constructor));
    }

    /// Builds the rule registered under `type_id`, if any.
    pub fn resolve(&self, type_id: &str, context: &RuleContext) -> Option<Box<dyn Rule>> {
        self.constructors
            .get(type_id.trim())
            .map(|constructor| constructor(context))
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.constructors.contains_key(type_id.trim())
    }

    pub fn type_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        RuleRegistry::builtin().clone()
    }
}
