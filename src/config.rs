//! Analysis configuration
//!
//! Settings arrive as the editor's JSON settings tree. Each request takes a
//! snapshot from [`ConfigHandle`]; nothing in the analysis reads shared
//! mutable flags.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::analysis::{ProblemKind, ProblemSeverity};
use crate::error::ConfigError;

pub const SEVERITY_PREFIX: &str = "spring-boot.ls.problem.data-query";
pub const SEMANTIC_TOKENS_KEY: &str = "spring-boot.ls.semantic-tokens.enabled";
pub const SPEL_ENABLED_KEY: &str = "spring-boot.ls.data-query.spel.enabled";
pub const EXPLAIN_ENABLED_KEY: &str = "spring-boot.ls.data-query.explain.enabled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryAnalysisConfig {
    pub semantic_tokens_enabled: bool,
    /// Delegate `#{...}` spans to the SpEL grammar
    pub embedded_expressions_enabled: bool,
    pub explain_lenses_enabled: bool,
    /// Overrides of [`ProblemKind::default_severity`]
    pub severities: BTreeMap<ProblemKind, ProblemSeverity>,
}

impl Default for QueryAnalysisConfig {
    fn default() -> Self {
        Self {
            semantic_tokens_enabled: true,
            embedded_expressions_enabled: true,
            explain_lenses_enabled: false,
            severities: BTreeMap::new(),
        }
    }
}

impl QueryAnalysisConfig {
    pub fn severity(&self, kind: ProblemKind) -> ProblemSeverity {
        self.severities.get(&kind).copied().unwrap_or_else(|| kind.default_severity())
    }

    /// Reads the editor settings tree over the defaults.
    pub fn from_settings(settings: &Value) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_settings(settings)?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Value = serde_json::from_str(text)?;
        Self::from_settings(&settings)
    }

    /// Applies the keys present in `settings`; absent keys keep their value.
    pub fn apply_settings(&mut self, settings: &Value) -> Result<(), ConfigError> {
        if let Some(enabled) = bool_setting(settings, SEMANTIC_TOKENS_KEY)? {
            self.semantic_tokens_enabled = enabled;
        }
        if let Some(enabled) = bool_setting(settings, SPEL_ENABLED_KEY)? {
            self.embedded_expressions_enabled = enabled;
        }
        if let Some(enabled) = bool_setting(settings, EXPLAIN_ENABLED_KEY)? {
            self.explain_lenses_enabled = enabled;
        }
        for kind in ProblemKind::ALL {
            let key = format!("{}.{}", SEVERITY_PREFIX, kind.id());
            let Some(value) = lookup(settings, &key) else { continue };
            let Some(text) = value.as_str() else {
                return Err(ConfigError::WrongType { key, expected: "a severity name" });
            };
            match ProblemSeverity::parse(text) {
                Some(severity) => {
                    self.severities.insert(kind, severity);
                }
                None => {
                    let error = ConfigError::UnknownSeverity { kind: kind.id().to_string(), value: text.to_string() };
                    warn!("Ignoring setting: {}", error);
                }
            }
        }
        Ok(())
    }
}

/// Finds `key` in a settings tree that may nest objects per dot-separated
/// segment, hold the dotted key flat, or mix both.
fn lookup<'a>(settings: &'a Value, key: &str) -> Option<&'a Value> {
    let object = settings.as_object()?;
    if let Some(value) = object.get(key) {
        return Some(value);
    }
    let mut split = key.char_indices().filter(|(_, c)| *c == '.').map(|(i, _)| i);
    split.find_map(|i| object.get(&key[..i]).and_then(|child| lookup(child, &key[i + 1..])))
}

fn bool_setting(settings: &Value, key: &str) -> Result<Option<bool>, ConfigError> {
    match lookup(settings, key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ConfigError::WrongType { key: key.to_string(), expected: "a boolean" }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEvent {
    /// Semantic tokens were switched on or off; clients should re-request
    /// tokens for every open document.
    RefreshSemanticTokens,
}

/// Owner of the current configuration.
///
/// Readers take snapshots (or watch for changes); writers publish whole new
/// configurations.
pub struct ConfigHandle {
    current: watch::Sender<Arc<QueryAnalysisConfig>>,
    events: broadcast::Sender<ConfigEvent>,
}

impl ConfigHandle {
    pub fn new(config: QueryAnalysisConfig) -> Self {
        let (current, _) = watch::channel(Arc::new(config));
        let (events, _) = broadcast::channel(16);
        Self { current, events }
    }

    pub fn snapshot(&self) -> Arc<QueryAnalysisConfig> {
        self.current.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<Arc<QueryAnalysisConfig>> {
        self.current.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<ConfigEvent> {
        self.events.subscribe()
    }

    /// Applies a settings change from the editor.
    pub fn update(&self, settings: &Value) -> anyhow::Result<()> {
        let mut next = (*self.snapshot()).clone();
        next.apply_settings(settings)?;
        self.publish(next);
        Ok(())
    }

    /// The toggle command path.
    pub fn set_semantic_tokens_enabled(&self, enabled: bool) {
        let mut next = (*self.snapshot()).clone();
        next.semantic_tokens_enabled = enabled;
        self.publish(next);
    }

    pub fn publish(&self, config: QueryAnalysisConfig) {
        let refresh = self.current.borrow().semantic_tokens_enabled != config.semantic_tokens_enabled;
        debug!("Publishing analysis config: {:?}", config);
        self.current.send_replace(Arc::new(config));
        if refresh {
            info!("Semantic tokens toggled, requesting refresh");
            // No subscribers simply means nobody needs refreshing.
            let _ = self.events.send(ConfigEvent::RefreshSemanticTokens);
        }
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(QueryAnalysisConfig::default())
    }
}
