//! Module system for starwars
//!
//! This module provides the core traits, types, and registry for modules.
//! A module receives its parameters from the automation host, enforces its
//! argument spec, and reports a result back.

pub mod movie;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during module execution
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("Module not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("missing required arguments: {0}")]
    MissingParameter(String),

    #[error("Movie number must be 1 to 9")]
    InvalidMovieNumber { movie: i64 },

    #[error("Scheme must be 'chronological' or 'released'")]
    InvalidScheme(String),
}

/// Result type for module operations
pub type ModuleResult<T> = Result<T, ModuleError>;

/// Status of a module execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    /// Module executed successfully
    Ok,
    /// Module short-circuited without doing its work (check mode)
    Skipped,
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleStatus::Ok => write!(f, "ok"),
            ModuleStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of a module execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleOutput {
    /// Whether the module changed anything
    pub changed: bool,
    /// Human-readable message about what happened
    pub msg: String,
    /// Status of the execution
    pub status: ModuleStatus,
    /// Return values, in the order the module reports them
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data: IndexMap<String, serde_json::Value>,
}

impl ModuleOutput {
    /// Create a new successful output with no changes
    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            msg: msg.into(),
            status: ModuleStatus::Ok,
            data: IndexMap::new(),
        }
    }

    /// Create a skipped output
    pub fn skipped(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            msg: msg.into(),
            status: ModuleStatus::Skipped,
            data: IndexMap::new(),
        }
    }

    /// Add data to the output
    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Replace all data, keeping the given order
    pub fn with_result(mut self, data: IndexMap<String, serde_json::Value>) -> Self {
        self.data = data;
        self
    }
}

/// Parameters passed to a module
pub type ModuleParams = HashMap<String, serde_json::Value>;

/// Context for module execution
#[derive(Debug, Clone, Default)]
pub struct ModuleContext {
    /// Whether to run in check mode (dry run)
    pub check_mode: bool,
    /// Per-module parameter defaults, keyed by module name
    pub module_defaults: HashMap<String, ModuleParams>,
}

impl ModuleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    pub fn with_module_defaults(mut self, defaults: HashMap<String, ModuleParams>) -> Self {
        self.module_defaults = defaults;
        self
    }

    /// Configured default for a module parameter, if any
    pub fn module_default(&self, module: &str, param: &str) -> Option<&serde_json::Value> {
        self.module_defaults.get(module).and_then(|d| d.get(param))
    }
}

/// Trait that all modules must implement
pub trait Module: Send + Sync {
    /// Returns the name of the module
    fn name(&self) -> &'static str;

    /// Returns a description of what the module does
    fn description(&self) -> &'static str;

    /// Execute the module with the given parameters
    fn execute(&self, params: &ModuleParams, context: &ModuleContext)
        -> ModuleResult<ModuleOutput>;

    /// Check what would happen without doing it (for check mode)
    fn check(&self, params: &ModuleParams, context: &ModuleContext) -> ModuleResult<ModuleOutput> {
        let check_context = ModuleContext {
            check_mode: true,
            ..context.clone()
        };
        self.execute(params, &check_context)
    }

    /// Validate the parameters before execution
    fn validate_params(&self, params: &ModuleParams) -> ModuleResult<()> {
        let _ = params;
        Ok(())
    }

    /// Returns the list of required parameters
    fn required_params(&self) -> &[&'static str] {
        &[]
    }

    /// Returns the list of optional parameters with their default values
    fn optional_params(&self) -> HashMap<&'static str, serde_json::Value> {
        HashMap::new()
    }

    /// Result fields reported even when the module fails or short-circuits
    fn seed_result(&self) -> IndexMap<String, serde_json::Value> {
        let mut result = IndexMap::new();
        result.insert("changed".to_string(), serde_json::Value::Bool(false));
        result
    }
}

/// Helper trait for extracting parameters
pub trait ParamExt {
    fn get_string(&self, key: &str) -> ModuleResult<Option<String>>;
    fn get_bool(&self, key: &str) -> ModuleResult<Option<bool>>;
    fn get_i64(&self, key: &str) -> ModuleResult<Option<i64>>;
    fn get_i64_required(&self, key: &str) -> ModuleResult<i64>;
}

impl ParamExt for ModuleParams {
    fn get_string(&self, key: &str) -> ModuleResult<Option<String>> {
        match self.get(key) {
            Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
            Some(serde_json::Value::Null) | None => Ok(None),
            Some(v @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => {
                Ok(Some(v.to_string()))
            }
            Some(_) => Err(ModuleError::InvalidParameter(format!(
                "argument '{}' is not a string",
                key
            ))),
        }
    }

    fn get_bool(&self, key: &str) -> ModuleResult<Option<bool>> {
        match self.get(key) {
            Some(serde_json::Value::Bool(b)) => Ok(Some(*b)),
            Some(serde_json::Value::String(s)) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" | "y" | "t" => Ok(Some(true)),
                "false" | "no" | "0" | "off" | "n" | "f" => Ok(Some(false)),
                _ => Err(ModuleError::InvalidParameter(format!(
                    "argument '{}' must be a boolean",
                    key
                ))),
            },
            Some(serde_json::Value::Number(n)) => match n.as_i64() {
                Some(1) => Ok(Some(true)),
                Some(0) => Ok(Some(false)),
                _ => Err(ModuleError::InvalidParameter(format!(
                    "argument '{}' must be a boolean",
                    key
                ))),
            },
            Some(serde_json::Value::Null) | None => Ok(None),
            Some(_) => Err(ModuleError::InvalidParameter(format!(
                "argument '{}' must be a boolean",
                key
            ))),
        }
    }

    fn get_i64(&self, key: &str) -> ModuleResult<Option<i64>> {
        let not_int = |kind: &str| {
            ModuleError::InvalidParameter(format!(
                "argument '{}' is of type {} and we were unable to convert to int",
                key, kind
            ))
        };

        match self.get(key) {
            Some(serde_json::Value::Number(n)) => match n.as_i64() {
                Some(i) => Ok(Some(i)),
                None if n.is_u64() => Ok(Some(i64::MAX)),
                // Whole floats are accepted, as the host does for type=int.
                // The cast saturates, so huge values stay out of any range.
                None => n
                    .as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| Some(f as i64))
                    .ok_or_else(|| not_int("float")),
            },
            Some(serde_json::Value::String(s)) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(i) => Ok(Some(i)),
                    Err(_) => saturate_int(s).map(Some).ok_or_else(|| not_int("str")),
                }
            }
            Some(serde_json::Value::Bool(_)) => Err(not_int("bool")),
            Some(serde_json::Value::Null) | None => Ok(None),
            Some(serde_json::Value::Array(_)) => Err(not_int("list")),
            Some(serde_json::Value::Object(_)) => Err(not_int("dict")),
        }
    }

    fn get_i64_required(&self, key: &str) -> ModuleResult<i64> {
        self.get_i64(key)?
            .ok_or_else(|| ModuleError::MissingParameter(key.to_string()))
    }
}

/// Clamp an integer literal too wide for i64 to the nearest bound
fn saturate_int(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Registry for looking up modules by name
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Create a registry with all built-in modules
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(movie::MovieModule));
        registry
    }

    /// Register a module
    pub fn register(&mut self, module: Arc<dyn Module>) {
        self.modules.insert(module.name().to_string(), module);
    }

    /// Get a module by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Module>> {
        self.modules.get(name).cloned()
    }

    /// Get all module names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Apply the module's argument spec: reject unknown names, require
    /// mandatory ones and fill in defaults.
    ///
    /// Explicit values win over `module_defaults`, which win over the
    /// module's declared defaults.
    pub fn prepare_params(
        module: &dyn Module,
        params: &ModuleParams,
        context: &ModuleContext,
    ) -> ModuleResult<ModuleParams> {
        let optional = module.optional_params();
        let required = module.required_params();

        let mut unsupported: Vec<&str> = params
            .keys()
            .map(|k| k.as_str())
            .filter(|k| !required.contains(k) && !optional.contains_key(k))
            .collect();
        if !unsupported.is_empty() {
            unsupported.sort_unstable();
            let mut supported: Vec<&str> = required
                .iter()
                .copied()
                .chain(optional.keys().copied())
                .collect();
            supported.sort_unstable();
            return Err(ModuleError::InvalidParameter(format!(
                "Unsupported parameters for ({}) module: {}. Supported parameters include: {}.",
                module.name(),
                unsupported.join(", "),
                supported.join(", ")
            )));
        }

        let mut missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|p| params.get(*p).map_or(true, serde_json::Value::is_null))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(ModuleError::MissingParameter(missing.join(", ")));
        }

        let mut prepared = params.clone();
        for (name, default) in optional {
            if prepared.get(name).map_or(true, serde_json::Value::is_null) {
                let value = context
                    .module_default(module.name(), name)
                    .cloned()
                    .unwrap_or(default);
                prepared.insert(name.to_string(), value);
            }
        }

        Ok(prepared)
    }

    /// Execute a module by name
    pub fn execute(
        &self,
        name: &str,
        params: &ModuleParams,
        context: &ModuleContext,
    ) -> ModuleResult<ModuleOutput> {
        let module = self
            .get(name)
            .ok_or_else(|| ModuleError::NotFound(name.to_string()))?;

        let params = Self::prepare_params(module.as_ref(), params, context)?;
        module.validate_params(&params)?;

        debug!(module = name, check_mode = context.check_mode, "executing module");

        if context.check_mode {
            module.check(&params, context)
        } else {
            module.execute(&params, context)
        }
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
