//! Binary module invocation protocol
//!
//! The automation host runs a binary module as `<module> <args-file>`, where
//! the file holds a JSON object of module arguments. Keys starting with
//! `_ansible_` carry host settings such as check mode and never reach the
//! module. The module answers with a single JSON object on stdout and exits
//! non-zero when that object reports `failed`.

use crate::error::{Error, Result};
use crate::modules::{ModuleContext, ModuleParams, ModuleRegistry, ParamExt};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Prefix of host-internal argument keys
pub const INTERNAL_PREFIX: &str = "_ansible_";

/// Key under which some hosts nest the module arguments
pub const WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";

/// Arguments for a single module run, split from the host's internal keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleInvocation {
    /// User-facing module parameters
    pub params: ModuleParams,
    /// Whether the host asked for a dry run
    pub check_mode: bool,
}

impl ModuleInvocation {
    /// Create an invocation from already-split parameters
    pub fn new(params: ModuleParams) -> Self {
        Self {
            params,
            check_mode: false,
        }
    }

    pub fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    /// Read the arguments file handed over by the host
    pub fn from_args_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ArgsFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "read module arguments");
        Self::from_json(&content)
    }

    /// Parse arguments from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Build an invocation from a JSON value, unwrapping
    /// `ANSIBLE_MODULE_ARGS` when present
    pub fn from_value(value: Value) -> Result<Self> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(Error::args_parse(format!(
                    "module arguments must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        if let Some(inner) = object.remove(WRAPPER_KEY) {
            return Self::from_value(inner);
        }

        let mut params = ModuleParams::new();
        let mut internal = ModuleParams::new();
        for (key, value) in object {
            if key.starts_with(INTERNAL_PREFIX) {
                internal.insert(key, value);
            } else {
                params.insert(key, value);
            }
        }

        let check_mode = internal
            .get_bool(&format!("{}check_mode", INTERNAL_PREFIX))?
            .unwrap_or(false);

        let ignored: Vec<&String> = internal.keys().collect();
        if !ignored.is_empty() {
            debug!(?ignored, "ignoring host-internal arguments");
        }

        Ok(Self { params, check_mode })
    }

    /// Module context for this run
    pub fn context(&self, module_defaults: HashMap<String, ModuleParams>) -> ModuleContext {
        ModuleContext::new()
            .with_check_mode(self.check_mode)
            .with_module_defaults(module_defaults)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The JSON object reported back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ModuleResponse {
    body: IndexMap<String, Value>,
}

impl ModuleResponse {
    /// A successful result made of the given return values
    pub fn success(changed: bool, data: IndexMap<String, Value>) -> Self {
        let mut body = IndexMap::with_capacity(data.len() + 1);
        body.insert("changed".to_string(), Value::Bool(changed));
        body.extend(data);
        Self { body }
    }

    /// A failed result: the seeded fields plus `failed` and `msg`
    pub fn failure(msg: impl Into<String>, seed: IndexMap<String, Value>) -> Self {
        let mut body = IndexMap::with_capacity(seed.len() + 3);
        body.insert("changed".to_string(), Value::Bool(false));
        body.extend(seed);
        body.insert("failed".to_string(), Value::Bool(true));
        body.insert("msg".to_string(), Value::String(msg.into()));
        Self { body }
    }

    /// A failure raised before any module could run
    pub fn from_error(err: &Error) -> Self {
        Self::failure(err.to_string(), IndexMap::new())
    }

    /// Record the effective module arguments under `invocation.module_args`
    pub fn with_invocation(mut self, module_args: &ModuleParams) -> Self {
        let args: serde_json::Map<String, Value> = module_args
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.body.insert(
            "invocation".to_string(),
            serde_json::json!({ "module_args": args }),
        );
        self
    }

    pub fn failed(&self) -> bool {
        matches!(self.body.get("failed"), Some(Value::Bool(true)))
    }

    pub fn changed(&self) -> bool {
        matches!(self.body.get("changed"), Some(Value::Bool(true)))
    }

    pub fn msg(&self) -> Option<&str> {
        self.body.get("msg").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    pub fn body(&self) -> &IndexMap<String, Value> {
        &self.body
    }

    /// Process exit code the host expects for this result
    pub fn exit_code(&self) -> i32 {
        if self.failed() {
            1
        } else {
            0
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|e| unserializable(&e))
    }
}

/// Minimal failure object for a response that could not be serialized
fn unserializable(err: &dyn std::fmt::Display) -> String {
    serde_json::json!({ "failed": true, "msg": err.to_string() }).to_string()
}

/// Run a module for the host and build its response
pub fn run(
    registry: &ModuleRegistry,
    module_name: &str,
    invocation: &ModuleInvocation,
    context: &ModuleContext,
) -> ModuleResponse {
    let Some(module) = registry.get(module_name) else {
        return ModuleResponse::failure(format!("Module not found: {}", module_name), IndexMap::new());
    };
    let seed = module.seed_result();

    let result = registry.execute(module_name, &invocation.params, context);
    let module_args = ModuleRegistry::prepare_params(module.as_ref(), &invocation.params, context);

    let response = match result {
        Ok(output) => {
            debug!(module = module_name, status = %output.status, "module finished");
            ModuleResponse::success(output.changed, output.data)
        }
        Err(err) => {
            debug!(module = module_name, error = %err, "module failed");
            ModuleResponse::failure(err.to_string(), seed)
        }
    };

    match module_args {
        Ok(args) => response.with_invocation(&args),
        Err(_) => response,
    }
}
