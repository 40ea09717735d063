//! Movie module - Return the box office title of a Star Wars saga film
//!
//! Given a movie number and an ordering scheme, reports the film's title,
//! the trilogy it belongs to and its place within that trilogy. The module
//! only reads a static catalog, so it never reports a change.

use super::{Module, ModuleContext, ModuleOutput, ModuleParams, ModuleResult, ParamExt};
use crate::catalog::{self, OrderingScheme};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Module for looking up saga films by number
pub struct MovieModule;

impl MovieModule {
    fn scheme_param(params: &ModuleParams) -> ModuleResult<String> {
        Ok(params
            .get_string("scheme")?
            .unwrap_or_else(|| OrderingScheme::default().to_string()))
    }

    /// Module documentation, in the layout `ansible-doc` uses
    pub fn documentation() -> ModuleDoc {
        let mut options = IndexMap::new();
        options.insert(
            "movie",
            OptionDoc {
                description: vec!["This is the number of the movie"],
                required: true,
                option_type: "int",
                default: None,
                choices: None,
            },
        );
        options.insert(
            "scheme",
            OptionDoc {
                description: vec!["Choose for chronological or released"],
                required: false,
                option_type: "str",
                default: Some(OrderingScheme::default().as_str()),
                choices: Some(OrderingScheme::ALL.iter().map(|s| s.as_str()).collect()),
            },
        );

        let mut returns = IndexMap::new();
        returns.insert(
            "title",
            ReturnDoc {
                description: "The box office title of the movie",
                return_type: "str",
                returned: "always",
                sample: Value::from("Episode I – The Phantom Menace"),
            },
        );
        returns.insert(
            "trilogy",
            ReturnDoc {
                description: "The trilogy this movie is part of",
                return_type: "str",
                returned: "always",
                sample: Value::from("Prequel"),
            },
        );
        returns.insert(
            "trilogy_sequence",
            ReturnDoc {
                description: "Which sequence number within the trilogy this movie is",
                return_type: "int",
                returned: "always",
                sample: Value::from(1),
            },
        );

        ModuleDoc {
            module: MovieModule.name(),
            short_description: MovieModule.description(),
            version_added: "2.4",
            description: vec![
                "This module returns the box office title for the requested starwars movie number",
            ],
            options,
            author: vec!["Fred van Zwieten (@fvzwieten)"],
            examples: EXAMPLES,
            returns,
            metadata: ModuleMetadata {
                metadata_version: "1.1",
                status: vec!["preview"],
                supported_by: "community",
            },
        }
    }
}

const EXAMPLES: &str = r#"# ask for title of movie 1
- name: give me the title of the first movie (in chronological order)
  movie:
    movie: 1

- name: give me the title of the first movie made
  movie:
    movie: 1
    scheme: released
"#;

/// Documentation for a module
#[derive(Debug, Clone, Serialize)]
pub struct ModuleDoc {
    pub module: &'static str,
    pub short_description: &'static str,
    pub version_added: &'static str,
    pub description: Vec<&'static str>,
    pub options: IndexMap<&'static str, OptionDoc>,
    pub author: Vec<&'static str>,
    pub examples: &'static str,
    #[serde(rename = "return")]
    pub returns: IndexMap<&'static str, ReturnDoc>,
    pub metadata: ModuleMetadata,
}

/// Support status of a module
#[derive(Debug, Clone, Serialize)]
pub struct ModuleMetadata {
    pub metadata_version: &'static str,
    pub status: Vec<&'static str>,
    pub supported_by: &'static str,
}

/// Documentation for a single module option
#[derive(Debug, Clone, Serialize)]
pub struct OptionDoc {
    pub description: Vec<&'static str>,
    pub required: bool,
    #[serde(rename = "type")]
    pub option_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<&'static str>>,
}

/// Documentation for a single return value
#[derive(Debug, Clone, Serialize)]
pub struct ReturnDoc {
    pub description: &'static str,
    #[serde(rename = "type")]
    pub return_type: &'static str,
    pub returned: &'static str,
    pub sample: Value,
}

impl Module for MovieModule {
    fn name(&self) -> &'static str {
        "movie"
    }

    fn description(&self) -> &'static str {
        "return the title of a starwars movie"
    }

    fn required_params(&self) -> &[&'static str] {
        &["movie"]
    }

    fn optional_params(&self) -> HashMap<&'static str, Value> {
        let mut params = HashMap::new();
        params.insert("scheme", Value::from(OrderingScheme::default().as_str()));
        params
    }

    fn seed_result(&self) -> IndexMap<String, Value> {
        let mut result = IndexMap::new();
        result.insert("changed".to_string(), Value::Bool(false));
        result.insert("title".to_string(), Value::from(""));
        result.insert("trilogy".to_string(), Value::from(""));
        result.insert("trilogy_sequence".to_string(), Value::from(0));
        result
    }

    fn validate_params(&self, params: &ModuleParams) -> ModuleResult<()> {
        // Type conversion only; range and scheme are checked at execution
        params.get_i64_required("movie")?;
        params.get_string("scheme")?;
        Ok(())
    }

    fn execute(
        &self,
        params: &ModuleParams,
        context: &ModuleContext,
    ) -> ModuleResult<ModuleOutput> {
        if context.check_mode {
            return self.check(params, context);
        }

        let movie = params.get_i64_required("movie")?;
        let scheme = Self::scheme_param(params)?;

        let lookup = catalog::resolve(movie, &scheme)?;
        debug!(movie, scheme = %scheme, title = lookup.title, "resolved movie");

        Ok(ModuleOutput::ok(format!("Movie {} ({}): {}", movie, scheme, lookup))
            .with_data("changed", Value::Bool(false))
            .with_data("title", Value::from(lookup.title))
            .with_data("trilogy", Value::from(lookup.trilogy.as_str()))
            .with_data("trilogy_sequence", Value::from(lookup.trilogy_sequence)))
    }

    fn check(&self, _params: &ModuleParams, _context: &ModuleContext) -> ModuleResult<ModuleOutput> {
        Ok(ModuleOutput::skipped("Check mode: movie lookup not performed")
            .with_result(self.seed_result()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{ModuleError, ModuleRegistry, ModuleStatus};
    use pretty_assertions::assert_eq;

    fn params(movie: Value, scheme: Option<&str>) -> ModuleParams {
        let mut params: ModuleParams = HashMap::new();
        params.insert("movie".to_string(), movie);
        if let Some(scheme) = scheme {
            params.insert("scheme".to_string(), Value::from(scheme));
        }
        params
    }

    #[test]
    fn test_movie_released() {
        let module = MovieModule;
        let result = module
            .execute(&params(Value::from(1), Some("released")), &ModuleContext::default())
            .unwrap();

        assert!(!result.changed);
        assert_eq!(result.status, ModuleStatus::Ok);
        assert_eq!(result.data["title"], "Episode IV – A New Hope");
        assert_eq!(result.data["trilogy"], "Original");
        assert_eq!(result.data["trilogy_sequence"], 1);
    }

    #[test]
    fn test_movie_defaults_to_chronological() {
        let module = MovieModule;
        let result = module
            .execute(&params(Value::from(1), None), &ModuleContext::default())
            .unwrap();

        assert_eq!(result.data["title"], "Episode I – The Phantom Menace");
        assert_eq!(result.data["trilogy"], "Prequel");
    }

    #[test]
    fn test_movie_result_key_order() {
        let module = MovieModule;
        let result = module
            .execute(&params(Value::from(9), Some("released")), &ModuleContext::default())
            .unwrap();

        let keys: Vec<&str> = result.data.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["changed", "title", "trilogy", "trilogy_sequence"]);
    }

    #[test]
    fn test_movie_string_number_is_converted() {
        let registry = ModuleRegistry::with_builtins();
        let result = registry
            .execute(
                "movie",
                &params(Value::from("2"), Some("released")),
                &ModuleContext::default(),
            )
            .unwrap();

        assert_eq!(result.data["title"], "Episode V – The Empire Strikes Back");
    }

    #[test]
    fn test_movie_out_of_range() {
        let module = MovieModule;
        for movie in [0, 10, -3] {
            let err = module
                .execute(&params(Value::from(movie), None), &ModuleContext::default())
                .unwrap_err();
            assert!(matches!(err, ModuleError::InvalidMovieNumber { .. }));
        }
    }

    #[test]
    fn test_movie_invalid_scheme() {
        let module = MovieModule;
        let err = module
            .execute(&params(Value::from(1), Some("alternate")), &ModuleContext::default())
            .unwrap_err();

        assert!(matches!(err, ModuleError::InvalidScheme(_)));
        assert_eq!(
            err.to_string(),
            "Scheme must be 'chronological' or 'released'"
        );
    }

    #[test]
    fn test_movie_check_mode_skips_lookup() {
        let module = MovieModule;
        let context = ModuleContext::default().with_check_mode(true);

        // Out of range is not an error in check mode: no lookup happens
        let result = module
            .execute(&params(Value::from(42), Some("released")), &context)
            .unwrap();

        assert!(!result.changed);
        assert_eq!(result.status, ModuleStatus::Skipped);
        assert_eq!(result.data, module.seed_result());
    }

    #[test]
    fn test_movie_check_mode_still_requires_movie() {
        let registry = ModuleRegistry::with_builtins();
        let err = registry
            .execute(
                "movie",
                &ModuleParams::new(),
                &ModuleContext::default().with_check_mode(true),
            )
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required arguments: movie");
    }

    #[test]
    fn test_movie_rejects_non_integer() {
        let registry = ModuleRegistry::with_builtins();
        let err = registry
            .execute(
                "movie",
                &params(Value::from("one"), None),
                &ModuleContext::default(),
            )
            .unwrap_err();

        assert!(matches!(err, ModuleError::InvalidParameter(_)));
        assert!(err.to_string().contains("unable to convert to int"));
    }

    #[test]
    fn test_movie_is_idempotent() {
        let module = MovieModule;
        let p = params(Value::from(5), Some("released"));
        let first = module.execute(&p, &ModuleContext::default()).unwrap();
        let second = module.execute(&p, &ModuleContext::default()).unwrap();

        assert_eq!(first.data, second.data);
        assert_eq!(first.msg, second.msg);
    }

    #[test]
    fn test_documentation_options() {
        let doc = MovieModule::documentation();

        assert_eq!(doc.module, "movie");
        assert_eq!(doc.short_description, MovieModule.description());
        assert_eq!(doc.version_added, "2.4");
        assert_eq!(doc.author, vec!["Fred van Zwieten (@fvzwieten)"]);
        assert_eq!(doc.metadata.status, vec!["preview"]);
        assert_eq!(doc.metadata.supported_by, "community");
        assert!(doc.options["movie"].required);
        assert_eq!(doc.options["scheme"].default, Some("chronological"));

        let yaml = serde_yaml::to_string(&doc).unwrap();
        assert!(yaml.contains("short_description"));
        assert!(yaml.contains("trilogy_sequence"));
        assert!(yaml.contains("return:"));
        assert!(yaml.contains("version_added:"));
        assert!(yaml.contains("supported_by: community"));
    }
}
