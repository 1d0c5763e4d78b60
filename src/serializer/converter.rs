use serde_json::Value;
use std::collections::HashMap;

use crate::core::TaskOutput;
use crate::errors::Error;

type ConvertFn = Box<dyn Fn(&Value) -> Result<Value, Error> + Send + Sync>;

/// Registry of output converters keyed by the output-kind discriminant.
///
/// Producers tag their output with a kind when attaching it to a task;
/// the registry dispatches on that tag instead of inspecting values.
/// An output whose kind has no registered converter passes through raw.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, ConvertFn>,
}

impl ConverterRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a converter for one output kind, replacing any previous
    /// converter for that kind
    ///
    /// # Arguments
    ///
    /// * `kind` - The output-kind discriminant the converter accepts
    /// * `convert` - Conversion function producing the wire representation
    pub fn register<F>(&mut self, kind: impl Into<String>, convert: F)
    where
        F: Fn(&Value) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.converters.insert(kind.into(), Box::new(convert));
    }

    /// Converts a tagged output into its wire representation
    ///
    /// # Returns
    ///
    /// The converted value, the raw value when no converter is registered
    /// for the kind, or the converter's error.
    pub fn convert(&self, output: &TaskOutput) -> Result<Value, Error> {
        match self.converters.get(&output.kind) {
            Some(convert) => convert(&output.value),
            None => Ok(output.value.clone()),
        }
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output(kind: &str, value: Value) -> TaskOutput {
        TaskOutput {
            kind: kind.to_string(),
            value,
        }
    }

    #[test]
    fn unregistered_kind_passes_through_raw() {
        let registry = ConverterRegistry::new();
        let value = registry.convert(&output("blob", json!({"n": 1}))).unwrap();
        assert_eq!(value, json!({"n": 1}));
    }

    #[test]
    fn registered_converter_is_dispatched_by_kind() {
        let mut registry = ConverterRegistry::new();
        registry.register("file-count", |value| {
            Ok(json!({ "files": value.as_array().map_or(0, Vec::len) }))
        });
        let value = registry
            .convert(&output("file-count", json!(["a", "b"])))
            .unwrap();
        assert_eq!(value, json!({"files": 2}));
    }

    #[test]
    fn converter_errors_surface() {
        let mut registry = ConverterRegistry::new();
        registry.register("strict", |_| {
            Err(Error::Conversion {
                kind: "strict".into(),
                message: "unsupported shape".into(),
            })
        });
        let err = registry.convert(&output("strict", json!(null))).unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }
}
