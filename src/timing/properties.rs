//! Plot property definitions with defaults from plot.json
//!
//! plot.json is embedded at compile time and lists every tunable of the
//! chart together with its default. Defaults are defined in that ONE place;
//! the reader below layers user values (config file, `--set` overrides) on
//! top of them.

use super::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// plot.json embedded at compile time
const PLOT_JSON: &str = include_str!("../../plot.json");

/// Property definition from plot.json
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(rename = "defaultValue", default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
    /// For EnumeratedProperty, the valid values
    #[serde(rename = "values")]
    pub valid_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "StringProperty")]
    String,
    #[serde(rename = "EnumeratedProperty")]
    Enumerated,
    #[serde(rename = "DoubleProperty")]
    Double,
    #[serde(rename = "IntegerProperty")]
    Integer,
}

#[derive(Debug, Deserialize)]
struct PlotJson {
    properties: Vec<PropertyDef>,
}

/// Registry of all plot properties with their defaults from plot.json
pub struct PropertyRegistry {
    properties: HashMap<String, PropertyDef>,
    /// Declaration order, for listing
    names: Vec<String>,
}

impl PropertyRegistry {
    /// Parse plot.json and build the registry
    ///
    /// Panics if plot.json is malformed, which the registry tests catch
    /// since the file is embedded at compile time.
    pub fn from_plot_json() -> Self {
        Self::from_json(PLOT_JSON).expect("plot.json is invalid")
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: PlotJson = serde_json::from_str(json)?;

        let names = parsed.properties.iter().map(|p| p.name.clone()).collect();
        let properties = parsed
            .properties
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        Ok(Self { properties, names })
    }

    /// Get the default value for a property
    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.default_value.as_str())
    }

    /// Get the property definition
    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    /// All property definitions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDef> {
        self.names.iter().filter_map(|n| self.properties.get(n))
    }

    /// Check if a value is valid for an enumerated property
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        self.properties
            .get(name)
            .and_then(|p| p.valid_values.as_ref())
            .map(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
            .unwrap_or(true) // Non-enumerated properties accept any value
    }
}

/// Global registry instance (initialized lazily)
static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// Get the global property registry
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(PropertyRegistry::from_plot_json)
}

/// Typed property reader
///
/// Resolves each property as the user-set value if present, otherwise the
/// default from plot.json.
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    /// Reader with no user values (all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Load user values from a JSON object file, e.g. `{"plot.width": 1200}`
    ///
    /// Strings, numbers and booleans are accepted; other values are skipped.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&json).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let mut reader = Self::new();
        for (key, value) in map {
            let value_str = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => {
                    tracing::warn!(property = %key, "ignoring non-scalar config value");
                    continue;
                }
            };
            reader.set(key, value_str)?;
        }

        Ok(reader)
    }

    /// Set a user value; the property must be declared in plot.json
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if registry().get_property(&name).is_none() {
            return Err(ConfigError::UnknownProperty(name));
        }
        self.user_values.insert(name, value.into());
        Ok(())
    }

    /// Apply a `KEY=VALUE` override
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidOverride(assignment.to_string()))?;
        self.set(key.trim(), value.trim())
    }

    /// Get string property (user value or default from plot.json)
    ///
    /// An empty user value is returned as-is; for `output.path` that is how
    /// output gets disabled.
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            return value.clone();
        }

        registry().get_default(name).unwrap_or("").to_string()
    }

    /// Get optional string property (None if empty)
    pub fn get_optional_string(&self, name: &str) -> Option<String> {
        let value = self.get_string(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Get enumerated property with validation
    ///
    /// Returns the user-set value (lowercased) if valid, otherwise the default.
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = reg.get_default(name).unwrap_or("");

        if let Some(value) = self.user_values.get(name) {
            if reg.is_valid_enum_value(name, value) {
                return value.to_lowercase();
            }
            let valid_values = reg
                .get_property(name)
                .and_then(|p| p.valid_values.as_ref())
                .map(|v| v.join(", "))
                .unwrap_or_default();
            tracing::warn!(
                "Invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                value,
                name,
                valid_values,
                default
            );
        }

        default.to_string()
    }

    /// Get boolean property stored as a "true"/"false" enum
    pub fn get_bool(&self, name: &str) -> bool {
        self.get_enum(name) == "true"
    }

    /// Get f64 property, falling back to the default if it does not parse
    pub fn get_f64(&self, name: &str) -> f64 {
        let default = default_as::<f64>(name);
        let value = self.get_string(name);

        match value.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    "Invalid numeric value '{}' for property '{}'. Using default: {}",
                    value,
                    name,
                    default
                );
                default
            }
        }
    }

    /// Get f64 property with range validation
    pub fn get_f64_in_range(&self, name: &str, min: f64, max: f64) -> f64 {
        let value = self.get_f64(name);
        if (min..=max).contains(&value) {
            value
        } else {
            let default = default_as::<f64>(name);
            tracing::warn!(
                "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
                value,
                name,
                min,
                max,
                default
            );
            default
        }
    }

    /// Get i32 property with range validation
    pub fn get_i32_in_range(&self, name: &str, min: i32, max: i32) -> i32 {
        let default = default_as::<i32>(name);
        let value = self.get_string(name);

        match value.trim().parse::<i32>() {
            Ok(v) if (min..=max).contains(&v) => v,
            Ok(v) => {
                tracing::warn!(
                    "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
                    v,
                    name,
                    min,
                    max,
                    default
                );
                default
            }
            Err(_) => {
                tracing::warn!(
                    "Invalid integer value '{}' for property '{}'. Using default: {}",
                    value,
                    name,
                    default
                );
                default
            }
        }
    }

    /// Parse a point "x,y" in data coordinates
    ///
    /// Returns None if empty or invalid format
    pub fn get_point(&self, name: &str) -> Option<(f64, f64)> {
        let value = self.get_string(name);
        if value.trim().is_empty() {
            return None;
        }

        let parsed = value
            .split_once(',')
            .and_then(|(x, y)| {
                let x = x.trim().parse::<f64>().ok()?;
                let y = y.trim().parse::<f64>().ok()?;
                Some((x, y))
            })
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        if parsed.is_none() {
            tracing::warn!(
                "Invalid coordinate format '{}' for property '{}', expected 'x,y'",
                value,
                name
            );
        }
        parsed
    }
}

fn default_as<T: std::str::FromStr + Default>(name: &str) -> T {
    registry()
        .get_default(name)
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads() {
        let reg = registry();
        assert!(reg.get_property("input.no_memo").is_some());
        assert!(reg.get_property("input.memo").is_some());
        assert!(reg.get_property("legend.position").is_some());
        assert_eq!(
            reg.get_property("output.format").map(|p| p.kind),
            Some(PropertyKind::Enumerated)
        );
    }

    #[test]
    fn test_registry_defaults() {
        let reg = registry();
        assert_eq!(reg.get_default("memo.time.divisor"), Some("1000"));
        assert_eq!(reg.get_default("axis.x.label"), Some("n"));
        assert_eq!(reg.get_default("axis.y.label"), Some("Time (seconds)"));
        assert_eq!(reg.get_default("legend.position"), Some("2,140"));
    }

    #[test]
    fn test_registry_order() {
        let first = registry().iter().next().map(|p| p.name.as_str());
        assert_eq!(first, Some("input.no_memo"));
    }

    #[test]
    fn test_enum_validation() {
        let reg = registry();
        assert!(reg.is_valid_enum_value("output.format", "svg"));
        assert!(reg.is_valid_enum_value("output.format", "PNG"));
        assert!(!reg.is_valid_enum_value("output.format", "gif"));
        // Free-form properties accept anything
        assert!(reg.is_valid_enum_value("plot.title", "whatever"));
    }

    #[test]
    fn test_reader_defaults() {
        let reader = PropertyReader::new();
        assert_eq!(reader.get_string("input.memo"), "fib-memo-results.csv");
        assert_eq!(reader.get_f64("memo.time.divisor"), 1000.0);
        assert_eq!(reader.get_enum("point.shape"), "circle");
        assert!(!reader.get_bool("plot.frame"));
        assert_eq!(reader.get_optional_string("plot.title"), None);
        assert_eq!(reader.get_point("legend.position"), Some((2.0, 140.0)));
    }

    #[test]
    fn test_reader_overrides() {
        let mut reader = PropertyReader::new();
        reader.apply_override("plot.width = 1200").unwrap();
        reader.apply_override("output.format=PNG").unwrap();
        reader.apply_override("legend.position=0.5, 3").unwrap();

        assert_eq!(reader.get_i32_in_range("plot.width", 100, 10000), 1200);
        assert_eq!(reader.get_enum("output.format"), "png");
        assert_eq!(reader.get_point("legend.position"), Some((0.5, 3.0)));
    }

    #[test]
    fn test_reader_invalid_values_fall_back() {
        let mut reader = PropertyReader::new();
        reader.set("point.shape", "star").unwrap();
        reader.set("plot.height", "tall").unwrap();
        reader.set("plot.width", "50").unwrap();
        reader.set("memo.time.divisor", "abc").unwrap();
        reader.set("legend.position", "2;140").unwrap();

        assert_eq!(reader.get_enum("point.shape"), "circle");
        assert_eq!(reader.get_i32_in_range("plot.height", 100, 10000), 600);
        assert_eq!(reader.get_i32_in_range("plot.width", 100, 10000), 800);
        assert_eq!(reader.get_f64("memo.time.divisor"), 1000.0);
        assert_eq!(reader.get_point("legend.position"), None);
    }

    #[test]
    fn test_reader_rejects_unknown_and_malformed() {
        let mut reader = PropertyReader::new();
        assert!(matches!(
            reader.apply_override("no.such.property=1"),
            Err(ConfigError::UnknownProperty(_))
        ));
        assert!(matches!(
            reader.apply_override("plot.width"),
            Err(ConfigError::InvalidOverride(_))
        ));
    }

    #[test]
    fn test_reader_from_json_file() {
        let path = std::env::temp_dir().join(format!("plot_config_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r##"{"plot.width": 1024, "plot.frame": true, "series.memo.color": "#00ff00", "nested": {}}"##,
        )
        .unwrap();

        // "nested" is skipped before the registry lookup
        let reader = PropertyReader::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(reader.get_i32_in_range("plot.width", 100, 10000), 1024);
        assert!(reader.get_bool("plot.frame"));
        assert_eq!(reader.get_string("series.memo.color"), "#00ff00");
    }

    #[test]
    fn test_reader_from_missing_json_file() {
        let err = PropertyReader::from_json_file("/nonexistent/plot_config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
