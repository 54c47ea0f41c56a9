//! Dispose analysis configuration
//!
//! One flat struct with `#[serde(default)]` so partial YAML files only need
//! to name the settings they change.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Supported YAML schema versions
pub const SUPPORTED_SCHEMA_VERSIONS: &[u32] = &[1];

/// Interprocedural lookup mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterproceduralMode {
    /// Calls are opaque; only the local heuristics apply
    None,
    /// Callee bodies are analysed with their parameters as the tracked roots
    ContextSensitive,
}

impl Default for InterproceduralMode {
    fn default() -> Self {
        Self::None
    }
}

/// Metadata names of the types the analysis needs to recognise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WellKnownTypeNames {
    pub disposable: String,
    pub async_disposable: String,
    pub task: String,
    pub generic_task: String,
    pub value_task: String,
    pub generic_value_task: String,
    pub collection_interfaces: Vec<String>,
    pub ownership_transfer_types: Vec<String>,
}

impl Default for WellKnownTypeNames {
    fn default() -> Self {
        Self {
            disposable: "System.IDisposable".to_string(),
            async_disposable: "System.IAsyncDisposable".to_string(),
            task: "System.Threading.Tasks.Task".to_string(),
            generic_task: "System.Threading.Tasks.Task`1".to_string(),
            value_task: "System.Threading.Tasks.ValueTask".to_string(),
            generic_value_task: "System.Threading.Tasks.ValueTask`1".to_string(),
            collection_interfaces: vec![
                "System.Collections.IList".to_string(),
                "System.Collections.Generic.ICollection`1".to_string(),
                "System.Collections.Generic.IDictionary`2".to_string(),
                "System.Collections.Concurrent.IProducerConsumerCollection`1".to_string(),
            ],
            ownership_transfer_types: vec![
                "System.IO.Stream".to_string(),
                "System.IO.TextReader".to_string(),
                "System.IO.TextWriter".to_string(),
                "System.Resources.IResourceReader".to_string(),
            ],
        }
    }
}

/// Dispose analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisposeConfig {
    /// Worklist block visits before giving up (1..=1000000)
    pub max_iterations: usize,

    /// Track disposable instance fields read through `this`
    pub track_instance_fields: bool,

    /// Interprocedural lookup mode
    pub interprocedural: InterproceduralMode,

    /// Maximum nested callee lookups (1..=64)
    pub max_call_chain_depth: usize,

    /// Treat every disposable constructor argument as transferred
    pub dispose_ownership_transfer_at_constructor: bool,

    /// Static factory method prefixes (case-insensitive)
    pub factory_method_prefixes: Vec<String>,

    /// Prefix of non-owning lookup methods with an out parameter
    pub try_get_prefix: String,

    /// Collection mutation method name prefixes
    pub collection_add_methods: Vec<String>,

    /// Extra ownership-transfer-likely types, by metadata name
    pub additional_ownership_transfer_types: Vec<String>,

    /// Well-known type names
    pub well_known: WellKnownTypeNames,
}

impl Default for DisposeConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl DisposeConfig {
    /// Get preset configuration
    pub fn from_preset(preset: Preset) -> Self {
        let base = Self {
            max_iterations: 10_000,
            track_instance_fields: false,
            interprocedural: InterproceduralMode::ContextSensitive,
            max_call_chain_depth: 2,
            dispose_ownership_transfer_at_constructor: false,
            factory_method_prefixes: vec!["create".to_string(), "open".to_string()],
            try_get_prefix: "TryGet".to_string(),
            collection_add_methods: vec![
                "Add".to_string(),
                "Insert".to_string(),
                "Push".to_string(),
                "Enqueue".to_string(),
                "TryAdd".to_string(),
            ],
            additional_ownership_transfer_types: Vec::new(),
            well_known: WellKnownTypeNames::default(),
        };

        match preset {
            Preset::Fast => Self {
                max_iterations: 1_000,
                interprocedural: InterproceduralMode::None,
                max_call_chain_depth: 1,
                ..base
            },
            Preset::Balanced | Preset::Custom => base,
            Preset::Thorough => Self {
                max_iterations: 100_000,
                track_instance_fields: true,
                max_call_chain_depth: 8,
                ..base
            },
        }
    }

    /// Builder: Set max_iterations
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = v;
        self
    }

    /// Builder: Set track_instance_fields
    pub fn track_instance_fields(mut self, v: bool) -> Self {
        self.track_instance_fields = v;
        self
    }

    /// Builder: Set interprocedural mode
    pub fn interprocedural(mut self, v: InterproceduralMode) -> Self {
        self.interprocedural = v;
        self
    }

    /// Builder: Set max_call_chain_depth
    pub fn max_call_chain_depth(mut self, v: usize) -> Self {
        self.max_call_chain_depth = v;
        self
    }

    /// Builder: Set dispose_ownership_transfer_at_constructor
    pub fn dispose_ownership_transfer_at_constructor(mut self, v: bool) -> Self {
        self.dispose_ownership_transfer_at_constructor = v;
        self
    }

    /// Builder: Add an ownership-transfer-likely type
    pub fn with_ownership_transfer_type(mut self, name: impl Into<String>) -> Self {
        self.additional_ownership_transfer_types.push(name.into());
        self
    }

    /// Whether a method name matches one of the factory prefixes
    pub fn is_factory_method_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.factory_method_prefixes
            .iter()
            .any(|p| lower.starts_with(&p.to_lowercase()))
    }

    /// Whether a method name is a collection mutation
    ///
    /// A prefix matches the whole name or a name continuing with a new
    /// word: `Add` matches `AddRange` but not `AddressOf`.
    pub fn is_collection_add_name(&self, name: &str) -> bool {
        self.collection_add_methods.iter().any(|p| {
            name.strip_prefix(p.as_str())
                .is_some_and(|rest| rest.chars().next().map_or(true, char::is_uppercase))
        })
    }

    /// Load from a YAML document (v1 schema)
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: DisposeConfigFile = serde_yaml::from_str(content)?;

        if !SUPPORTED_SCHEMA_VERSIONS.contains(&file.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: file.version,
                supported: SUPPORTED_SCHEMA_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&file.preset)?;
        let config = match file.analysis {
            Some(overrides) => overrides,
            None => Self::from_preset(preset),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file (v1 schema)
    pub fn from_yaml(path: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export as YAML (v1 schema, custom preset)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = DisposeConfigFile {
            version: 1,
            preset: Preset::Custom.as_str().to_string(),
            analysis: Some(self.clone()),
        };
        serde_yaml::to_string(&file).map_err(ConfigError::Yaml)
    }
}

impl Validatable for DisposeConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_iterations == 0 || self.max_iterations > 1_000_000 {
            return Err(ConfigError::range_with_hint(
                "max_iterations",
                self.max_iterations,
                1,
                1_000_000,
                "Worklist iterations must be finite",
            ));
        }

        if self.max_call_chain_depth == 0 || self.max_call_chain_depth > 64 {
            return Err(ConfigError::range_with_hint(
                "max_call_chain_depth",
                self.max_call_chain_depth,
                1,
                64,
                "Call chain depth must be at least 1",
            ));
        }

        if self.try_get_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "try_get_prefix must not be empty".to_string(),
            ));
        }

        if self.factory_method_prefixes.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::Validation(
                "factory_method_prefixes must not contain empty prefixes".to_string(),
            ));
        }

        self.well_known.validate()
    }

    fn config_name(&self) -> &'static str {
        "DisposeConfig"
    }
}

impl Validatable for WellKnownTypeNames {
    fn validate(&self) -> ConfigResult<()> {
        if self.disposable.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{}.disposable must name the disposable interface",
                self.config_name()
            )));
        }

        let lists = [
            ("collection_interfaces", &self.collection_interfaces),
            ("ownership_transfer_types", &self.ownership_transfer_types),
        ];
        for (field, names) in lists {
            if names.iter().any(|n| n.is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "{}.{} must not contain empty type names",
                    self.config_name(),
                    field
                )));
            }
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "well_known"
    }
}

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisposeConfigFile {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Base preset
    pub preset: String,

    /// Full analysis settings; missing fields fall back to defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<DisposeConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough] {
            DisposeConfig::from_preset(preset).validate().unwrap();
        }
    }

    #[test]
    fn test_fast_preset_is_intraprocedural() {
        let config = DisposeConfig::from_preset(Preset::Fast);
        assert_eq!(config.interprocedural, InterproceduralMode::None);
        assert!(!config.track_instance_fields);
    }

    #[test]
    fn test_invalid_iterations() {
        let err = DisposeConfig::default().max_iterations(0).validate().unwrap_err();
        assert!(err.to_string().contains("max_iterations"));
    }

    #[test]
    fn test_factory_prefix_is_case_insensitive() {
        let config = DisposeConfig::default();
        assert!(config.is_factory_method_name("CreateReader"));
        assert!(config.is_factory_method_name("openFile"));
        assert!(!config.is_factory_method_name("GetReader"));
    }

    #[test]
    fn test_collection_add_prefix() {
        let config = DisposeConfig::default();
        assert!(config.is_collection_add_name("Add"));
        assert!(config.is_collection_add_name("AddRange"));
        assert!(config.is_collection_add_name("TryAdd"));
        assert!(!config.is_collection_add_name("Remove"));
    }

    #[test]
    fn test_collection_add_prefix_needs_word_boundary() {
        let config = DisposeConfig::default();
        assert!(!config.is_collection_add_name("AddressOf"));
        assert!(!config.is_collection_add_name("Additional"));
        assert!(!config.is_collection_add_name("Pushed"));
        assert!(config.is_collection_add_name("EnqueueAll"));
    }

    #[test]
    fn test_well_known_names_are_validated() {
        let mut config = DisposeConfig::default();
        config.well_known.ownership_transfer_types.push(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("well_known.ownership_transfer_types"));

        let mut config = DisposeConfig::default();
        config.well_known.disposable.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        assert!(WellKnownTypeNames::default().validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = DisposeConfig::default().max_call_chain_depth(5);
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("preset: custom"));
        assert!(yaml.contains("max_call_chain_depth: 5"));

        let loaded = DisposeConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_yaml_preset_only() {
        let loaded = DisposeConfig::from_yaml_str("version: 1\npreset: thorough\n").unwrap();
        assert_eq!(loaded, DisposeConfig::from_preset(Preset::Thorough));
    }

    #[test]
    fn test_yaml_partial_analysis_section() {
        let yaml = "version: 1\npreset: custom\nanalysis:\n  track_instance_fields: true\n";
        let loaded = DisposeConfig::from_yaml_str(yaml).unwrap();
        assert!(loaded.track_instance_fields);
        assert_eq!(loaded.try_get_prefix, "TryGet");
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let err = DisposeConfig::from_yaml_str("version: 9\npreset: fast\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 9, .. }));
    }

    #[test]
    fn test_yaml_rejects_invalid_values() {
        let yaml = "version: 1\npreset: custom\nanalysis:\n  max_call_chain_depth: 0\n";
        assert!(matches!(
            DisposeConfig::from_yaml_str(yaml),
            Err(ConfigError::Range { .. })
        ));
    }
}
