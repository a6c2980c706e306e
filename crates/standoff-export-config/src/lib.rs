use serde::{Deserialize, Serialize};
use standoff_export_engine::{BlockRenderer, FsComposer, ItemComposer, LayerOrder, LayerRenderer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Export settings, read from `~/.config/standoff-export/config.toml` unless
/// a path is given. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Joins base text lines before resolving locations.
    pub line_separator: String,
    pub layer_order: LayerOrder,
    /// Where flow files are written; shell variables and `~` are expanded.
    pub output_dir: PathBuf,
    /// Written once at the top of every flow file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_head: Option<String>,
    /// Written once at the bottom of every flow file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_tail: Option<String>,
    pub text_renderer: BlockRenderer,
    /// Layer key (`type_id` or `type_id|role_id`) to renderer.
    pub layer_renderers: BTreeMap<String, LayerRenderer>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_separator: "\n".to_string(),
            layer_order: LayerOrder::default(),
            output_dir: PathBuf::from("out"),
            text_head: None,
            text_tail: None,
            text_renderer: BlockRenderer::default(),
            layer_renderers: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.output_dir = expand_output_dir(config.output_dir);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/standoff-export");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Builds the in-memory composer described by this configuration.
    pub fn composer(&self) -> ItemComposer {
        ItemComposer {
            layer_renderers: self.layer_renderers.clone(),
            ..ItemComposer::new(self.text_renderer.clone())
        }
        .with_layer_order(self.layer_order)
        .with_line_separator(self.line_separator.clone())
    }

    /// Builds a composer writing flow files under `output_dir`, or under the
    /// configured directory when `None`.
    pub fn fs_composer(&self, output_dir: Option<&Path>) -> FsComposer {
        let dir = output_dir.unwrap_or(&self.output_dir);
        let mut composer = FsComposer::new(self.composer(), dir);
        if let Some(head) = &self.text_head {
            composer = composer.with_head(head.clone());
        }
        if let Some(tail) = &self.text_tail {
            composer = composer.with_tail(tail.clone());
        }
        composer
    }
}

/// Resolves `~` and `$VAR` in an output directory. A directory naming an
/// unset variable is kept verbatim.
fn expand_output_dir(dir: PathBuf) -> PathBuf {
    match shellexpand::full(&dir.to_string_lossy()) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use standoff_export_engine::{Fragment, Item, PlainTextOptions, TeiLayerOptions, TextLayer};
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn config_lives_under_standoff_export_dir() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/standoff-export/config.toml"));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.layer_order, LayerOrder::ByKey);
    }

    #[test]
    fn full_config_parses() {
        let config: Config = toml::from_str(
            r#"
line_separator = "\r\n"
layer_order = "as-declared"
output_dir = "/tmp/export"
text_head = "<TEI>"
text_tail = "</TEI>"

[text_renderer]
kind = "plain"
block_separator = "|"

[layer_renderers."comment|fr"]
kind = "tei-standoff"
element = "note"

[layer_renderers.orthography]
kind = "null"
"#,
        )
        .unwrap();

        assert_eq!(config.line_separator, "\r\n");
        assert_eq!(config.layer_order, LayerOrder::AsDeclared);
        assert_eq!(
            config.text_renderer,
            BlockRenderer::Plain(PlainTextOptions {
                block_separator: "|".to_string(),
                ..PlainTextOptions::default()
            })
        );
        assert_eq!(
            config.layer_renderers["comment|fr"],
            LayerRenderer::TeiStandoff(TeiLayerOptions::default())
        );
        assert_eq!(config.layer_renderers["orthography"], LayerRenderer::Null);
        assert_eq!(config.text_head.as_deref(), Some("<TEI>"));
    }

    fn load_output_dir(dir: &str) -> PathBuf {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, format!("output_dir = {dir:?}")).unwrap();
        Config::load_from_path(&config_file).unwrap().unwrap().output_dir
    }

    #[test]
    fn output_dir_tilde_is_expanded_on_load() {
        let dir = load_output_dir("~/standoff/tei");
        assert!(!dir.to_string_lossy().starts_with('~'));
        assert!(dir.ends_with("standoff/tei"));
    }

    #[test]
    fn output_dir_env_var_is_expanded_on_load() {
        unsafe {
            env::set_var("STANDOFF_EXPORT_ROOT", "/srv/editions");
        }
        assert_eq!(
            load_output_dir("$STANDOFF_EXPORT_ROOT/tei"),
            PathBuf::from("/srv/editions/tei")
        );
        unsafe {
            env::remove_var("STANDOFF_EXPORT_ROOT");
        }
    }

    #[test]
    fn output_dir_with_unset_variable_is_kept() {
        assert_eq!(
            load_output_dir("$STANDOFF_EXPORT_UNSET_DIR/tei"),
            PathBuf::from("$STANDOFF_EXPORT_UNSET_DIR/tei")
        );
    }

    #[test]
    fn relative_output_dir_is_kept() {
        assert_eq!(load_output_dir("exports/tei"), PathBuf::from("exports/tei"));
    }

    #[test]
    fn missing_config_file_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn invalid_layer_order_reports_config_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "layer_order = \"sideways\"").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn saved_renderers_load_back() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let mut test_config = Config {
            output_dir: PathBuf::from("/tmp/standoff"),
            text_head: Some("<TEI>".to_string()),
            ..Config::default()
        };
        test_config.layer_renderers.insert(
            "comment".to_string(),
            LayerRenderer::TeiStandoff(TeiLayerOptions::default()),
        );

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn composer_uses_configured_separator_and_renderers() {
        let config = Config {
            line_separator: " / ".to_string(),
            text_renderer: BlockRenderer::Plain(PlainTextOptions::default()),
            ..Config::default()
        };
        let item = Item {
            id: "i".to_string(),
            title: String::new(),
            group_id: None,
            base_text: vec!["a b".to_string(), "c".to_string()],
            layers: vec![TextLayer::new("x", vec![Fragment::at("2.1")])],
        };

        let composition = config.composer().compose(&item, 1).unwrap();
        assert_eq!(composition.flows["base-text"], "a b\nc\n");
        assert_eq!(composition.context.targets_of("L0F0"), ["1_2_2"]);
    }

    #[test]
    fn fs_composer_prefers_explicit_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default();
        let composer = config.fs_composer(Some(temp_dir.path()));
        assert_eq!(composer.output_dir(), temp_dir.path());
        assert_eq!(config.fs_composer(None).output_dir(), Path::new("out"));
    }
}
