use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::VoiceGender;
use crate::instruction::{InstructionTemplate, TemplateError};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "live_settings.toml";
const ENV_PREFIX: &str = "LIVE_SETTINGS__";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Mailbox size of the catalog actor.
    pub channel_buffer: usize,
    pub language: String,
    pub voice: VoiceGender,
    pub log_filter: String,
    /// File holding a custom instruction template.
    pub template_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            language: String::new(),
            voice: VoiceGender::Female,
            log_filter: "info".into(),
            template_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid instruction template: {0}")]
    Template(#[from] TemplateError),
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path)?)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CHANNEL_BUFFER") {
            match v.parse::<usize>() {
                Ok(parsed) if parsed > 0 => self.channel_buffer = parsed,
                _ => warn!(value = %v, "Ignoring invalid channel buffer override"),
            }
        }
        if let Some(v) = lookup("LANGUAGE") {
            self.language = v;
        }
        if let Some(v) = lookup("VOICE") {
            match v.to_ascii_lowercase().as_str() {
                "female" => self.voice = VoiceGender::Female,
                "male" => self.voice = VoiceGender::Male,
                _ => warn!(value = %v, "Ignoring invalid voice override"),
            }
        }
        if let Some(v) = lookup("LOG_FILTER") {
            self.log_filter = v;
        }
        if let Some(v) = lookup("TEMPLATE_PATH") {
            self.template_path = Some(PathBuf::from(v));
        }
    }

    /// The configured instruction template, or the built-in one.
    pub fn load_template(&self) -> Result<InstructionTemplate, ConfigError> {
        match &self.template_path {
            Some(path) => Ok(InstructionTemplate::parse(&read(path)?)?),
            None => Ok(InstructionTemplate::default()),
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Defaults, then `live_settings.toml` if present, then environment overrides.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = Path::new(CONFIG_FILE);
    let mut config = if path.exists() {
        AppConfig::from_file(path)?
    } else {
        AppConfig::default()
    };
    config.apply_env_overrides();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = AppConfig::from_toml_str("language = \"Thai\"").unwrap();

        assert_eq!(config.language, "Thai");
        assert_eq!(config.channel_buffer, 32);
        assert_eq!(config.voice, VoiceGender::Female);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn voice_is_lowercase_in_toml() {
        let config = AppConfig::from_toml_str("voice = \"male\"").unwrap();
        assert_eq!(config.voice, VoiceGender::Male);

        assert!(matches!(
            AppConfig::from_toml_str("voice = \"robot\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values_and_skip_bad_input() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CHANNEL_BUFFER", "0"),
            ("LANGUAGE", "Spanish"),
            ("VOICE", "MALE"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.channel_buffer, 32);
        assert_eq!(config.language, "Spanish");
        assert_eq!(config.voice, VoiceGender::Male);
    }

    #[test]
    fn template_file_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{gender}} {{language}} {{products}} {{product_details}}").unwrap();

        let config = AppConfig {
            template_path: Some(file.path().to_path_buf()),
            ..AppConfig::default()
        };
        assert!(config.load_template().is_ok());
    }

    #[test]
    fn template_file_without_slots_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Just sell things.").unwrap();

        let config = AppConfig {
            template_path: Some(file.path().to_path_buf()),
            ..AppConfig::default()
        };
        assert!(matches!(config.load_template(), Err(ConfigError::Template(_))));
    }

    #[test]
    fn missing_template_file_reports_path() {
        let config = AppConfig {
            template_path: Some(PathBuf::from("/nonexistent/template.txt")),
            ..AppConfig::default()
        };
        let err = config.load_template().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/template.txt"));
    }
}
