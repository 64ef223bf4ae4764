use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CANVASSIST_DIR: &str = ".canvassist";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are CanvasAssist, an AI assistant designed to help students with Canvas LMS.
You can help with assignments, deadlines, grades, and course materials.
Be concise, helpful, and student-focused in your responses.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub temperature: f64,
    pub canvas_api_url: String,
    pub canvas_access_token: String,
    pub canvas_institute_url: String,
    pub max_history: usize,
    pub system_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            openai_api_key: String::new(),
            openai_model: "gpt-4o".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.7,
            canvas_api_url: "http://localhost:8000".to_string(),
            canvas_access_token: String::new(),
            canvas_institute_url: "https://uncg.instructure.com".to_string(),
            max_history: 10,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

pub fn get_canvassist_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(CANVASSIST_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_canvassist_dir().join("config.toml")
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

impl Config {
    /// Defaults, then `~/.canvassist/config.toml` when present, then the
    /// process environment. Fails if a required value is still missing.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if config_exists() {
            load_config_from(&get_config_path())?
        } else {
            Config::default()
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("OPENAI_API_KEY") {
            self.openai_api_key = v;
        }
        if let Some(v) = non_empty("OPENAI_MODEL") {
            self.openai_model = v;
        }
        if let Some(v) = non_empty("OPENAI_BASE_URL") {
            self.openai_base_url = v;
        }
        if let Some(v) = non_empty("CANVAS_API_URL") {
            self.canvas_api_url = v;
        }
        if let Some(v) = non_empty("CANVAS_ACCESS_TOKEN") {
            self.canvas_access_token = v;
        }
        if let Some(v) = non_empty("CANVAS_INSTITUTE_URL") {
            self.canvas_institute_url = v;
        }
        if let Some(v) = non_empty("CANVASSIST_SYSTEM_PROMPT") {
            self.system_prompt = v;
        }
        if let Some(v) = non_empty("CANVASSIST_TEMPERATURE") {
            self.temperature = v.trim().parse().map_err(|e| {
                ConfigError::InvalidValue("CANVASSIST_TEMPERATURE".to_string(), format!("{}", e))
            })?;
        }
        if let Some(v) = non_empty("CANVASSIST_MAX_HISTORY") {
            self.max_history = v.trim().parse().map_err(|e| {
                ConfigError::InvalidValue("CANVASSIST_MAX_HISTORY".to_string(), format!("{}", e))
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.openai_api_key.trim().is_empty() {
            missing.push("OPENAI_API_KEY".to_string());
        }
        if self.canvas_access_token.trim().is_empty() {
            missing.push("CANVAS_ACCESS_TOKEN".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingRequired(missing));
        }

        if self.max_history == 0 {
            return Err(ConfigError::InvalidValue(
                "max_history".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.max_history, 10);
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.canvas_api_url, "http://localhost:8000");
        assert!(config.system_prompt.starts_with("You are CanvasAssist"));
    }

    #[test]
    fn env_overrides_defaults() {
        let vars = env(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("CANVAS_ACCESS_TOKEN", "tok"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("CANVASSIST_MAX_HISTORY", "4"),
        ]);
        let mut config = Config::default();
        config.apply_env_with(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.max_history, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_reports_all_missing_keys() {
        let err = Config::default().validate().unwrap_err();
        match err {
            ConfigError::MissingRequired(keys) => {
                assert_eq!(keys, vec!["OPENAI_API_KEY", "CANVAS_ACCESS_TOKEN"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_max_history_is_rejected() {
        let vars = env(&[("CANVASSIST_MAX_HISTORY", "lots")]);
        let mut config = Config::default();
        let err = config.apply_env_with(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key, _) if key == "CANVASSIST_MAX_HISTORY"));
    }

    #[test]
    fn zero_history_is_rejected() {
        let config = Config {
            openai_api_key: "k".into(),
            canvas_access_token: "t".into(),
            max_history: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_, _))));
    }

    #[test]
    fn loads_partial_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "openai_api_key = \"sk-file\"\ncanvas_access_token = \"tok\"\nmax_history = 6\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.openai_api_key, "sk-file");
        assert_eq!(config.max_history, 6);
        assert_eq!(config.openai_model, "gpt-4o");
    }

    #[test]
    fn broken_toml_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "max_history = [").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse { .. })));
    }
}
