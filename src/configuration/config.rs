#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::Flag;
use crate::domain::models::ValidationRule;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiKey,
    ConfigFile,
    DataDir,
    EstimatedTime,
    IssueID,
    IssueType,
    ProjectID,
    RedmineBaseURL,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        #[cfg(not(target_os = "macos"))]
        let config_path = dirs::config_dir()
            .unwrap_or_else(env::temp_dir)
            .join("issuetimer/config.toml");
        #[cfg(target_os = "macos")]
        let config_path = dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".config/issuetimer/config.toml");

        let data_dir = env::current_dir()
            .unwrap_or_else(|_| return path::PathBuf::from("."))
            .join("data");

        let res = match key {
            ConfigKey::ApiKey => "".to_string(),
            ConfigKey::EstimatedTime => "".to_string(),
            ConfigKey::IssueID => "-1".to_string(),
            ConfigKey::IssueType => "general".to_string(),
            ConfigKey::ProjectID => "".to_string(),
            ConfigKey::RedmineBaseURL => "".to_string(),

            // Special
            ConfigKey::ConfigFile => config_path.to_string_lossy().to_string(),
            ConfigKey::DataDir => data_dir.to_string_lossy().to_string(),
        };

        return res;
    }

    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(&config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }

                let Some(item) = doc.get(&key.to_string()) else {
                    continue;
                };
                let Some(val) = scalar(item) else {
                    bail!("{config_file} has an unsupported value for key '{key}'");
                };
                if val.is_empty() {
                    continue;
                }

                if let Some(flag) = Flag::find(key) {
                    if let Err(err) = flag.validate(&val) {
                        bail!("{config_file} has an invalid value for key '{key}': {err}");
                    }
                }

                Config::set(key, &val);
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            project_id = Config::get(ConfigKey::ProjectID),
            issue_id = Config::get(ConfigKey::IssueID),
            redmine_base_url = Config::get(ConfigKey::RedmineBaseURL),
            estimated_time = Config::get(ConfigKey::EstimatedTime),
            issue_type = Config::get(ConfigKey::IssueType),
            data_dir = Config::get(ConfigKey::DataDir),
            "config"
        );

        return Ok(());
    }

    /// Default config file. Settings without a usable default stay commented
    /// out.
    pub fn serialize_default() -> String {
        let mut entries = Flag::session_flags()
            .iter()
            .map(|flag| {
                let mut description = flag.usage.to_string();
                if let ValidationRule::OneOf(values) = flag.rule {
                    description = format!("{description} [possible values: {}]", values.join(", "));
                }

                let default = flag.default_value();
                let entry = if default.parse::<i64>().is_ok() {
                    format!("{} = {default}", flag.name())
                } else {
                    format!("{} = {}", flag.name(), quoted(&default))
                };

                if default.is_empty() || flag.validate(&default).is_err() {
                    return format!("# {description}\n# {entry}");
                }
                return format!("# {description}\n{entry}");
            })
            .collect::<Vec<String>>();

        entries.push(format!(
            "# Directory holding the per-host session logs\n# {} = {}",
            ConfigKey::DataDir,
            quoted(&Config::default(ConfigKey::DataDir))
        ));

        return entries.join("\n\n");
    }
}

fn scalar(item: &toml_edit::Item) -> Option<String> {
    match item.as_value()? {
        toml_edit::Value::String(val) => return Some(val.value().to_string()),
        toml_edit::Value::Integer(val) => return Some(val.value().to_string()),
        toml_edit::Value::Float(val) => return Some(val.value().to_string()),
        _ => return None,
    }
}

fn quoted(val: &str) -> String {
    return format!("\"{}\"", val.replace('\\', "\\\\").replace('"', "\\\""));
}
