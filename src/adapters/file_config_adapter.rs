//! INI file configuration adapter.

use crate::domain::error::NetrankError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NetrankError> {
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|e| NetrankError::ConfigParse {
                file: path.as_ref().display().to_string(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[costs]
broker_profile = Default
broker_fee = 0.002
override_enabled = true

[ranking]
objective = income_stability
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("costs", "broker_profile"),
            Some("Default".to_string())
        );
        assert_eq!(
            adapter.get_string("ranking", "objective"),
            Some("income_stability".to_string())
        );
        assert_eq!(adapter.get_double("costs", "broker_fee", 0.0), 0.002);
        assert!(adapter.get_bool("costs", "override_enabled", false));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[costs]\nbroker_fee = 0.001\n").unwrap();
        assert_eq!(adapter.get_string("costs", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_value_and_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[costs]\nholding_window = 10\nbad = abc\n").unwrap();
        assert_eq!(adapter.get_int("costs", "holding_window", 0), 10);
        assert_eq!(adapter.get_int("costs", "missing", 42), 42);
        assert_eq!(adapter.get_int("costs", "bad", 42), 42);
    }

    #[test]
    fn get_double_value_and_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[costs]\ncess = 0.0005\nbad = x\n").unwrap();
        assert_eq!(adapter.get_double("costs", "cess", 0.0), 0.0005);
        assert_eq!(adapter.get_double("costs", "missing", 9.9), 9.9);
        assert_eq!(adapter.get_double("costs", "bad", 9.9), 9.9);
    }

    #[test]
    fn get_bool_value_and_defaults() {
        let adapter = FileConfigAdapter::from_string(
            "[costs]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\n",
        )
        .unwrap();
        assert!(adapter.get_bool("costs", "a", false));
        assert!(adapter.get_bool("costs", "b", false));
        assert!(adapter.get_bool("costs", "c", false));
        assert!(!adapter.get_bool("costs", "d", true));
        assert!(!adapter.get_bool("costs", "e", true));
        assert!(!adapter.get_bool("costs", "f", true));
        assert!(adapter.get_bool("costs", "missing", true));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\nprices = data/prices.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "prices"),
            Some("data/prices.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/netrank.ini");
        assert!(matches!(result, Err(NetrankError::ConfigParse { .. })));
    }
}
