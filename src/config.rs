use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_FILE: &str = "userconfig.cfg";
const HISTORY_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub questions_path: PathBuf,
    pub questions_to_pick: usize,
    pub advance_delay_ms: u64,
    pub restart_unlock_ms: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub dark_mode: bool,
    pub file_history: Vec<(String, i64)>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from("questions.csv"),
            questions_to_pick: 4,
            advance_delay_ms: 1000,
            restart_unlock_ms: 5000,
            log_level: "info".to_string(),
            log_file: None,
            dark_mode: false,
            file_history: Vec::new(),
        }
    }
}

impl UserConfig {
    /// `<config dir>/quiz-canvas/userconfig.cfg`, or the working directory
    /// when the platform has no config dir.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("quiz-canvas").join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    pub fn load() -> Result<Self, serde_json::Error> {
        Self::load_from(&Self::path())
    }

    /// A missing file gives the defaults. A file that exists but does not
    /// parse is an error, so the caller can report it once logging is up.
    pub fn load_from(path: &std::path::Path) -> Result<Self, serde_json::Error> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn restart_unlock(&self) -> Duration {
        Duration::from_millis(self.restart_unlock_ms)
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Records a successfully loaded bank, newest first.
    pub fn update_file_history(&mut self, filename: String) {
        let timestamp = chrono::Utc::now().timestamp();
        self.file_history.retain(|(f, _)| f != &filename);
        self.file_history.insert(0, (filename, timestamp));
        self.file_history.truncate(HISTORY_LEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: UserConfig = serde_json::from_str(r#"{ "questions_to_pick": 6 }"#).unwrap();
        assert_eq!(config.questions_to_pick, 6);
        assert_eq!(config.questions_path, PathBuf::from("questions.csv"));
        assert_eq!(config.advance_delay(), Duration::from_secs(1));
        assert_eq!(config.log_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn unknown_log_level_means_info() {
        let config = UserConfig {
            log_level: "chatty".into(),
            ..UserConfig::default()
        };
        assert_eq!(config.log_filter(), log::LevelFilter::Info);
        let config = UserConfig {
            log_level: "debug".into(),
            ..UserConfig::default()
        };
        assert_eq!(config.log_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn history_is_deduplicated_and_capped() {
        let mut config = UserConfig::default();
        for i in 0..12 {
            config.update_file_history(format!("bank{i}.csv"));
        }
        config.update_file_history("bank5.csv".into());
        assert_eq!(config.file_history.len(), HISTORY_LEN);
        assert_eq!(config.file_history[0].0, "bank5.csv");
        assert_eq!(
            config.file_history.iter().filter(|(f, _)| f == "bank5.csv").count(),
            1
        );
    }

    #[test]
    fn saves_and_loads_from_disk() {
        let dir = std::env::temp_dir().join(format!("quiz_canvas_cfg_{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);
        let mut config = UserConfig::default();
        config.dark_mode = true;
        config.update_file_history("questions.csv".into());
        config.save_to(&path).unwrap();

        let loaded = UserConfig::load_from(&path).unwrap();
        fs::remove_dir_all(&dir).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let path = std::env::temp_dir().join(format!("quiz_canvas_bad_{}.cfg", std::process::id()));
        fs::write(&path, "not json").unwrap();
        let loaded = UserConfig::load_from(&path);
        fs::remove_file(&path).ok();
        assert!(loaded.is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("quiz_canvas_no_such_config.cfg");
        assert_eq!(UserConfig::load_from(&path).unwrap(), UserConfig::default());
    }
}
