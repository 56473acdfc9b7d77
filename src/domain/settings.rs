use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the configured remote password
pub const PASSWORD_ENV: &str = "PAIGE_TURNER_REMOTE_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_false")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_false")]
    pub show_file_line: bool,
    #[serde(default = "default_false")]
    pub show_thread_ids: bool,
    #[serde(default = "default_true")]
    pub show_target: bool,
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "minutely", "never"
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_logging_enabled: default_false(),
            console_logging_enabled: default_true(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            show_file_line: default_false(),
            show_thread_ids: default_false(),
            show_target: default_true(),
            ansi_colors: default_true(),
            rotation: default_rotation(),
        }
    }
}

/// Where and how the OCR command is run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,
    #[serde(default = "default_sshpass_program")]
    pub sshpass_program: String,
    /// Run `command` through the local shell instead of over SSH
    #[serde(default = "default_false")]
    pub use_local_executor: bool,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            user: default_user(),
            password: String::new(),
            command: default_command(),
            timeout_secs: default_timeout_secs(),
            ssh_program: default_ssh_program(),
            sshpass_program: default_sshpass_program(),
            use_local_executor: false,
        }
    }
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Read-job tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderSettings {
    /// Words per emitted chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Pause between the start of two consecutive `Read` events
    #[serde(default = "default_emit_delay_secs")]
    pub emit_delay_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            emit_delay_secs: default_emit_delay_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ReaderSettings {
    /// Chunk size clamped to at least one word
    pub fn group_size(&self) -> usize {
        self.chunk_size.max(1)
    }

    pub fn emit_delay(&self) -> Duration {
        Duration::from_secs(self.emit_delay_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "paige_turner".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}
fn default_host() -> String {
    "192.168.50.31".to_string()
}
fn default_user() -> String {
    "parallels".to_string()
}
fn default_command() -> String {
    "python3 gocr.py".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_ssh_program() -> String {
    "ssh".to_string()
}
fn default_sshpass_program() -> String {
    "sshpass".to_string()
}
fn default_friendly_name() -> String {
    "PaigeTurner".to_string()
}
fn default_chunk_size() -> usize {
    120
}
fn default_emit_delay_secs() -> u64 {
    8
}
fn default_poll_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_friendly_name")]
    pub friendly_name: String,
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub reader: ReaderSettings,
    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            friendly_name: default_friendly_name(),
            remote: RemoteSettings::default(),
            reader: ReaderSettings::default(),
            log_settings: LogSettings::default(),
        }
    }
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    /// Load settings from the default location in the user's config directory
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Ok(Self::from_path(settings_path))
    }

    /// Load settings from an explicit file. A missing or unreadable file
    /// yields the defaults.
    pub fn from_path(settings_path: PathBuf) -> Self {
        let mut settings = Self::load_from_file(&settings_path).unwrap_or_default();
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            settings.remote.password = password;
        }

        Self {
            settings,
            settings_path,
        }
    }

    fn get_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("PaigeTurner");
        fs::create_dir_all(&path)?;
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.reader.chunk_size, 120);
        assert_eq!(settings.reader.emit_delay(), Duration::from_secs(8));
        assert_eq!(settings.reader.poll_interval(), Duration::from_secs(1));
        assert_eq!(settings.remote.timeout(), Duration::from_secs(30));
        assert_eq!(settings.remote.command, "python3 gocr.py");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let json = r#"{ "reader": { "chunk_size": 40 }, "remote": { "host": "10.0.0.2" } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.reader.chunk_size, 40);
        assert_eq!(settings.reader.emit_delay_secs, 8);
        assert_eq!(settings.remote.host, "10.0.0.2");
        assert_eq!(settings.remote.user, "parallels");
        assert_eq!(settings.log_settings.level, "info");
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let reader = ReaderSettings {
            chunk_size: 0,
            ..Default::default()
        };
        assert_eq!(reader.group_size(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut service = SettingsService::from_path(path.clone());
        service.get_mut().reader.emit_delay_secs = 3;
        service.get_mut().remote.command = "cat page.txt".to_string();
        service.save().unwrap();

        let reloaded = SettingsService::from_path(path);
        assert_eq!(reloaded.get().reader.emit_delay_secs, 3);
        assert_eq!(reloaded.get().remote.command, "cat page.txt");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = SettingsService::from_path(dir.path().join("absent.json"));
        assert_eq!(service.get().reader.chunk_size, 120);
    }
}
