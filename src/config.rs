//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{AppError, AppResult};
use crate::ui::ThemeConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File store connection
    pub server: ServerConfig,
    /// Browsing behaviour
    pub browser: BrowserConfig,
    /// Confirmation settings
    pub confirmations: ConfirmConfig,
    /// Log file settings
    pub logging: LogConfig,
    /// Theme settings
    pub theme: ThemeConfig,
    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeyBindings,
    /// External viewer rules (MIME regex -> command)
    #[serde(default = "default_open_with")]
    pub open_with: Vec<OpenWith>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL, the client appends `/api/v1/...`
    pub url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Percent-encode query values instead of sending them verbatim
    pub escape_paths: bool,
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Directory listed on startup
    pub start_path: String,
    /// Re-list after every uploaded file instead of once per batch
    pub refresh_after_each_upload: bool,
    /// Where downloads are written (empty = current directory)
    pub download_dir: String,
    /// Reopen the last visited directory on startup
    pub remember_path: bool,
    /// Last visited directory (written on exit when remember_path is on)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_path: Option<String>,
}

impl BrowserConfig {
    pub fn download_dir(&self) -> PathBuf {
        if self.download_dir.trim().is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&self.download_dir)
        }
    }

    /// Directory to open first
    pub fn initial_path(&self) -> &str {
        match &self.last_path {
            Some(path) if self.remember_path && !path.is_empty() => path,
            _ => &self.start_path,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Ask before deleting
    pub delete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    /// Filter used when RUST_LOG is not set
    pub level: String,
    /// Log file (empty = ferret.log in the config directory)
    pub file: String,
}

/// External viewer rule: maps a MIME regex to a command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWith {
    /// Regex matched against the MIME type (e.g. "^video/")
    pub pattern: String,
    /// Command to run. `{}` is replaced by the file URL.
    pub command: String,
}

/// Keyboard shortcut configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeyBindings {
    /// Custom keybindings (action -> key)
    #[serde(flatten)]
    pub bindings: HashMap<String, String>,
}

impl KeyBindings {
    /// Key for an action, falling back to the default
    pub fn get(&self, action: &str) -> &str {
        self.bindings
            .get(action)
            .map(|s| s.as_str())
            .unwrap_or_else(|| default_keybinding(action))
    }

    /// Check if a key event matches an action
    pub fn matches(&self, action: &str, key: &crossterm::event::KeyEvent) -> bool {
        use crossterm::event::{KeyCode, KeyModifiers};

        let Some((code, mods)) = parse_key_binding(self.get(action)) else {
            return false;
        };
        // Terminals report Shift on uppercase letters, ignore it for chars
        let pressed = match key.code {
            KeyCode::Char(_) => key.modifiers - KeyModifiers::SHIFT,
            _ => key.modifiers,
        };
        let wanted = match code {
            KeyCode::Char(_) => mods - KeyModifiers::SHIFT,
            _ => mods,
        };
        if pressed != wanted {
            return false;
        }
        match (key.code, code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }
}

/// Default key for an action, empty for unknown actions
pub fn default_keybinding(action: &str) -> &'static str {
    match action {
        "quit" => "F10",
        "quit_alt" => "Ctrl+Q",
        "help" => "F1",
        "rename" => "F2",
        "preview" => "F3",
        "copy" => "F5",
        "new_folder" => "F7",
        "delete" => "F8",
        "menu" => "F9",
        "upload" => "Ctrl+U",
        "download" => "Ctrl+D",
        "refresh" => "Ctrl+R",
        "go_up" => "Backspace",
        "select" => "Insert",
        _ => "",
    }
}

/// Parse a key binding string like "Ctrl+R", "Alt+F1", "F10", etc.
pub fn parse_key_binding(s: &str) -> Option<(crossterm::event::KeyCode, crossterm::event::KeyModifiers)> {
    use crossterm::event::KeyModifiers;

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // "Ctrl++" binds the plus key
    let (prefix, key) = match s.strip_suffix("++") {
        Some(rest) => (rest, "+"),
        None => match s.rfind('+') {
            Some(idx) => (&s[..idx], &s[idx + 1..]),
            None => ("", s),
        },
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in prefix.split('+').filter(|p| !p.is_empty()) {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => return None,
        };
    }

    Some((parse_key_code(key)?, modifiers))
}

fn parse_key_code(s: &str) -> Option<crossterm::event::KeyCode> {
    use crossterm::event::KeyCode;

    let lower = s.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok())
        && (1..=12).contains(&n)
    {
        return Some(KeyCode::F(n));
    }

    match lower.as_str() {
        "esc" | "escape" => Some(KeyCode::Esc),
        "enter" | "return" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "backspace" | "bs" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "insert" | "ins" => Some(KeyCode::Insert),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "space" => Some(KeyCode::Char(' ')),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            browser: BrowserConfig::default(),
            confirmations: ConfirmConfig::default(),
            logging: LogConfig::default(),
            theme: ThemeConfig::default(),
            keybindings: KeyBindings::default(),
            open_with: default_open_with(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
            escape_paths: false,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            start_path: ".".to_string(),
            refresh_after_each_upload: true,
            download_dir: String::new(),
            remember_path: false,
            last_path: None,
        }
    }
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self { delete: true }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: String::new(),
        }
    }
}

/// Returns the platform-appropriate default open command
fn default_open_command() -> &'static str {
    #[cfg(target_os = "linux")]
    { "setsid xdg-open {}" }
    #[cfg(target_os = "macos")]
    { "open {}" }
    #[cfg(target_os = "windows")]
    { "explorer {}" }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    { "xdg-open {}" }
}

/// Default external viewer rules
pub fn default_open_with() -> Vec<OpenWith> {
    let cmd = default_open_command().to_string();
    ["^image/", "^video/", "^audio/", "^application/pdf"]
        .iter()
        .map(|pattern| OpenWith {
            pattern: pattern.to_string(),
            command: cmd.clone(),
        })
        .collect()
}

/// Get the config directory path for the current platform
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(|p| PathBuf::from(p).join("ferret"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        // XDG_CONFIG_HOME first, then ~/.config
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|p| PathBuf::from(p).join(".config")))
            .map(|p| p.join("ferret"))
    }
}

/// Get the default config file path
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Default config file content with comments
fn default_config() -> String {
    let open_cmd = default_open_command();
    format!(r##"# Ferret Configuration
# This file is auto-generated. Edit as needed.

[server]
# Base URL of the file store (the client appends /api/v1/...)
url = "http://127.0.0.1:8080"

# Seconds before a request is abandoned
timeout_secs = 30

# Percent-encode paths in query strings.
# Off sends names verbatim, so names containing & # or + reach the
# server mangled.
escape_paths = false

[browser]
# Directory listed on startup
start_path = "."

# Refresh the listing after every uploaded file (false = once per batch)
refresh_after_each_upload = true

# Where downloads are saved (empty = current directory)
download_dir = ""

# Reopen the last visited directory on startup
remember_path = false

[confirmations]
# Ask before deleting files and folders
delete = true

[logging]
enabled = true
# Filter when RUST_LOG is unset: error, warn, info, debug, trace
level = "info"
# Log file (empty = ferret.log next to this file)
file = ""

[theme]
# Preset: "dark" or "light"
preset = "dark"

# Override single colors of the preset.
# Colors: named ("red", "light_blue"), hex ("#RRGGBB") or "rgb(R,G,B)"
[theme.colors]
# card_cursor = "#78b4ff"
# folder_icon = "yellow"

# Card tinting by MIME type, first match wins
[[theme.highlights]]
pattern = "^image/"
color = "light_magenta"
label = "IMG"

[[theme.highlights]]
pattern = "^video/"
color = "light_red"
label = "VID"

[[theme.highlights]]
pattern = "^audio/"
color = "light_cyan"
label = "AUD"

[[theme.highlights]]
pattern = "^application/pdf"
color = "red"
label = "PDF"

[[theme.highlights]]
pattern = "(zip|tar|gzip|x-7z|x-rar|x-bzip|x-xz)"
color = "yellow"
label = "ARC"

[[theme.highlights]]
pattern = "^text/"
color = "light_green"
label = "TXT"

[keybindings]
# Format: "Ctrl+X", "Alt+X", "F1", "Backspace", ...
# quit = "F10"
# quit_alt = "Ctrl+Q"
# help = "F1"
# rename = "F2"
# preview = "F3"
# copy = "F5"
# new_folder = "F7"
# delete = "F8"
# menu = "F9"
# upload = "Ctrl+U"
# download = "Ctrl+D"
# refresh = "Ctrl+R"
# go_up = "Backspace"
# select = "Insert"

# External viewers, matched against the MIME type. {{}} is the file URL.
# Media started this way is stopped when the preview moves on.
# Example: command = "mpv --no-terminal {{}}"
[[open_with]]
pattern = "^image/"
command = "{open_cmd}"

[[open_with]]
pattern = "^video/"
command = "{open_cmd}"

[[open_with]]
pattern = "^audio/"
command = "{open_cmd}"

[[open_with]]
pattern = "^application/pdf"
command = "{open_cmd}"
"##)
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Self {
        match config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                eprintln!("Warning: Could not determine config directory");
                Config::default()
            }
        }
    }

    /// Load configuration from `path`, creating a commented default if it
    /// doesn't exist. Problems are reported and defaults used instead.
    pub fn load_from(path: &Path) -> Self {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
            && let Err(e) = fs::create_dir_all(dir)
        {
            eprintln!("Warning: Could not create config directory: {}", e);
            return Config::default();
        }

        if !path.exists()
            && let Err(e) = fs::write(path, default_config())
        {
            eprintln!("Warning: Could not create config file: {}", e);
            return Config::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: {}", e);
                    eprintln!("Using default configuration");
                    Config::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Could not read config file: {}", e);
                Config::default()
            }
        }
    }

    pub fn parse(content: &str) -> AppResult<Self> {
        toml_edit::de::from_str(content)
            .map_err(|e| AppError::Config(format!("Could not parse config file: {}", e)))
    }

    /// Store the last visited directory in `path`, keeping comments intact
    pub fn save_last_path(&mut self, path: &Path, last_path: &str) -> AppResult<()> {
        if !self.browser.remember_path {
            return Ok(());
        }
        self.browser.last_path = Some(last_path.to_string());

        let content = match fs::read_to_string(path) {
            Ok(existing) => update_last_path(&existing, last_path)?,
            Err(_) => toml_edit::ser::to_string_pretty(self)
                .map_err(|e| AppError::Config(e.to_string()))?,
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Command for the first `open_with` rule matching `mime`, with `{}`
    /// replaced by the quoted URL
    pub fn find_handler(&self, mime: &str, url: &str) -> Option<String> {
        self.open_with
            .iter()
            .find(|rule| {
                regex::Regex::new(&rule.pattern)
                    .map(|re| re.is_match(mime))
                    .unwrap_or(false)
            })
            .map(|rule| rule.command.replace("{}", &shell_quote(url)))
    }
}

fn update_last_path(existing: &str, last_path: &str) -> AppResult<String> {
    use toml_edit::{value, DocumentMut, Item, Table};

    let mut doc: DocumentMut = existing
        .parse()
        .map_err(|e: toml_edit::TomlError| AppError::Config(e.to_string()))?;
    if !doc.contains_key("browser") {
        doc["browser"] = Item::Table(Table::new());
    }
    let browser = doc["browser"]
        .as_table_mut()
        .ok_or_else(|| AppError::Config("[browser] is not a table".to_string()))?;
    browser["last_path"] = value(last_path);
    Ok(doc.to_string())
}

/// Quote a string for sh use
#[cfg(not(windows))]
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Quote a string for cmd.exe use
#[cfg(windows)]
fn shell_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&default_config()).unwrap();
        assert_eq!(config.server.url, "http://127.0.0.1:8080");
        assert!(!config.server.escape_paths);
        assert!(config.browser.refresh_after_each_upload);
        assert!(config.confirmations.delete);
        assert_eq!(config.open_with.len(), 4);
        assert_eq!(config.theme.highlights.len(), 6);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[server]\nurl = \"http://files:9000\"\n").unwrap();
        assert_eq!(config.server.url, "http://files:9000");
        assert_eq!(config.server.timeout_secs, 30);
        assert_eq!(config.browser.start_path, ".");
        assert_eq!(config.logging.level, "info");
        assert!(!config.open_with.is_empty());
    }

    #[test]
    fn test_invalid_config_is_error() {
        assert!(matches!(Config::parse("[server\nurl = 1"), Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path);

        assert!(path.exists());
        assert_eq!(config.browser.start_path, ".");
    }

    #[test]
    fn test_save_last_path_keeps_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# my notes\n[browser]\nremember_path = true\n").unwrap();

        let mut config = Config::load_from(&path);
        config.save_last_path(&path, "./photos").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# my notes"));
        let reloaded = Config::load_from(&path);
        assert_eq!(reloaded.browser.initial_path(), "./photos");
    }

    #[test]
    fn test_save_last_path_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browser]\n").unwrap();

        let mut config = Config::load_from(&path);
        config.save_last_path(&path, "./x").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[browser]\n");
    }

    #[test]
    fn test_find_handler() {
        let mut config = Config::default();
        config.open_with = vec![
            OpenWith { pattern: "^video/".into(), command: "mpv {}".into() },
            OpenWith { pattern: "[".into(), command: "broken {}".into() },
        ];

        assert_eq!(
            config.find_handler("video/mp4", "http://h/api/v1/download?path=./a.mp4&peek=true"),
            Some("mpv 'http://h/api/v1/download?path=./a.mp4&peek=true'".to_string())
        );
        assert_eq!(config.find_handler("text/plain", "x"), None);
    }

    #[test]
    fn test_parse_key_binding() {
        assert_eq!(parse_key_binding("F10"), Some((KeyCode::F(10), KeyModifiers::NONE)));
        assert_eq!(parse_key_binding("Ctrl+R"), Some((KeyCode::Char('R'), KeyModifiers::CONTROL)));
        assert_eq!(
            parse_key_binding("ctrl+alt+backspace"),
            Some((KeyCode::Backspace, KeyModifiers::CONTROL | KeyModifiers::ALT))
        );
        assert_eq!(parse_key_binding("Ctrl++"), Some((KeyCode::Char('+'), KeyModifiers::CONTROL)));
        assert_eq!(parse_key_binding("Hyper+X"), None);
        assert_eq!(parse_key_binding(""), None);
    }

    #[test]
    fn test_keybinding_matches() {
        let mut bindings = KeyBindings::default();
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(bindings.matches("refresh", &ctrl_r));
        assert!(!bindings.matches("refresh", &KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE)));

        bindings.bindings.insert("refresh".into(), "F5".into());
        assert!(!bindings.matches("refresh", &ctrl_r));
        assert!(bindings.matches("refresh", &KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert!(!bindings.matches("unknown", &ctrl_r));
    }
}
