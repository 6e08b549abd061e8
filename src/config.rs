use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;

const BUNDLED_THEME_NAME: &str = "inkpad-dawn";
const BUNDLED_THEME: &str = include_str!("../themes/inkpad-dawn.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_theme_name")]
    pub theme: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Width of the note list, in percent of the screen.
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u16,
}

fn default_data_dir() -> String { "~/.local/share/inkpad".to_string() }
fn default_theme_name() -> String { BUNDLED_THEME_NAME.to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_sidebar_width() -> u16 { 30 }

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { sidebar_width: default_sidebar_width() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            theme: default_theme_name(),
            log_level: default_log_level(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read a config file, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load the config, writing a default config file and the bundled theme
    /// on first launch.
    pub fn load_or_create() -> Self {
        let config_dir = Self::config_dir();
        let themes_dir = Self::themes_dir();

        if !config_dir.exists() { let _ = fs::create_dir_all(&config_dir); }
        if !themes_dir.exists() { let _ = fs::create_dir_all(&themes_dir); }

        let default_theme_path = themes_dir.join(format!("{}.toml", BUNDLED_THEME_NAME));
        if !default_theme_path.exists() {
            let _ = fs::write(&default_theme_path, BUNDLED_THEME);
        }

        let config_path = Self::config_path();
        if !config_path.exists() {
            if let Err(e) = Self::default().save_to(&config_path) {
                warn!(error = %e, "failed to write default config");
            }
        }
        Self::load()
    }

    pub fn config_path() -> PathBuf { Self::config_dir().join("config.toml") }
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("inkpad")
    }
    pub fn themes_dir() -> PathBuf { Self::config_dir().join("themes") }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        let path = shellexpand::tilde(&self.data_dir).to_string();
        PathBuf::from(path)
    }

    pub fn sidebar_width(&self) -> u16 {
        self.layout.sidebar_width.clamp(15, 60)
    }
}

// ============================================================================
// Theme File Format (TOML parsing structures)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeFile {
    #[serde(default)]
    pub base: BaseColors,
    #[serde(default)]
    pub accent: AccentColors,
    #[serde(default)]
    pub ui: UiColorsFile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseColors {
    #[serde(default = "defaults::background")]
    pub background: String,
    #[serde(default = "defaults::foreground")]
    pub foreground: String,
    #[serde(default = "defaults::muted")]
    pub muted: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccentColors {
    #[serde(default = "defaults::primary")]
    pub primary: String,
    #[serde(default = "defaults::secondary")]
    pub secondary: String,
    #[serde(default = "defaults::error")]
    pub error: String,
    #[serde(default = "defaults::warning")]
    pub warning: String,
    #[serde(default = "defaults::success")]
    pub success: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiColorsFile {
    #[serde(default = "defaults::border")]
    pub border: String,
    #[serde(default = "defaults::border_focused")]
    pub border_focused: String,
    #[serde(default = "defaults::selection")]
    pub selection: String,
    #[serde(default)]
    pub statusbar: StatusbarColors,
    #[serde(default)]
    pub sidebar: SidebarColors,
    #[serde(default)]
    pub editor: EditorColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusbarColors {
    #[serde(default = "defaults::selection")]
    pub background: String,
    #[serde(default = "defaults::foreground")]
    pub foreground: String,
    #[serde(default = "defaults::primary")]
    pub brand: String,
    #[serde(default = "defaults::warning")]
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidebarColors {
    #[serde(default = "defaults::foreground")]
    pub title: String,
    #[serde(default = "defaults::warning")]
    pub title_active: String,
    #[serde(default = "defaults::muted")]
    pub preview: String,
    #[serde(default = "defaults::secondary")]
    pub date: String,
    #[serde(default = "defaults::error")]
    pub delete: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorColors {
    #[serde(default = "defaults::foreground")]
    pub text: String,
    #[serde(default = "defaults::muted")]
    pub tag: String,
    #[serde(default = "defaults::success")]
    pub control: String,
    #[serde(default = "defaults::muted")]
    pub placeholder: String,
}

mod defaults {
    pub fn background() -> String { "#1a1a24".to_string() }
    pub fn foreground() -> String { "#c0caf5".to_string() }
    pub fn muted() -> String { "#565f89".to_string() }
    pub fn primary() -> String { "#7aa2f7".to_string() }
    pub fn secondary() -> String { "#bb9af7".to_string() }
    pub fn error() -> String { "#f7768e".to_string() }
    pub fn warning() -> String { "#e0af68".to_string() }
    pub fn success() -> String { "#9ece6a".to_string() }
    pub fn border() -> String { "#3b4261".to_string() }
    pub fn border_focused() -> String { "#7aa2f7".to_string() }
    pub fn selection() -> String { "#283457".to_string() }
}

impl Default for BaseColors {
    fn default() -> Self {
        Self {
            background: defaults::background(),
            foreground: defaults::foreground(),
            muted: defaults::muted(),
        }
    }
}

impl Default for AccentColors {
    fn default() -> Self {
        Self {
            primary: defaults::primary(),
            secondary: defaults::secondary(),
            error: defaults::error(),
            warning: defaults::warning(),
            success: defaults::success(),
        }
    }
}

impl Default for UiColorsFile {
    fn default() -> Self {
        Self {
            border: defaults::border(),
            border_focused: defaults::border_focused(),
            selection: defaults::selection(),
            statusbar: StatusbarColors::default(),
            sidebar: SidebarColors::default(),
            editor: EditorColors::default(),
        }
    }
}

impl Default for StatusbarColors {
    fn default() -> Self {
        Self {
            background: defaults::selection(),
            foreground: defaults::foreground(),
            brand: defaults::primary(),
            mode: defaults::warning(),
        }
    }
}

impl Default for SidebarColors {
    fn default() -> Self {
        Self {
            title: defaults::foreground(),
            title_active: defaults::warning(),
            preview: defaults::muted(),
            date: defaults::secondary(),
            delete: defaults::error(),
        }
    }
}

impl Default for EditorColors {
    fn default() -> Self {
        Self {
            text: defaults::foreground(),
            tag: defaults::muted(),
            control: defaults::success(),
            placeholder: defaults::muted(),
        }
    }
}

impl ThemeFile {
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Option<Self> {
        match toml::from_str(content) {
            Ok(theme) => Some(theme),
            Err(e) => {
                warn!(error = %e, "failed to parse theme");
                None
            }
        }
    }

    fn get_bundled_theme(name: &str) -> Option<Self> {
        match name {
            BUNDLED_THEME_NAME => Self::load_from_str(BUNDLED_THEME),
            _ => None,
        }
    }

    /// User themes directory first, then the theme compiled into the binary.
    pub fn load_by_name(name: &str) -> Option<Self> {
        let theme_path = Config::themes_dir().join(format!("{}.toml", name));
        if theme_path.exists() {
            if let Some(theme) = Self::load_from_file(&theme_path) {
                return Some(theme);
            }
        }
        Self::get_bundled_theme(name)
    }
}

// ============================================================================
// Runtime Theme (parsed colors for UI rendering)
// ============================================================================

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    pub primary: Color,
    pub secondary: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,

    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,

    pub statusbar: StatusbarTheme,
    pub sidebar: SidebarTheme,
    pub editor: EditorTheme,
}

#[derive(Debug, Clone)]
pub struct StatusbarTheme {
    pub background: Color,
    pub foreground: Color,
    pub brand: Color,
    pub mode: Color,
}

#[derive(Debug, Clone)]
pub struct SidebarTheme {
    pub title: Color,
    pub title_active: Color,
    pub preview: Color,
    pub date: Color,
    pub delete: Color,
}

#[derive(Debug, Clone)]
pub struct EditorTheme {
    pub text: Color,
    pub tag: Color,
    pub control: Color,
    pub placeholder: Color,
}

impl Theme {
    pub fn from_file(tf: &ThemeFile) -> Self {
        Self {
            background: parse_hex_color(&tf.base.background),
            foreground: parse_hex_color(&tf.base.foreground),
            muted: parse_hex_color(&tf.base.muted),

            primary: parse_hex_color(&tf.accent.primary),
            secondary: parse_hex_color(&tf.accent.secondary),
            error: parse_hex_color(&tf.accent.error),
            warning: parse_hex_color(&tf.accent.warning),
            success: parse_hex_color(&tf.accent.success),

            border: parse_hex_color(&tf.ui.border),
            border_focused: parse_hex_color(&tf.ui.border_focused),
            selection: parse_hex_color(&tf.ui.selection),

            statusbar: StatusbarTheme {
                background: parse_hex_color(&tf.ui.statusbar.background),
                foreground: parse_hex_color(&tf.ui.statusbar.foreground),
                brand: parse_hex_color(&tf.ui.statusbar.brand),
                mode: parse_hex_color(&tf.ui.statusbar.mode),
            },
            sidebar: SidebarTheme {
                title: parse_hex_color(&tf.ui.sidebar.title),
                title_active: parse_hex_color(&tf.ui.sidebar.title_active),
                preview: parse_hex_color(&tf.ui.sidebar.preview),
                date: parse_hex_color(&tf.ui.sidebar.date),
                delete: parse_hex_color(&tf.ui.sidebar.delete),
            },
            editor: EditorTheme {
                text: parse_hex_color(&tf.ui.editor.text),
                tag: parse_hex_color(&tf.ui.editor.tag),
                control: parse_hex_color(&tf.ui.editor.control),
                placeholder: parse_hex_color(&tf.ui.editor.placeholder),
            },
        }
    }

    pub fn from_name(name: &str) -> Self {
        if let Some(theme_file) = ThemeFile::load_by_name(name) {
            return Self::from_file(&theme_file);
        }
        warn!(theme = name, "theme not found, using defaults");
        Self::from_file(&ThemeFile::default())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_file(&ThemeFile::default())
    }
}

fn parse_hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#').trim_start_matches('\'').trim_end_matches('\'');
    if hex.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }
    Color::White
}
