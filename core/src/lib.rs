//! jumplabel-core
//!
//! Keyboard-driven jump labelling for text views: scan the visible text for
//! match positions, hand each one a short label drawn from the keys around
//! the search character, then narrow the label set one keystroke at a time
//! until a single target remains.
//!
//! Public API:
//! - `JumpSession` - One search-and-jump interaction, fed a key at a time
//! - `SearchTree` - Label assignment trie with keyboard-proximity ordering
//! - `KeyboardLayout` - Physical key grid parsed from a layout string
//! - `KeyboardHeuristic` - Pluggable label-ordering strategies
//! - `JumpMode` / `scan` - Text scanning for word, line and char targets
//! - `Config` - Configuration and styling options
use serde::{Deserialize, Serialize};

pub mod layout;
pub use layout::KeyboardLayout;

pub mod heuristics;
pub use heuristics::{heuristic_names, provide_heuristic, KeyboardHeuristic};

pub mod tree;
pub use tree::{EngineError, SearchTree};

pub mod scan;
pub use scan::{scan, JumpMode, ScanOptions, SearchPosition, TextPosition};

pub mod style;
pub use style::{pulse_for, style_for, ModeStyle, PulseStyle, SearchStyle};

pub mod session;
pub use session::{JumpSession, Outcome, Tag};

/// Configuration for label assignment, scanning and rendering.
///
/// All fields round-trip through TOML. Hosts typically load one of these at
/// startup, let the user edit a subset, and rebuild the [`JumpSession`] when
/// something changes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Keyboard rows, whitespace-separated. Blank-line-separated blocks
    /// define additional layouts for multi-language keyboards.
    pub keyboard_layout: String,

    /// Characters present on the keyboard but never used for labels.
    pub keyboard_ignored: String,

    /// Search ring depth cap; 0 disables the cap.
    pub keyboard_depth: i32,

    /// Label-ordering strategy name (see [`heuristic_names`]).
    pub heuristic: String,

    /// Mode used when a session starts without an explicit one.
    pub default_mode: JumpMode,

    /// Jump immediately when the first keystroke yields a single match.
    pub auto_jump_on_single: bool,

    /// Render labels upper-cased (matching stays case-insensitive).
    pub capitalize_labels: bool,

    /// Fold accented characters to their base letter while matching.
    pub convert_utf8_to_ascii: bool,

    /// Notice text shown when a search finds nothing.
    pub not_found_text: String,

    /// Characters skipped by terminator mode in addition to whitespace.
    pub terminator_exceptions: String,

    // Per-mode label colors.
    pub style_start: ModeStyle,
    pub style_end: ModeStyle,
    pub style_any: ModeStyle,
    pub style_line: ModeStyle,
    pub style_terminator: ModeStyle,

    /// Highlight color flashed at the landing position after a jump.
    pub jump_pulse_color: String,
    /// Pulse duration in seconds.
    pub jump_pulse_duration: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyboard_layout: "1234567890 qwertyuiop asdfghjkl zxcvbnm".to_string(),
            keyboard_ignored: "0".to_string(),
            keyboard_depth: 2,
            heuristic: "spiral".to_string(),
            default_mode: JumpMode::Start,
            auto_jump_on_single: false,
            capitalize_labels: false,
            convert_utf8_to_ascii: false,
            not_found_text: "🚫".to_string(),
            terminator_exceptions: ".,;:'\"`".to_string(),
            style_start: ModeStyle::new("#FFFF00", "#FF5733", "#FF5733"),
            style_end: ModeStyle::new("#FFFF00", "#0000FF", "#0000FF"),
            style_any: ModeStyle::new("#800080", "#00FFFF", "#00FFFF"),
            style_line: ModeStyle::new("#FFFF00", "#FF00FF", "#FF00FF"),
            style_terminator: ModeStyle::new("#FFFF00", "#696969", "#696969"),
            jump_pulse_color: "#FF0000".to_string(),
            jump_pulse_duration: 0.15,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Style block for a jump mode.
    pub fn mode_style(&self, mode: JumpMode) -> &ModeStyle {
        match mode {
            JumpMode::Start => &self.style_start,
            JumpMode::End => &self.style_end,
            JumpMode::Any => &self.style_any,
            JumpMode::Line => &self.style_line,
            JumpMode::Terminator => &self.style_terminator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = config.to_toml_string().unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert_eq!(back.keyboard_layout, config.keyboard_layout);
        assert_eq!(back.default_mode, config.default_mode);
        assert_eq!(back.style_start, config.style_start);
        assert_eq!(back.jump_pulse_duration, config.jump_pulse_duration);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml_str("heuristic = \"plain\"\nkeyboard_depth = 3\n").unwrap();
        assert_eq!(config.heuristic, "plain");
        assert_eq!(config.keyboard_depth, 3);
        assert_eq!(config.keyboard_layout, Config::default().keyboard_layout);
    }

    #[test]
    fn test_mode_style_selects_per_mode_block() {
        let config = Config::default();
        assert_eq!(config.mode_style(JumpMode::Start), &config.style_start);
        assert_eq!(config.mode_style(JumpMode::Terminator), &config.style_terminator);
    }
}
