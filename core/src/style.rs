//! Display data for rendered tags.
//!
//! The engine does not render anything; these are plain data containers the
//! host reads to draw label overlays and the jump pulse. No callbacks, no
//! traits — the host owns presentation entirely.

use serde::{Deserialize, Serialize};

use crate::scan::JumpMode;
use crate::Config;

/// Colors for one jump mode's tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeStyle {
    pub bg: String,
    pub text: String,
    pub border: String,
}

impl ModeStyle {
    pub fn new(bg: &str, text: &str, border: &str) -> Self {
        Self {
            bg: bg.to_string(),
            text: text.to_string(),
            border: border.to_string(),
        }
    }
}

/// Everything a rendered tag needs besides its label and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStyle {
    /// Render the label uppercased.
    pub capitalize: bool,
    pub bg: String,
    pub text: String,
    pub border: String,
    /// How many leading label characters are already typed and should be
    /// rendered as placeholder space.
    pub offset: usize,
    /// Stacking index so later tags draw above earlier ones.
    pub idx: usize,
}

/// Data for the one-shot pulse drawn at the jump target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseStyle {
    /// Seconds.
    pub duration: f32,
    pub bg: String,
}

/// Resolve the style for the tag at position `idx` in the current session.
pub fn style_for(config: &Config, mode: JumpMode, idx: usize, offset: usize) -> SearchStyle {
    let colors = config.mode_style(mode);
    SearchStyle {
        capitalize: config.capitalize_labels,
        bg: colors.bg.clone(),
        text: colors.text.clone(),
        border: colors.border.clone(),
        offset,
        idx,
    }
}

/// Resolve the jump pulse style.
pub fn pulse_for(config: &Config) -> PulseStyle {
    PulseStyle {
        duration: config.jump_pulse_duration,
        bg: config.jump_pulse_color.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_follows_mode() {
        let config = Config::default();
        let start = style_for(&config, JumpMode::Start, 0, 0);
        let any = style_for(&config, JumpMode::Any, 3, 1);
        assert_ne!(start.text, any.text);
        assert_eq!(any.idx, 3);
        assert_eq!(any.offset, 1);
    }

    #[test]
    fn test_capitalize_flag_carries_over() {
        let mut config = Config::default();
        config.capitalize_labels = true;
        assert!(style_for(&config, JumpMode::Line, 0, 0).capitalize);
    }
}
