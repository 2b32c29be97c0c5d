//! Jump session orchestration.
//!
//! A [`JumpSession`] ties the text scan, the label tree and the narrowing
//! loop together for the host's key handler. It is synchronous and
//! single-threaded: the host feeds it one character per step and owns all
//! timing, focus and escape handling. Internal tree errors never escape —
//! the session resets itself and reports [`Outcome::Failed`] so the host
//! can show a generic notice.

use std::ops::Range;

use tracing::{debug, warn};

use crate::heuristics::provide_heuristic;
use crate::layout::KeyboardLayout;
use crate::scan::{scan, JumpMode, ScanOptions, SearchPosition};
use crate::style::{style_for, SearchStyle};
use crate::tree::SearchTree;
use crate::Config;

/// One renderable label: where it sits and what it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub label: String,
    pub position: SearchPosition,
}

/// What the host should do after feeding the session a keystroke.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No session is active; the keystroke was not consumed.
    Idle,
    /// Render these tags and wait for the next keystroke.
    Labels(Vec<Tag>),
    /// Exactly one candidate remains: move the cursor there and reset.
    Jump(SearchPosition),
    /// Nothing matched, or narrowing reached a dead end; session is over.
    NothingFound,
    /// An internal guard tripped; session was reset, show a generic notice.
    Failed,
}

/// Session state for one search-and-jump interaction.
pub struct JumpSession {
    config: Config,
    tree: SearchTree<SearchPosition>,
    mode: JumpMode,
    /// Count of label characters already typed, used as the render offset.
    typed: usize,
    active: bool,
}

impl JumpSession {
    /// Build a session from configuration. The keyboard layout string may
    /// contain several blank-line-separated blocks for multi-language
    /// setups; each block becomes its own layout.
    pub fn new(config: Config) -> Self {
        let blocks: Vec<KeyboardLayout> = config
            .keyboard_layout
            .split("\n\n")
            .filter(|block| !block.trim().is_empty())
            .map(|block| KeyboardLayout::parse(block, &config.keyboard_ignored))
            .collect();
        let heuristic = provide_heuristic(&config.heuristic);
        let tree = SearchTree::with_layouts(blocks, heuristic, config.keyboard_depth);
        let mode = config.default_mode;
        Self {
            config,
            tree,
            mode,
            typed: 0,
            active: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> JumpMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a session in `mode`, discarding any previous state.
    pub fn begin(&mut self, mode: JumpMode) {
        debug!(%mode, "session begin");
        self.tree.reset();
        self.mode = mode;
        self.typed = 0;
        self.active = true;
    }

    /// Feed the first real keystroke: scan `text` within `visible`, assign
    /// a label to every match, and report the tags (or jump directly when
    /// configured to and only one match exists).
    ///
    /// Line modes ignore `input` and synthesize the mid-layout character.
    pub fn first_key(&mut self, input: char, text: &str, visible: Range<usize>) -> Outcome {
        if !self.active {
            return Outcome::Idle;
        }

        let query = if self.mode.is_line_mode() {
            match self.tree.mid_layout_char(None) {
                Some(mid) => mid,
                None => {
                    warn!("layout has no usable keys");
                    self.abort();
                    return Outcome::NothingFound;
                }
            }
        } else {
            input
        };

        let opts = ScanOptions {
            fold_ascii: self.config.convert_utf8_to_ascii,
            terminator_exceptions: self.config.terminator_exceptions.clone(),
        };
        let positions = scan(self.mode, text, visible, query, &opts);
        debug!(mode = %self.mode, found = positions.len(), "scan complete");

        if positions.is_empty() {
            self.abort();
            return Outcome::NothingFound;
        }

        for position in positions {
            if let Err(err) = self.tree.assign(query, position) {
                warn!(%err, "label assignment failed");
                self.abort();
                return Outcome::Failed;
            }
        }
        self.typed = 0;

        match self.tags() {
            Some(tags) if tags.len() == 1 && self.config.auto_jump_on_single => {
                let target = tags[0].position.clone();
                self.abort();
                Outcome::Jump(target)
            }
            Some(tags) => Outcome::Labels(tags),
            None => {
                self.abort();
                Outcome::Failed
            }
        }
    }

    /// Feed a narrowing keystroke. A single survivor resolves the session
    /// with a jump; an empty survivor set ends it with nothing found.
    pub fn next_key(&mut self, input: char) -> Outcome {
        if !self.active {
            return Outcome::Idle;
        }

        self.tree.narrow(input);
        self.typed += 1;

        let Some(tags) = self.tags() else {
            self.abort();
            return Outcome::Failed;
        };

        match tags.len() {
            0 => {
                self.abort();
                Outcome::NothingFound
            }
            1 => {
                let target = tags.into_iter().next().map(|tag| tag.position);
                self.abort();
                match target {
                    Some(position) => Outcome::Jump(position),
                    None => Outcome::Failed,
                }
            }
            _ => Outcome::Labels(tags),
        }
    }

    /// End the session and discard all state.
    pub fn abort(&mut self) {
        debug!("session reset");
        self.tree.reset();
        self.typed = 0;
        self.active = false;
    }

    /// Style for the tag at render index `idx`.
    pub fn tag_style(&self, idx: usize) -> SearchStyle {
        style_for(&self.config, self.mode, idx, self.typed)
    }

    /// Current leaves as tags, sorted by document position.
    fn tags(&self) -> Option<Vec<Tag>> {
        let frozen = self.tree.freeze().ok()?;
        let mut tags: Vec<Tag> = frozen
            .into_iter()
            .map(|(label, position)| Tag { label, position })
            .collect();
        tags.sort_by_key(|tag| tag.position.index_s);
        Some(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> JumpSession {
        JumpSession::new(Config::default())
    }

    #[test]
    fn test_inactive_session_ignores_keys() {
        let mut s = session();
        assert_eq!(s.first_key('t', "text", 0..4), Outcome::Idle);
        assert_eq!(s.next_key('t'), Outcome::Idle);
    }

    #[test]
    fn test_first_key_labels_matches() {
        let mut s = session();
        let text = "the thin cat";
        s.begin(JumpMode::Start);
        let outcome = s.first_key('t', text, 0..text.len());
        let Outcome::Labels(tags) = outcome else {
            panic!("expected labels, got {outcome:?}");
        };
        assert_eq!(tags.len(), 2);
        // sorted by document position
        assert_eq!(tags[0].position.index_s, 0);
        assert_eq!(tags[1].position.index_s, 4);
        // labels are unique
        assert_ne!(tags[0].label, tags[1].label);
    }

    #[test]
    fn test_no_match_ends_session() {
        let mut s = session();
        s.begin(JumpMode::Start);
        assert_eq!(s.first_key('z', "the cat", 0..7), Outcome::NothingFound);
        assert!(!s.is_active());
    }

    #[test]
    fn test_narrowing_to_one_jumps() {
        let mut s = session();
        let text = "the thin cat";
        s.begin(JumpMode::Start);
        let Outcome::Labels(tags) = s.first_key('t', text, 0..text.len()) else {
            panic!("expected labels");
        };
        let target = tags[1].clone();
        let first = target.label.chars().next().unwrap();
        let outcome = s.next_key(first);
        assert_eq!(outcome, Outcome::Jump(target.position));
        assert!(!s.is_active());
    }

    #[test]
    fn test_narrow_miss_reports_nothing_found() {
        let mut s = session();
        let text = "the thin cat";
        s.begin(JumpMode::Start);
        let Outcome::Labels(tags) = s.first_key('t', text, 0..text.len()) else {
            panic!("expected labels");
        };
        // pick a key no label starts with
        let used: Vec<char> = tags
            .iter()
            .filter_map(|tag| tag.label.chars().next())
            .collect();
        let miss = ('a'..='z').find(|c| !used.contains(c)).unwrap();
        assert_eq!(s.next_key(miss), Outcome::NothingFound);
        assert!(!s.is_active());
    }

    #[test]
    fn test_auto_jump_on_single_match() {
        let mut config = Config::default();
        config.auto_jump_on_single = true;
        let mut s = JumpSession::new(config);
        let text = "lonely";
        s.begin(JumpMode::Start);
        let outcome = s.first_key('l', text, 0..text.len());
        let Outcome::Jump(position) = outcome else {
            panic!("expected a jump, got {outcome:?}");
        };
        assert_eq!(position.index_s, 0);
        assert!(!s.is_active());
    }

    #[test]
    fn test_line_mode_needs_no_query() {
        let mut s = session();
        let text = "one\ntwo\nthree";
        s.begin(JumpMode::Line);
        // the input char is ignored; every line gets a tag
        let Outcome::Labels(tags) = s.first_key('\0', text, 0..text.len()) else {
            panic!("expected labels");
        };
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].position.start.line, 0);
        assert_eq!(tags[2].position.start.line, 2);
    }

    #[test]
    fn test_tag_style_tracks_typed_prefix() {
        let mut s = session();
        let text = "the thin the";
        s.begin(JumpMode::Start);
        s.first_key('t', text, 0..text.len());
        assert_eq!(s.tag_style(0).offset, 0);
        if let Outcome::Labels(_) = s.next_key('t') {
            assert_eq!(s.tag_style(0).offset, 1);
        }
    }
}
