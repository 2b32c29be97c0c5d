//! End-to-end session flows: scan, label, narrow, jump, across modes and
//! configuration variants.

use jumplabel_core::scan::JumpMode;
use jumplabel_core::{Config, JumpSession, Outcome};

const TEXT: &str = "fn main() {\n    let result = compute();\n    report(result);\n}\n";

fn new_session() -> JumpSession {
    JumpSession::new(Config::default())
}

#[test]
fn test_word_start_search_labels_every_match() {
    let mut session = new_session();
    session.begin(JumpMode::Start);
    let outcome = session.first_key('r', TEXT, 0..TEXT.len());
    let Outcome::Labels(tags) = outcome else {
        panic!("expected labels, got {outcome:?}");
    };
    // "result", "report", "result" all start with 'r'
    assert_eq!(tags.len(), 3);
    assert!(tags.windows(2).all(|w| w[0].position.index_s < w[1].position.index_s));
    assert!(tags.iter().all(|tag| TEXT[tag.position.index_s..].starts_with('r')));
}

#[test]
fn test_full_flow_narrows_to_a_jump() {
    let mut session = new_session();
    session.begin(JumpMode::Start);
    let Outcome::Labels(tags) = session.first_key('r', TEXT, 0..TEXT.len()) else {
        panic!("expected labels");
    };
    let wanted = tags[2].clone();

    let mut outcome = Outcome::Labels(tags);
    for ch in wanted.label.chars() {
        outcome = session.next_key(ch);
        if matches!(outcome, Outcome::Jump(_)) {
            break;
        }
    }
    assert_eq!(outcome, Outcome::Jump(wanted.position));
    assert!(!session.is_active());
}

#[test]
fn test_visible_window_limits_the_scan() {
    let mut session = new_session();
    session.begin(JumpMode::Start);
    // only the first line is visible
    let outcome = session.first_key('r', TEXT, 0..11);
    assert_eq!(outcome, Outcome::NothingFound);
}

#[test]
fn test_any_mode_matches_inside_words() {
    let mut session = new_session();
    session.begin(JumpMode::Any);
    let text = "abracadabra";
    let Outcome::Labels(tags) = session.first_key('b', text, 0..text.len()) else {
        panic!("expected labels");
    };
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].position.index_s, 1);
    assert_eq!(tags[1].position.index_s, 8);
}

#[test]
fn test_word_end_mode_targets_final_letters() {
    let mut session = new_session();
    session.begin(JumpMode::End);
    let text = "cat cut echo salt";
    let Outcome::Labels(tags) = session.first_key('t', text, 0..text.len()) else {
        panic!("expected labels");
    };
    let offsets: Vec<usize> = tags.iter().map(|tag| tag.position.index_s).collect();
    assert_eq!(offsets, vec![2, 6, 16]);
}

#[test]
fn test_line_mode_tags_every_line() {
    let mut session = new_session();
    session.begin(JumpMode::Line);
    let Outcome::Labels(tags) = session.first_key(' ', TEXT, 0..TEXT.len()) else {
        panic!("expected labels");
    };
    assert_eq!(tags.len(), 4);
    let lines: Vec<usize> = tags.iter().map(|tag| tag.position.start.line).collect();
    assert_eq!(lines, vec![0, 1, 2, 3]);
    // indented lines are tagged at their first non-blank character
    assert_eq!(tags[1].position.start.ch, 4);
}

#[test]
fn test_terminator_mode_skips_trailing_punctuation() {
    let mut session = new_session();
    session.begin(JumpMode::Terminator);
    let text = "first line.\nsecond;\n";
    let Outcome::Labels(tags) = session.first_key(' ', text, 0..text.len()) else {
        panic!("expected labels");
    };
    assert_eq!(tags.len(), 2);
    // '.' and ';' are exception characters, so the targets land before them
    assert_eq!(tags[0].position.index_s, text.find('e').unwrap());
    assert!(text[tags[1].position.index_s..].starts_with('d'));
}

fn plain_matches(text: &str, fold: bool) -> usize {
    let mut config = Config::default();
    config.convert_utf8_to_ascii = fold;
    let mut session = JumpSession::new(config);
    session.begin(JumpMode::Any);
    match session.first_key('e', text, 0..text.len()) {
        Outcome::Labels(tags) => tags.len(),
        Outcome::Jump(_) => 1,
        _ => 0,
    }
}

#[test]
fn test_accent_folding_widens_matches() {
    let text = "café crème";
    let without = plain_matches(text, false);
    let with = plain_matches(text, true);
    assert!(with > without, "folding found {with}, plain found {without}");
    // é in "café" and both è/e in "crème"
    assert_eq!(with, 3);
    assert_eq!(without, 1);
}

#[test]
fn test_config_toml_round_trip_drives_a_session() {
    let mut config = Config::default();
    config.default_mode = JumpMode::End;
    config.heuristic = "forward".to_string();
    config.auto_jump_on_single = true;

    let text = config.to_toml_string().unwrap();
    let config = Config::from_toml_str(&text).unwrap();
    assert_eq!(config.default_mode, JumpMode::End);

    let mut session = JumpSession::new(config);
    session.begin(JumpMode::End);
    let outcome = session.first_key('n', "fn", 0..2);
    // single match plus auto-jump resolves immediately
    let Outcome::Jump(position) = outcome else {
        panic!("expected a jump, got {outcome:?}");
    };
    assert_eq!(position.index_s, 1);
}
