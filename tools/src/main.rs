use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use jumplabel_core::scan::JumpMode;
use jumplabel_core::{Config, JumpSession, Outcome, Tag};

/// Run a jump search against a text file and print the labelled matches,
/// optionally replaying a narrowing key sequence.
#[derive(Parser)]
struct Args {
    /// Text file to search.
    file: PathBuf,

    /// Search character (ignored by the line modes).
    #[arg(long, default_value = "a")]
    key: char,

    /// Jump mode: start, end, any, line or terminator.
    #[arg(long, default_value = "start")]
    mode: JumpMode,

    /// Narrowing keystrokes to replay after the first search.
    #[arg(long, default_value = "")]
    narrow: String,

    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_toml(path)
            .map_err(|e| anyhow::anyhow!("load config {}: {e}", path.display()))?,
        None => Config::default(),
    };
    let not_found = config.not_found_text.clone();

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;

    let mut session = JumpSession::new(config);
    session.begin(args.mode);

    let mut outcome = session.first_key(args.key, &text, 0..text.len());
    print_outcome(&outcome, &text, &not_found);

    for ch in args.narrow.chars() {
        if !matches!(outcome, Outcome::Labels(_)) {
            break;
        }
        println!("narrow '{ch}':");
        outcome = session.next_key(ch);
        print_outcome(&outcome, &text, &not_found);
    }
    Ok(())
}

fn print_outcome(outcome: &Outcome, text: &str, not_found: &str) {
    match outcome {
        Outcome::Labels(tags) => print_tags(tags, text),
        Outcome::Jump(position) => println!(
            "jump -> line {} col {} (byte {})",
            position.start.line, position.start.ch, position.index_s
        ),
        Outcome::NothingFound => println!("{not_found} nothing found"),
        Outcome::Failed => println!("search failed, session reset"),
        Outcome::Idle => println!("no active session"),
    }
}

fn print_tags(tags: &[Tag], text: &str) {
    println!("{} match(es):", tags.len());
    for tag in tags {
        let line = text.lines().nth(tag.position.start.line).unwrap_or("");
        println!(
            "  [{}] line {} col {}: {}",
            tag.label,
            tag.position.start.line,
            tag.position.start.ch,
            line.trim_end()
        );
    }
}
