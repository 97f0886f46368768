//! Aegis application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Install the tracing subscriber
//! 3. Build the chat orchestrator with a tracing-backed activity log that
//!    also keeps recent entries in memory
//! 4. Run a line-oriented chat loop over stdin

mod cli;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use aegis_chat::{ChatOrchestrator, ChatTurn, Route};
use aegis_core::{ActivityLog, AegisConfig, MemoryActivityLog, TracingActivityLog};

use cli::CliArgs;

const GREETING: &str =
    "Hi, I'm Aegis. Ask me anything about staying safe online. Type 'quit' to leave.";
const PROMPT: &str = "you> ";
const RECENT_ACTIVITY_SHOWN: usize = 10;

/// Traces every activity and keeps the most recent ones for display.
struct ConsoleActivityLog {
    recent: MemoryActivityLog,
}

impl ActivityLog for ConsoleActivityLog {
    fn log_activity(&self, category: &str, action: &str, details: &str) -> aegis_core::Result<()> {
        TracingActivityLog.log_activity(category, action, details)?;
        self.recent.log_activity(category, action, details)
    }
}

/// Flag > RUST_LOG > config file.
fn env_filter(flag: Option<String>, config_level: &str) -> EnvFilter {
    if let Some(level) = flag {
        if let Ok(filter) = EnvFilter::try_new(&level) {
            return filter;
        }
        eprintln!("Ignoring invalid --log-level '{}'", level);
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn is_exit(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "quit" | "exit")
}

fn print_turn(out: &mut impl Write, turn: &ChatTurn, json: bool) -> io::Result<()> {
    writeln!(out, "aegis> {}", turn.reply)?;
    if let Some(offer) = &turn.follow_up_offer {
        writeln!(out, "aegis> {}", offer)?;
    }
    match &turn.route {
        Route::Reply => {}
        Route::CreateTask(draft) => {
            let draft_json = serde_json::to_string(draft).map_err(io::Error::other)?;
            writeln!(out, "[route: {}] {}", turn.route.as_str(), draft_json)?;
        }
        other => writeln!(out, "[route: {}]", other.as_str())?,
    }
    if json {
        if let Some(analysis) = &turn.analysis {
            let analysis_json =
                serde_json::to_string_pretty(analysis).map_err(io::Error::other)?;
            writeln!(out, "{}", analysis_json)?;
        }
    }
    Ok(())
}

fn print_recent_activity(out: &mut impl Write, log: &MemoryActivityLog) -> io::Result<()> {
    let entries = log.entries();
    if entries.is_empty() {
        return writeln!(out, "  (no activity yet)");
    }
    let skip = entries.len().saturating_sub(RECENT_ACTIVITY_SHOWN);
    for entry in &entries[skip..] {
        writeln!(
            out,
            "  {} [{}] {}: {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.category,
            entry.action,
            entry.details
        )?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = AegisConfig::load_or_default(&config_file);
    config.dialogue.rng_seed = args.resolve_seed(config.dialogue.rng_seed);

    // Tracing goes to stderr so stdout stays a clean transcript.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(
            args.resolve_log_level(),
            &config.general.log_level,
        ))
        .with_writer(io::stderr)
        .init();

    tracing::info!("Starting Aegis v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let activity = Arc::new(ConsoleActivityLog {
        recent: MemoryActivityLog::new(config.activity.max_entries),
    });
    let orchestrator = ChatOrchestrator::new(&config, activity.clone())?;

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "aegis> {}", GREETING)?;

    let mut session: Option<Uuid> = None;
    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if is_exit(&line) {
            break;
        }

        let turn = orchestrator.handle_message(&line, session)?;
        session = Some(turn.session_id);
        print_turn(&mut out, &turn, args.json)?;
        if turn.route == Route::ShowActivityLog {
            print_recent_activity(&mut out, &activity.recent)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "aegis> Stay safe out there!")?;
    tracing::info!(sessions = orchestrator.session_count(), "Aegis shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::NullActivityLog;

    fn seeded() -> ChatOrchestrator {
        let mut config = AegisConfig::default();
        config.dialogue.rng_seed = Some(5);
        ChatOrchestrator::new(&config, Arc::new(NullActivityLog)).unwrap()
    }

    fn render(turn: &ChatTurn, json: bool) -> String {
        let mut buf = Vec::new();
        print_turn(&mut buf, turn, json).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_exit_words() {
        assert!(is_exit("quit"));
        assert!(is_exit("  EXIT "));
        assert!(!is_exit("quit smoking tips"));
        assert!(!is_exit(""));
    }

    #[test]
    fn test_print_topic_turn_with_offer() {
        let turn = seeded().handle_message("tell me about vpns", None).unwrap();
        let text = render(&turn, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("aegis> "));
        assert_eq!(
            lines[1],
            "aegis> Would you like a follow-up tip about VPNs? (yes/no)"
        );
    }

    #[test]
    fn test_print_task_route() {
        let turn = seeded()
            .handle_message("remind me to update my router tomorrow", None)
            .unwrap();
        let text = render(&turn, false);
        assert!(text.contains("[route: create_task]"));
        assert!(text.contains("\"title\":\"update my router\""));
    }

    #[test]
    fn test_print_json_analysis() {
        let turn = seeded().handle_message("start a quiz", None).unwrap();
        let text = render(&turn, true);
        assert!(text.contains("[route: start_quiz]"));
        assert!(text.contains("\"intent\": \"start_quiz\""));
    }

    #[test]
    fn test_console_log_keeps_recent_entries() {
        let activity = Arc::new(ConsoleActivityLog {
            recent: MemoryActivityLog::new(2),
        });
        let mut config = AegisConfig::default();
        config.dialogue.rng_seed = Some(5);
        let orch = ChatOrchestrator::new(&config, activity.clone()).unwrap();
        let sid = orch.handle_message("hello", None).unwrap().session_id;
        orch.handle_message("start a quiz", Some(sid)).unwrap();
        orch.handle_message("show my activity log", Some(sid)).unwrap();

        assert_eq!(activity.recent.len(), 2);
        let mut buf = Vec::new();
        print_recent_activity(&mut buf, &activity.recent).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("[Chat] start_quiz: start a quiz"));
        assert!(!text.contains("hello"));
    }

    #[test]
    fn test_recent_activity_empty() {
        let mut buf = Vec::new();
        print_recent_activity(&mut buf, &MemoryActivityLog::new(5)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "  (no activity yet)\n");
    }

    #[test]
    fn test_invalid_flag_level_falls_back() {
        // Must not panic on a malformed directive.
        let _ = env_filter(Some("[[[".to_string()), "info");
        let _ = env_filter(None, "debug");
    }
}
