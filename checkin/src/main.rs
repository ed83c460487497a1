//! Check-in terminal.
//!
//! Reads lines from stdin (keyboard-wedge scanners type the payload followed
//! by Enter) and prints the scan gate and roster state.
//!
//! ```text
//! <payload>      scan
//! :ok            acknowledge the displayed result
//! /<text>        search the roster
//! :redeem <id>   redeem a ticket from the list
//! :paid <id>     mark a list entry as paid
//! :list          print the filtered roster
//! :refresh       refetch the roster
//! :quit          exit
//! ```

use checkin::scan_gate::{ScanPhase, ScanSession};
use checkin::{CheckinApp, Config, TicketRecord};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// One operator input line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Scan(String),
    Acknowledge,
    Search(String),
    Redeem(String),
    MarkPaid(String),
    List,
    Refresh,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        if let Some(query) = line.strip_prefix('/') {
            return Some(Self::Search(query.to_string()));
        }

        let Some(command) = line.strip_prefix(':') else {
            return Some(Self::Scan(line.to_string()));
        };

        let (verb, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(verb, arg)| (verb, arg.trim()));

        Some(match verb {
            "ok" => Self::Acknowledge,
            "redeem" => Self::Redeem(arg.to_string()),
            "paid" => Self::MarkPaid(arg.to_string()),
            "list" => Self::List,
            "refresh" => Self::Refresh,
            "quit" | "q" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        })
    }
}

fn render_session(session: &ScanSession) {
    match (&session.phase, &session.last_result) {
        (ScanPhase::Idle, _) => println!("[idle]"),
        (ScanPhase::Armed, _) => println!("[ready] scan a ticket"),
        (ScanPhase::Pending { ticket_id, .. }, _) => println!("[checking] {ticket_id}"),
        (ScanPhase::Resolved, Some(result)) if result.accepted => {
            println!("{}  {} ({})", result.message, result.name, result.ticket_type);
            println!("  :ok to scan the next ticket");
        },
        (ScanPhase::Resolved, Some(result)) => {
            println!("{}", result.message);
            println!("  :ok to scan the next ticket");
        },
        (ScanPhase::Resolved, None) => println!("[resolved]"),
        (ScanPhase::Draining, _) => println!("[waiting] previous scan still settling"),
    }
}

fn render_roster(records: &[TicketRecord]) {
    if records.is_empty() {
        println!("no results");
        return;
    }
    for record in records {
        println!(
            "{:<24} {:<32} {}",
            record.id,
            record.full_name,
            record.status_label()
        );
    }
}

async fn render_notice(app: &CheckinApp) {
    if let Some(notice) = app.notice().await {
        match notice.reason {
            Some(reason) => println!("{} ({reason})", notice.message),
            None => println!("{}", notice.message),
        }
        // Dismissing only fails after teardown
        let _ = app.dismiss_notice().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkin=info,checkin_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let app = CheckinApp::from_config(&config)?;
    info!(prefix = %config.scanner.prefix, "Starting check-in terminal");

    app.start().await?.wait().await;
    render_session(&app.session().await);
    println!("{} records loaded", app.roster_records().await.len());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Scan(payload) => {
                if app.session().await.is_locked() {
                    println!("result on screen, :ok first");
                    continue;
                }
                app.scan("keyboard", payload).await?.wait().await;
                render_session(&app.session().await);
            },
            Command::Acknowledge => {
                app.acknowledge().await?;
                render_session(&app.session().await);
            },
            Command::Search(query) => {
                app.set_query(query).await?;
                render_roster(&app.visible_roster().await);
            },
            Command::Redeem(id) => {
                app.redeem(id).await?.wait().await;
                render_notice(&app).await;
            },
            Command::MarkPaid(id) => {
                app.mark_paid(id).await?.wait().await;
                render_notice(&app).await;
            },
            Command::List => render_roster(&app.visible_roster().await),
            Command::Refresh => {
                app.refresh().await?.wait().await;
                println!("{} records loaded", app.roster_records().await.len());
            },
            Command::Quit => break,
            Command::Unknown(input) => {
                error!(input = %input, "Unknown command");
                println!("unknown command: {input}");
            },
        }
    }

    app.teardown().await;
    info!("Check-in terminal stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_is_a_scan() {
        assert_eq!(
            Command::parse("0477GROUP:abc123\r\n"),
            Some(Command::Scan("0477GROUP:abc123".to_string()))
        );
    }

    #[test]
    fn blank_line_is_skipped() {
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn colon_commands() {
        assert_eq!(Command::parse(":ok"), Some(Command::Acknowledge));
        assert_eq!(
            Command::parse(":redeem  t1 "),
            Some(Command::Redeem("t1".to_string()))
        );
        assert_eq!(Command::parse(":paid u1"), Some(Command::MarkPaid("u1".to_string())));
        assert_eq!(Command::parse(":paid"), Some(Command::MarkPaid(String::new())));
        assert_eq!(Command::parse(":quit"), Some(Command::Quit));
        assert_eq!(
            Command::parse(":nope"),
            Some(Command::Unknown(":nope".to_string()))
        );
    }

    #[test]
    fn slash_sets_search_query() {
        assert_eq!(Command::parse("/josé"), Some(Command::Search("josé".to_string())));
        assert_eq!(Command::parse("/"), Some(Command::Search(String::new())));
    }
}
