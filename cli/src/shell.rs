//! Interactive session: one long-lived dashboard driven by typed commands

use anyhow::Result;
use portfoliox_core::{PerformancePeriod, Section};
use portfoliox_engine::DashboardSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  go <dashboard|portfolios|analytics|settings>   switch section
  select <id>                                    pick a portfolio and show its analytics
  show <id>                                      one portfolio's card
  recommendations                                recommendations for the selected portfolio
  analyze                                        run analysis for the selected portfolio
  refresh                                        reload the dashboard
  performance [1m|3m|6m|1y|all]                  history of the selected portfolio
  save <base-url> [token]                        store connection settings
  test                                           probe the backend endpoints
  logout                                         forget stored settings
  help                                           show this text
  quit                                           leave the shell";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Go(Section),
    Select(i64),
    Show(i64),
    Recommendations,
    Analyze,
    Refresh,
    Performance(PerformancePeriod),
    Save { base_url: String, token: String },
    Test,
    Logout,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("go", [section]) => ShellCommand::Go(section.parse()?),
            ("select", [id]) => ShellCommand::Select(
                id.parse()
                    .map_err(|_| format!("'{}' is not a portfolio id", id))?,
            ),
            ("show", [id]) => ShellCommand::Show(
                id.parse()
                    .map_err(|_| format!("'{}' is not a portfolio id", id))?,
            ),
            ("recommendations", []) => ShellCommand::Recommendations,
            ("analyze", []) => ShellCommand::Analyze,
            ("refresh", []) => ShellCommand::Refresh,
            ("performance", []) => ShellCommand::Performance(PerformancePeriod::default()),
            ("performance", [period]) => ShellCommand::Performance(period.parse()?),
            ("save", [base_url]) => ShellCommand::Save {
                base_url: base_url.to_string(),
                token: String::new(),
            },
            ("save", [base_url, token]) => ShellCommand::Save {
                base_url: base_url.to_string(),
                token: token.to_string(),
            },
            ("test", []) => ShellCommand::Test,
            ("logout", []) => ShellCommand::Logout,
            ("help" | "?", []) => ShellCommand::Help,
            ("quit" | "exit", []) => ShellCommand::Quit,
            (other, _) => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(Some(command))
    }
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(session: &DashboardSession) -> Result<()> {
    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };
        debug!("Shell command: {:?}", command);

        match command {
            ShellCommand::Go(section) => {
                session.navigate(section).await;
            }
            ShellCommand::Select(id) => {
                session.select_portfolio(id).await;
            }
            ShellCommand::Show(id) => {
                session.load_portfolio(id).await;
            }
            ShellCommand::Recommendations => {
                session.load_current_recommendations().await;
            }
            ShellCommand::Analyze => {
                // The deferred reload keeps running in the background
                let _ = session.trigger_analysis().await;
            }
            ShellCommand::Refresh => {
                session.refresh_dashboard().await;
            }
            ShellCommand::Performance(period) => {
                session.load_performance(period).await;
            }
            ShellCommand::Save { base_url, token } => {
                let _ = session.save_settings(&base_url, &token).await;
            }
            ShellCommand::Test => {
                session.test_connection().await;
            }
            ShellCommand::Logout => {
                let _ = session.logout().await;
            }
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ShellCommand::parse("go Analytics"),
            Ok(Some(ShellCommand::Go(Section::Analytics)))
        );
        assert_eq!(
            ShellCommand::parse("  select 7 "),
            Ok(Some(ShellCommand::Select(7)))
        );
        assert_eq!(
            ShellCommand::parse("performance 3m"),
            Ok(Some(ShellCommand::Performance(PerformancePeriod::ThreeMonths)))
        );
        assert_eq!(
            ShellCommand::parse("performance"),
            Ok(Some(ShellCommand::Performance(PerformancePeriod::OneYear)))
        );
        assert_eq!(
            ShellCommand::parse("save http://localhost:8000"),
            Ok(Some(ShellCommand::Save {
                base_url: "http://localhost:8000".into(),
                token: String::new(),
            }))
        );
        assert_eq!(ShellCommand::parse("show 4"), Ok(Some(ShellCommand::Show(4))));
        assert_eq!(
            ShellCommand::parse("recommendations"),
            Ok(Some(ShellCommand::Recommendations))
        );
        assert_eq!(ShellCommand::parse("exit"), Ok(Some(ShellCommand::Quit)));
        assert_eq!(ShellCommand::parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ShellCommand::parse("select seven").is_err());
        assert!(ShellCommand::parse("go reports").is_err());
        assert!(ShellCommand::parse("analyze now").is_err());
        assert!(ShellCommand::parse("performance 2y").is_err());
    }
}
