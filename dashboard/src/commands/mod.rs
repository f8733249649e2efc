pub mod search;
pub mod summary;

use crate::error::DashboardError;
use cashly_client::Period;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

pub const USAGE: &str = "dashboard summary [week|month|year] | dashboard search <text>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum CommandName {
    Summary,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mount every dashboard widget for a period
    Summary(Period),
    /// Type a transaction search one key at a time
    Search(String),
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, DashboardError> {
        let usage = || DashboardError::Usage(USAGE.to_string());

        let name = match args.first() {
            Some(name) => CommandName::from_str(name).map_err(|_| usage())?,
            None => return Ok(Command::Summary(Period::default())),
        };

        match name {
            CommandName::Summary => {
                let period = match args.get(1) {
                    Some(period) => Period::from_str(period).map_err(|_| usage())?,
                    None => Period::default(),
                };
                Ok(Command::Summary(period))
            }
            CommandName::Search => {
                let text = args[1..].join(" ");
                if text.trim().is_empty() {
                    return Err(usage());
                }
                Ok(Command::Search(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_summary_is_the_default() {
        assert_eq!(
            Command::parse(&[]).unwrap(),
            Command::Summary(Period::Month)
        );
        assert_eq!(
            Command::parse(&args("summary year")).unwrap(),
            Command::Summary(Period::Year)
        );
    }

    #[test]
    fn test_search_joins_words() {
        assert_eq!(
            Command::parse(&args("search coffee beans")).unwrap(),
            Command::Search("coffee beans".to_string())
        );
    }

    #[test]
    fn test_invalid_commands() {
        for line in ["export", "summary decade", "search"] {
            assert!(matches!(
                Command::parse(&args(line)),
                Err(DashboardError::Usage(_))
            ));
        }
    }
}
