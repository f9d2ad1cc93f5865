use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::LogStatus;

#[derive(Parser, Debug)]
#[command(name = "sms-console")]
#[command(about = "Terminal admin console for sending SMS and browsing delivery logs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Launch the interactive console (default)
    Tui,

    /// Sign in and store a session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Clear the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Send one SMS
    Send {
        /// Recipient number, with country code
        #[arg(short, long)]
        to: String,

        /// Sender name or number
        #[arg(short, long)]
        from: String,

        /// Message text (160 characters max)
        #[arg(short, long)]
        message: String,
    },

    /// Upload a recipients CSV as one campaign
    SendBatch {
        /// CSV file with phone,name,message columns
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List SMS logs
    Logs {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long, default_value = "10")]
        page_size: usize,

        /// Only show one status (delivered, read, pending, failed)
        #[arg(short, long)]
        status: Option<String>,

        /// Match destination, source or subaccount
        #[arg(short, long)]
        query: Option<String>,
    },
}

impl Commands {
    pub fn parse_status(status: &str) -> anyhow::Result<LogStatus> {
        LogStatus::parse(status).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid status: {}. Valid options: delivered, read, pending, failed",
                status
            )
        })
    }

    /// 0-based index for a 1-based `--page`; page 1 is always valid
    pub fn parse_page(page: usize, page_count: usize) -> anyhow::Result<usize> {
        let last = page_count.max(1);
        if page == 0 || page > last {
            anyhow::bail!("Invalid page: {}. Valid pages: 1 to {}", page, last);
        }
        Ok(page - 1)
    }

    /// Whether the command runs the full-screen console
    pub fn is_interactive(command: Option<&Commands>) -> bool {
        matches!(command, None | Some(Commands::Tui))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_out_of_range() {
        assert_eq!(Commands::parse_page(1, 3).unwrap(), 0);
        assert_eq!(Commands::parse_page(3, 3).unwrap(), 2);
        assert_eq!(Commands::parse_page(1, 0).unwrap(), 0);

        let err = Commands::parse_page(999, 1).unwrap_err();
        assert_eq!(err.to_string(), "Invalid page: 999. Valid pages: 1 to 1");
        assert!(Commands::parse_page(0, 3).is_err());
    }

    #[test]
    fn test_defaults_to_console() {
        let cli = Cli::try_parse_from(["sms-console"]).unwrap();
        assert!(cli.command.is_none());
        assert!(Commands::is_interactive(cli.command.as_ref()));
    }

    #[test]
    fn test_send_arguments() {
        let cli = Cli::try_parse_from([
            "sms-console", "send", "--to", "+1234567890", "--from", "Biz", "--message", "Hi",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Send {
                to: "+1234567890".to_string(),
                from: "Biz".to_string(),
                message: "Hi".to_string(),
            })
        );
        assert!(!Commands::is_interactive(cli.command.as_ref()));
    }

    #[test]
    fn test_logs_defaults_and_status() {
        let cli = Cli::try_parse_from(["sms-console", "logs", "--status", "Read"]).unwrap();
        match cli.command {
            Some(Commands::Logs { page, page_size, status, query }) => {
                assert_eq!(page, 1);
                assert_eq!(page_size, 10);
                assert_eq!(Commands::parse_status(status.as_deref().unwrap()).unwrap(), LogStatus::Read);
                assert!(query.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Commands::parse_status("lost").is_err());
    }

    #[test]
    fn test_send_batch_requires_file() {
        assert!(Cli::try_parse_from(["sms-console", "send-batch"]).is_err());
    }
}
