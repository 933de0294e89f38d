use crate::report::{run_report, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mourne_ops::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mourne-ops",
    about = "Score and rank Mourne-oids stores and managers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print leaderboards computed from CSV exports
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Shift metrics CSV loaded into the in-memory store at startup
    #[arg(long)]
    pub(crate) seed_shifts: Option<PathBuf>,
    /// OSA audit CSV loaded into the in-memory store at startup
    #[arg(long)]
    pub(crate) seed_audits: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mourne_ops::performance::{Board, DateWindow};

    #[test]
    fn report_flags_parse_into_engine_types() {
        let cli = Cli::try_parse_from([
            "mourne-ops",
            "report",
            "--shifts",
            "shifts.csv",
            "--window",
            "last7",
            "--today",
            "2025-03-18",
            "--board",
            "cost",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.window, Some(DateWindow::Rolling { days: 7 }));
                assert_eq!(args.board, Some(Board::Cost));
                assert_eq!(args.shifts, Some(PathBuf::from("shifts.csv")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_board_is_rejected() {
        let parsed = Cli::try_parse_from(["mourne-ops", "report", "--board", "speed"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["mourne-ops"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
