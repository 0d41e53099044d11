use crate::report::{
    run_export, run_leaderboard, run_score, run_stats, run_submit, ExportArgs, ScoreArgs,
    SubmitArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ecometer::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EcoMeter",
    about = "Track household electricity usage and EcoScores from the command line",
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
    /// Score a reading without touching the usage document
    Score(ScoreArgs),
    /// Record this month's reading and rescore it
    Submit(SubmitArgs),
    /// Print the dashboard statistics for the stored history
    Stats,
    /// Write the usage history to a CSV file
    Export(ExportArgs),
    /// Show the community leaderboard and this month's challenge
    Leaderboard,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Submit(args) => run_submit(args),
        Command::Stats => run_stats(),
        Command::Export(args) => run_export(args),
        Command::Leaderboard => run_leaderboard(),
    }
}
