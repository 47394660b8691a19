use crate::commands::{run_estimate, run_rank, EstimateArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use swap_credits::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Swap Credits",
    about = "Value timeshare weeks in credits and rank swap offers",
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
    /// Price a week from a JSON valuation input and print the breakdown
    Estimate(EstimateArgs),
    /// Rank an offer against a target week's credit value
    Rank(RankArgs),
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
        Command::Estimate(args) => run_estimate(args).await,
        Command::Rank(args) => run_rank(args),
    }
}
