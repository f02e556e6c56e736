use crate::demo::{run_demo, run_roster_check, DemoArgs, RosterArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tricksy::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tricksy Cleaning Desk",
    about = "Run and demonstrate the Tricksy cleaning-service backend from the command line",
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
    /// Validate a cleaner roster CSV the way the import endpoint would
    Roster(RosterArgs),
    /// Run an end-to-end CLI demo covering bookings, assignment, and payments
    Demo(DemoArgs),
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
        Command::Roster(args) => run_roster_check(args),
        Command::Demo(args) => run_demo(args),
    }
}
