use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};

mod sim;
mod ti;
mod util;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[clap(flatten)]
    env: Env,
    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the board image
    Make,
    /// List the clock and DDR profiles
    Profiles,
    /// Run bring-up against the register model on the host
    Simulate(SimArgs),
}

#[derive(Clone, Debug, Args)]
struct Env {
    /// Build in release mode
    #[arg(long, global = true)]
    release: bool,
    /// Board to build
    #[arg(long, global = true, value_enum, default_value_t = Board::Dm365Evm)]
    board: Board,
    /// Board crate features, e.g. a clock profile
    #[arg(long, global = true, value_delimiter = ',')]
    features: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Board {
    Dm365Evm,
}

#[derive(Clone, Debug, Args)]
struct SimArgs {
    /// Profile name, see `profiles`
    #[arg(long, default_value = "default")]
    profile: String,
    #[arg(long, value_enum, default_value_t = Scenario::Cold)]
    scenario: Scenario,
    /// Give up on a hardware wait after this many polls
    #[arg(long)]
    polls: Option<u32>,
    /// Run the NAND EMIF setup
    #[arg(long)]
    nand: bool,
    /// Print every register access
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Clean entry with no reset cause and no flag
    Cold,
    /// Power-on reset reported by PLLC1
    PowerOn,
    /// Watchdog reset with the flag still armed
    Watchdog,
    /// DDR PLL never locks
    StuckPll,
    /// VTP calibration never completes
    StuckVtp,
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match &cli.command {
        Commands::Make => match cli.env.board {
            Board::Dm365Evm => ti::dm365::execute_command(&cli.env),
        },
        Commands::Profiles => sim::print_profiles(),
        Commands::Simulate(args) => {
            if let Err(e) = sim::simulate(args) {
                error!("{e}");
                std::process::exit(1);
            }
        }
    }
    info!("done");
}
