use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Generator, Shell};
use peft_compare::cli::{self, commands::*, logging, CliResult, Output};
use peft_compare::Config;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "peft-compare",
    version,
    about = "Compare full fine-tuning, LoRA and QLoRA benchmark results",
    long_about = "Collects evaluation harness output for fine-tuned models, aggregates scores \
                  into per-task comparison tables and reports the improvement of each \
                  fine-tuning method over the base model."
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set the verbosity level (can be repeated for more verbose output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PEFT_COMPARE_CONFIG")]
    config: Option<String>,

    /// Override the results directory
    #[arg(long, global = true)]
    results_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate stored results into comparison tables
    Analyze(AnalyzeCommand),

    /// Store a harness result file under its canonical name
    Capture(CaptureCommand),

    /// Compare the scores of two result files
    Compare(CompareCommand),

    /// Describe a single result file
    Inspect(InspectCommand),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Show current configuration
    Show,

    /// Initialize configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

fn print_completions<G: Generator>(gen: G, cmd: &mut clap::Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.print_error();
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    logging::init_logging(cli.verbose, cli.quiet, cli.json)?;

    let out = Output::new(cli.json, cli.quiet);

    // These do not need an existing configuration
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(*shell, &mut cmd);
            return Ok(());
        }
        Commands::Config {
            subcommand: ConfigSubcommand::Init { force },
        } => {
            let path = cli::config::init_config(cli.config.as_deref(), *force)?;
            out.success(&format!("Configuration written to {}", path.display()));
            return Ok(());
        }
        _ => {}
    }

    let mut config = cli::config::load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.results_dir {
        config.layout.results_dir = dir;
    }
    config.validate()?;

    match cli.command {
        Commands::Analyze(cmd) => cli::commands::analyze::execute(cmd, config, out),
        Commands::Capture(cmd) => cli::commands::capture::execute(cmd, config, out),
        Commands::Compare(cmd) => cli::commands::compare::execute(cmd, config, out),
        Commands::Inspect(cmd) => cli::commands::inspect::execute(cmd, config, out),
        Commands::Config { subcommand } => handle_config(subcommand, &config),
        Commands::Completions { .. } => Ok(()),
    }
}

fn handle_config(subcommand: ConfigSubcommand, config: &Config) -> CliResult<()> {
    match subcommand {
        ConfigSubcommand::Show => cli::config::show_config(config),
        ConfigSubcommand::Init { .. } => Ok(()),
    }
}
