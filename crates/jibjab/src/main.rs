use clap::{ArgAction, Parser, Subcommand};
use jibjab::Config;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::decompile::DecompileArgs;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "jibjab")]
#[command(about = "Run JibJab target programs and read edited targets back")]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug). `JIBJAB_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Project root for `.jibjab/config.toml`
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompile target source into canonical JibJab
    Decompile(DecompileArgs),

    /// Build and run a target source file
    Run(RunArgs),

    /// List targets and whether their toolchains are installed
    Targets,
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env("JIBJAB_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
    let config = Config::load(&root);

    let exit_code = match cli.command {
        Commands::Decompile(args) => commands::decompile::cmd_decompile(&args, cli.json),
        Commands::Targets => commands::targets::cmd_targets(&config, cli.json),
        Commands::Run(args) => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("error: failed to start async runtime: {e}");
                    std::process::exit(1);
                }
            };
            let code = rt.block_on(commands::run::cmd_run(&args, &config, cli.json));
            // A stdin read may still be parked on the blocking pool.
            rt.shutdown_background();
            code
        }
    };

    std::process::exit(exit_code);
}
