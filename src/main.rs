use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use helmflat::HelmflatError;
use helmflat::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, HelmflatError> {
    let builder = cli.builder();
    match cli.command {
        Commands::Flatten(args) => {
            let run = args.apply(builder).run(&args.file)?;
            print!("{}", run.rendered);
            for problem in &run.flattening.problems {
                eprintln!("warning: {problem}");
            }
            if run.failed() {
                return Ok(ExitCode::from(2));
            }
        }
        Commands::Config(args) => builder.handle_and_print(&args.into_action())?,
    }
    Ok(ExitCode::SUCCESS)
}

/// `HELMFLAT_LOG` wins over `-v`; without either only warnings are shown.
fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("HELMFLAT_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
