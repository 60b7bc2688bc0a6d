//! ChocoPy checker CLI.

use choco_check::cli::{parse_args, print_usage, Invocation};
use choco_check::{check, init_tracing, CheckError, CheckerConfig, Reporter};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Invocation::Check(options)) => options,
        Ok(Invocation::Help) => {
            print_usage();
            return;
        }
        Err(CheckError::MissingStage) => {
            print_usage();
            std::process::exit(1);
        }
        Err(e @ CheckError::StageOutOfRange(_)) => {
            println!("{e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let mut config = CheckerConfig::from_env();
    options.apply(&mut config);

    let reporter = Reporter::stdout(config.verbose);
    match check(config, options.stage, &reporter) {
        Ok(summary) => std::process::exit(summary.exit_code()),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
