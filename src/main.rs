use clap::Parser;
use declutter::cli::{Cli, init_tracing, run_cli};
use declutter::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run_cli(&cli) {
        OutputFormatter::error(&format!("Error: {}", e));
    }
}
