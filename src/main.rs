use clap::Parser;
use vrc_cache_seed::cli;
use vrc_cache_seed::console::StdConsole;
use vrc_cache_seed::models::Args;

fn main() {
    let args = Args::parse();
    cli::init_logging(args.verbose);

    // Failures are reported on the console, the exit code stays 0
    let mut console = StdConsole::new();
    cli::run(&args, &mut console);
}
