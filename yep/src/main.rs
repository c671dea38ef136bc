mod cli;
mod commands;
mod error;
mod util;

use structopt::StructOpt;
use tracing::Level;

use cli::{CliOpts, Commands};

fn run(opts: CliOpts) -> error::Result<()> {
    match opts.cmd {
        Commands::Pack(args) => commands::pack(args, opts.verbose),
        Commands::List(args) => commands::list(args),
        Commands::Extract(args) => commands::extract(args),
    }
}

fn init_logging(verbose: bool, to_stdout: bool) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false);

    if to_stdout {
        builder.with_writer(std::io::stdout).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
}

fn main() {
    let opts = CliOpts::from_iter(wild::args_os());
    init_logging(opts.verbose, opts.cmd.logs_to_stdout());

    if let Err(e) = run(opts) {
        tracing::error!("{}", util::error_chain(&e));
        std::process::exit(1);
    }
}
