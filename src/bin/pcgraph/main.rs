use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod display;
mod io;

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = cli::parse();
    let io_opts = cli.command.io();
    init_logging(io_opts.verbose, io_opts.quiet);
    let ctx = display::Context::detect().with_quiet(io_opts.quiet);

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
