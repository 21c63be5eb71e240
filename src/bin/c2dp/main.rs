use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod display;
mod io;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();
    util::logging::init(cli.verbose);

    let ctx = display::Context::detect().with_quiet(match &cli.command {
        cli::Command::Convert(args) => args.output.quiet,
        cli::Command::Split(args) => args.output.quiet,
    });

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
