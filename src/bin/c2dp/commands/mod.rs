mod convert;
mod split;

use convert::run_convert;
use split::run_split;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Convert(args) => run_convert(args, ctx),
        Command::Split(args) => run_split(args, ctx),
    }
}
