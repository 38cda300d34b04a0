use anyhow::Error;
use clap::Parser;
use cmd::{Cli, handle_args};

mod cmd;

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Cli::parse();
    handle_args(&args)?;
    Ok(())
}
