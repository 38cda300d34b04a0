use anyhow::Error;
use clap::{Parser, Subcommand};
use train::{TrainArgs, train};

pub mod train;

#[derive(Debug, Clone, Parser)]
pub struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Cmd {
    #[command(about = "Assemble a training job and hand it to the submission backend")]
    Train(TrainArgs),
}

pub fn handle_args(args: &Cli) -> Result<(), Error> {
    match args.cmd {
        Cmd::Train(ref train_args) => {
            train(train_args)?;
        }
    }
    Ok(())
}
