use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, demo::DemoArg, train::TrainArg};

mod auto_play;
mod demo;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve evaluator weights by self-play and save them as a model
    Train(#[clap(flatten)] TrainArg),
    /// Play one headless game with the AI and print the result
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Run a real-time demo game driven by the AI
    Demo(#[clap(flatten)] DemoArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Demo(arg) => demo::run(&arg)?,
    }
    Ok(())
}
