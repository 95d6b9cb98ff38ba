mod command;
mod settings;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
