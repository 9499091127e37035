mod command;
mod input;
mod session;

fn main() -> anyhow::Result<()> {
    command::run()
}
