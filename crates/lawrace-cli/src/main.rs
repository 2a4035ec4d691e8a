mod cache;
mod command;
mod util;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    command::run()
}
