use clap::Parser;
use sessbound_cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().execute()
}
