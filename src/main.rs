use anyhow::Result;
use clap::Parser;
use pkgpulse::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.execute()
}
