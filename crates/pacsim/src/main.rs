use clap::Parser;
use color_eyre::eyre::eyre;
use pacsim::{Cli, execute, init_logging};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let outcome = execute(&cli.command)?;
    println!("{}", outcome.output);

    if outcome.success {
        Ok(())
    } else {
        Err(eyre!("scenario is invalid"))
    }
}
