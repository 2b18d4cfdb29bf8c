use clap::Parser;
use invest_scenarios::cli::{Cli, error_json, execute};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match execute(Cli::parse()) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            println!("{}", error_json(&e));
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
