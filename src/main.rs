use anyhow::Result;
use clap::Parser;
use labelplot::cli::Cli;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // Parse command-line arguments; a wrong argument count exits here with the usage line
    let cli = Cli::parse();

    let default_filter = if cli.debug { "labelplot=debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // Run the main application logic from the library
    match labelplot::run(&cli) {
        Ok(path) => println!("Plot saved to: {}", path.display()),
        Err(e) => {
            eprintln!("Error during plotting: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
