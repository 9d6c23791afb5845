use clap::Parser;
use passvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so stdout stays pipe-friendly.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add {
            ref service,
            ref username,
            ref password,
            ref notes,
            generate,
            length,
        } => passvault::cli::commands::add::execute(
            &cli,
            service,
            username.as_deref(),
            password.as_deref(),
            notes.as_deref(),
            generate,
            length,
        ),
        Commands::List => passvault::cli::commands::list::execute(&cli),
        Commands::Show { ref query, copy } => {
            passvault::cli::commands::show::execute(&cli, query, copy)
        }
        Commands::Delete { ref query, force } => {
            passvault::cli::commands::delete::execute(&cli, query, force)
        }
        Commands::Generate { length, copy } => {
            passvault::cli::commands::generate::execute(length, copy)
        }
        Commands::Import { ref file } => passvault::cli::commands::import_cmd::execute(&cli, file),
        Commands::Export { ref output } => passvault::cli::commands::export::execute(&cli, output),
        Commands::Completions { ref shell } => {
            passvault::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
