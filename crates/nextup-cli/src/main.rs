use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nextup-cli", version, about = "Nextup CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Recommend the one task to do now
    Recommend(commands::recommend::RecommendArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Recommend(args) => commands::recommend::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
