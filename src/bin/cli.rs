use std::path::PathBuf;

use clap::{Parser, Subcommand};
use devfolio_core::cli::render::render_file;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Preview the rendering of a restricted-markup text file
    Render {
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Render { file } => match render_file(file) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                eprintln!("failed to render {}: {err}", file.display());
                std::process::exit(1);
            }
        },
    }
}
