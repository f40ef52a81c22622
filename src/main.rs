#[warn(clippy::pedantic, clippy::cargo)]
mod build;
mod collection;
mod config;
mod consts;
#[cfg(test)]
mod test;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::error;

use crate::build::{clean, run_build};
use crate::consts::SOCIALS;

#[derive(Parser)]
#[command(name = "rustaceanrob-site", about = "Typst portfolio site generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands
}

#[derive(Subcommand)]
enum Commands {
    /// Build the website
    Build {
        /// Minify the html output
        #[arg(short, long)]
        minify: bool,
        /// The root directory to build
        #[arg(short, long, default_value = "./")]
        dir: PathBuf
    },

    /// Cleans the directory, ie deletes the dist folder
    Clean {
        /// The root directory of the build to clean
        #[arg(short, long, default_value = "./")]
        dir: PathBuf
    },

    /// Print the social links in display order
    Socials
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { minify, dir } => run_build(dir, minify),
        Commands::Clean { dir } => clean(&dir),
        Commands::Socials => {
            for social in SOCIALS {
                println!("{} {}", social.name, social.href);
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
