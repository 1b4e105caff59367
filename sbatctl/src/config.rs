use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = None,
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the SBAT metadata a PE image carries
    Inspect {
        /// Path to the image
        image: std::path::PathBuf,

        /// Print JSON instead of text
        #[clap(long)]
        json: bool,
    },

    /// Show the revocation list the platform enforces
    Revocations {
        /// Read the list from a file instead of the firmware
        #[clap(short, long)]
        input: Option<std::path::PathBuf>,

        /// Print JSON instead of text
        #[clap(long)]
        json: bool,
    },

    /// Check an image against the revocation list
    Check {
        /// Path to the image
        image: std::path::PathBuf,

        /// Read the list from a file instead of the firmware
        #[clap(short, long)]
        revocations: Option<std::path::PathBuf>,

        /// Print JSON instead of text
        #[clap(long)]
        json: bool,
    },
}

impl Args {
    pub fn new() -> Self {
        Self::parse()
    }
}
