use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "horserace",
    about = "Generates a horse pool and a multi-round program and races it round by round"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    /// Stream the progress of every round from a simulator thread
    #[clap(short, long)]
    pub watch: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to a JSON store config (OPTIONAL: if not set, the reference program is used)
    #[clap(short, long)]
    pub config_path: Option<PathBuf>,

    /// Set seed for reproducible programs (OPTIONAL: if not set, seeded from entropy)
    #[clap(short, long)]
    pub seed: Option<u64>,

    /// Set simulation timestep size in seconds, should be in the range [0.001, 1.0]
    #[clap(short, long, default_value = "0.1")]
    pub timestep_size: f64,

    /// Set path for the results export, .json writes JSON, anything else CSV
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

impl SimOpts {
    /// check_timestep_size makes sure the timestep size is in the range [0.001, 1.0].
    pub fn check_timestep_size(&self) -> anyhow::Result<()> {
        if !(0.001..=1.0).contains(&self.timestep_size) {
            anyhow::bail!(
                "Timestep size must be in the range [0.001, 1.0], but is {}",
                self.timestep_size
            );
        }
        Ok(())
    }
}
