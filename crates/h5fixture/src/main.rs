//! Writes the default fixture profile to `test.hdf5` in the working directory.

use anyhow::{Context, Result};
use h5fixture::{FixtureProfile, DEFAULT_OUTPUT};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let profile = FixtureProfile::default();
    profile
        .write_to(DEFAULT_OUTPUT)
        .with_context(|| format!("writing {profile} fixture to {DEFAULT_OUTPUT}"))?;
    Ok(())
}
