use anyhow::Result;
use esirkepov_rs::{run, Config};

fn main() -> Result<()> {
    let cfg = Config::new()?;
    run(cfg)
}
