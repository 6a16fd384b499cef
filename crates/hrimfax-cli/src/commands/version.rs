//! `hrimfax version`

use anyhow::Result;
use console::style;

pub fn run() -> Result<()> {
    println!(
        "{} {}",
        style("hrimfax").green().bold(),
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}
