//! `hrimfax platform`

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use hrimfax_platform::Platform;
use std::path::PathBuf;

#[derive(Args)]
pub struct PlatformArgs {
    /// Platform configuration JSON.
    pub config: PathBuf,

    /// Also list every instruction with its duration.
    #[arg(long)]
    pub instructions: bool,
}

pub fn run(args: PlatformArgs) -> Result<()> {
    let name = args
        .config
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "platform".to_string());
    let platform = Platform::from_file(&name, &args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    println!("{} {}", style("platform").green().bold(), platform.name());
    println!("  qubits:     {}", platform.qubit_count());
    println!("  cycle time: {} ns", platform.cycle_time());
    if let Some(compiler) = platform.eqasm_compiler() {
        println!("  backend:    {compiler}");
    }
    if let Some(topology) = platform.topology() {
        println!(
            "  topology:   {}x{} grid, {} edges",
            topology.x_size,
            topology.y_size,
            topology.edges.len()
        );
    }
    if !platform.resources().is_empty() {
        let names: Vec<&str> = platform.resources().keys().map(String::as_str).collect();
        println!("  resources:  {}", names.join(", "));
    }
    if args.instructions {
        println!("  {}", style("instructions:").dim());
        for (key, def) in platform.instructions() {
            println!("    {key}: {} ns", def.duration);
        }
    }
    Ok(())
}
