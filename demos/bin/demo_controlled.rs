//! Derives the controlled version of a payload kernel and compiles
//! both side by side.

use anyhow::Result;
use clap::Parser;
use hrimfax_compile::{CompilerOptions, Program};
use hrimfax_demos::{print_header, print_info, print_success, GRID_2X2};
use hrimfax_ir::{Kernel, QubitId};
use hrimfax_platform::Platform;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "demo-controlled", about = "Controlled-kernel derivation")]
struct Args {
    /// Output directory for the qasm files.
    #[arg(short, long, default_value = "test_output")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();

    print_header("Controlled-kernel demo");
    let platform = Platform::from_json_str("grid_2x2", GRID_2X2)?;

    let mut payload = Kernel::new("payload", 4, 0);
    payload.x(QubitId(1))?;
    payload.h(QubitId(2))?;
    payload.cnot(QubitId(1), QubitId(2))?;

    let mut controlled = Kernel::new("controlled_payload", 4, 0);
    controlled.controlled(&payload, &[QubitId(0)], &[QubitId(3)])?;
    print_info("payload gates", payload.instructions().len());
    print_info("controlled gates", controlled.instructions().len());

    let mut program = Program::new("controlled_demo", platform, 4, 0)?;
    program.add_kernel(payload)?;
    program.add_kernel(controlled)?;

    let mut options = CompilerOptions::default();
    options.output_dir = args.output_dir;
    options.set("use_default_gates", "yes")?;
    options.set("decompose_toffoli", "NC")?;
    let report = program.compile(&options)?;

    if let Some(path) = &report.scheduled_path {
        print_success(&format!("wrote {}", path.display()));
    }
    Ok(())
}
