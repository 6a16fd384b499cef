//! The pass abstraction.

use crate::error::CompileResult;
use crate::options::CompilerOptions;
use hrimfax_ir::Kernel;
use hrimfax_platform::Platform;
use tracing::{debug, info};

/// Read-only state shared by all passes of one compilation.
pub struct PassContext<'a> {
    /// The target platform.
    pub platform: &'a Platform,
    /// The active option set.
    pub options: &'a CompilerOptions,
}

/// A kernel-to-kernel transformation.
pub trait Pass {
    /// Short pass name for reporting.
    fn name(&self) -> &'static str;

    /// Rewrite one kernel. Returns whether anything changed.
    fn run(&self, kernel: &mut Kernel, ctx: &PassContext<'_>) -> CompileResult<bool>;
}

/// Runs a pass list over every kernel in order.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// An empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass.
    pub fn push(&mut self, pass: Box<dyn Pass>) -> &mut Self {
        self.passes.push(pass);
        self
    }

    /// Names of the registered passes, in run order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass over every kernel.
    pub fn run(&self, kernels: &mut [Kernel], ctx: &PassContext<'_>) -> CompileResult<()> {
        for pass in &self.passes {
            let mut changed_any = false;
            for kernel in kernels.iter_mut() {
                let changed = pass.run(kernel, ctx)?;
                changed_any |= changed;
                debug!(pass = pass.name(), kernel = kernel.name(), changed, "pass done");
            }
            info!(pass = pass.name(), changed = changed_any, "pass complete");
        }
        Ok(())
    }
}
