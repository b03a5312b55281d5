use log::debug;

use clvmr::{run_program, ChiaDialect, NO_UNKNOWN_OPS};

use crate::common::types::{AllocEncoder, Error, IntoErr, Program};

pub fn chia_dialect() -> ChiaDialect {
    ChiaDialect::new(NO_UNKNOWN_OPS)
}

/// Cost ceiling of a full block.
pub const DEFAULT_MAX_COST: u64 = 11_000_000_000;

/// Executes puzzles on behalf of the analyzer.
///
/// Results are always fully expanded serializations, so anything returned
/// can be handed straight back to `Program::to_nodeptr`.
pub trait PuzzleRunner {
    fn run(&self, program: &Program, args: &Program) -> Result<Program, Error>;
}

/// In process clvm execution.
#[derive(Debug, Clone)]
pub struct ClvmRunner {
    pub max_cost: u64,
}

impl Default for ClvmRunner {
    fn default() -> Self {
        ClvmRunner {
            max_cost: DEFAULT_MAX_COST,
        }
    }
}

impl ClvmRunner {
    pub fn new(max_cost: u64) -> Self {
        ClvmRunner { max_cost }
    }
}

impl PuzzleRunner for ClvmRunner {
    fn run(&self, program: &Program, args: &Program) -> Result<Program, Error> {
        let mut allocator = AllocEncoder::new();
        let program_node = program.to_nodeptr(&mut allocator)?;
        let args_node = args.to_nodeptr(&mut allocator)?;
        let reduction = run_program(
            allocator.allocator(),
            &chia_dialect(),
            program_node,
            args_node,
            self.max_cost,
        )
        .into_gen()?;
        debug!("run cost {}", reduction.0);
        Program::from_nodeptr(&mut allocator, reduction.1)
    }
}
