use serde::{Deserialize, Serialize};

use clvmr::allocator::NodePtr;

use clvm_traits::{ClvmEncoder, ToClvm, ToClvmError};

use crate::common::types::{AllocEncoder, Error, Program};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Puzzle(Program);

impl<E: ClvmEncoder<Node = NodePtr>> ToClvm<E> for Puzzle {
    fn to_clvm(&self, encoder: &mut E) -> Result<<E as ClvmEncoder>::Node, ToClvmError> {
        self.0.to_clvm(encoder)
    }
}

impl From<Program> for Puzzle {
    fn from(other: Program) -> Self {
        Puzzle(other)
    }
}

impl Puzzle {
    pub fn to_program(&self) -> &Program {
        &self.0
    }
    pub fn from_bytes(by: &[u8]) -> Puzzle {
        Puzzle(Program::from_bytes(by))
    }
    pub fn from_nodeptr(allocator: &mut AllocEncoder, node: NodePtr) -> Result<Puzzle, Error> {
        Ok(Puzzle(Program::from_nodeptr(allocator, node)?))
    }
    pub fn to_nodeptr(&self, allocator: &mut AllocEncoder) -> Result<NodePtr, Error> {
        self.0.to_nodeptr(allocator)
    }
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}
