use serde::{Deserialize, Serialize};

use clvm_traits::{ClvmEncoder, ToClvm, ToClvmError};
use clvmr::allocator::NodePtr;

use crate::common::types::Hash;

/// CoinID
#[derive(Default, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CoinID(pub Hash);

impl CoinID {
    pub fn new(h: Hash) -> CoinID {
        CoinID(h)
    }
    pub fn bytes(&self) -> &[u8] {
        self.0.bytes()
    }
    pub fn to_hex_0x(&self) -> String {
        format!("0x{}", self.0.to_hex())
    }
}

impl<E: ClvmEncoder<Node = NodePtr>> ToClvm<E> for CoinID {
    fn to_clvm(&self, encoder: &mut E) -> Result<<E as ClvmEncoder>::Node, ToClvmError> {
        self.0.to_clvm(encoder)
    }
}
