use log::debug;

use clvmr::allocator::{NodePtr, SExp};

use crate::utils::proper_list;

use crate::common::constants::{AGG_SIG_ME_ATOM, AGG_SIG_UNSAFE_ATOM, CREATE_COIN_ATOM};

use crate::common::types::{
    u64_from_atom, AllocEncoder, Amount, Error, Hash, Program, PublicKey, PuzzleHash,
};
use crate::runner::PuzzleRunner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoinCondition {
    AggSigMe(PublicKey, Vec<u8>),
    AggSigUnsafe(PublicKey, Vec<u8>),
    CreateCoin(PuzzleHash, Amount, Vec<Vec<u8>>),
}

fn atoms_of(allocator: &AllocEncoder, nodes: &[NodePtr]) -> Option<Vec<Vec<u8>>> {
    nodes
        .iter()
        .map(|n| match allocator.allocator_ref().sexp(*n) {
            SExp::Atom => Some(allocator.allocator_ref().atom(*n).to_vec()),
            _ => None,
        })
        .collect()
}

/// An AGG_SIG naming a malformed key is an error, not a skipped condition.
fn agg_sig_key(opcode: &str, key: &[u8]) -> Result<PublicKey, Error> {
    PublicKey::from_slice(key).map_err(|e| {
        Error::StrErr(format!(
            "{opcode} with bad public key {}: {e:?}",
            hex::encode(key)
        ))
    })
}

fn parse_condition(
    allocator: &AllocEncoder,
    condition: NodePtr,
) -> Result<Option<CoinCondition>, Error> {
    let Some(exploded) = proper_list(allocator.allocator_ref(), condition, true) else {
        return Ok(None);
    };
    if exploded.len() < 3 {
        return Ok(None);
    }

    let Some(atoms) = atoms_of(allocator, &exploded[..3]) else {
        return Ok(None);
    };
    if atoms[0] == AGG_SIG_UNSAFE_ATOM {
        let pk = agg_sig_key("AGG_SIG_UNSAFE", &atoms[1])?;
        return Ok(Some(CoinCondition::AggSigUnsafe(pk, atoms[2].to_vec())));
    } else if atoms[0] == AGG_SIG_ME_ATOM {
        let pk = agg_sig_key("AGG_SIG_ME", &atoms[1])?;
        return Ok(Some(CoinCondition::AggSigMe(pk, atoms[2].to_vec())));
    } else if atoms[0] == CREATE_COIN_ATOM {
        let Some(amt) = u64_from_atom(&atoms[2]) else {
            return Ok(None);
        };
        let memos = exploded
            .get(3)
            .and_then(|m| proper_list(allocator.allocator_ref(), *m, true))
            .and_then(|m| atoms_of(allocator, &m))
            .unwrap_or_default();
        return Ok(Some(CoinCondition::CreateCoin(
            PuzzleHash::from_hash(Hash::from_slice(&atoms[1])),
            Amount::new(amt),
            memos,
        )));
    }

    Ok(None)
}

impl CoinCondition {
    /// Conditions this crate acts on; anything else in the list is skipped.
    pub fn from_nodeptr(
        allocator: &AllocEncoder,
        conditions: NodePtr,
    ) -> Result<Vec<CoinCondition>, Error> {
        let Some(exploded) = proper_list(allocator.allocator_ref(), conditions, true) else {
            return Ok(Vec::new());
        };
        let mut result = Vec::new();
        for cond in exploded.iter() {
            if let Some(parsed) = parse_condition(allocator, *cond)? {
                result.push(parsed);
            }
        }
        Ok(result)
    }

    pub fn from_puzzle_and_solution(
        allocator: &mut AllocEncoder,
        runner: &dyn PuzzleRunner,
        puzzle: &Program,
        solution: &Program,
    ) -> Result<Vec<CoinCondition>, Error> {
        let conditions = runner.run(puzzle, solution)?;
        debug!("conditions to parse {}", conditions.to_hex());
        let conditions_node = conditions.to_nodeptr(allocator)?;
        CoinCondition::from_nodeptr(allocator, conditions_node)
    }
}
