use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use num_bigint::BigInt;
use num_traits::cast::ToPrimitive;

use rand::distributions::Standard;
use rand::prelude::*;

use clvm_traits::{ClvmEncoder, ToClvm, ToClvmError};
use clvmr::allocator::NodePtr;

use crate::common::types::{atom_from_clvm, AllocEncoder, CoinID, Error, Hash};

pub fn u64_from_atom(a: &[u8]) -> Option<u64> {
    let bi = BigInt::from_signed_bytes_be(a);
    bi.to_u64()
}

/// Minimal two's complement encoding clvm uses for integers.  Zero is the
/// empty atom.
pub fn canonical_amount_bytes(amount: u64) -> Vec<u8> {
    if amount == 0 {
        return Vec::new();
    }
    BigInt::from(amount).to_signed_bytes_be()
}

/// Amount
#[derive(Default, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
pub struct Amount(u64);

impl Amount {
    pub fn new(amt: u64) -> Amount {
        Amount(amt)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }

    pub fn from_clvm(allocator: &AllocEncoder, clvm: NodePtr) -> Result<Amount, Error> {
        if let Some(val) = atom_from_clvm(allocator, clvm).and_then(|a| u64_from_atom(&a)) {
            Ok(Amount::new(val))
        } else {
            Err(Error::StrErr("bad amount".to_string()))
        }
    }

    pub fn checked_add(&self, other: &Amount) -> Result<Amount, Error> {
        self.0
            .checked_add(other.0)
            .map(Amount::new)
            .ok_or_else(|| Error::StrErr("amount overflow".to_string()))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(mut self, rhs: Self) -> Amount {
        self += rhs;
        self
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(mut self, rhs: Self) -> Amount {
        self -= rhs;
        self
    }
}

impl<E: ClvmEncoder<Node = NodePtr>> ToClvm<E> for Amount {
    fn to_clvm(&self, encoder: &mut E) -> Result<<E as ClvmEncoder>::Node, ToClvmError> {
        self.0.to_clvm(encoder)
    }
}

impl From<Amount> for u64 {
    fn from(amt: Amount) -> Self {
        amt.0
    }
}

/// Puzzle hash
#[derive(Default, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct PuzzleHash(Hash);

impl PuzzleHash {
    pub fn from_bytes(by: [u8; 32]) -> PuzzleHash {
        PuzzleHash(Hash::from_bytes(by))
    }
    pub fn from_hash(h: Hash) -> PuzzleHash {
        PuzzleHash(h)
    }
    pub fn from_hex(s: &str) -> Result<PuzzleHash, Error> {
        Ok(PuzzleHash(Hash::from_hex(s)?))
    }
    pub fn bytes(&self) -> &[u8] {
        self.0.bytes()
    }
    pub fn hash(&self) -> &Hash {
        &self.0
    }
    pub fn to_hex_0x(&self) -> String {
        format!("0x{}", self.0.to_hex())
    }
}

impl Distribution<PuzzleHash> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PuzzleHash {
        PuzzleHash::from_hash(rng.gen())
    }
}

impl<E: ClvmEncoder<Node = NodePtr>> ToClvm<E> for PuzzleHash {
    fn to_clvm(&self, encoder: &mut E) -> Result<<E as ClvmEncoder>::Node, ToClvmError> {
        encoder.encode_atom(clvm_traits::Atom::Borrowed(&self.0 .0))
    }
}

/// Coin String
///
/// `parent ++ puzzle_hash ++ amount` with the amount in canonical clvm
/// integer form.  Hashing it gives the coin id the ledger uses.
#[derive(Default, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct CoinString(Vec<u8>);

impl std::fmt::Debug for CoinString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(formatter, "{:?}", self.to_parts())
    }
}

impl CoinString {
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_parts(parent: &CoinID, puzzle_hash: &PuzzleHash, amount: &Amount) -> CoinString {
        let mut res = Vec::new();
        res.extend_from_slice(parent.bytes());
        res.extend_from_slice(puzzle_hash.bytes());
        res.append(&mut canonical_amount_bytes(amount.to_u64()));
        CoinString(res)
    }

    pub fn to_parts(&self) -> Option<(CoinID, PuzzleHash, Amount)> {
        if self.0.len() < 64 {
            return None;
        }

        let parent_id = CoinID::new(Hash::from_slice(&self.0[..32]));
        let puzzle_hash = PuzzleHash::from_hash(Hash::from_slice(&self.0[32..64]));
        let amount_bytes = &self.0[64..];
        u64_from_atom(amount_bytes).map(|a| (parent_id, puzzle_hash, Amount::new(a)))
    }

    pub fn to_coin_id(&self) -> CoinID {
        CoinID(Hash::new(&self.0))
    }
}

pub trait GetCoinStringParts {
    type Res;

    /// Return an error if the optional coin string is improper.
    fn get_coin_string_parts(&self) -> Result<Self::Res, Error>;
}

impl GetCoinStringParts for CoinString {
    type Res = (CoinID, PuzzleHash, Amount);
    fn get_coin_string_parts(&self) -> Result<Self::Res, Error> {
        if let Some((id, ph, amt)) = self.to_parts() {
            Ok((id, ph, amt))
        } else {
            Err(Error::StrErr("improper coin string".to_string()))
        }
    }
}
