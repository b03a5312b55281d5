use num_bigint::{BigInt, Sign};
use num_traits::Signed;

use clvm_traits::{clvm_curried_args, ToClvm};
use clvm_utils::CurriedProgram;

use clvmr::NodePtr;

use crate::common::constants::{
    DEFAULT_HIDDEN_PUZZLE_HEX, GROUP_ORDER, P2_DELEGATED_PUZZLE_OR_HIDDEN_PUZZLE_HEX,
};
use crate::common::load_clvm::puzzle_from_static_hex;
use crate::common::types::{
    Aggsig, AllocEncoder, CoinID, Error, Hash, IntoErr, PrivateKey, Program, PublicKey, Puzzle,
    PuzzleHash, Sha256Input, Sha256tree, ToQuotedProgram,
};

pub fn get_standard_coin_puzzle(allocator: &mut AllocEncoder) -> Result<Puzzle, Error> {
    puzzle_from_static_hex(allocator, P2_DELEGATED_PUZZLE_OR_HIDDEN_PUZZLE_HEX)
}

pub fn get_default_hidden_puzzle(allocator: &mut AllocEncoder) -> Result<Puzzle, Error> {
    puzzle_from_static_hex(allocator, DEFAULT_HIDDEN_PUZZLE_HEX)
}

pub fn get_default_hidden_puzzle_hash(allocator: &mut AllocEncoder) -> Result<PuzzleHash, Error> {
    let hidden = get_default_hidden_puzzle(allocator)?;
    Ok(hidden.sha256tree(allocator))
}

fn group_order_int() -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &GROUP_ORDER)
}

/// The hash is read as a signed integer, then reduced into the group.
pub fn calculate_synthetic_offset(
    public_key: &PublicKey,
    hidden_puzzle_hash: &PuzzleHash,
) -> Result<PrivateKey, Error> {
    let blob = Sha256Input::Array(vec![
        Sha256Input::Bytes(&public_key.bytes()),
        Sha256Input::Bytes(hidden_puzzle_hash.bytes()),
    ])
    .hash();
    let group_order = group_order_int();
    let mut offset = BigInt::from_signed_bytes_be(blob.bytes()) % &group_order;
    if offset.is_negative() {
        offset += &group_order;
    }

    let (_, offset_bytes) = offset.to_bytes_be();
    let mut private_key_bytes: [u8; 32] = [0; 32];
    let start = 32 - offset_bytes.len();
    private_key_bytes[start..].copy_from_slice(&offset_bytes);
    PrivateKey::from_bytes(&private_key_bytes)
}

pub fn calculate_synthetic_public_key(
    public_key: &PublicKey,
    hidden_puzzle_hash: &PuzzleHash,
) -> Result<PublicKey, Error> {
    let offset = calculate_synthetic_offset(public_key, hidden_puzzle_hash)?;
    Ok(public_key.clone() + offset.public_key())
}

pub fn calculate_synthetic_secret_key(
    secret_key: &PrivateKey,
    hidden_puzzle_hash: &PuzzleHash,
) -> Result<PrivateKey, Error> {
    let offset = calculate_synthetic_offset(&secret_key.public_key(), hidden_puzzle_hash)?;
    Ok(secret_key.clone() + offset)
}

pub fn puzzle_for_synthetic_public_key(
    allocator: &mut AllocEncoder,
    standard_coin_puzzle: &Puzzle,
    synthetic_public_key: &PublicKey,
) -> Result<Puzzle, Error> {
    let curried_program = CurriedProgram {
        program: standard_coin_puzzle.clone(),
        args: clvm_curried_args!(synthetic_public_key.clone()),
    };
    let nodeptr = curried_program.to_clvm(allocator).into_gen()?;
    Puzzle::from_nodeptr(allocator, nodeptr)
}

pub fn puzzle_for_pk(allocator: &mut AllocEncoder, public_key: &PublicKey) -> Result<Puzzle, Error> {
    let hidden_puzzle_hash = get_default_hidden_puzzle_hash(allocator)?;
    let synthetic_public_key = calculate_synthetic_public_key(public_key, &hidden_puzzle_hash)?;
    let standard_coin_puzzle = get_standard_coin_puzzle(allocator)?;
    puzzle_for_synthetic_public_key(allocator, &standard_coin_puzzle, &synthetic_public_key)
}

pub fn puzzle_hash_for_pk(
    allocator: &mut AllocEncoder,
    public_key: &PublicKey,
) -> Result<PuzzleHash, Error> {
    let puzzle = puzzle_for_pk(allocator, public_key)?;
    Ok(puzzle.sha256tree(allocator))
}

/// What an AGG_SIG_ME signature actually covers.
pub fn agg_sig_me_message(raw_message: &[u8], coin: &CoinID, additional_data: &Hash) -> Vec<u8> {
    let mut message = raw_message.to_vec();
    message.extend_from_slice(coin.bytes());
    message.extend_from_slice(additional_data.bytes());
    message
}

pub fn sign_agg_sig_me(
    secret_key: &PrivateKey,
    message: &[u8],
    parent_coin: &CoinID,
    agg_sig_me_additional_data: &Hash,
) -> Aggsig {
    secret_key.sign(agg_sig_me_message(
        message,
        parent_coin,
        agg_sig_me_additional_data,
    ))
}

/// `(() (q . conditions) ())`: spend the standard puzzle through a delegated
/// puzzle that just returns the conditions.
pub fn solution_for_conditions(
    allocator: &mut AllocEncoder,
    conditions: NodePtr,
) -> Result<NodePtr, Error> {
    let delegated_puzzle = conditions.to_quoted_program(allocator)?;
    ((), (delegated_puzzle, ((), ())))
        .to_clvm(allocator)
        .into_gen()
}

/// Standard solution for the conditions and the signature the standard
/// puzzle will demand for them.
pub fn standard_solution_partial(
    allocator: &mut AllocEncoder,
    synthetic_private_key: &PrivateKey,
    parent_coin: &CoinID,
    conditions: NodePtr,
    agg_sig_me_additional_data: &Hash,
) -> Result<(Program, Aggsig), Error> {
    let quoted_conditions = conditions.to_quoted_program(allocator)?;
    let quoted_conditions_hash = quoted_conditions.sha256tree(allocator);
    let solution = solution_for_conditions(allocator, conditions)?;
    let signature = sign_agg_sig_me(
        synthetic_private_key,
        quoted_conditions_hash.bytes(),
        parent_coin,
        agg_sig_me_additional_data,
    );
    Ok((Program::from_nodeptr(allocator, solution)?, signature))
}

pub fn private_to_public_key(private_key: &PrivateKey) -> PublicKey {
    private_key.public_key()
}

/// A key together with the standard puzzle it controls.
#[derive(Clone, Debug)]
pub struct ChiaIdentity {
    pub private_key: PrivateKey,
    pub synthetic_private_key: PrivateKey,
    pub public_key: PublicKey,
    pub synthetic_public_key: PublicKey,
    pub puzzle: Puzzle,
    pub puzzle_hash: PuzzleHash,
}

impl ChiaIdentity {
    pub fn new(allocator: &mut AllocEncoder, private_key: PrivateKey) -> Result<Self, Error> {
        let hidden_puzzle_hash = get_default_hidden_puzzle_hash(allocator)?;
        let synthetic_private_key = calculate_synthetic_secret_key(&private_key, &hidden_puzzle_hash)?;
        let public_key = private_to_public_key(&private_key);
        let synthetic_public_key = private_to_public_key(&synthetic_private_key);
        let standard_coin_puzzle = get_standard_coin_puzzle(allocator)?;
        let puzzle =
            puzzle_for_synthetic_public_key(allocator, &standard_coin_puzzle, &synthetic_public_key)?;
        let puzzle_hash = puzzle.sha256tree(allocator);
        Ok(ChiaIdentity {
            private_key,
            synthetic_private_key,
            public_key,
            synthetic_public_key,
            puzzle,
            puzzle_hash,
        })
    }
}
