//! Reading the coin spends out of a block generator.

use log::debug;
use serde::{Deserialize, Serialize};

use clvm_traits::ToClvm;
use clvmr::NodePtr;

use crate::common::types::{
    check_for_hex, AllocEncoder, Amount, CoinID, CoinString, Error, Hash, IntoErr, Node, Program, PuzzleHash,
    Sha256tree,
};
use crate::decompile::key_param::key_param;
use crate::decompile::nft::{nft_metadata, NftMetadata};
use crate::decompile::{mods_path, simplify_puzzle, SimplifiedPuzzle};
use crate::runner::PuzzleRunner;
use crate::templates::{TemplateRegistry, GENERATOR};
use crate::utils::{map_m, proper_list};

/// Everything the analyzer can say about one coin spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinInfo {
    pub parent: String,
    pub puzzle: String,
    pub parsed_puzzle: SimplifiedPuzzle,
    pub amount: String,
    pub solution: String,
    pub coin_name: String,
    pub mods: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_param: Option<String>,
    /// Present for NFT singletons whose metadata carries a uri and hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft_metadata: Option<NftMetadata>,
}

/// Run a block generator and return its output: a list whose first element
/// is the list of `(parent puzzle amount solution)` spends.
///
/// Generators that reference earlier blocks are run through the `generator`
/// template, which receives `(generator ((ref ...)))`.  Others are run
/// directly against `(())`.
pub fn parse_block(
    runner: &dyn PuzzleRunner,
    registry: &TemplateRegistry,
    generator: &Program,
    refs: &[Vec<u8>],
) -> Result<Program, Error> {
    if refs.is_empty() {
        let mut allocator = AllocEncoder::new();
        let env = ((), ()).to_clvm(&mut allocator).into_gen()?;
        let env_program = Program::from_nodeptr(&mut allocator, env)?;
        return runner.run(generator, &env_program);
    }

    let mut allocator = AllocEncoder::new();
    let generator_node = generator.to_nodeptr(&mut allocator)?;
    let ref_nodes = map_m(
        |r: &Vec<u8>| -> Result<Node, Error> {
            Ok(Node(allocator.allocator().new_atom(r).into_gen()?))
        },
        refs,
    )?;
    let args = (Node(generator_node), ((ref_nodes, ()), ()))
        .to_clvm(&mut allocator)
        .into_gen()?;
    let args_program = Program::from_nodeptr(&mut allocator, args)?;
    debug!("running block with {} back references", refs.len());
    runner.run(registry.program(GENERATOR)?, &args_program)
}

/// Build the `CoinInfo` for a `(parent puzzle amount solution)` node.
pub fn parse_coin(
    allocator: &mut AllocEncoder,
    registry: &TemplateRegistry,
    spend: NodePtr,
) -> Result<CoinInfo, Error> {
    let parts = proper_list(allocator.allocator_ref(), spend, true)
        .ok_or_else(|| Error::StrErr("coin spend is not a list".to_string()))?;
    if parts.len() < 4 {
        return Err(Error::StrErr(format!(
            "coin spend has {} elements, expected 4",
            parts.len()
        )));
    }

    let parent = CoinID::new(Hash::from_nodeptr(allocator, parts[0])?);
    let puzzle = parts[1];
    let amount = Amount::from_clvm(allocator, parts[2])?;

    let puzzle_hex = Node(puzzle).to_hex(allocator)?;
    let solution_hex = Node(parts[3]).to_hex(allocator)?;
    let puzzle_hash: PuzzleHash = Node(puzzle).sha256tree(allocator);
    let coin_name = CoinString::from_parts(&parent, &puzzle_hash, &amount).to_coin_id();

    let parsed_puzzle = simplify_puzzle(allocator, registry, puzzle);
    let mods = mods_path(&parsed_puzzle);
    let key_param = key_param(&parsed_puzzle);
    let metadata = nft_metadata(allocator, registry, puzzle);

    Ok(CoinInfo {
        parent: parent.to_hex_0x(),
        puzzle: format!("0x{puzzle_hex}"),
        parsed_puzzle,
        amount: amount.to_u64().to_string(),
        solution: format!("0x{solution_hex}"),
        coin_name: coin_name.to_hex_0x(),
        mods,
        key_param,
        nft_metadata: metadata,
    })
}

/// Coin infos for every spend in an executed block, in block order.
pub fn parse_block_coins(
    registry: &TemplateRegistry,
    block_result: &Program,
) -> Result<Vec<CoinInfo>, Error> {
    let mut allocator = AllocEncoder::new();
    let result = block_result.to_nodeptr(&mut allocator)?;
    let outputs = proper_list(allocator.allocator_ref(), result, true)
        .ok_or_else(|| Error::StrErr("block result is not a list".to_string()))?;
    let Some(spend_list) = outputs.first() else {
        return Err(Error::StrErr("block result is empty".to_string()));
    };
    let spends = proper_list(allocator.allocator_ref(), *spend_list, true)
        .ok_or_else(|| Error::StrErr("block spends are not a list".to_string()))?;

    let coins = map_m(
        |spend: &NodePtr| parse_coin(&mut allocator, registry, *spend),
        &spends,
    )?;
    debug!("generated {} coins", coins.len());
    Ok(coins)
}

/// Hex generator and reference blocks in, coin infos out.
pub fn analyze_block(
    runner: &dyn PuzzleRunner,
    registry: &TemplateRegistry,
    generator_hex: &str,
    ref_hex_list: &[String],
) -> Result<Vec<CoinInfo>, Error> {
    let generator = Program::from_hex(generator_hex)?;
    let refs = map_m(|r: &String| check_for_hex(r.trim()), ref_hex_list)?;
    let block_result = parse_block(runner, registry, &generator, &refs)?;
    parse_block_coins(registry, &block_result)
}
