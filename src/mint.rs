//! Issuing a new CAT whose tail is locked to a single genesis coin.

use log::{debug, info};

use clvm_traits::{clvm_curried_args, ToClvm};
use clvm_utils::CurriedProgram;
use clvmr::NodePtr;

use crate::common::constants::{CREATE_COIN, PLACEHOLDER_PUZZLE_HASH, RUN_TAIL_MAGIC, UNSAFE_MEMO_CHARS};
use crate::common::standard_coin::ChiaIdentity;
use crate::common::types::{
    AllocEncoder, Amount, CoinID, CoinSpend, CoinString, Error, IntoErr, Node, PrivateKey,
    Program, Puzzle, PuzzleHash, Sha256tree, SpendBundle,
};
use crate::config::Network;
use crate::runner::PuzzleRunner;
use crate::signing::{combine_spend_bundles, sign_coin_spends};
use crate::templates::{TemplateRegistry, CAT_V1, CAT_V2, GENESIS_BY_COIN_ID};
use crate::transfer::{SpendPlanner, TransferTarget};
use crate::utils::name_omit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatVersion {
    V1,
    #[default]
    V2,
}

impl CatVersion {
    pub fn template_name(&self) -> &'static str {
        match self {
            CatVersion::V1 => CAT_V1,
            CatVersion::V2 => CAT_V2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MintCatRequest {
    pub target: PuzzleHash,
    pub change: PuzzleHash,
    pub amount: Amount,
    pub fee: Amount,
    pub memo: String,
    pub coins: Vec<CoinString>,
    /// Signs the spend of the freshly created CAT coin.
    pub signing_key: PrivateKey,
    /// Owners of `coins`.
    pub identities: Vec<ChiaIdentity>,
    pub network: Network,
    pub cat_version: CatVersion,
}

#[derive(Debug, Clone)]
pub struct MintCatInfo {
    pub spend_bundle: SpendBundle,
    pub asset_id: PuzzleHash,
}

/// The puzzles a mint is built from.
#[derive(Debug, Clone)]
pub struct CatPuzzleInfo {
    pub inner_puzzle: Program,
    pub inner_puzzle_hash: PuzzleHash,
    pub cat_puzzle: Puzzle,
    pub cat_puzzle_hash: PuzzleHash,
    pub asset_id: PuzzleHash,
    pub bootstrap_coin: CoinID,
}

pub fn sanitize_memo(memo: &str) -> String {
    memo.chars()
        .map(|c| if UNSAFE_MEMO_CHARS.contains(c) { '_' } else { c })
        .collect()
}

/// `(q (51 () -113 TAIL ()) (51 TARGET AMOUNT (TARGET MEMO)))`
fn mint_inner_puzzle(
    allocator: &mut AllocEncoder,
    tail: NodePtr,
    target: &PuzzleHash,
    amount: &Amount,
    memo: &str,
) -> Result<NodePtr, Error> {
    let memos = if memo.is_empty() {
        (target.clone(), ()).to_clvm(allocator).into_gen()?
    } else {
        let memo_atom = allocator
            .allocator()
            .new_atom(memo.as_bytes())
            .into_gen()?;
        (target.clone(), (Node(memo_atom), ()))
            .to_clvm(allocator)
            .into_gen()?
    };
    let run_tail = (
        CREATE_COIN,
        ((), (RUN_TAIL_MAGIC, (Node(tail), ((), ())))),
    );
    let create_coin = (
        CREATE_COIN,
        (target.clone(), (amount.clone(), (Node(memos), ()))),
    );
    (1, (run_tail, (create_coin, ())))
        .to_clvm(allocator)
        .into_gen()
}

pub fn construct_cat_puzzle(
    allocator: &mut AllocEncoder,
    planner: &dyn SpendPlanner,
    registry: &TemplateRegistry,
    request: &MintCatRequest,
    memo: &str,
) -> Result<CatPuzzleInfo, Error> {
    let placeholder = [TransferTarget {
        puzzle_hash: PuzzleHash::from_hash(PLACEHOLDER_PUZZLE_HASH.clone()),
        amount: request.amount.clone(),
    }];
    let temp_plan = planner.plan_spend(
        &request.coins,
        &placeholder,
        &request.change,
        request.fee.clone(),
    )?;
    let Some(first_coin) = temp_plan.coins.first() else {
        return Err(Error::StrErr("no coin to bootstrap the mint".to_string()));
    };
    let bootstrap_coin = first_coin.to_coin_id();

    let tail = CurriedProgram {
        program: registry.program(GENESIS_BY_COIN_ID)?.clone(),
        args: clvm_curried_args!(bootstrap_coin.clone()),
    }
    .to_clvm(allocator)
    .into_gen()?;
    let asset_id = Node(tail).sha256tree(allocator);

    let inner = mint_inner_puzzle(allocator, tail, &request.target, &request.amount, memo)?;
    let inner_puzzle_hash = Node(inner).sha256tree(allocator);

    let cat_mod = registry.program(request.cat_version.template_name())?;
    let cat_mod_hash = cat_mod.sha256tree(allocator);
    let cat = CurriedProgram {
        program: cat_mod.clone(),
        args: clvm_curried_args!(cat_mod_hash, asset_id.clone(), Node(inner)),
    }
    .to_clvm(allocator)
    .into_gen()?;
    let cat_puzzle_hash = Node(cat).sha256tree(allocator);

    Ok(CatPuzzleInfo {
        inner_puzzle: Program::from_nodeptr(allocator, inner)?,
        inner_puzzle_hash,
        cat_puzzle: Puzzle::from_nodeptr(allocator, cat)?,
        cat_puzzle_hash,
        asset_id,
        bootstrap_coin,
    })
}

/// Standard spend paying `amount` into the new CAT puzzle hash.
pub fn construct_internal_bundle(
    allocator: &mut AllocEncoder,
    planner: &dyn SpendPlanner,
    request: &MintCatRequest,
    cat_puzzle_hash: &PuzzleHash,
) -> Result<SpendBundle, Error> {
    let targets = [TransferTarget {
        puzzle_hash: cat_puzzle_hash.clone(),
        amount: request.amount.clone(),
    }];
    let plan = planner.plan_spend(
        &request.coins,
        &targets,
        &request.change,
        request.fee.clone(),
    )?;
    planner.build_bundle(allocator, &plan, &request.identities, request.network)
}

/// Spend of the CAT coin the internal bundle creates, which runs the tail.
pub fn construct_external_bundle(
    allocator: &mut AllocEncoder,
    runner: &dyn PuzzleRunner,
    info: &CatPuzzleInfo,
    amount: &Amount,
    signing_key: &PrivateKey,
    network: Network,
) -> Result<SpendBundle, Error> {
    let coin = CoinString::from_parts(&info.bootstrap_coin, &info.cat_puzzle_hash, amount);
    let coin_name = coin.to_coin_id();

    let solution = (
        (),
        (
            (),
            (
                coin_name,
                (
                    (
                        info.bootstrap_coin.clone(),
                        (info.cat_puzzle_hash.clone(), (amount.clone(), ())),
                    ),
                    (
                        (
                            info.bootstrap_coin.clone(),
                            (info.inner_puzzle_hash.clone(), (amount.clone(), ())),
                        ),
                        ((), ((), ())),
                    ),
                ),
            ),
        ),
    )
        .to_clvm(allocator)
        .into_gen()?;

    let coin_spends = vec![CoinSpend {
        coin,
        puzzle_reveal: info.cat_puzzle.clone(),
        solution: Program::from_nodeptr(allocator, solution)?,
    }];
    let signature = sign_coin_spends(
        allocator,
        runner,
        &coin_spends,
        &[signing_key.clone()],
        &network.agg_sig_me_additional_data(),
    )?;
    Ok(SpendBundle {
        aggregated_signature: Some(signature),
        coin_spends,
    })
}

pub fn generate_mint_cat_bundle(
    runner: &dyn PuzzleRunner,
    planner: &dyn SpendPlanner,
    registry: &TemplateRegistry,
    request: &MintCatRequest,
) -> Result<MintCatInfo, Error> {
    let mut allocator = AllocEncoder::new();
    let memo = sanitize_memo(&request.memo);

    let info = construct_cat_puzzle(&mut allocator, planner, registry, request, &memo)?;
    info!(
        "minting cat {} from coin {}",
        name_omit(&info.asset_id.to_hex_0x(), "...", 10, true),
        info.bootstrap_coin.to_hex_0x()
    );

    let internal = construct_internal_bundle(&mut allocator, planner, request, &info.cat_puzzle_hash)?;
    let external = construct_external_bundle(
        &mut allocator,
        runner,
        &info,
        &request.amount,
        &request.signing_key,
        request.network,
    )?;
    let spend_bundle = combine_spend_bundles(&[internal, external])?;
    debug!("mint bundle has {} spends", spend_bundle.coin_spends.len());

    Ok(MintCatInfo {
        spend_bundle,
        asset_id: info.asset_id,
    })
}
