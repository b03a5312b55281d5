//! Spending standard coins: choosing which coins pay and turning that choice
//! into a signed bundle.

use log::debug;

use clvm_traits::ToClvm;
use clvmr::NodePtr;

use crate::common::constants::{
    ASSERT_COIN_ANNOUNCEMENT, CREATE_COIN, CREATE_COIN_ANNOUNCEMENT, RESERVE_FEE,
};
use crate::common::standard_coin::{standard_solution_partial, ChiaIdentity};
use crate::common::types::{
    Aggsig, AllocEncoder, Amount, CoinSpend, CoinString, Error, GetCoinStringParts, IntoErr,
    Node, PuzzleHash, Sha256Input, SpendBundle,
};
use crate::config::Network;

/// Message the lead coin announces so the others can tie themselves to it.
const SPEND_ANNOUNCEMENT: &[u8] = b"$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTarget {
    pub puzzle_hash: PuzzleHash,
    pub amount: Amount,
}

/// Coins chosen to pay for a set of outputs.  The first coin leads: it
/// creates every output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendPlan {
    pub coins: Vec<CoinString>,
    pub targets: Vec<TransferTarget>,
    pub change: Option<TransferTarget>,
    pub fee: Amount,
}

pub trait SpendPlanner {
    fn plan_spend(
        &self,
        coins: &[CoinString],
        targets: &[TransferTarget],
        change: &PuzzleHash,
        fee: Amount,
    ) -> Result<SpendPlan, Error>;

    fn build_bundle(
        &self,
        allocator: &mut AllocEncoder,
        plan: &SpendPlan,
        identities: &[ChiaIdentity],
        network: Network,
    ) -> Result<SpendBundle, Error>;
}

/// Plans and signs spends of coins locked by the standard puzzle.
#[derive(Debug, Clone, Default)]
pub struct StandardTransfer;

fn sum_amounts<'a, I: Iterator<Item = &'a Amount>>(amounts: I) -> Result<Amount, Error> {
    let mut total = Amount::default();
    for amount in amounts {
        total = total.checked_add(amount)?;
    }
    Ok(total)
}

fn lead_conditions(
    allocator: &mut AllocEncoder,
    plan: &SpendPlan,
    coin_count: usize,
) -> Result<NodePtr, Error> {
    let mut conditions = Vec::new();
    for target in plan.targets.iter().chain(plan.change.iter()) {
        conditions.push(
            (
                CREATE_COIN,
                (target.puzzle_hash.clone(), (target.amount.clone(), ())),
            )
                .to_clvm(allocator)
                .into_gen()?,
        );
    }
    if plan.fee.to_u64() > 0 {
        conditions.push(
            (RESERVE_FEE, (plan.fee.clone(), ()))
                .to_clvm(allocator)
                .into_gen()?,
        );
    }
    if coin_count > 1 {
        let message = allocator
            .allocator()
            .new_atom(SPEND_ANNOUNCEMENT)
            .into_gen()?;
        conditions.push(
            (CREATE_COIN_ANNOUNCEMENT, (Node(message), ()))
                .to_clvm(allocator)
                .into_gen()?,
        );
    }
    let nodes: Vec<Node> = conditions.into_iter().map(Node).collect();
    nodes.to_clvm(allocator).into_gen()
}

fn follower_conditions(
    allocator: &mut AllocEncoder,
    lead_coin: &CoinString,
) -> Result<NodePtr, Error> {
    let announcement = Sha256Input::Array(vec![
        Sha256Input::Bytes(lead_coin.to_coin_id().bytes()),
        Sha256Input::Bytes(SPEND_ANNOUNCEMENT),
    ])
    .hash();
    ((ASSERT_COIN_ANNOUNCEMENT, (announcement, ())), ())
        .to_clvm(allocator)
        .into_gen()
}

impl SpendPlanner for StandardTransfer {
    /// Largest coins first, ties broken by coin id, until the outputs and
    /// fee are covered.  Anything left over goes to `change`.
    fn plan_spend(
        &self,
        coins: &[CoinString],
        targets: &[TransferTarget],
        change: &PuzzleHash,
        fee: Amount,
    ) -> Result<SpendPlan, Error> {
        let needed = sum_amounts(targets.iter().map(|t| &t.amount))?.checked_add(&fee)?;

        let mut candidates = Vec::new();
        for coin in coins.iter() {
            let (_, _, amount) = coin.get_coin_string_parts()?;
            candidates.push((amount, coin.to_coin_id(), coin.clone()));
        }
        candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let available = sum_amounts(candidates.iter().map(|c| &c.0))?;

        let mut selected = Vec::new();
        let mut total = Amount::default();
        for (amount, _, coin) in candidates.into_iter() {
            if !selected.is_empty() && total >= needed {
                break;
            }
            total = total.checked_add(&amount)?;
            selected.push(coin);
        }

        if selected.is_empty() || total < needed {
            return Err(Error::InsufficientFunds(needed, available));
        }

        let change_amount = total - needed;
        let change = if change_amount.to_u64() > 0 {
            Some(TransferTarget {
                puzzle_hash: change.clone(),
                amount: change_amount,
            })
        } else {
            None
        };

        debug!(
            "planned spend of {} coins for {} outputs",
            selected.len(),
            targets.len()
        );
        Ok(SpendPlan {
            coins: selected,
            targets: targets.to_vec(),
            change,
            fee,
        })
    }

    fn build_bundle(
        &self,
        allocator: &mut AllocEncoder,
        plan: &SpendPlan,
        identities: &[ChiaIdentity],
        network: Network,
    ) -> Result<SpendBundle, Error> {
        let Some(lead_coin) = plan.coins.first() else {
            return Err(Error::StrErr("spend plan has no coins".to_string()));
        };
        let additional_data = network.agg_sig_me_additional_data();

        let mut signature = Aggsig::default();
        let mut coin_spends = Vec::new();
        for (i, coin) in plan.coins.iter().enumerate() {
            let (_, puzzle_hash, _) = coin.get_coin_string_parts()?;
            let Some(identity) = identities.iter().find(|id| id.puzzle_hash == puzzle_hash) else {
                return Err(Error::StrErr(format!(
                    "no key controls coin {}",
                    coin.to_coin_id().to_hex_0x()
                )));
            };

            let conditions = if i == 0 {
                lead_conditions(allocator, plan, plan.coins.len())?
            } else {
                follower_conditions(allocator, lead_coin)?
            };
            let (solution, coin_signature) = standard_solution_partial(
                allocator,
                &identity.synthetic_private_key,
                &coin.to_coin_id(),
                conditions,
                &additional_data,
            )?;
            signature += coin_signature;
            coin_spends.push(CoinSpend {
                coin: coin.clone(),
                puzzle_reveal: identity.puzzle.clone(),
                solution,
            });
        }

        Ok(SpendBundle {
            aggregated_signature: Some(signature),
            coin_spends,
        })
    }
}
