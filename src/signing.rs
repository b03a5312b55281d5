//! Process wide signing state and the operations that depend on it.

use std::sync::OnceLock;

use log::{debug, info};

use crate::common::standard_coin::agg_sig_me_message;
use crate::common::types::{
    Aggsig, AllocEncoder, CoinCondition, CoinSpend, Error, Hash, PrivateKey, PublicKey,
    SpendBundle,
};
use crate::runner::PuzzleRunner;

const SELF_TEST_KEY: [u8; 32] = [1; 32];
const SELF_TEST_MESSAGE: &[u8] = b"chia spend analyzer self test";

/// Proof that the BLS backend works in this process.
#[derive(Debug, Clone)]
pub struct SigningContext {
    pub self_test_public_key: PublicKey,
}

static SIGNING_CONTEXT: OnceLock<SigningContext> = OnceLock::new();

fn self_test() -> Result<SigningContext, Error> {
    let private_key = PrivateKey::from_bytes(&SELF_TEST_KEY)?;
    let public_key = private_key.public_key();
    let signature = private_key.sign(SELF_TEST_MESSAGE);
    if !signature.verify(&public_key, SELF_TEST_MESSAGE) {
        return Err(Error::StrErr("BLS self test failed".to_string()));
    }
    Ok(SigningContext {
        self_test_public_key: public_key,
    })
}

/// Idempotent; only the first successful call does any work.
pub fn init_signing() -> Result<&'static SigningContext, Error> {
    if let Some(context) = SIGNING_CONTEXT.get() {
        return Ok(context);
    }
    let context = self_test()?;
    info!("signing initialized");
    Ok(SIGNING_CONTEXT.get_or_init(|| context))
}

pub fn signing_context() -> Result<&'static SigningContext, Error> {
    SIGNING_CONTEXT.get().ok_or(Error::SigningUninitialized)
}

fn key_for<'a>(keys: &'a [PrivateKey], public_key: &PublicKey) -> Result<&'a PrivateKey, Error> {
    keys.iter()
        .find(|k| k.public_key() == *public_key)
        .ok_or_else(|| {
            Error::StrErr(format!(
                "no private key for public key {}",
                hex::encode(public_key.bytes())
            ))
        })
}

/// Sign every AGG_SIG_ME and AGG_SIG_UNSAFE condition the spends produce.
pub fn sign_coin_spends(
    allocator: &mut AllocEncoder,
    runner: &dyn PuzzleRunner,
    coin_spends: &[CoinSpend],
    keys: &[PrivateKey],
    agg_sig_me_additional_data: &Hash,
) -> Result<Aggsig, Error> {
    signing_context()?;

    let mut signature = Aggsig::default();
    for spend in coin_spends.iter() {
        let conditions = CoinCondition::from_puzzle_and_solution(
            allocator,
            runner,
            spend.puzzle_reveal.to_program(),
            &spend.solution,
        )?;
        for condition in conditions.iter() {
            match condition {
                CoinCondition::AggSigMe(public_key, message) => {
                    let key = key_for(keys, public_key)?;
                    let full_message = agg_sig_me_message(
                        message,
                        &spend.coin.to_coin_id(),
                        agg_sig_me_additional_data,
                    );
                    signature += key.sign(&full_message);
                }
                CoinCondition::AggSigUnsafe(public_key, message) => {
                    let key = key_for(keys, public_key)?;
                    signature += key.sign(message);
                }
                CoinCondition::CreateCoin(..) => {}
            }
        }
    }
    Ok(signature)
}

/// Merge bundles into one.  Bundles that were never signed are left out
/// entirely; the rest contribute their spends in order and their
/// signatures to the aggregate.
pub fn combine_spend_bundles(bundles: &[SpendBundle]) -> Result<SpendBundle, Error> {
    signing_context()?;

    let mut aggregated_signature = Aggsig::default();
    let mut coin_spends = Vec::new();
    for bundle in bundles.iter() {
        let Some(signature) = &bundle.aggregated_signature else {
            continue;
        };
        aggregated_signature += signature.clone();
        coin_spends.extend(bundle.coin_spends.iter().cloned());
    }

    debug!(
        "combined {} bundles into {} spends",
        bundles.len(),
        coin_spends.len()
    );
    Ok(SpendBundle {
        aggregated_signature: Some(aggregated_signature),
        coin_spends,
    })
}
