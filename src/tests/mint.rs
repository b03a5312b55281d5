use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::common::standard_coin::{agg_sig_me_message, ChiaIdentity};
use crate::common::types::{
    AllocEncoder, Amount, CoinCondition, CoinID, CoinString, GetCoinStringParts, Node, PuzzleHash,
    Sha256tree,
};
use crate::config::Network;
use crate::decompile::key_param::key_param;
use crate::decompile::simplify_program;
use crate::mint::{generate_mint_cat_bundle, sanitize_memo, CatVersion, MintCatRequest};
use crate::runner::ClvmRunner;
use crate::signing::init_signing;
use crate::templates::{CAT_V2, GENESIS_BY_COIN_ID};
use crate::tests::{atom_tree_hash, curried_tree_hash, curry_nodes, fixture_registry, template_node};
use crate::transfer::StandardTransfer;

#[test]
fn test_sanitize_memo() {
    assert_eq!(sanitize_memo("my token"), "my_token");
    assert_eq!(sanitize_memo("a&b/c\\d#e,f+g(h)i$j~k%l.m'n\"o:p*q?r<s>t{u}v[w]"), "a_b_c_d_e_f_g_h_i_j_k_l_m_n_o_p_q_r_s_t_u_v_w_");
    assert_eq!(sanitize_memo("plain-memo_1"), "plain-memo_1");
}

#[test]
fn test_cat_version_default() {
    assert_eq!(CatVersion::default(), CatVersion::V2);
}

#[test]
fn test_mint_cat_end_to_end() {
    init_signing().expect("should init");
    let mut rng = ChaCha8Rng::from_seed([9; 32]);
    let mut allocator = AllocEncoder::new();
    let registry = fixture_registry();
    let identity = ChiaIdentity::new(&mut allocator, rng.gen()).expect("identity");
    let coins: Vec<CoinString> = [300, 5000]
        .iter()
        .map(|amt| {
            CoinString::from_parts(
                &CoinID::new(rng.gen()),
                &identity.puzzle_hash,
                &Amount::new(*amt),
            )
        })
        .collect();
    let target: PuzzleHash = rng.gen();

    let request = MintCatRequest {
        target: target.clone(),
        change: identity.puzzle_hash.clone(),
        amount: Amount::new(1000),
        fee: Amount::new(10),
        memo: "my token".to_string(),
        coins: coins.clone(),
        signing_key: identity.private_key.clone(),
        identities: vec![identity.clone()],
        network: Network::Testnet11,
        cat_version: CatVersion::default(),
    };
    let runner = ClvmRunner::default();
    let info = generate_mint_cat_bundle(&runner, &StandardTransfer, &registry, &request)
        .expect("should mint");

    let bootstrap = coins[1].to_coin_id();
    let genesis = template_node(&mut allocator, &registry, GENESIS_BY_COIN_ID);
    let bootstrap_atom = allocator
        .allocator()
        .new_atom(bootstrap.bytes())
        .expect("atom");
    let tail = curry_nodes(&mut allocator, genesis, &[bootstrap_atom]);
    assert_eq!(info.asset_id, Node(tail).sha256tree(&mut allocator));

    let spends = &info.spend_bundle.coin_spends;
    assert_eq!(spends.len(), 2);
    assert_eq!(spends[0].coin, coins[1]);
    assert!(info.spend_bundle.aggregated_signature.is_some());

    let (cat_parent, cat_puzzle_hash, cat_amount) =
        spends[1].coin.get_coin_string_parts().expect("parts");
    assert_eq!(cat_parent, bootstrap);
    assert_eq!(cat_amount, Amount::new(1000));
    assert_eq!(
        cat_puzzle_hash,
        spends[1].puzzle_reveal.sha256tree(&mut allocator)
    );

    let internal_conditions = CoinCondition::from_puzzle_and_solution(
        &mut allocator,
        &runner,
        spends[0].puzzle_reveal.to_program(),
        &spends[0].solution,
    )
    .expect("should run");
    assert!(internal_conditions.contains(&CoinCondition::CreateCoin(
        cat_puzzle_hash.clone(),
        Amount::new(1000),
        vec![]
    )));
    assert!(internal_conditions.contains(&CoinCondition::CreateCoin(
        identity.puzzle_hash.clone(),
        Amount::new(3990),
        vec![]
    )));

    let external_conditions = CoinCondition::from_puzzle_and_solution(
        &mut allocator,
        &runner,
        spends[1].puzzle_reveal.to_program(),
        &spends[1].solution,
    )
    .expect("cat layer accepts the mint solution");
    // The CAT layer wraps the target in a CAT puzzle with the same tail.
    let cat_mod_hash = registry.hash_of(CAT_V2).expect("cat_v2").clone();
    let wrapped_target = curried_tree_hash(
        &cat_mod_hash,
        &[
            atom_tree_hash(cat_mod_hash.bytes()),
            atom_tree_hash(info.asset_id.bytes()),
            target.hash().clone(),
        ],
    );
    assert!(external_conditions.contains(&CoinCondition::CreateCoin(
        wrapped_target,
        Amount::new(1000),
        vec![target.bytes().to_vec(), b"my_token".to_vec()]
    )));
    assert!(!external_conditions
        .iter()
        .any(|c| matches!(c, CoinCondition::AggSigMe(..) | CoinCondition::AggSigUnsafe(..))));

    // Only the standard spend asks for a signature, so the aggregate is just
    // that signature.
    let message = internal_conditions
        .iter()
        .find_map(|c| match c {
            CoinCondition::AggSigMe(_, msg) => Some(msg.clone()),
            _ => None,
        })
        .expect("standard spend asks for a signature");
    let signature = info.spend_bundle.aggregated_signature.clone().expect("signed");
    assert!(signature.verify(
        &identity.synthetic_public_key,
        &agg_sig_me_message(
            &message,
            &bootstrap,
            &Network::Testnet11.agg_sig_me_additional_data()
        )
    ));

    let simplified =
        simplify_program(&registry, spends[1].puzzle_reveal.to_program()).expect("decode");
    assert_eq!(simplified.template_name(), Some("cat_v2"));
    assert_eq!(
        key_param(&simplified),
        Some(format!("0xa0{}", hex::encode(info.asset_id.bytes())))
    );
}

#[test]
fn test_mint_without_funds_fails() {
    init_signing().expect("should init");
    let mut rng = ChaCha8Rng::from_seed([10; 32]);
    let mut allocator = AllocEncoder::new();
    let identity = ChiaIdentity::new(&mut allocator, rng.gen()).expect("identity");
    let request = MintCatRequest {
        target: rng.gen(),
        change: identity.puzzle_hash.clone(),
        amount: Amount::new(1000),
        fee: Amount::default(),
        memo: String::new(),
        coins: vec![],
        signing_key: identity.private_key.clone(),
        identities: vec![identity],
        network: Network::Mainnet,
        cat_version: CatVersion::V1,
    };
    assert!(generate_mint_cat_bundle(
        &ClvmRunner::default(),
        &StandardTransfer,
        &fixture_registry(),
        &request
    )
    .is_err());
}
