use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use clvm_traits::ToClvm;

use crate::common::constants::CREATE_COIN;
use crate::common::load_clvm::hex_to_sexp;
use crate::common::standard_coin::{
    agg_sig_me_message, calculate_synthetic_public_key, get_default_hidden_puzzle_hash,
    get_standard_coin_puzzle, puzzle_hash_for_pk, standard_solution_partial, ChiaIdentity,
};
use crate::common::types::{
    AllocEncoder, Amount, CoinCondition, CoinID, CoinString, Error, Node, PrivateKey, PublicKey,
    PuzzleHash, Sha256tree,
};
use crate::config::Network;
use crate::runner::ClvmRunner;

const TEST_PUBLIC_KEY_HEX: &str = "86de1dad404c024085fbff64a872f0684f1bf24e16a9cca2e633251f47d701717ee103aa931c22ec314d067823311bf7";

const EXPECTED_PUZZLE_HEX: &str = "ff02ffff01ff02ffff01ff02ffff03ff0bffff01ff02ffff03ffff09ff05ffff1dff0bffff1effff0bff0bffff02ff06ffff04ff02ffff04ff17ff8080808080808080ffff01ff02ff17ff2f80ffff01ff088080ff0180ffff01ff04ffff04ff04ffff04ff05ffff04ffff02ff06ffff04ff02ffff04ff17ff80808080ff80808080ffff02ff17ff2f808080ff0180ffff04ffff01ff32ff02ffff03ffff07ff0580ffff01ff0bffff0102ffff02ff06ffff04ff02ffff04ff09ff80808080ffff02ff06ffff04ff02ffff04ff0dff8080808080ffff01ff0bffff0101ff058080ff0180ff018080ffff04ffff01b0885aeb185acfe6fc9a526880a16b23361b2c70866fb0630b7afa10c65bcfff6dac781d0b4a566dcf52073527d2ae796bff018080";

#[test]
fn test_standard_puzzle() {
    let mut allocator = AllocEncoder::new();
    let test_key =
        PublicKey::from_slice(&hex::decode(TEST_PUBLIC_KEY_HEX).expect("hex")).expect("key");
    let puzzle_hash = puzzle_hash_for_pk(&mut allocator, &test_key).expect("should work");
    let expected_puzzle = hex_to_sexp(&mut allocator, EXPECTED_PUZZLE_HEX).expect("should convert");
    let expected_hash = Node(expected_puzzle).sha256tree(&mut allocator);
    assert_eq!(expected_hash, puzzle_hash);
    assert_eq!(
        puzzle_hash,
        PuzzleHash::from_hex("200feb91bf01fd6ef6027781250b361acbaed1b8c2c3252bd64ff83dc0e035eb")
            .expect("hex")
    );
}

#[test]
fn test_standard_puzzle_template_hashes() {
    let mut allocator = AllocEncoder::new();
    let standard = get_standard_coin_puzzle(&mut allocator).expect("should load");
    assert_eq!(
        standard.sha256tree(&mut allocator),
        PuzzleHash::from_hex("e9aaa49f45bad5c889b86ee3341550c155cfdd10c3a6757de618d20612fffd52")
            .expect("hex")
    );
    assert_eq!(
        get_default_hidden_puzzle_hash(&mut allocator).expect("should load"),
        PuzzleHash::from_hex("711d6c4e32c92e53179b199484cf8c897542bc57f2b22582799f9d657eec4699")
            .expect("hex")
    );
}

#[test]
fn test_identity_synthetic_keys_agree() {
    let mut rng = ChaCha8Rng::from_seed([0; 32]);
    let mut allocator = AllocEncoder::new();
    let private_key: PrivateKey = rng.gen();
    let identity = ChiaIdentity::new(&mut allocator, private_key).expect("should create");
    let hidden_puzzle_hash = get_default_hidden_puzzle_hash(&mut allocator).expect("hidden");
    assert_eq!(
        identity.synthetic_public_key,
        calculate_synthetic_public_key(&identity.public_key, &hidden_puzzle_hash).expect("pk")
    );
    assert_eq!(
        identity.puzzle_hash,
        puzzle_hash_for_pk(&mut allocator, &identity.public_key).expect("ph")
    );
}

#[test]
fn test_private_key_from_hex() {
    let key = PrivateKey::from_hex(&format!("0x{}", hex::encode([1; 32]))).expect("key");
    assert_eq!(key.bytes(), [1; 32]);
    assert!(PrivateKey::from_hex("0x0102").is_err());
}

#[test]
fn test_standard_solution_signs_what_the_puzzle_asks_for() -> Result<(), Error> {
    let mut rng = ChaCha8Rng::from_seed([1; 32]);
    let mut allocator = AllocEncoder::new();
    let identity = ChiaIdentity::new(&mut allocator, rng.gen())?;
    let target: PuzzleHash = rng.gen();
    let coin = CoinString::from_parts(
        &CoinID::new(rng.gen()),
        &identity.puzzle_hash,
        &Amount::new(100),
    );

    let conditions = ((CREATE_COIN, (target.clone(), (Amount::new(100), ()))), ())
        .to_clvm(&mut allocator)
        .expect("conditions");
    let additional_data = Network::Testnet11.agg_sig_me_additional_data();
    let (solution, signature) = standard_solution_partial(
        &mut allocator,
        &identity.synthetic_private_key,
        &coin.to_coin_id(),
        conditions,
        &additional_data,
    )?;

    let produced = CoinCondition::from_puzzle_and_solution(
        &mut allocator,
        &ClvmRunner::default(),
        identity.puzzle.to_program(),
        &solution,
    )?;
    let agg_sig_me = produced.iter().find_map(|c| match c {
        CoinCondition::AggSigMe(pk, msg) => Some((pk.clone(), msg.clone())),
        _ => None,
    });
    let (public_key, message) = agg_sig_me.expect("standard puzzle demands a signature");
    assert_eq!(public_key, identity.synthetic_public_key);
    assert!(signature.verify(
        &public_key,
        &agg_sig_me_message(&message, &coin.to_coin_id(), &additional_data)
    ));
    assert!(produced.contains(&CoinCondition::CreateCoin(
        target,
        Amount::new(100),
        vec![]
    )));
    Ok(())
}
