use chia_puzzles::CHIALISP_DESERIALISATION;
use clvm_traits::ToClvm;
use clvm_tools_rs::classic::clvm_tools::binutils::disassemble;

use crate::block::{analyze_block, parse_block, parse_block_coins};
use crate::common::types::{
    AllocEncoder, Amount, CoinID, CoinString, Hash, Node, Program, PuzzleHash, Sha256tree,
};
use crate::runner::ClvmRunner;
use crate::decompile::nft::NftMetadata;
use crate::templates::{CAT_V2, NFT_STATE_LAYER, SINGLETON_TOP_LAYER_V1_1};
use crate::tests::{assemble_node, assemble_program, curry_nodes, fixture_registry, hash_atom, template_node};

/// `(q ((parent puzzle amount solution) ...))`
fn block_program(allocator: &mut AllocEncoder, spends: Vec<Node>) -> Program {
    let node = (1, (spends, ())).to_clvm(allocator).expect("should build");
    Program::from_nodeptr(allocator, node).expect("serialize")
}

#[test]
fn test_parse_block_without_refs_runs_on_nil_list() {
    let registry = fixture_registry();
    let runner = ClvmRunner::default();
    let result = parse_block(&runner, &registry, &assemble_program("1"), &[]).expect("should run");
    assert_eq!(result.bytes(), &[0xff, 0x80, 0x80]);
}

#[test]
fn test_parse_block_with_refs_uses_generator_template() {
    let registry = fixture_registry();
    let runner = ClvmRunner::default();
    let refs = vec![vec![0xde, 0xad], vec![0xbe, 0xef]];
    let result = parse_block(&runner, &registry, &assemble_program("5"), &refs).expect("should run");

    let mut allocator = AllocEncoder::new();
    let node = result.to_nodeptr(&mut allocator).expect("decode");
    assert_eq!(
        disassemble(allocator.allocator(), node, None),
        "(0xdead 0xbeef)"
    );

    // The block program also gets the deserializer to unpack its references.
    let deserializer =
        parse_block(&runner, &registry, &assemble_program("2"), &refs).expect("should run");
    assert_eq!(deserializer, Program::from_bytes(&CHIALISP_DESERIALISATION));
}

#[test]
fn test_parse_block_propagates_vm_failure() {
    let registry = fixture_registry();
    let runner = ClvmRunner::default();
    let failing = assemble_program("(x)");
    assert!(parse_block(&runner, &registry, &failing, &[]).is_err());
}

#[test]
fn test_parse_block_coins_in_order() {
    let registry = fixture_registry();
    let mut allocator = AllocEncoder::new();

    let cat_mod = template_node(&mut allocator, &registry, CAT_V2);
    let mod_hash = hash_atom(&mut allocator, 0x01);
    let tail = hash_atom(&mut allocator, 0x02);
    let inner = assemble_node(&mut allocator, "(q . ())");
    let cat_puzzle = curry_nodes(&mut allocator, cat_mod, &[mod_hash, tail, inner]);
    let plain_puzzle = assemble_node(&mut allocator, "(q . 1)");
    let solution = assemble_node(&mut allocator, "(())");

    let parent_a = Hash::from_bytes([0xaa; 32]);
    let parent_b = Hash::from_bytes([0xcc; 32]);
    let spends = vec![
        Node(
            (
                parent_a.clone(),
                (Node(cat_puzzle), (1000, (Node(solution), ()))),
            )
                .to_clvm(&mut allocator)
                .expect("spend"),
        ),
        Node(
            (
                parent_b.clone(),
                (Node(plain_puzzle), (0, (Node(solution), ()))),
            )
                .to_clvm(&mut allocator)
                .expect("spend"),
        ),
    ];
    let block = block_program(&mut allocator, spends);
    let runner = ClvmRunner::default();
    let block_result = parse_block(&runner, &registry, &block, &[]).expect("should run");
    let coins = parse_block_coins(&registry, &block_result).expect("should parse");

    assert_eq!(coins.len(), 2);

    let cat_hash: PuzzleHash = Node(cat_puzzle).sha256tree(&mut allocator);
    let cat_coin = CoinString::from_parts(&CoinID::new(parent_a.clone()), &cat_hash, &Amount::new(1000));
    assert_eq!(coins[0].parent, CoinID::new(parent_a).to_hex_0x());
    assert_eq!(coins[0].amount, "1000");
    assert_eq!(coins[0].coin_name, cat_coin.to_coin_id().to_hex_0x());
    assert_eq!(
        coins[0].puzzle,
        format!("0x{}", Node(cat_puzzle).to_hex(&mut allocator).expect("hex"))
    );
    assert_eq!(coins[0].solution, "0xff8080");
    assert_eq!(coins[0].mods, "cat_v2()");
    assert_eq!(
        coins[0].key_param,
        Some(format!("0xa0{}", hex::encode([0x02; 32])))
    );

    assert_eq!(coins[1].parent, CoinID::new(parent_b).to_hex_0x());
    assert_eq!(coins[1].amount, "0");
    assert_eq!(coins[1].mods, "");
    assert_eq!(coins[1].key_param, None);
    assert_eq!(coins[1].parsed_puzzle.raw(), Some("0xff0101"));
}

#[test]
fn test_coin_info_json_omits_missing_key_param() {
    let registry = fixture_registry();
    let mut allocator = AllocEncoder::new();
    let puzzle = assemble_node(&mut allocator, "(q . 1)");
    let spend = (Hash::from_bytes([0xaa; 32]), (Node(puzzle), (1, ((), ()))))
        .to_clvm(&mut allocator)
        .expect("spend");
    let block = block_program(&mut allocator, vec![Node(spend)]);

    let coins = analyze_block(&ClvmRunner::default(), &registry, &block.to_hex_0x(), &[])
        .expect("should analyze");
    let value = serde_json::to_value(&coins[0]).expect("json");
    assert!(value.get("key_param").is_none());
    assert!(value.get("nft_metadata").is_none());
    assert_eq!(value["parsed_puzzle"]["raw"], "0xff0101");
}

#[test]
fn test_malformed_spend_is_an_error() {
    let registry = fixture_registry();
    let mut allocator = AllocEncoder::new();
    let short_spend = (Hash::from_bytes([0xaa; 32]), (1, ()))
        .to_clvm(&mut allocator)
        .expect("spend");
    let block = block_program(&mut allocator, vec![Node(short_spend)]);
    let block_result = parse_block(&ClvmRunner::default(), &registry, &block, &[]).expect("run");
    assert!(parse_block_coins(&registry, &block_result).is_err());
}

#[test]
fn test_nft_singleton_coin_carries_metadata() {
    let registry = fixture_registry();
    let mut allocator = AllocEncoder::new();
    let singleton_mod = template_node(&mut allocator, &registry, SINGLETON_TOP_LAYER_V1_1);
    let state_mod = template_node(&mut allocator, &registry, NFT_STATE_LAYER);
    let metadata = assemble_node(&mut allocator, "((u \"https://example.com/nft.png\") (h . 0x0102))");
    let state_mod_hash = hash_atom(&mut allocator, 0x31);
    let updater = hash_atom(&mut allocator, 0x32);
    let inner = assemble_node(&mut allocator, "(q . ())");
    let state = curry_nodes(&mut allocator, state_mod, &[state_mod_hash, metadata, updater, inner]);
    let singleton_struct = hash_atom(&mut allocator, 0x33);
    let singleton = curry_nodes(&mut allocator, singleton_mod, &[singleton_struct, state]);
    let spend = (Hash::from_bytes([0xab; 32]), (Node(singleton), (1, ((), ()))))
        .to_clvm(&mut allocator)
        .expect("spend");
    let block = block_program(&mut allocator, vec![Node(spend)]);

    let coins = analyze_block(&ClvmRunner::default(), &registry, &block.to_hex_0x(), &[])
        .expect("should analyze");
    assert_eq!(coins[0].mods, "singleton_top_layer_v1_1(nft_state_layer())");
    assert_eq!(
        coins[0].nft_metadata,
        Some(NftMetadata {
            uri: "https://example.com/nft.png".to_string(),
            hash: "0102".to_string(),
        })
    );
    let value = serde_json::to_value(&coins[0]).expect("json");
    assert_eq!(value["nft_metadata"]["uri"], "https://example.com/nft.png");
}
