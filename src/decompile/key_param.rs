use crate::decompile::SimplifiedPuzzle;
use crate::templates::{
    CAT_V1, CAT_V2, DID_INNERPUZ, NFT_OWNERSHIP_LAYER,
    NFT_OWNERSHIP_TRANSFER_PROGRAM_ONE_WAY_CLAIM_WITH_ROYALTIES, NFT_STATE_LAYER,
    SINGLETON_TOP_LAYER_V1_1,
};

fn raw_hex(puzzle: &SimplifiedPuzzle) -> Option<String> {
    puzzle.raw().map(|r| r.to_string())
}

/// Asset id of a CAT: the raw tail hash.
fn cat_tail(puzzle: &SimplifiedPuzzle) -> Option<String> {
    [CAT_V1, CAT_V2]
        .iter()
        .find_map(|cat| puzzle.curried_arg(cat, 1))
        .and_then(raw_hex)
}

fn nft_royalty_address(puzzle: &SimplifiedPuzzle) -> Option<String> {
    let state_layer = puzzle.curried_arg(SINGLETON_TOP_LAYER_V1_1, 1)?;
    let ownership_layer = state_layer.curried_arg(NFT_STATE_LAYER, 3)?;
    let transfer_program = ownership_layer.curried_arg(NFT_OWNERSHIP_LAYER, 2)?;
    transfer_program
        .curried_arg(NFT_OWNERSHIP_TRANSFER_PROGRAM_ONE_WAY_CLAIM_WITH_ROYALTIES, 1)
        .and_then(raw_hex)
}

fn did_recovery_key(puzzle: &SimplifiedPuzzle) -> Option<String> {
    let did_inner = puzzle.curried_arg(SINGLETON_TOP_LAYER_V1_1, 1)?;
    did_inner.curried_arg(DID_INNERPUZ, 1).and_then(raw_hex)
}

/// The one value that identifies what a recognized puzzle is about: a
/// CAT's tail, an NFT's royalty address or a DID's recovery key.  Only exact
/// known nestings match.
pub fn key_param(puzzle: &SimplifiedPuzzle) -> Option<String> {
    cat_tail(puzzle)
        .or_else(|| nft_royalty_address(puzzle))
        .or_else(|| did_recovery_key(puzzle))
}
