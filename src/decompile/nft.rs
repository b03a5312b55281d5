use serde::{Deserialize, Serialize};

use clvmr::allocator::SExp;
use clvmr::NodePtr;

use crate::common::types::{AllocEncoder, Node, Sha256tree};
use crate::decompile::uncurry;
use crate::templates::{TemplateRegistry, NFT_STATE_LAYER, SINGLETON_TOP_LAYER_V1_1};
use crate::utils::proper_list;

const URI_KEY: &[u8] = b"u";
const HASH_KEY: &[u8] = b"h";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub uri: String,
    pub hash: String,
}

fn uncurry_template(
    allocator: &mut AllocEncoder,
    registry: &TemplateRegistry,
    puzzle: NodePtr,
    template: &str,
    arg_count: usize,
) -> Option<Vec<NodePtr>> {
    let (module, args) = uncurry(allocator.allocator_ref(), puzzle)?;
    let module_hash = Node(module).sha256tree(allocator);
    if registry.resolve_by_hash(&module_hash) == Some(template) && args.len() == arg_count {
        Some(args)
    } else {
        None
    }
}

/// First value stored under `key` in a metadata alist.  Values are either
/// lists (the first element wins) or bare atoms.
fn metadata_value(allocator: &AllocEncoder, entries: &[NodePtr], key: &[u8]) -> Option<Vec<u8>> {
    let a = allocator.allocator_ref();
    entries.iter().find_map(|entry| {
        let SExp::Pair(k, v) = a.sexp(*entry) else {
            return None;
        };
        if !matches!(a.sexp(k), SExp::Atom) || a.atom(k).to_vec() != key {
            return None;
        }
        let value = match a.sexp(v) {
            SExp::Pair(first, _) => first,
            SExp::Atom => v,
        };
        match a.sexp(value) {
            SExp::Atom => Some(a.atom(value).to_vec()),
            SExp::Pair(_, _) => None,
        }
    })
}

/// Metadata uri and hash of an NFT singleton puzzle reveal.
pub fn nft_metadata(
    allocator: &mut AllocEncoder,
    registry: &TemplateRegistry,
    puzzle: NodePtr,
) -> Option<NftMetadata> {
    let singleton_args =
        uncurry_template(allocator, registry, puzzle, SINGLETON_TOP_LAYER_V1_1, 2)?;
    let state_args =
        uncurry_template(allocator, registry, singleton_args[1], NFT_STATE_LAYER, 4)?;
    let entries = proper_list(allocator.allocator_ref(), state_args[1], true)?;
    let uri = metadata_value(allocator, &entries, URI_KEY)?;
    let hash = metadata_value(allocator, &entries, HASH_KEY)?;
    Some(NftMetadata {
        uri: String::from_utf8(uri).ok()?,
        hash: hex::encode(hash),
    })
}
