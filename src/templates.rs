//! Known puzzle templates, keyed both by name and by tree hash.
//!
//! A registry is built once (from explicit entries or a manifest file) and
//! then only read.  Everything that needs one takes it by reference.  The
//! manifest form always starts from the programs compiled into the crate.

use std::collections::{BTreeMap, HashMap};
use std::fs::read_to_string;
use std::path::Path;

use log::debug;
use toml::{Table, Value};

use chia_puzzles::{
    CAT_PUZZLE, CHIALISP_DESERIALISATION, DID_INNERPUZ as DID_INNERPUZ_PROGRAM,
    GENESIS_BY_COIN_ID as GENESIS_BY_COIN_ID_PROGRAM,
    NFT_OWNERSHIP_LAYER as NFT_OWNERSHIP_LAYER_PROGRAM,
    NFT_OWNERSHIP_TRANSFER_PROGRAM_ONE_WAY_CLAIM_WITH_ROYALTIES as ROYALTY_TRANSFER_PROGRAM,
    NFT_STATE_LAYER as NFT_STATE_LAYER_PROGRAM,
    SINGLETON_TOP_LAYER_V1_1 as SINGLETON_TOP_LAYER_V1_1_PROGRAM,
};
use clvm_traits::ToClvm;

use crate::common::load_clvm::read_hex_program;
use crate::common::types::{AllocEncoder, Error, IntoErr, Node, Program, PuzzleHash, Sha256tree};

pub const CAT_V1: &str = "cat_v1";
pub const CAT_V2: &str = "cat_v2";
pub const SINGLETON_TOP_LAYER_V1_1: &str = "singleton_top_layer_v1_1";
pub const NFT_STATE_LAYER: &str = "nft_state_layer";
pub const NFT_OWNERSHIP_LAYER: &str = "nft_ownership_layer";
pub const NFT_OWNERSHIP_TRANSFER_PROGRAM_ONE_WAY_CLAIM_WITH_ROYALTIES: &str =
    "nft_ownership_transfer_program_one_way_claim_with_royalties";
pub const DID_INNERPUZ: &str = "did_innerpuz";
pub const GENESIS_BY_COIN_ID: &str = "genesis_by_coin_id";
pub const GENERATOR: &str = "generator";

/// `(a 2 (c (q . DESERIALIZER) 5))`: runs the block program in `2` with
/// `(DESERIALIZER (ref ...))`, the environment the block ROM gives it, and
/// returns what the block program returns.
fn block_generator_template() -> Result<Program, Error> {
    let mut allocator = AllocEncoder::new();
    let deserializer =
        Program::from_bytes(&CHIALISP_DESERIALISATION).to_nodeptr(&mut allocator)?;
    let env = (4, ((1, Node(deserializer)), (5, ())));
    let node = (2, (2, (env, ()))).to_clvm(&mut allocator).into_gen()?;
    Program::from_nodeptr(&mut allocator, node)
}

/// Templates every registry starts from.  `cat_v1` is not among them and
/// has to come from a manifest.
pub fn builtin_entries() -> Result<Vec<(String, Program)>, Error> {
    let mut entries: Vec<(String, Program)> = [
        (CAT_V2, &CAT_PUZZLE[..]),
        (GENESIS_BY_COIN_ID, &GENESIS_BY_COIN_ID_PROGRAM[..]),
        (SINGLETON_TOP_LAYER_V1_1, &SINGLETON_TOP_LAYER_V1_1_PROGRAM[..]),
        (NFT_STATE_LAYER, &NFT_STATE_LAYER_PROGRAM[..]),
        (NFT_OWNERSHIP_LAYER, &NFT_OWNERSHIP_LAYER_PROGRAM[..]),
        (
            NFT_OWNERSHIP_TRANSFER_PROGRAM_ONE_WAY_CLAIM_WITH_ROYALTIES,
            &ROYALTY_TRANSFER_PROGRAM[..],
        ),
        (DID_INNERPUZ, &DID_INNERPUZ_PROGRAM[..]),
    ]
    .iter()
    .map(|(name, bytes)| (name.to_string(), Program::from_bytes(bytes)))
    .collect();
    entries.push((GENERATOR.to_string(), block_generator_template()?));
    Ok(entries)
}

#[derive(Debug, Clone)]
struct TemplateEntry {
    program: Program,
    hash: PuzzleHash,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    by_hash: HashMap<PuzzleHash, String>,
    by_name: BTreeMap<String, TemplateEntry>,
}

impl TemplateRegistry {
    /// Names and hashes must both be unique.
    pub fn new(entries: Vec<(String, Program)>) -> Result<TemplateRegistry, Error> {
        let mut allocator = AllocEncoder::new();
        let mut registry = TemplateRegistry::default();
        for (name, program) in entries.into_iter() {
            let node = program.to_nodeptr(&mut allocator)?;
            let hash = Node(node).sha256tree(&mut allocator);
            if registry.by_name.contains_key(&name) {
                return Err(Error::StrErr(format!("template {name} registered twice")));
            }
            if let Some(existing) = registry.by_hash.get(&hash) {
                return Err(Error::StrErr(format!(
                    "template {name} has the same hash as {existing}"
                )));
            }
            debug!("template {name} {hash:?}");
            registry.by_hash.insert(hash.clone(), name.clone());
            registry.by_name.insert(name, TemplateEntry { program, hash });
        }
        Ok(registry)
    }

    pub fn builtin() -> Result<TemplateRegistry, Error> {
        TemplateRegistry::new(builtin_entries()?)
    }

    /// The built in templates plus those named by a manifest of the form
    ///
    /// ```toml
    /// [templates]
    /// cat_v1 = "cat_v1.clvm.hex"
    /// ```
    ///
    /// Relative paths are taken from `base_dir`.  A manifest entry may not
    /// reuse a built in name.
    pub fn from_manifest_str(text: &str, base_dir: &Path) -> Result<TemplateRegistry, Error> {
        let manifest = text.parse::<Table>().into_gen()?;
        let mut entries = builtin_entries()?;
        if let Some(Value::Table(t)) = manifest.get("templates") {
            for (name, v) in t.iter() {
                if let Value::String(file) = v {
                    let program = read_hex_program(&base_dir.join(file))?;
                    entries.push((name.clone(), program));
                } else {
                    return Err(Error::StrErr(format!(
                        "template {name} should name a hex file"
                    )));
                }
            }
        }
        TemplateRegistry::new(entries)
    }

    pub fn from_manifest(path: &Path) -> Result<TemplateRegistry, Error> {
        let text = read_to_string(path).map_err(|e| {
            Error::StrErr(format!("Error reading {}: {e:?}", path.display()))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        TemplateRegistry::from_manifest_str(&text, base_dir)
    }

    pub fn resolve_by_hash(&self, hash: &PuzzleHash) -> Option<&str> {
        self.by_hash.get(hash).map(|name| name.as_str())
    }

    pub fn resolve_by_name(&self, name: &str) -> Option<&Program> {
        self.by_name.get(name).map(|entry| &entry.program)
    }

    /// Like `resolve_by_name`, for callers that cannot proceed without it.
    pub fn program(&self, name: &str) -> Result<&Program, Error> {
        self.resolve_by_name(name)
            .ok_or_else(|| Error::StrErr(format!("no template named {name}")))
    }

    pub fn hash_of(&self, name: &str) -> Option<&PuzzleHash> {
        self.by_name.get(name).map(|entry| &entry.hash)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
