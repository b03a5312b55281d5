//! Turning curried puzzles back into named templates.
//!
//! A puzzle either matches a known template (directly, or as that template
//! with curried arguments) or is kept as the raw bytes it arrived as.  There
//! is no partial recognition: if the curried module is unknown the whole
//! node stays raw, even when some of its arguments were recognized.

pub mod key_param;
pub mod nft;

use log::warn;
use serde::{Deserialize, Serialize};

use clvmr::allocator::SExp;
use clvmr::{Allocator, NodePtr};

use crate::common::types::{AllocEncoder, Error, Node, Program, Sha256tree};
use crate::templates::TemplateRegistry;
use crate::utils::{atom_is, proper_list};

const QUOTE_ATOM: [u8; 1] = [1];
const APPLY_ATOM: [u8; 1] = [2];
const CONS_ATOM: [u8; 1] = [4];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SimplifiedPuzzle {
    Template {
        #[serde(rename = "mod")]
        template: String,
        args: Vec<SimplifiedPuzzle>,
    },
    /// 0x prefixed hex of the original serialization.
    Raw { raw: String },
}

impl SimplifiedPuzzle {
    pub fn template_name(&self) -> Option<&str> {
        match self {
            SimplifiedPuzzle::Template { template, .. } => Some(template),
            SimplifiedPuzzle::Raw { .. } => None,
        }
    }

    pub fn args(&self) -> &[SimplifiedPuzzle] {
        match self {
            SimplifiedPuzzle::Template { args, .. } => args,
            SimplifiedPuzzle::Raw { .. } => &[],
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            SimplifiedPuzzle::Raw { raw } => Some(raw),
            SimplifiedPuzzle::Template { .. } => None,
        }
    }

    /// Argument `index` if this node is the named template.
    pub fn curried_arg(&self, template: &str, index: usize) -> Option<&SimplifiedPuzzle> {
        if self.template_name() == Some(template) {
            self.args().get(index)
        } else {
            None
        }
    }
}

fn quoted_body(allocator: &Allocator, node: NodePtr) -> Option<NodePtr> {
    match allocator.sexp(node) {
        SExp::Pair(f, r) if atom_is(allocator, f, &QUOTE_ATOM) => Some(r),
        _ => None,
    }
}

/// Split `(a (q . MOD) (c (q . ARG1) (c (q . ARG2) ... 1)))` into the module
/// and its curried arguments.
pub fn uncurry(allocator: &Allocator, program: NodePtr) -> Option<(NodePtr, Vec<NodePtr>)> {
    let apply = proper_list(allocator, program, true)?;
    if apply.len() != 3 || !atom_is(allocator, apply[0], &APPLY_ATOM) {
        return None;
    }
    let module = quoted_body(allocator, apply[1])?;

    let mut args = Vec::new();
    let mut env = apply[2];
    loop {
        if atom_is(allocator, env, &QUOTE_ATOM) {
            return Some((module, args));
        }
        let cons = proper_list(allocator, env, true)?;
        if cons.len() != 3 || !atom_is(allocator, cons[0], &CONS_ATOM) {
            return None;
        }
        args.push(quoted_body(allocator, cons[1])?);
        env = cons[2];
    }
}

fn raw_leaf(allocator: &mut AllocEncoder, puzzle: NodePtr) -> SimplifiedPuzzle {
    let raw = match Node(puzzle).to_hex(allocator) {
        Ok(h) => format!("0x{h}"),
        Err(e) => {
            warn!("could not serialize unrecognized puzzle: {e:?}");
            String::new()
        }
    };
    SimplifiedPuzzle::Raw { raw }
}

pub fn simplify_puzzle(
    allocator: &mut AllocEncoder,
    registry: &TemplateRegistry,
    puzzle: NodePtr,
) -> SimplifiedPuzzle {
    let puzzle_hash = Node(puzzle).sha256tree(allocator);
    if let Some(name) = registry.resolve_by_hash(&puzzle_hash) {
        return SimplifiedPuzzle::Template {
            template: name.to_string(),
            args: Vec::new(),
        };
    }

    let Some((module, args)) = uncurry(allocator.allocator_ref(), puzzle) else {
        return raw_leaf(allocator, puzzle);
    };

    let module_hash = Node(module).sha256tree(allocator);
    let Some(name) = registry.resolve_by_hash(&module_hash) else {
        return raw_leaf(allocator, puzzle);
    };

    let args = args
        .iter()
        .map(|arg| simplify_puzzle(allocator, registry, *arg))
        .collect();
    SimplifiedPuzzle::Template {
        template: name.to_string(),
        args,
    }
}

/// Fails only when the bytes are not a clvm tree at all.
pub fn simplify_program(
    registry: &TemplateRegistry,
    program: &Program,
) -> Result<SimplifiedPuzzle, Error> {
    let mut allocator = AllocEncoder::new();
    let node = program.to_nodeptr(&mut allocator)?;
    Ok(simplify_puzzle(&mut allocator, registry, node))
}

/// `name(child,child,...)` over the recognized templates; raw leaves
/// contribute nothing.
pub fn mods_path(puzzle: &SimplifiedPuzzle) -> String {
    match puzzle {
        SimplifiedPuzzle::Raw { .. } => String::new(),
        SimplifiedPuzzle::Template { template, args } => {
            let children: Vec<String> = args
                .iter()
                .map(mods_path)
                .filter(|c| !c.is_empty())
                .collect();
            format!("{template}({})", children.join(","))
        }
    }
}
