use clvmr::NodePtr;

use clvm_tools_rs::classic::clvm_tools::binutils::assemble;

use crate::common::types::{AllocEncoder, Hash, Program, PuzzleHash, Sha256Input};
use crate::templates::{builtin_entries, TemplateRegistry, CAT_V1};

pub mod block;
pub mod config;
pub mod mint;
pub mod standard_coin;

/// Stand in for CAT1, which is not built in: runs the curried inner puzzle
/// on the second element of the solution.
pub const FAKE_CAT_V1: &str = "(a 11 (f (r 15)))";

pub fn assemble_node(allocator: &mut AllocEncoder, text: &str) -> NodePtr {
    assemble(allocator.allocator(), text).expect("should assemble")
}

pub fn assemble_program(text: &str) -> Program {
    let mut allocator = AllocEncoder::new();
    let node = assemble_node(&mut allocator, text);
    Program::from_nodeptr(&mut allocator, node).expect("should serialize")
}

/// `(a (q . module) (c (q . arg) ... 1))`
pub fn curry_nodes(allocator: &mut AllocEncoder, module: NodePtr, args: &[NodePtr]) -> NodePtr {
    let a = allocator.allocator();
    let quote = a.new_atom(&[1]).expect("atom");
    let apply = a.new_atom(&[2]).expect("atom");
    let cons = a.new_atom(&[4]).expect("atom");
    let nil = a.null();

    let mut env = quote;
    for arg in args.iter().rev() {
        let quoted_arg = a.new_pair(quote, *arg).expect("pair");
        let rest = a.new_pair(env, nil).expect("pair");
        let tail = a.new_pair(quoted_arg, rest).expect("pair");
        env = a.new_pair(cons, tail).expect("pair");
    }

    let quoted_module = a.new_pair(quote, module).expect("pair");
    let env_list = a.new_pair(env, nil).expect("pair");
    let tail = a.new_pair(quoted_module, env_list).expect("pair");
    a.new_pair(apply, tail).expect("pair")
}

pub fn hash_atom(allocator: &mut AllocEncoder, byte: u8) -> NodePtr {
    allocator.allocator().new_atom(&[byte; 32]).expect("atom")
}

/// Tree hash of `module_hash` curried with arguments given by their tree
/// hashes, so an argument can stand for a puzzle that is only known by hash.
pub fn curried_tree_hash(module_hash: &PuzzleHash, arg_hashes: &[Hash]) -> PuzzleHash {
    let pair_hash = |first: &Hash, rest: &Hash| {
        Sha256Input::Array(vec![
            Sha256Input::Bytes(&[2]),
            Sha256Input::Bytes(first.bytes()),
            Sha256Input::Bytes(rest.bytes()),
        ])
        .hash()
    };
    let quote = atom_tree_hash(&[1]);
    let apply = atom_tree_hash(&[2]);
    let cons = atom_tree_hash(&[4]);
    let nil = atom_tree_hash(&[]);

    let mut env = quote.clone();
    for arg in arg_hashes.iter().rev() {
        let quoted_arg = pair_hash(&quote, arg);
        let rest = pair_hash(&env, &nil);
        let tail = pair_hash(&quoted_arg, &rest);
        env = pair_hash(&cons, &tail);
    }

    let quoted_module = pair_hash(&quote, module_hash.hash());
    let env_list = pair_hash(&env, &nil);
    let tail = pair_hash(&quoted_module, &env_list);
    PuzzleHash::from_hash(pair_hash(&apply, &tail))
}

/// Tree hash of an atom.
pub fn atom_tree_hash(bytes: &[u8]) -> Hash {
    Sha256Input::Array(vec![Sha256Input::Bytes(&[1]), Sha256Input::Bytes(bytes)]).hash()
}

/// The built in templates plus a stand in for `cat_v1`.
pub fn fixture_registry() -> TemplateRegistry {
    let mut entries = builtin_entries().expect("built in templates");
    entries.push((CAT_V1.to_string(), assemble_program(FAKE_CAT_V1)));
    TemplateRegistry::new(entries).expect("should build registry")
}

pub fn template_node(allocator: &mut AllocEncoder, registry: &TemplateRegistry, name: &str) -> NodePtr {
    registry
        .program(name)
        .expect("fixture template")
        .to_nodeptr(allocator)
        .expect("should decode")
}
