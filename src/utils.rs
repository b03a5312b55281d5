use clvmr::allocator::SExp;
use clvmr::{Allocator, NodePtr};

pub fn map_m<T, U, E, F>(mut f: F, list: &[T]) -> Result<Vec<U>, E>
where
    F: FnMut(&T) -> Result<U, E>,
{
    let mut result = Vec::new();
    for e in list {
        let val = f(e)?;
        result.push(val);
    }
    Ok(result)
}

pub fn non_nil(allocator: &Allocator, sexp: NodePtr) -> bool {
    match allocator.sexp(sexp) {
        SExp::Pair(_, _) => true,
        SExp::Atom => allocator.atom_len(sexp) != 0,
    }
}

pub fn proper_list(allocator: &Allocator, sexp: NodePtr, store: bool) -> Option<Vec<NodePtr>> {
    let mut args = vec![];
    let mut args_sexp = sexp;
    loop {
        match allocator.sexp(args_sexp) {
            SExp::Atom => {
                if !non_nil(allocator, args_sexp) {
                    return Some(args);
                } else {
                    return None;
                }
            }
            SExp::Pair(f, r) => {
                if store {
                    args.push(f);
                }
                args_sexp = r;
            }
        }
    }
}

/// Atom bytes if the node is an atom equal to `expected`.
pub fn atom_is(allocator: &Allocator, sexp: NodePtr, expected: &[u8]) -> bool {
    match allocator.sexp(sexp) {
        SExp::Atom => allocator.atom(sexp).to_vec() == expected,
        SExp::Pair(_, _) => false,
    }
}

/// Shorten a long identifier for display, e.g. an asset id in a log line.
pub fn name_omit(name: &str, ellipsis: &str, length: usize, uppercase: bool) -> String {
    if name.is_empty() {
        return String::new();
    }
    let shortened = if name.chars().count() <= length + ellipsis.chars().count() {
        name.to_string()
    } else {
        let head: String = name.chars().take(length).collect();
        format!("{head}{ellipsis}")
    };
    if uppercase {
        shortened.to_uppercase()
    } else {
        shortened
    }
}
