//! Resolves `@if(cond) ... @elseif(cond) ... @else ... @endif` blocks.
//!
//! Blocks are not parsed into a tree. Instead the first `@if` is matched to
//! its `@endif` by counting nesting depth, only `@elseif` and `@else` markers
//! at depth one split it into branches. The selected branch replaces the
//! whole block and scanning resumes at the start of the replacement, so that
//! any blocks nested inside it are resolved next.

use std::borrow::Cow;
use std::ops::Range;

use crate::compile::scan;
use crate::context::Context;
use crate::expr;

const IF: &str = "@if(";
const ELSEIF: &str = "@elseif(";
const ELSE: &str = "@else";
const ENDIF: &str = "@endif";

/// The markers that affect block structure, `@elseif(` must come before
/// `@else` so that it wins when both match.
const MARKERS: &[&str] = &[IF, ELSEIF, ELSE, ENDIF];

/// A matched `@if` block.
#[cfg_attr(internal_debug, derive(Debug))]
struct Block {
    branches: Vec<Branch>,
    /// The byte offset just past `@endif`.
    end: usize,
}

#[cfg_attr(internal_debug, derive(Debug))]
struct Branch {
    /// The condition source, or `None` for the `@else` branch.
    cond: Option<Range<usize>>,
    body: Range<usize>,
}

pub(crate) fn resolve<'a>(source: &'a str, ctx: &Context<'_>) -> Cow<'a, str> {
    let mut text = Cow::Borrowed(source);
    let mut pos = 0;
    while let Some(i) = scan::find(&text, pos, IF) {
        match parse_block(&text, i) {
            Some(block) => {
                let body = select(&text, &block, ctx);
                let mut spliced = String::with_capacity(text.len());
                spliced.push_str(&text[..i]);
                spliced.push_str(&text[body]);
                spliced.push_str(&text[block.end..]);
                text = Cow::Owned(spliced);
                pos = i;
            }
            // Unmatched, leave it as text.
            None => pos = i + IF.len(),
        }
    }
    text
}

/// Matches the `@if` marker at `i` with its branches and `@endif`.
fn parse_block(text: &str, i: usize) -> Option<Block> {
    let open = i + IF.len();
    let close = scan::closing_paren(text, open)?;

    let mut branches = Vec::new();
    let mut cond = Some(open..close);
    let mut start = close + 1;
    let mut pos = start;
    let mut depth = 1;

    loop {
        let (j, marker) = scan::find_any(text, pos, MARKERS)?;
        match MARKERS[marker] {
            IF => {
                depth += 1;
                pos = j + IF.len();
            }
            ENDIF => {
                depth -= 1;
                if depth == 0 {
                    branches.push(Branch {
                        cond,
                        body: start..j,
                    });
                    return Some(Block {
                        branches,
                        end: j + ENDIF.len(),
                    });
                }
                pos = j + ENDIF.len();
            }
            ELSEIF if depth == 1 => {
                let open = j + ELSEIF.len();
                let close = scan::closing_paren(text, open)?;
                branches.push(Branch {
                    cond: cond.replace(open..close),
                    body: start..j,
                });
                start = close + 1;
                pos = start;
            }
            ELSE if depth == 1 && is_bare_else(text, j) => {
                branches.push(Branch {
                    cond: cond.take(),
                    body: start..j,
                });
                start = j + ELSE.len();
                pos = start;
            }
            m => pos = j + m.len(),
        }
    }
}

/// Whether the `@else` at `j` stands on its own rather than being the start
/// of a longer word like `@elsewhere`.
fn is_bare_else(text: &str, j: usize) -> bool {
    !text[j + ELSE.len()..].starts_with(expr::is_ident)
}

/// Returns the body of the first branch whose condition is truthy, or of
/// the `@else` branch. Conditions that fail to evaluate are false.
fn select(text: &str, block: &Block, ctx: &Context<'_>) -> Range<usize> {
    for branch in &block.branches {
        let Some(cond) = &branch.cond else {
            return branch.body.clone();
        };
        let source = &text[cond.clone()];
        match expr::eval(source, ctx) {
            Ok(value) if value.is_truthy() => return branch.body.clone(),
            Ok(_) => {}
            Err(err) => log::debug!("treating condition `{source}` as false: {err}"),
        }
    }
    0..0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_block_branches() {
        let text = "@if(a)A@elseif(b)B@elseC@endif!";
        let block = parse_block(text, 0).unwrap();
        let branches: Vec<_> = block
            .branches
            .iter()
            .map(|b| (b.cond.clone().map(|c| &text[c]), &text[b.body.clone()]))
            .collect();
        assert_eq!(branches, [(Some("a"), "A"), (Some("b"), "B"), (None, "C")]);
        assert_eq!(&text[block.end..], "!");
    }

    #[test]
    fn parse_block_nested_branches_are_opaque() {
        let text = "@if(a)@if(b)x@elsey@endif@elsez@endif";
        let block = parse_block(text, 0).unwrap();
        assert_eq!(block.branches.len(), 2);
        assert_eq!(&text[block.branches[0].body.clone()], "@if(b)x@elsey@endif");
        assert_eq!(&text[block.branches[1].body.clone()], "z");
        assert_eq!(block.end, text.len());
    }

    #[test]
    fn parse_block_unmatched() {
        assert!(parse_block("@if(a)never closed", 0).is_none());
        assert!(parse_block("@if(a@endif", 0).is_none());
        assert!(parse_block("@if(a)@if(b)x@endif", 0).is_none());
    }

    #[test]
    fn parse_block_else_prefix_is_not_else() {
        let text = "@if(a)x@elsewhere@endif";
        let block = parse_block(text, 0).unwrap();
        assert_eq!(block.branches.len(), 1);
        assert_eq!(&text[block.branches[0].body.clone()], "x@elsewhere");
    }
}
