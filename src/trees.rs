#![deny(warnings)]

use crate::chart::{Chart, Item};
use crate::grammar::Symbol;
use std::rc::Rc;

/// One parse tree. Internal nodes carry the rule that licensed them,
/// leaves carry the scanned token.
#[derive(Clone, Debug, PartialEq)]
pub enum Tree {
    Leaf(String),
    Node(String, Vec<Tree>),
}

impl Tree {
    /// Indented dump for diagnostics.
    pub fn print(&self) -> String {
        let mut out = String::new();
        self.print_helper("", &mut out);
        out
    }

    fn print_helper(&self, level: &str, out: &mut String) {
        match self {
            Tree::Leaf(token) => *out += &format!("{}`-- {:?}\n", level, token),
            Tree::Node(rule, children) => {
                *out += &format!("{}`-- {}\n", level, rule);
                if let Some((last, rest)) = children.split_last() {
                    let mid = format!("{}  |", level);
                    for child in rest {
                        child.print_helper(&mid, out);
                    }
                    let end = format!("{}   ", level);
                    last.print_helper(&end, out);
                }
            }
        }
    }
}

/// Every distinct parse tree the chart licenses, rooted at the start
/// symbol, in chart-insertion order at each recursion level. Empty when
/// the input was rejected.
pub fn all_trees(chart: &Chart) -> Vec<Tree> {
    let Some(root) = chart.final_item() else {
        return Vec::new();
    };
    // The gamma rule wraps exactly one Start symbol; surface its trees.
    build_trees(chart, &root, chart.len() - 1)
        .into_iter()
        .map(|tree| match tree {
            Tree::Node(_, mut children) => children.remove(0),
            Tree::Leaf(_) => unreachable!("gamma node without a child"),
        })
        .collect()
}

/// First tree in enumeration order; the tree for unambiguous grammars.
pub fn first_tree(chart: &Chart) -> Option<Tree> {
    all_trees(chart).into_iter().next()
}

// Enumerate every tree for a completed `item` found in column `end`.
fn build_trees(chart: &Chart, item: &Rc<Item>, end: usize) -> Vec<Tree> {
    walk(chart, item, item.rule.spec.len(), end, &[])
}

// Match `item`'s production right-to-left. `upto` is how many symbols are
// still unmatched, `right` the column bounding the rightmost of them, and
// `children` the subtrees already accumulated to their right.
fn walk(chart: &Chart, item: &Rc<Item>, upto: usize, right: usize, children: &[Tree]) -> Vec<Tree> {
    if upto == 0 {
        // the walk must land exactly where the item began
        if right != item.origin {
            return Vec::new();
        }
        return vec![Tree::Node(item.rule.to_string(), children.to_vec())];
    }
    match &*item.rule.spec[upto - 1] {
        sym @ Symbol::Terminal(_) => match chart[right].token() {
            // the token that reached `right` is this symbol's leaf
            Some(token) if sym.matches(token) => {
                let children = prepend(Tree::Leaf(token.to_string()), children);
                walk(chart, item, upto - 1, right - 1, &children)
            }
            _ => Vec::new(),
        },
        Symbol::NonTerm(name) => {
            let mut trees = Vec::new();
            for st in chart[right].iter() {
                // Columns fill in completion order: nothing at or past the
                // item's own slot can take part in its derivation. This
                // cutoff is what keeps self-embedding rules from recursing
                // forever.
                if Rc::ptr_eq(st, item) {
                    break;
                }
                if !st.complete() || st.rule.head != *name {
                    continue;
                }
                // the leftmost symbol must stretch back to the item's origin
                if upto == 1 && st.origin != item.origin {
                    continue;
                }
                for subtree in build_trees(chart, st, right) {
                    let children = prepend(subtree, children);
                    trees.extend(walk(chart, item, upto - 1, st.origin, &children));
                }
            }
            trees
        }
    }
}

fn prepend(first: Tree, rest: &[Tree]) -> Vec<Tree> {
    let mut out = Vec::with_capacity(rest.len() + 1);
    out.push(first);
    out.extend(rest.iter().cloned());
    out
}
