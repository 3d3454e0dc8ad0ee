#![deny(warnings)]

mod grammar;
pub use crate::grammar::{Grammar, GrammarBuilder, GrammarError, Rule, Symbol};

mod chart;
pub use crate::chart::{Chart, Column, Item};

mod parser;
pub use crate::parser::EarleyParser;

mod trees;
pub use crate::trees::{all_trees, first_tree, Tree};
