#![deny(warnings)]

use crate::chart::{Chart, Item};
use crate::grammar::{Grammar, Rule, Symbol, GAMMA_RULE};
use std::rc::Rc;

pub struct EarleyParser {
    pub g: Grammar,
}

impl EarleyParser {
    pub fn new(grammar: Grammar) -> EarleyParser {
        EarleyParser { g: grammar }
    }

    /// Build the recognition chart for a token sequence. Rejection is not an
    /// error: the returned chart reports the outcome through
    /// `Chart::accepted` / `Chart::final_item` and stays open for inspection.
    pub fn parse<S>(&self, tok: S) -> Chart
    where
        S: Iterator,
        S::Item: AsRef<str>,
    {
        let tokens: Vec<String> = tok.map(|t| t.as_ref().to_string()).collect();
        let mut chart = Chart::new(tokens);

        // Seed column 0 with (γ -> · Start, 0)
        let gamma = Rc::new(Rule {
            head: GAMMA_RULE.to_string(),
            spec: vec![Rc::new(Symbol::NonTerm(self.g.start.clone()))],
        });
        chart.column_mut(0).insert(Item::predicted(&gamma, 0));

        for k in 0..chart.len() {
            // Walk the column by index against its live length; Predict and
            // Complete append to the column being walked and the loop must
            // run into those new items
            let mut idx = 0;
            while idx < chart[k].len() {
                let item = chart[k][idx].clone();
                match item.next_symbol() {
                    None => {
                        self.complete(&mut chart, k, &item);
                    }
                    Some(Symbol::NonTerm(name)) => {
                        self.predict(&mut chart, k, name);
                    }
                    Some(Symbol::Terminal(_)) => self.scan(&mut chart, k, &item),
                }
                idx += 1;
            }
            self.epsilon_closure(&mut chart, k);

            if cfg!(feature = "debug") {
                eprintln!("{:?}", chart[k]);
            }
        }
        chart
    }

    // Earley predict: one fresh item per production of `name`, anchored at k.
    // Reports whether the column changed.
    fn predict(&self, chart: &mut Chart, k: usize, name: &str) -> bool {
        let mut changed = false;
        for rule in self.g.rules_for(name) {
            changed |= chart.column_mut(k).insert(Item::predicted(rule, k));
        }
        changed
    }

    // Earley complete: go back to the column where `item` started and advance
    // everything that was waiting on its head. Reports whether the column
    // changed.
    fn complete(&self, chart: &mut Chart, k: usize, item: &Item) -> bool {
        let advanced: Vec<Item> = chart[item.origin]
            .iter()
            .filter(|source| item.can_complete(source))
            .map(|source| Item::advanced(source))
            .collect();
        let mut changed = false;
        for it in advanced {
            changed |= chart.column_mut(k).insert(it);
        }
        changed
    }

    // Earley scan: move the dot over a terminal that matches the next token.
    fn scan(&self, chart: &mut Chart, k: usize, item: &Item) {
        if k + 1 >= chart.len() {
            return;
        }
        let matched = match (item.next_symbol(), chart[k + 1].token()) {
            (Some(sym), Some(token)) => sym.matches(token),
            _ => false,
        };
        if matched {
            chart.column_mut(k + 1).insert(Item::advanced(item));
        }
    }

    // An empty production can complete inside the column that predicted it,
    // unlocking predictions and completions the single forward walk has
    // already passed over. Re-walk the column until a full pass inserts
    // nothing, where "inserted" means some insert reported a new item.
    fn epsilon_closure(&self, chart: &mut Chart, k: usize) {
        loop {
            let mut changed = false;
            let mut idx = 0;
            while idx < chart[k].len() {
                let item = chart[k][idx].clone();
                match item.next_symbol() {
                    None => changed |= self.complete(chart, k, &item),
                    Some(Symbol::NonTerm(name)) => changed |= self.predict(chart, k, name),
                    Some(Symbol::Terminal(_)) => (),
                }
                idx += 1;
            }
            if !changed {
                break;
            }
        }
    }
}
