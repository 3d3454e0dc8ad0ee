#![deny(warnings)]

use crate::grammar::{Rule, Symbol, GAMMA_RULE};
use std::collections::HashSet;
use std::ops::Index;
use std::rc::Rc;
use std::{fmt, slice};

/// An Earley item: a production with match progress `dot`, begun at input
/// position `origin`. The head of the production is implicit in the rule.
#[derive(PartialEq, Eq, Hash)]
pub struct Item {
    pub rule: Rc<Rule>,
    pub dot: usize,
    pub origin: usize,
}

impl Item {
    pub fn complete(&self) -> bool {
        self.dot >= self.rule.spec.len()
    }

    pub fn next_symbol(&self) -> Option<&Symbol> {
        self.rule.symbol_at(self.dot).map(|s| &**s)
    }

    // check if a source item's next symbol is the non-terminal this
    // completed item just derived
    pub(crate) fn can_complete(&self, source: &Item) -> bool {
        self.complete()
            && match source.next_symbol() {
                Some(Symbol::NonTerm(name)) => *name == self.rule.head,
                _ => false,
            }
    }

    // build a new Item for a prediction
    pub(crate) fn predicted(rule: &Rc<Rule>, origin: usize) -> Item {
        Item {
            rule: rule.clone(),
            dot: 0,
            origin,
        }
    }

    // the dot moves over one symbol; the origin is preserved
    pub(crate) fn advanced(source: &Item) -> Item {
        Item {
            rule: source.rule.clone(),
            dot: source.dot + 1,
            origin: source.origin,
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pre = self
            .rule
            .spec
            .iter()
            .take(self.dot)
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(" ");
        let post = self
            .rule
            .spec
            .iter()
            .skip(self.dot)
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(" ");
        write!(
            f,
            "({}) {} -> {} \u{00b7} {}",
            self.origin, self.rule.head, pre, post
        )
    }
}

/// A chart column: the ordered, de-duplicated items active at one input
/// position, anchored to the token that was scanned to reach it.
pub struct Column {
    index: usize,
    token: Option<String>,
    order: Vec<Rc<Item>>,
    dedup: HashSet<Rc<Item>>,
}

impl Column {
    fn new(index: usize, token: Option<String>) -> Column {
        Column {
            index,
            token,
            order: Vec::new(),
            dedup: HashSet::new(),
        }
    }

    /// Append `item` unless an equal one is already present; first
    /// appearance wins the slot. Reports whether the column changed.
    pub(crate) fn insert(&mut self, item: Item) -> bool {
        if self.dedup.contains(&item) {
            return false;
        }
        let item = Rc::new(item);
        self.order.push(item.clone());
        self.dedup.insert(item);
        true
    }

    /// Position of this column in the chart.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The token scanned to reach this column; None for column 0.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate in insertion order. The recognizer instead walks columns by
    /// index against the live length, so items appended mid-pass are seen.
    pub fn iter(&self) -> slice::Iter<'_, Rc<Item>> {
        self.order.iter()
    }
}

impl Index<usize> for Column {
    type Output = Rc<Item>;
    fn index(&self, idx: usize) -> &Rc<Item> {
        self.order.index(idx)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[{}] {:?}", self.index, self.token.as_deref().unwrap_or(""))?;
        for item in &self.order {
            writeln!(f, "  {:?}", item)?;
        }
        Ok(())
    }
}

/// The full recognition table: one column per input position, `N + 1` in
/// total. Built monotonically by the recognizer, immutable afterwards.
pub struct Chart {
    columns: Vec<Column>,
}

impl Chart {
    pub(crate) fn new(tokens: Vec<String>) -> Chart {
        let mut columns = vec![Column::new(0, None)];
        columns.extend(
            tokens
                .into_iter()
                .enumerate()
                .map(|(i, tok)| Column::new(i + 1, Some(tok))),
        );
        Chart { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub(crate) fn column_mut(&mut self, k: usize) -> &mut Column {
        &mut self.columns[k]
    }

    /// The accepting gamma item spanning the whole input, if recognition
    /// succeeded. Its absence means the input was rejected.
    pub fn final_item(&self) -> Option<Rc<Item>> {
        self.columns
            .last()?
            .iter()
            .find(|it| it.rule.head == GAMMA_RULE && it.complete() && it.origin == 0)
            .cloned()
    }

    pub fn accepted(&self) -> bool {
        self.final_item().is_some()
    }
}

impl Index<usize> for Chart {
    type Output = Column;
    fn index(&self, idx: usize) -> &Column {
        self.columns.index(idx)
    }
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for col in &self.columns {
            write!(f, "{:?}", col)?;
        }
        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Chart, Column, Item, Rule, Symbol};
    use std::rc::Rc;

    fn terminal(atom: &str) -> Rc<Symbol> {
        Rc::new(Symbol::Terminal(atom.to_string()))
    }

    fn nonterm(name: &str) -> Rc<Symbol> {
        Rc::new(Symbol::NonTerm(name.to_string()))
    }

    fn gen_rule1() -> Rc<Rule> {
        // S -> S + 1
        Rc::new(Rule::new("S", &[nonterm("S"), terminal("+"), terminal("1")]))
    }

    fn gen_rule2() -> Rc<Rule> {
        // M -> M * 1
        Rc::new(Rule::new("M", &[nonterm("M"), terminal("*"), terminal("1")]))
    }

    fn item(rule: Rc<Rule>, dot: usize, origin: usize) -> Item {
        Item { rule, dot, origin }
    }

    #[test]
    fn item_eq() {
        let rule1 = gen_rule1();
        let rule2 = gen_rule2();
        assert_eq!(Item::predicted(&rule1, 0), Item::predicted(&rule1, 0));
        assert_ne!(Item::predicted(&rule1, 0), Item::predicted(&rule2, 0));
        assert_ne!(Item::predicted(&rule1, 0), Item::predicted(&rule1, 1));
        assert_ne!(item(rule1.clone(), 1, 0), item(rule1.clone(), 2, 0));
    }

    #[test]
    fn item_progress() {
        let rule1 = gen_rule1();
        assert!(!item(rule1.clone(), 2, 0).complete());
        assert!(item(rule1.clone(), 3, 0).complete());
        assert!(!item(rule1.clone(), 0, 0).next_symbol().unwrap().is_terminal());
        assert!(item(rule1.clone(), 1, 0).next_symbol().unwrap().is_terminal());
        assert_eq!(item(rule1, 3, 0).next_symbol(), None);
    }

    #[test]
    fn item_advance() {
        let rule1 = gen_rule1();
        let source = item(rule1.clone(), 1, 3);
        let advanced = Item::advanced(&source);
        assert_eq!(advanced, item(rule1, 2, 3));
    }

    #[test]
    fn item_completes_source() {
        // completed: S -> S + 1 ·   against source  X -> · S
        let completed = item(gen_rule1(), 3, 0);
        let source_rule = Rc::new(Rule::new("X", &[nonterm("S")]));
        assert!(completed.can_complete(&item(source_rule, 0, 0)));
        // a source waiting on a terminal is never completed into
        let scan_rule = Rc::new(Rule::new("X", &[terminal("+")]));
        assert!(!completed.can_complete(&item(scan_rule, 0, 0)));
    }

    #[test]
    fn column_dedups() {
        let rule = gen_rule2();
        let mut col = Column::new(0, None);
        assert!(col.insert(item(rule.clone(), 0, 0)));
        assert!(!col.insert(item(rule.clone(), 0, 0)));
        assert_eq!(col.len(), 1);
        assert!(col.insert(item(rule.clone(), 1, 0)));
        assert!(!col.insert(item(rule.clone(), 1, 0)));
        assert_eq!(col.len(), 2);
        assert!(col.insert(item(rule.clone(), 2, 0)));
        assert_eq!(col.len(), 3);
        // insertion order is the order of first appearance
        let dots: Vec<usize> = col.iter().map(|it| it.dot).collect();
        assert_eq!(dots, vec![0, 1, 2]);
    }

    #[test]
    fn chart_columns_anchor_tokens() {
        let chart = Chart::new(vec!["1".to_string(), "+".to_string(), "1".to_string()]);
        assert_eq!(chart.len(), 4);
        assert!(!chart.is_empty());
        assert_eq!(chart[0].token(), None);
        assert_eq!(chart[1].token(), Some("1"));
        assert_eq!(chart[2].token(), Some("+"));
        assert_eq!(chart[3].token(), Some("1"));
        for (k, col) in chart.iter().enumerate() {
            assert_eq!(col.index(), k);
            assert!(col.is_empty());
        }
    }

    #[test]
    fn empty_chart_has_no_final_item() {
        let chart = Chart::new(Vec::new());
        assert_eq!(chart.len(), 1);
        assert!(chart.final_item().is_none());
        assert!(!chart.accepted());
    }
}
