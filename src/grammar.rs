#![deny(warnings)]

use std::collections::HashMap;
use std::rc::Rc;
use std::fmt;
use thiserror::Error;

// Head of the synthetic rule wrapping the start symbol, so acceptance is a
// single uniform predicate (unicode small gamma, not a usable symbol name).
pub(crate) const GAMMA_RULE: &str = "\u{0263}";

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    NonTerm(String),
    // A terminal carries the literal token atom it accepts
    Terminal(String),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::NonTerm(name) => name,
            Symbol::Terminal(atom) => atom,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Match a terminal's atom against an input token. NonTerms never match.
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Symbol::Terminal(atom) => atom == token,
            Symbol::NonTerm(_) => false,
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Terminal(atom) => write!(f, "Terminal({})", atom),
            Symbol::NonTerm(name) => write!(f, "NonTerm({})", name),
        }
    }
}

#[derive(PartialEq, Eq, Hash)]
pub struct Rule {
    pub head: String,
    pub spec: Vec<Rc<Symbol>>,
}

impl Rule {
    #[cfg(test)]
    pub(crate) fn new(head: &str, spec: &[Rc<Symbol>]) -> Self {
        Rule {
            head: head.to_string(),
            spec: spec.to_vec(),
        }
    }

    pub fn symbol_at(&self, idx: usize) -> Option<&Rc<Symbol>> {
        self.spec.get(idx)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.head,
            self.spec
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
    #[error("missing symbol: {0}")]
    MissingSymbol(String),
    #[error("duplicate rule: {0}")]
    DuplicateRule(String),
    #[error("rule head must be a non-terminal: {0}")]
    TerminalRuleHead(String),
    #[error("start symbol must be a non-terminal: {0}")]
    TerminalStart(String),
    #[error("missing start symbol: {0}")]
    MissingStart(String),
}

#[derive(Clone)]
pub struct Grammar {
    pub start: String,
    pub rules: Vec<Rc<Rule>>,
}

impl Grammar {
    /// Productions registered under `head`, in definition order.
    pub fn rules_for<'a>(&'a self, head: &'a str) -> impl Iterator<Item = &'a Rc<Rule>> {
        self.rules.iter().filter(move |r| r.head == head)
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use std::collections::hash_map::Entry;
        let mut group_order = Vec::new();
        let mut rule_groups = HashMap::new();
        for r in &self.rules {
            match rule_groups.entry(&r.head) {
                Entry::Vacant(e) => {
                    group_order.push(&r.head);
                    e.insert(Vec::new()).push(r);
                }
                Entry::Occupied(mut e) => e.get_mut().push(r),
            }
        }
        writeln!(f, "Start: {}", self.start)?;
        for head in group_order {
            for rule in &rule_groups[head] {
                writeln!(f, "{}", rule)?;
            }
        }
        Ok(())
    }
}

/// Builds a Grammar while validating symbol existence and rule sanity.
/// The first failed check is latched and surfaced by `into_grammar`.
#[derive(Default)]
pub struct GrammarBuilder {
    symbols: HashMap<String, Rc<Symbol>>,
    rules: Vec<Rc<Rule>>,
    error: Option<GrammarError>,
}

impl GrammarBuilder {
    fn add_symbol(&mut self, symbol: Symbol) {
        // Existence check keeps later registrations from stomping earlier ones
        if !self.symbols.contains_key(symbol.name()) {
            self.symbols
                .insert(symbol.name().to_string(), Rc::new(symbol));
        } else {
            self.error = Some(GrammarError::DuplicateSymbol(symbol.name().to_string()));
        }
    }

    pub fn nonterm(mut self, name: &str) -> Self {
        self.add_symbol(Symbol::NonTerm(name.into()));
        self
    }

    pub fn terminal(mut self, atom: &str) -> Self {
        self.add_symbol(Symbol::Terminal(atom.into()));
        self
    }

    fn add_rule(&mut self, head: &str, spec: &[&str]) {
        // All referenced symbols must have been registered
        if let Some(s) = spec.iter().find(|n| !self.symbols.contains_key(**n)) {
            self.error = Some(GrammarError::MissingSymbol(s.to_string()));
            return;
        }
        match self.symbols.get(head) {
            Some(s) if s.is_terminal() => {
                self.error = Some(GrammarError::TerminalRuleHead(head.to_string()));
                return;
            }
            None => {
                self.error = Some(GrammarError::MissingSymbol(head.to_string()));
                return;
            }
            Some(_) => (),
        }
        let rule = Rc::new(Rule {
            head: head.to_string(),
            spec: spec.iter().map(|s| self.symbols[*s].clone()).collect(),
        });
        // NOTE: `Rc`s compare equal on their inner value
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        } else {
            self.error = Some(GrammarError::DuplicateRule(rule.to_string()));
        }
    }

    /// Register a production under `head`. An empty `spec` is epsilon.
    /// More productions may be added to a head at any time, which is what
    /// makes self-referential rules possible.
    pub fn rule(mut self, head: &str, spec: &[&str]) -> Self {
        self.add_rule(head, spec);
        self
    }

    pub fn into_grammar(mut self, start: &str) -> Result<Grammar, GrammarError> {
        match self.symbols.get(start) {
            Some(s) if s.is_terminal() => {
                self.error = Some(GrammarError::TerminalStart(start.to_string()))
            }
            None => self.error = Some(GrammarError::MissingStart(start.to_string())),
            Some(_) => (),
        }
        match self.error {
            Some(e) => Err(e),
            None => Ok(Grammar {
                start: start.to_string(),
                rules: self.rules,
            }),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
