use std::fmt;

use thiserror::Error;

use crate::context::ContextSnapshot;
use crate::kernel::action::ActionResult;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleError {
    pub message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type RuleOutcome = Result<Option<ActionResult>, RuleError>;

/// Pure function of a snapshot. The same snapshot must yield the same outcome.
pub trait Rule: Send {
    fn evaluate(&self, ctx: &ContextSnapshot) -> RuleOutcome;
}

impl<F> Rule for F
where
    F: Fn(&ContextSnapshot) -> RuleOutcome + Send,
{
    fn evaluate(&self, ctx: &ContextSnapshot) -> RuleOutcome {
        self(ctx)
    }
}

/// Insertion-ordered rule map. Re-registering a name swaps the function in
/// place, so evaluation order follows first registration.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<(String, Box<dyn Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&ContextSnapshot) -> RuleOutcome + Send + 'static,
    {
        self.insert(name, Box::new(rule));
    }

    /// Registers a rule object, for rules that are not plain closures.
    pub fn insert(&mut self, name: impl Into<String>, rule: Box<dyn Rule>) {
        let name = name.into();
        match self.rules.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = rule,
            None => self.rules.push((name, rule)),
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|(k, _)| k != name);
        self.rules.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, rule)| rule.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Rule)> {
        self.rules.iter().map(|(k, rule)| (k.as_str(), rule.as_ref()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
