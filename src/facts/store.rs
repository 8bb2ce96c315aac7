use serde_json::{Map, Value};

/// Insertion-ordered map of named facts.
///
/// Replacing a fact keeps its original position, so `query` results stay in
/// first-insert order.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    entries: Vec<(String, Value)>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or silently replaces a fact.
    pub fn add_fact(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Shallow-merges the keys of `patch` into the current object value.
    /// A missing or non-object current value is treated as `{}`; a non-object
    /// patch replaces the fact outright.
    pub fn update_fact(&mut self, name: &str, patch: Value) {
        let Value::Object(patch) = patch else {
            self.add_fact(name, patch);
            return;
        };

        let mut merged = match self.get(name) {
            Some(Value::Object(current)) => current.clone(),
            _ => Map::new(),
        };
        merged.extend(patch);
        self.add_fact(name, Value::Object(merged));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Linear, case-sensitive scan over names and serialized values.
    pub fn query(&self, pattern: &str) -> Vec<(&str, &Value)> {
        self.entries
            .iter()
            .filter(|(name, value)| name.contains(pattern) || value.to_string().contains(pattern))
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replace_keeps_position() {
        let mut facts = FactStore::new();
        facts.add_fact("a", json!(1));
        facts.add_fact("b", json!(2));
        facts.add_fact("a", json!(3));

        let names: Vec<_> = facts.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(facts.get("a"), Some(&json!(3)));
    }

    #[test]
    fn query_matches_name_or_value_case_sensitive() {
        let mut facts = FactStore::new();
        facts.add_fact("market-conditions", json!({ "trending": ["Smart Contracts"] }));
        facts.add_fact("platform-state", json!({ "systemHealth": "good" }));

        let hits = facts.query("Smart");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "market-conditions");

        assert!(facts.query("smart contracts").is_empty());
        assert_eq!(facts.query("state").len(), 1);
        assert_eq!(facts.query("-").len(), 2);
    }

    #[test]
    fn update_merges_objects() {
        let mut facts = FactStore::new();
        facts.add_fact("platform-state", json!({ "activeUsers": 0, "systemHealth": "good" }));
        facts.update_fact("platform-state", json!({ "activeUsers": 12 }));
        facts.update_fact("fresh", json!({ "x": true }));

        assert_eq!(
            facts.get("platform-state"),
            Some(&json!({ "activeUsers": 12, "systemHealth": "good" }))
        );
        assert_eq!(facts.get("fresh"), Some(&json!({ "x": true })));
        assert_eq!(facts.get("missing"), None);
    }
}
