//! Process environment and in-memory key sources.

use std::collections::HashMap;

use crate::ports::KeySource;

/// Reads variables from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvKeySource;

impl KeySource for EnvKeySource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Fixed set of variables (for tests and embedded configuration).
#[derive(Default, Clone)]
pub struct StaticKeySource {
    values: HashMap<String, String>,
}

impl StaticKeySource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl KeySource for StaticKeySource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl std::fmt::Debug for StaticKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("StaticKeySource").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d_parts_stop_at_gap() {
        let source = StaticKeySource::new()
            .with("ARXWEAVE_JWK_D_0", "aa")
            .with("ARXWEAVE_JWK_D_1", "bb")
            .with("ARXWEAVE_JWK_D_3", "dd");
        assert_eq!(source.d_parts(), vec!["aa".to_string(), "bb".to_string()]);
    }

    #[test]
    fn test_d_parts_numeric_not_lexical() {
        let mut source = StaticKeySource::new();
        for i in 0..12 {
            source = source.with(format!("ARXWEAVE_JWK_D_{i}"), format!("{i:02}"));
        }
        let parts = source.d_parts();
        assert_eq!(parts.len(), 12);
        assert_eq!(parts[10], "10");
        assert_eq!(parts[2], "02");
    }
}
