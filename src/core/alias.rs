// src/core/alias.rs

//! # Alias Resolver
//!
//! An alias is a literal line prefix (conventionally ending with a space, like `"pyc "`)
//! rewritten to a longer command before dispatch. Aliases are tried in insertion order,
//! the first one that prefixes the line wins, and the rewritten line is never scanned again.

/// Ordered alias table: prefix -> replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alias at the end of the table, or updates an existing one in place.
    ///
    /// Empty prefixes are ignored: they would match every line.
    pub fn insert(&mut self, alias: impl Into<String>, command: impl Into<String>) {
        let alias = alias.into();
        let command = command.into();
        if alias.is_empty() {
            log::warn!("Ignoring alias with an empty prefix (-> {:?}).", command);
            return;
        }
        match self.entries.iter_mut().find(|(existing, _)| *existing == alias) {
            Some(entry) => entry.1 = command,
            None => self.entries.push((alias, command)),
        }
    }

    /// Iterates over `(alias, command)` pairs in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(alias, command)| (alias.as_str(), command.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites the leading alias of `line`, if any. At most one alias is applied.
    pub fn resolve(&self, line: &str) -> String {
        log::debug!("Resolve alias...");
        for (alias, command) in &self.entries {
            if let Some(rest) = line.strip_prefix(alias.as_str()) {
                log::info!("Alias found: {:?} -> {:?}", alias, command);
                return format!("{}{}", command, rest);
            }
        }
        line.to_string()
    }
}

impl<A: Into<String>, C: Into<String>> FromIterator<(A, C)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (A, C)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (alias, command) in iter {
            table.insert(alias, command);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python_aliases() -> AliasTable {
        AliasTable::from_iter([("pyc ", "python3 -c "), ("pym ", "python3 -m ")])
    }

    #[test]
    fn test_resolve_leading_alias() {
        let table = python_aliases();
        assert_eq!(table.resolve("pyc print(1)"), "python3 -c print(1)");
        assert_eq!(table.resolve("pym http.server"), "python3 -m http.server");
    }

    #[test]
    fn test_lines_without_alias_are_unchanged() {
        let table = python_aliases();
        for line in ["ls -la", "", "pyc", "echo pyc x", " pyc print(1)", "PYC x"] {
            assert_eq!(table.resolve(line), line);
        }
    }

    #[test]
    fn test_only_the_prefix_is_replaced() {
        let table = python_aliases();
        assert_eq!(table.resolve("pyc pyc pyc "), "python3 -c pyc pyc ");
    }

    #[test]
    fn test_at_most_one_alias_is_applied() {
        // The replacement itself starts with the second alias.
        let table = AliasTable::from_iter([("ll ", "la -l "), ("la ", "ls -a ")]);
        assert_eq!(table.resolve("ll /tmp"), "la -l /tmp");
    }

    #[test]
    fn test_first_match_wins_in_insertion_order() {
        let table = AliasTable::from_iter([("g", "git"), ("gs ", "git status ")]);
        assert_eq!(table.resolve("gs x"), "gits x");

        let table = AliasTable::from_iter([("gs ", "git status "), ("g", "git")]);
        assert_eq!(table.resolve("gs x"), "git status x");
    }

    #[test]
    fn test_insert_updates_in_place_and_skips_empty() {
        let mut table = python_aliases();
        table.insert("pyc ", "python -c ");
        table.insert("", "boom");
        assert_eq!(table.len(), 2);
        let first = table.iter().next().unwrap();
        assert_eq!(first, ("pyc ", "python -c "));
    }
}
