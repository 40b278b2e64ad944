//! # Ordered group of named plugin symbols.
//!
//! [`PluginGroup`] replaces a process-wide registry: callers own a group,
//! register symbols into it and ask for them in resolved order.
//!
//! ## Ordering
//! ```text
//! base order:  (rank(placement), plugin name, registration index)
//!              rank: First=0, None/Before/After=1, Last=2
//! edges:       Before(x): self ──► x      After(x): x ──► self
//! resolution:  Kahn's algorithm, always taking the ready entry with the
//!              smallest base key, so unconstrained entries keep base order
//! ```
//! Hints naming a plugin that is not registered are ignored.

use std::collections::BTreeSet;

use crate::error::CliError;
use crate::plugin::Placement;

/// One registered symbol.
struct Entry<T> {
    plugin: String,
    placement: Placement,
    symbol: T,
}

/// Named, placed symbols resolved into a deterministic order.
pub struct PluginGroup<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for PluginGroup<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> PluginGroup<T> {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `symbol` under `plugin` with an ordering hint.
    pub fn register(
        &mut self,
        plugin: impl Into<String>,
        placement: Placement,
        symbol: T,
    ) -> &mut Self {
        self.entries.push(Entry {
            plugin: plugin.into(),
            placement,
            symbol,
        });
        self
    }

    /// Number of registered symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plugin names in resolved order.
    pub fn plugins(&self) -> Result<Vec<&str>, CliError> {
        Ok(self.ordered()?.into_iter().map(|(name, _)| name).collect())
    }

    /// Symbols in resolved order.
    pub fn symbols(&self) -> Result<Vec<&T>, CliError> {
        Ok(self.ordered()?.into_iter().map(|(_, sym)| sym).collect())
    }

    /// `(plugin, symbol)` pairs in resolved order.
    pub fn ordered(&self) -> Result<Vec<(&str, &T)>, CliError> {
        Ok(self
            .order()?
            .into_iter()
            .map(|idx| {
                let e = &self.entries[idx];
                (e.plugin.as_str(), &e.symbol)
            })
            .collect())
    }

    fn order(&self) -> Result<Vec<usize>, CliError> {
        let n = self.entries.len();
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut indegree = vec![0usize; n];

        for (idx, entry) in self.entries.iter().enumerate() {
            let (target, before) = match &entry.placement {
                Placement::Before(target) => (target, true),
                Placement::After(target) => (target, false),
                _ => continue,
            };
            for (other, candidate) in self.entries.iter().enumerate() {
                if other == idx || candidate.plugin != *target {
                    continue;
                }
                let (from, to) = if before { (idx, other) } else { (other, idx) };
                successors[from].push(to);
                indegree[to] += 1;
            }
        }

        let key = |idx: usize| {
            let e = &self.entries[idx];
            (e.placement.rank(), e.plugin.as_str(), idx)
        };
        let mut ready: BTreeSet<_> = (0..n).filter(|&i| indegree[i] == 0).map(key).collect();
        let mut order = Vec::with_capacity(n);

        while let Some((_, _, idx)) = ready.pop_first() {
            order.push(idx);
            for &next in &successors[idx] {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    ready.insert(key(next));
                }
            }
        }

        if order.len() < n {
            let mut plugins: Vec<String> = (0..n)
                .filter(|&i| indegree[i] > 0)
                .map(|i| self.entries[i].plugin.clone())
                .collect();
            plugins.sort();
            plugins.dedup();
            return Err(CliError::PlacementCycle { plugins });
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(specs: &[(&str, &str)]) -> PluginGroup<()> {
        let mut g = PluginGroup::new();
        for (name, placement) in specs {
            g.register(*name, placement.parse().unwrap(), ());
        }
        g
    }

    #[test]
    fn unplaced_plugins_sort_by_name() {
        let g = group(&[("c", ""), ("a", ""), ("b", "")]);
        assert_eq!(g.plugins().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn first_and_last_buckets() {
        let g = group(&[("a", ">"), ("b", ""), ("z", "<")]);
        assert_eq!(g.plugins().unwrap(), vec!["z", "b", "a"]);
    }

    #[test]
    fn relative_placements_are_honoured() {
        let g = group(&[
            ("cliwork/debug", ""),
            ("cliwork/log", "<cliwork/debug"),
            ("aaa", ""),
        ]);
        assert_eq!(g.plugins().unwrap(), vec!["aaa", "cliwork/log", "cliwork/debug"]);

        let g = group(&[("b", ">c"), ("c", ""), ("a", "")]);
        assert_eq!(g.plugins().unwrap(), vec!["a", "c", "b"]);
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let g = group(&[("b", "<nope"), ("a", "")]);
        assert_eq!(g.plugins().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn same_plugin_keeps_registration_order() {
        let mut g = PluginGroup::new();
        g.register("p", Placement::None, 1)
            .register("p", Placement::None, 2)
            .register("o", Placement::None, 0);
        let syms: Vec<i32> = g.symbols().unwrap().into_iter().copied().collect();
        assert_eq!(syms, vec![0, 1, 2]);
    }

    #[test]
    fn cycles_are_reported() {
        let g = group(&[("a", "<b"), ("b", "<a"), ("c", "")]);
        match g.plugins() {
            Err(CliError::PlacementCycle { plugins }) => assert_eq!(plugins, vec!["a", "b"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }
}
