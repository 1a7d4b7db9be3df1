//! Quote catalog loading
//!
//! The source file holds one entry per line. A line containing " || " is
//! split into several quotes that share a single wallpaper.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use std::path::Path;

/// One or more quotes rendered together on a single wallpaper.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSet(Vec<String>);

impl QuoteSet {
    pub fn new(quotes: Vec<String>) -> Option<Self> {
        if quotes.is_empty() {
            None
        } else {
            Some(Self(quotes))
        }
    }

    pub fn quotes(&self) -> &[String] {
        &self.0
    }
}

/// All quote sets available for one run. Never empty.
#[derive(Debug, Clone)]
pub struct QuoteCatalog(Vec<QuoteSet>);

impl QuoteCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading quote file {}", path.display()))?;

        let sets = parse(&text);
        if sets.is_empty() {
            anyhow::bail!("no usable quotes in {}", path.display());
        }
        Ok(Self(sets))
    }

    /// Pick one quote set per display. Sets are distinct while the catalog
    /// is large enough; repeats are allowed once it runs out.
    pub fn pick(&self, count: usize) -> Result<Vec<&QuoteSet>> {
        let mut rng = rand::thread_rng();
        if self.0.len() >= count {
            Ok(self.0.choose_multiple(&mut rng, count).collect())
        } else {
            (0..count)
                .map(|_| self.0.choose(&mut rng).context("catalog is empty"))
                .collect()
        }
    }
}

fn parse(text: &str) -> Vec<QuoteSet> {
    let mut sets = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.contains(" || ") {
            let segments: Vec<String> = line
                .split("||")
                .map(|segment| segment.trim().to_string())
                .filter(|segment| !segment.is_empty())
                .collect();
            if let Some(set) = QuoteSet::new(segments) {
                sets.push(set);
            }
        } else if let Some(set) = QuoteSet::new(vec![line.to_string()]) {
            sets.push(set);
        }
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_is_single_quote_set() {
        let sets = parse("Hello");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].quotes(), &["Hello".to_string()]);
    }

    #[test]
    fn test_separator_splits_into_ordered_set() {
        let sets = parse("A || B || C");
        assert_eq!(sets.len(), 1);
        assert_eq!(
            sets[0].quotes(),
            &["A".to_string(), "B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let sets = parse("First\n\n   \nSecond\n");
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].quotes(), &["First".to_string()]);
        assert_eq!(sets[1].quotes(), &["Second".to_string()]);
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let sets = parse("A ||  || B");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].quotes(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_empty_input_yields_no_sets() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn test_load_fails_on_missing_file() {
        let result = QuoteCatalog::load(Path::new("/nonexistent/quotes.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_pick_returns_distinct_sets_when_possible() {
        let catalog = QuoteCatalog(parse("one\ntwo\nthree\nfour"));
        let picked = catalog.pick(3).unwrap();
        assert_eq!(picked.len(), 3);
        let mut seen: Vec<_> = picked.iter().map(|s| s.quotes()[0].clone()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_pick_repeats_when_catalog_is_small() {
        let catalog = QuoteCatalog(parse("only one"));
        let picked = catalog.pick(3).unwrap();
        assert_eq!(picked.len(), 3);
        for set in picked {
            assert_eq!(set.quotes(), &["only one".to_string()]);
        }
    }
}
