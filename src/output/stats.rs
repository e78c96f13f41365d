//! Visit statistics keyed by `uuid` prefix
//!
//! Pages of the target application carry the id of the object they show in
//! the `uuid` query parameter. Objects of one kind share a leading prefix, so
//! counting visits per prefix tells how much of each kind the crawl covered.

use crate::output::traits::Observer;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Default number of leading `uuid` characters forming a key
pub const DEFAULT_PREFIX_LEN: usize = 6;

/// Counts visited pages by the prefix of their `uuid` parameter
#[derive(Debug)]
pub struct UuidPrefixStats {
    prefix_len: usize,
    counts: Mutex<BTreeMap<String, u64>>,
}

impl Default for UuidPrefixStats {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX_LEN)
    }
}

impl UuidPrefixStats {
    /// Creates empty statistics keyed by the first `prefix_len` characters
    pub fn new(prefix_len: usize) -> Self {
        Self {
            prefix_len: prefix_len.max(1),
            counts: Mutex::new(BTreeMap::new()),
        }
    }

    /// Records one visited URL; URLs without a long enough `uuid` are ignored
    pub fn record(&self, url: &str) {
        let Some(key) = uuid_of(url).and_then(|uuid| prefix(&uuid, self.prefix_len)) else {
            return;
        };

        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        *counts.entry(key).or_insert(0) += 1;
    }

    /// A copy of the counts collected so far
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Observer for UuidPrefixStats {
    fn on_visited(&self, _status: u16, url: &str, _links: &[String], _errors: &[String]) {
        self.record(url);
    }
}

/// The first `uuid` query value of an absolute or relative URL
fn uuid_of(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "uuid")
        .map(|(_, value)| value.into_owned())
}

fn prefix(value: &str, len: usize) -> Option<String> {
    let key: String = value.chars().take(len).collect();
    (key.chars().count() == len).then_some(key)
}

/// Prints statistics to stdout, most visited prefixes first
pub fn print_statistics(counts: &BTreeMap<String, u64>) {
    println!("=== Visits by uuid prefix ===\n");

    if counts.is_empty() {
        println!("  (no pages with a uuid parameter)");
        return;
    }

    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (key, count) in sorted {
        println!("  {}: {}", key, count);
    }
}
