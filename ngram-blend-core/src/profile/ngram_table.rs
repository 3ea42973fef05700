use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Frequency table mapping n-grams to their (possibly weighted) frequency.
///
/// Entries keep their insertion order until `sort_descending` is called,
/// after which they are ordered by decreasing frequency. The sort is stable:
/// equal frequencies keep their previous relative order.
///
/// # Invariants
/// - Keys are unique
/// - Values are finite; negative values are tolerated and merged like any other
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct NgramTable {
	entries: IndexMap<String, f64>,
}

impl NgramTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the frequency recorded for `ngram`, if any.
	pub fn get(&self, ngram: &str) -> Option<f64> {
		self.entries.get(ngram).copied()
	}

	/// Sets the frequency of `ngram`, replacing any previous value.
	pub fn insert(&mut self, ngram: impl Into<String>, frequency: f64) {
		self.entries.insert(ngram.into(), frequency);
	}

	/// Adds `frequency` to `ngram`.
	///
	/// Unknown n-grams are appended with `frequency` as their value.
	pub fn add(&mut self, ngram: &str, frequency: f64) {
		match self.entries.get_mut(ngram) {
			Some(existing) => *existing += frequency,
			None => {
				self.entries.insert(ngram.to_owned(), frequency);
			}
		}
	}

	/// Adds every entry of `other` into this table (key union, summed values).
	pub fn absorb(&mut self, other: &NgramTable) {
		for (ngram, frequency) in other.iter() {
			self.add(ngram, frequency);
		}
	}

	/// Multiplies every frequency by `weight`.
	pub fn scale(&mut self, weight: f64) {
		for frequency in self.entries.values_mut() {
			*frequency *= weight;
		}
	}

	/// Reorders entries by decreasing frequency (stable).
	pub fn sort_descending(&mut self) {
		self.entries.sort_by(|_, a, _, b| b.total_cmp(a));
	}

	/// Returns `true` if frequencies never increase along the table.
	pub fn is_sorted_descending(&self) -> bool {
		self.entries
			.values()
			.zip(self.entries.values().skip(1))
			.all(|(previous, next)| previous >= next)
	}

	/// Sum of all frequencies.
	pub fn total(&self) -> f64 {
		self.entries.values().sum()
	}

	/// Iterates entries in table order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), *v))
	}
}

impl<K: Into<String>> FromIterator<(K, f64)> for NgramTable {
	fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
		let mut table = NgramTable::new();
		for (ngram, frequency) in iter {
			table.insert(ngram, frequency);
		}
		table
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_inserts_missing_and_sums_existing() {
		let mut table: NgramTable = [("th", 3.0)].into_iter().collect();
		table.add("th", 2.0);
		table.add("he", 1.5);

		assert_eq!(table.get("th"), Some(5.0));
		assert_eq!(table.get("he"), Some(1.5));
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn sort_is_descending_and_stable() {
		let mut table: NgramTable = [("ab", 1.0), ("cd", 4.0), ("ef", 1.0), ("gh", 2.0)].into_iter().collect();
		assert!(!table.is_sorted_descending());

		table.sort_descending();

		let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
		assert_eq!(keys, vec!["cd", "gh", "ab", "ef"]);
		assert!(table.is_sorted_descending());
	}

	#[test]
	fn scale_keeps_order() {
		let mut table: NgramTable = [("a", 10.0), ("b", 4.0)].into_iter().collect();
		table.scale(0.5);
		assert_eq!(table.iter().collect::<Vec<_>>(), vec![("a", 5.0), ("b", 2.0)]);
	}
}
