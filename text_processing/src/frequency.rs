//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use compact_str::CompactString;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use crate::stopword_registry::StopWordList;

/// Something that decides if a token is hidden from a ranking.
pub trait TokenExclusion {
    fn excludes(&self, token: &str) -> bool;
}

impl<S> TokenExclusion for HashSet<S> where S: Borrow<str> + Hash + Eq {
    #[inline]
    fn excludes(&self, token: &str) -> bool {
        self.contains(token)
    }
}

impl<S> TokenExclusion for [S] where S: AsRef<str> {
    fn excludes(&self, token: &str) -> bool {
        self.iter().any(|value| value.as_ref() == token)
    }
}

impl<S, const N: usize> TokenExclusion for [S; N] where S: AsRef<str> {
    #[inline]
    fn excludes(&self, token: &str) -> bool {
        self.as_slice().excludes(token)
    }
}

impl<S> TokenExclusion for Vec<S> where S: AsRef<str> {
    #[inline]
    fn excludes(&self, token: &str) -> bool {
        self.as_slice().excludes(token)
    }
}

impl TokenExclusion for StopWordList {
    #[inline]
    fn excludes(&self, token: &str) -> bool {
        self.is_stopword(token)
    }
}

impl<A, B> TokenExclusion for (A, B) where A: TokenExclusion, B: TokenExclusion {
    #[inline]
    fn excludes(&self, token: &str) -> bool {
        self.0.excludes(token) || self.1.excludes(token)
    }
}

impl<T> TokenExclusion for Option<T> where T: TokenExclusion {
    #[inline]
    fn excludes(&self, token: &str) -> bool {
        self.as_ref().is_some_and(|value| value.excludes(token))
    }
}

impl<T> TokenExclusion for &T where T: TokenExclusion + ?Sized {
    #[inline]
    fn excludes(&self, token: &str) -> bool {
        (**self).excludes(token)
    }
}

/// Counts every token of every document.
pub fn tabulate<D, I, W>(documents: D) -> FrequencyTable
where
    D: IntoIterator<Item=I>,
    I: IntoIterator<Item=W>,
    W: AsRef<str>
{
    let mut table = FrequencyTable::default();
    for document in documents {
        table.add(document);
    }
    table
}

/// The frequencies of the tokens in a corpus.
/// Keeps the order in which the tokens were first seen, ties in a ranking
/// are resolved by this order.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct FrequencyTable {
    document_count: u64,
    word_count: u64,
    word_counts: IndexMap<CompactString, u64>,
}

impl FrequencyTable {
    /// Adds the tokens of a single document. Counting is additive,
    /// adding the same document twice doubles the counts.
    pub fn add<I, W>(&mut self, doc: I)
    where
        I: IntoIterator<Item=W>,
        W: AsRef<str>
    {
        self.document_count = self.document_count.saturating_add(1);
        for value in doc {
            self.word_count = self.word_count.saturating_add(1);
            let value = value.as_ref();
            match self.word_counts.get_mut(value) {
                Some(count) => *count = count.saturating_add(1),
                None => {
                    self.word_counts.insert(CompactString::from(value), 1);
                }
            }
        }
    }

    /// Adds the counts of [other]. Tokens unknown to self are appended in the order of [other].
    pub fn merge(&mut self, other: &FrequencyTable) {
        self.document_count = self.document_count.saturating_add(other.document_count);
        self.word_count = self.word_count.saturating_add(other.word_count);
        for (word, count) in &other.word_counts {
            self.word_counts
                .entry(word.clone())
                .and_modify(|value| *value = value.saturating_add(*count))
                .or_insert(*count);
        }
    }

    /// Sets the count of every known token in [tokens] to zero.
    /// The entries stay in the table, unknown tokens are ignored.
    pub fn suppress<I, W>(&mut self, tokens: I)
    where
        I: IntoIterator<Item=W>,
        W: AsRef<str>
    {
        for token in tokens {
            if let Some(count) = self.word_counts.get_mut(token.as_ref()) {
                *count = 0;
            }
        }
    }

    /// The number of added documents
    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    /// The number of counted tokens, including repetitions.
    pub fn word_count(&self) -> u64 {
        self.word_count
    }

    /// The number of distinct tokens, including suppressed ones.
    pub fn unique_word_count(&self) -> usize {
        self.word_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_counts.is_empty()
    }

    /// The count of [token], None if it was never seen.
    pub fn count(&self, token: &str) -> Option<u64> {
        self.word_counts.get(token).copied()
    }

    /// Iterates the tokens in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item=(&str, u64)> {
        self.word_counts.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// The [n] most common tokens, the count of every excluded token is treated as zero.
    /// The table itself is not changed.
    pub fn top_n<E>(&self, n: usize, exclude: &E) -> Vec<(String, u64)>
    where
        E: TokenExclusion + ?Sized
    {
        self.top_n_filtered(n, |token| exclude.excludes(token))
    }

    /// The [n] most common tokens where [is_excluded] returns false.
    ///
    /// Sorted by count descending, equal counts keep the order the tokens were first seen.
    /// Tokens with a count of zero are never part of the result.
    pub fn top_n_filtered<F>(&self, n: usize, is_excluded: F) -> Vec<(String, u64)>
    where
        F: Fn(&str) -> bool
    {
        self.word_counts
            .iter()
            .filter(|(word, count)| **count > 0 && !is_excluded(word.as_str()))
            .sorted_by(|(_, a), (_, b)| b.cmp(a))
            .take(n)
            .map(|(word, count)| (word.to_string(), *count))
            .collect_vec()
    }
}

impl<W> FromIterator<W> for FrequencyTable where W: AsRef<str> {
    /// Collects a single document.
    fn from_iter<T: IntoIterator<Item=W>>(iter: T) -> Self {
        let mut table = Self::default();
        table.add(iter);
        table
    }
}

impl Display for FrequencyTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Document Count: {}\n", self.document_count)?;
        write!(f, "Word Count: {}\n", self.word_count)?;
        write!(f, "Unique Word Count: {}\n", self.unique_word_count())?;
        write!(f, "Words:")?;
        for (word, count) in &self.word_counts {
            write!(f, "\n  {word}: {count}")?;
        }
        Ok(())
    }
}
