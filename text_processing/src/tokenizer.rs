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

use std::sync::LazyLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::configs::{DEFAULT_MAX_TOKEN_LENGTH, DEFAULT_MIN_TOKEN_LENGTH};

/// A run of word characters without digits.
static ALPHABETIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\W\d]+").unwrap());

/// A primitive tokenizer, splits a text into lowercased alphabetic words.
/// Digits and punctuation never end up in a token.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Tokenizer {
    min_len: usize,
    max_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TOKEN_LENGTH, DEFAULT_MAX_TOKEN_LENGTH)
    }
}

impl Tokenizer {
    /// Tokens are kept if `min_len <= chars <= max_len`.
    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Tokenizes [text], the order of the words is kept.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> impl Iterator<Item=String> + 'a {
        ALPHABETIC_TOKEN
            .find_iter(text)
            .map(|found| found.as_str().to_lowercase())
            .filter(|token| {
                let len = token.chars().count();
                self.min_len <= len && len <= self.max_len && !token.starts_with('_')
            })
    }
}
