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

use std::collections::HashSet;
use std::ops::Deref;
use compact_str::CompactString;
use isolang::Language;
use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use crate::stopword_registry::StopWordRepository;

/// The default for [NormalizerConfig::min_token_length]
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;
/// The default for [NormalizerConfig::max_token_length]
pub const DEFAULT_MAX_TOKEN_LENGTH: usize = 15;

/// Link patterns found in tweets that the plain url removal misses.
/// Everything after a `http` is dropped, including the rest of the tweet.
pub const TWEET_LINK_PATTERNS: [&str; 3] = [
    r"pic\.twitter\.com/.*",
    r"imza\.la.*http://.*fb\.me/.*",
    r"http.*",
];

/// The config for a stopword registry
#[derive(Debug, Clone, Serialize, Deserialize, Eq, Default)]
#[serde(transparent)]
pub struct StopwordRegistryConfig {
    pub registries: Vec<StopWordRepository>
}

impl PartialEq for StopwordRegistryConfig {
    fn eq(&self, other: &Self) -> bool {
        self.registries.len() == other.registries.len()
            && self.registries.iter().all(|value| other.registries.contains(value))
    }
}

impl Deref for StopwordRegistryConfig {
    type Target = [StopWordRepository];

    fn deref(&self) -> &Self::Target {
        &self.registries
    }
}


/// The config of the [crate::normalizer::Normalizer].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Lowercase the text before anything else happens.
    /// The tokenizer lowercases the tokens anyway, but the link
    /// patterns see the text after this step.
    pub lowercase: bool,
    /// Tokens with less chars are dropped.
    pub min_token_length: usize,
    /// Tokens with more chars are dropped.
    pub max_token_length: usize,
    /// Drop the stopwords of [stopword_language].
    pub remove_stopwords: bool,
    pub stopword_language: Language,
    /// Tokens dropped in addition to the stopwords.
    pub extra_tokens_to_drop: HashSet<CompactString>,
    /// Regular expressions removed after the default link removal.
    pub extra_link_patterns: Vec<String>,
    /// Join the tokens with a single whitespace.
    pub join_output: bool,
    pub stemmer: Option<Algorithm>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
            remove_stopwords: false,
            stopword_language: Language::Eng,
            extra_tokens_to_drop: HashSet::new(),
            extra_link_patterns: Vec::new(),
            join_output: false,
            stemmer: None,
        }
    }
}

impl NormalizerConfig {
    /// Cleans tweets for a sentiment analysis, the tokens are joined to a single string.
    pub fn sentiment() -> Self {
        Self {
            remove_stopwords: true,
            join_output: true,
            ..Self::default()
        }
    }

    /// Cleans tweets for counting words. Stopwords are kept in the tokens
    /// so they can be excluded when ranking.
    pub fn word_frequency() -> Self {
        Self {
            lowercase: false,
            extra_link_patterns: TWEET_LINK_PATTERNS.iter().map(|value| value.to_string()).collect(),
            ..Self::default()
        }
    }
}

/// A [NormalizerConfig] where every field is optional.
/// Used to overwrite single settings of a preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfigOverrides {
    pub lowercase: Option<bool>,
    pub min_token_length: Option<usize>,
    pub max_token_length: Option<usize>,
    pub remove_stopwords: Option<bool>,
    pub stopword_language: Option<Language>,
    pub extra_tokens_to_drop: Option<HashSet<CompactString>>,
    pub extra_link_patterns: Option<Vec<String>>,
    pub join_output: Option<bool>,
    pub stemmer: Option<Algorithm>,
}

impl NormalizerConfigOverrides {
    /// Replaces the fields of [base] that are set in self.
    pub fn apply_to(self, base: NormalizerConfig) -> NormalizerConfig {
        NormalizerConfig {
            lowercase: self.lowercase.unwrap_or(base.lowercase),
            min_token_length: self.min_token_length.unwrap_or(base.min_token_length),
            max_token_length: self.max_token_length.unwrap_or(base.max_token_length),
            remove_stopwords: self.remove_stopwords.unwrap_or(base.remove_stopwords),
            stopword_language: self.stopword_language.unwrap_or(base.stopword_language),
            extra_tokens_to_drop: self.extra_tokens_to_drop.unwrap_or(base.extra_tokens_to_drop),
            extra_link_patterns: self.extra_link_patterns.unwrap_or(base.extra_link_patterns),
            join_output: self.join_output.unwrap_or(base.join_output),
            stemmer: self.stemmer.or(base.stemmer),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::configs::{NormalizerConfig, NormalizerConfigOverrides, DEFAULT_MIN_TOKEN_LENGTH};

    #[test]
    fn missing_fields_use_defaults() {
        let cfg: NormalizerConfig = serde_json::from_str(r#"{"remove_stopwords": true, "extra_tokens_to_drop": ["rt"]}"#).unwrap();
        assert!(cfg.lowercase);
        assert!(cfg.remove_stopwords);
        assert_eq!(DEFAULT_MIN_TOKEN_LENGTH, cfg.min_token_length);
        assert!(cfg.extra_tokens_to_drop.contains("rt"));
        assert!(cfg.stemmer.is_none());
    }

    #[test]
    fn presets_differ_in_lowercasing() {
        assert!(NormalizerConfig::sentiment().lowercase);
        assert!(NormalizerConfig::sentiment().join_output);
        assert!(!NormalizerConfig::word_frequency().lowercase);
        assert_eq!(3, NormalizerConfig::word_frequency().extra_link_patterns.len());
    }

    #[test]
    fn overrides_only_touch_the_set_fields() {
        let overrides: NormalizerConfigOverrides = serde_json::from_str(r#"{"min_token_length": 2, "extra_tokens_to_drop": ["rt"]}"#).unwrap();
        let cfg = overrides.apply_to(NormalizerConfig::sentiment());
        assert_eq!(2, cfg.min_token_length);
        assert!(cfg.extra_tokens_to_drop.contains("rt"));
        assert!(cfg.remove_stopwords);
        assert!(cfg.join_output);
        assert!(cfg.lowercase);

        let untouched = NormalizerConfigOverrides::default().apply_to(NormalizerConfig::word_frequency());
        assert!(!untouched.lowercase);
        assert_eq!(3, untouched.extra_link_patterns.len());
    }
}
