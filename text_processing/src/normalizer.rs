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

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, LazyLock};
use compact_str::CompactString;
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::configs::NormalizerConfig;
use crate::error::{NormalizeError, NormalizerCreationError};
use crate::stopword_registry::{StopWordList, StopWordRegistry};
use crate::tokenizer::Tokenizer;

static NUMBERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static LINKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?:www\.\S+)|(?:https?://\S+)").unwrap());
static USERNAMES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\S+").unwrap());

/// The result of normalizing a single text.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessedText {
    /// The tokens joined by a single whitespace.
    Joined(String),
    Tokens(Vec<String>),
}

impl ProcessedText {
    pub fn is_empty(&self) -> bool {
        match self {
            ProcessedText::Joined(value) => value.is_empty(),
            ProcessedText::Tokens(value) => value.is_empty(),
        }
    }

    pub fn as_joined(&self) -> Cow<'_, str> {
        match self {
            ProcessedText::Joined(value) => Cow::Borrowed(value.as_str()),
            ProcessedText::Tokens(value) => Cow::Owned(value.join(" ")),
        }
    }

    pub fn into_tokens(self) -> Vec<String> {
        match self {
            ProcessedText::Joined(value) => value.split_whitespace().map(str::to_string).collect_vec(),
            ProcessedText::Tokens(value) => value,
        }
    }
}

impl Display for ProcessedText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_joined())
    }
}

/// Cleans a text and splits it into tokens.
///
/// The steps are applied in this order:
/// 1. lowercase (optional)
/// 2. remove all numbers
/// 3. trim
/// 4. remove links, then the extra link patterns
/// 5. remove usernames
/// 6. tokenize
/// 7. drop stopwords (optional)
/// 8. drop the extra tokens
/// 9. stem (optional)
#[derive(Debug, Clone)]
pub struct Normalizer {
    lowercase: bool,
    tokenizer: Tokenizer,
    stop_words: Option<Arc<StopWordList>>,
    extra_tokens_to_drop: HashSet<CompactString>,
    extra_link_patterns: Vec<Regex>,
    join_output: bool,
    stemmer: Option<rust_stemmers::Algorithm>,
}

impl Normalizer {
    /// Creates a new normalizer. [stop_words] is only used if the config asks for
    /// stopword removal.
    pub fn new(cfg: &NormalizerConfig, stop_words: Option<Arc<StopWordList>>) -> Result<Self, NormalizerCreationError> {
        if cfg.min_token_length > cfg.max_token_length {
            return Err(
                NormalizerCreationError::InvalidTokenLength {
                    min: cfg.min_token_length,
                    max: cfg.max_token_length
                }
            )
        }

        let stop_words = if cfg.remove_stopwords {
            Some(stop_words.ok_or(NormalizerCreationError::MissingStopwords(cfg.stopword_language))?)
        } else {
            None
        };

        let extra_link_patterns = cfg.extra_link_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| NormalizerCreationError::InvalidPattern {
                    pattern: pattern.clone(),
                    source
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(
            Self {
                lowercase: cfg.lowercase,
                tokenizer: Tokenizer::new(cfg.min_token_length, cfg.max_token_length),
                stop_words,
                extra_tokens_to_drop: cfg.extra_tokens_to_drop.clone(),
                extra_link_patterns,
                join_output: cfg.join_output,
                stemmer: cfg.stemmer,
            }
        )
    }

    /// Creates a normalizer with the stopwords provided by [registry].
    pub fn from_registry(cfg: &NormalizerConfig, registry: &StopWordRegistry) -> Result<Self, NormalizerCreationError> {
        let stop_words = if cfg.remove_stopwords {
            registry.get_or_load(&cfg.stopword_language)
        } else {
            None
        };
        Self::new(cfg, stop_words)
    }

    /// Creates a normalizer backed by the global stopword registry.
    pub fn from_config(cfg: &NormalizerConfig) -> Result<Self, NormalizerCreationError> {
        Self::from_registry(cfg, StopWordRegistry::global())
    }

    pub fn joins_output(&self) -> bool {
        self.join_output
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Applies the text cleaning steps, everything before tokenizing.
    pub fn clean(&self, text: &str) -> String {
        let text = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };
        let text = NUMBERS.replace_all(&text, "");
        let text = LINKS.replace_all(text.trim(), "");
        let mut text = text.into_owned();
        for pattern in &self.extra_link_patterns {
            text = pattern.replace_all(&text, "").into_owned();
        }
        USERNAMES.replace_all(&text, "").into_owned()
    }

    /// Normalizes [text] to a sequence of tokens. An empty result is valid.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let cleaned = self.clean(text);
        let tokens = self.tokenizer
            .tokenize(&cleaned)
            .filter(|token| {
                !self.stop_words.as_ref().is_some_and(|stop_words| stop_words.is_stopword(token))
            })
            .filter(|token| !self.extra_tokens_to_drop.contains(token.as_str()));

        if let Some(stemmer) = self.stemmer {
            let stemmer = rust_stemmers::Stemmer::create(stemmer);
            tokens
                .map(|token| stemmer.stem(&token).into_owned())
                .filter(|token| token.chars().count() >= self.tokenizer.min_len())
                .collect_vec()
        } else {
            tokens.collect_vec()
        }
    }

    /// Normalizes a value from a dataset, a missing value is not a text.
    pub fn normalize_value(&self, text: Option<&str>) -> Result<Vec<String>, NormalizeError> {
        text.map(|value| self.normalize(value)).ok_or(NormalizeError::InvalidInput)
    }

    /// Normalizes a value and joins the tokens if configured.
    pub fn process(&self, text: Option<&str>) -> Result<ProcessedText, NormalizeError> {
        let tokens = self.normalize_value(text)?;
        Ok(
            if self.join_output {
                ProcessedText::Joined(tokens.join(" "))
            } else {
                ProcessedText::Tokens(tokens)
            }
        )
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use isolang::Language;
    use crate::configs::NormalizerConfig;
    use crate::error::{NormalizeError, NormalizerCreationError};
    use crate::normalizer::{Normalizer, ProcessedText};
    use crate::stopword_registry::{StopWordList, StopWordRegistry};

    const TWEET: &str = "Check this out www.example.com/page @someuser 123 great!!";

    #[test]
    fn removes_links_mentions_and_numbers() {
        let normalizer = Normalizer::from_config(&NormalizerConfig::default()).unwrap();
        assert_eq!(vec!["check", "this", "out", "great"], normalizer.normalize(TWEET));
    }

    #[test]
    fn is_deterministic() {
        let normalizer = Normalizer::from_config(&NormalizerConfig::sentiment()).unwrap();
        let text = "RT @news: 3 new https://t.co/abc reports about the weather in Paris";
        assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
    }

    #[test]
    fn tokens_respect_the_bounds() {
        let normalizer = Normalizer::from_config(&NormalizerConfig::default()).unwrap();
        let text = "a bb ccc dddd x1y2z3 2024 supercalifragilistic ok?! Hello\tWorld";
        let tokens = normalizer.normalize(text);
        assert_eq!(vec!["ccc", "dddd", "xyz", "hello", "world"], tokens);
        for token in tokens {
            assert!(token.chars().count() >= 3);
            assert!(token.chars().all(|c| !c.is_numeric() && !c.is_whitespace()));
        }
    }

    #[test]
    fn numbers_are_removed_before_tokenizing() {
        let normalizer = Normalizer::from_config(&NormalizerConfig::default()).unwrap();
        assert_eq!(vec!["covid"], normalizer.normalize("COVID19"));
    }

    #[test]
    fn links_are_matched_case_insensitive() {
        let normalizer = Normalizer::from_config(&NormalizerConfig { lowercase: false, ..NormalizerConfig::default() }).unwrap();
        assert_eq!(vec!["look", "here"], normalizer.normalize("Look HTTPS://Example.com/X here WWW.Foo.bar"));
    }

    #[test]
    fn removes_stopwords_and_extra_tokens() {
        let mut cfg = NormalizerConfig::default();
        cfg.remove_stopwords = true;
        cfg.extra_tokens_to_drop.insert("great".into());
        let normalizer = Normalizer::from_config(&cfg).unwrap();
        assert_eq!(vec!["check"], normalizer.normalize(TWEET));
    }

    #[test]
    fn custom_stopwords_are_used() {
        let mut cfg = NormalizerConfig::default();
        cfg.remove_stopwords = true;
        let list: StopWordList = ["check"].into_iter().collect();
        let normalizer = Normalizer::new(&cfg, Some(Arc::new(list))).unwrap();
        assert_eq!(vec!["this", "out", "great"], normalizer.normalize(TWEET));
    }

    #[test]
    fn everything_filtered_is_not_an_error() {
        let normalizer = Normalizer::from_config(&NormalizerConfig::sentiment()).unwrap();
        assert_eq!(Ok(ProcessedText::Joined(String::new())), normalizer.process(Some("@me 12 http://x.y")));
        assert_eq!(Ok(ProcessedText::Joined(String::new())), normalizer.process(Some("")));
    }

    #[test]
    fn missing_values_are_invalid() {
        let normalizer = Normalizer::from_config(&NormalizerConfig::default()).unwrap();
        assert_eq!(Err(NormalizeError::InvalidInput), normalizer.normalize_value(None));
        assert_eq!(Err(NormalizeError::InvalidInput), normalizer.process(None));
    }

    #[test]
    fn joins_if_configured() {
        let normalizer = Normalizer::from_config(&NormalizerConfig::sentiment()).unwrap();
        assert!(normalizer.joins_output());
        let processed = normalizer.process(Some(TWEET)).unwrap();
        assert_eq!(ProcessedText::Joined("check great".to_string()), processed);
        assert_eq!(vec!["check", "great"], processed.into_tokens());

        let normalizer = Normalizer::from_config(&NormalizerConfig::default()).unwrap();
        let processed = normalizer.process(Some(TWEET)).unwrap();
        assert_eq!("check this out great", processed.to_string());
    }

    #[test]
    fn word_frequency_preset_drops_everything_after_a_link() {
        let normalizer = Normalizer::from_config(&NormalizerConfig::word_frequency()).unwrap();
        assert_eq!(
            vec!["storm", "warning", "for", "tonight"],
            normalizer.normalize("Storm warning for tonight pic.twitter.com/abc see more")
        );
        assert_eq!(
            vec!["news"],
            normalizer.normalize("News httpfoo trailing words")
        );
    }

    #[test]
    fn stems_if_configured() {
        let cfg = NormalizerConfig {
            stemmer: Some(rust_stemmers::Algorithm::English),
            ..NormalizerConfig::default()
        };
        let normalizer = Normalizer::from_config(&cfg).unwrap();
        assert_eq!(vec!["run", "fast", "dog"], normalizer.normalize("running fast dogs"));
    }

    #[test]
    fn rejects_broken_configs() {
        let cfg = NormalizerConfig {
            extra_link_patterns: vec!["(unclosed".to_string()],
            ..NormalizerConfig::default()
        };
        assert!(matches!(Normalizer::from_config(&cfg), Err(NormalizerCreationError::InvalidPattern { .. })));

        let cfg = NormalizerConfig {
            min_token_length: 5,
            max_token_length: 2,
            ..NormalizerConfig::default()
        };
        assert!(matches!(Normalizer::from_config(&cfg), Err(NormalizerCreationError::InvalidTokenLength { min: 5, max: 2 })));

        let cfg = NormalizerConfig {
            remove_stopwords: true,
            stopword_language: Language::Deu,
            ..NormalizerConfig::default()
        };
        assert!(matches!(
            Normalizer::from_registry(&cfg, &StopWordRegistry::default()),
            Err(NormalizerCreationError::MissingStopwords(Language::Deu))
        ));
    }
}
