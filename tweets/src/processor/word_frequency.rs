// Copyright 2024. Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use camino::Utf8Path;
use isolang::Language;
use serde::{Deserialize, Deserializer, Serialize};
use text_processing::configs::{NormalizerConfig, NormalizerConfigOverrides};
use text_processing::stopword_registry::{StopWordList, StopWordRegistry};
use text_processing::{FrequencyTable, Normalizer, TokenExclusion};
use crate::dataset::{TextCorpus, TimestampedDatasetConfig, TimestampedDatasetLoader};
use crate::processor::{progress_step, ProcessingError};

/// The number of words returned by default.
pub const DEFAULT_NUM_WORDS: usize = 10;

/// The config of the [WordFrequencyProcessor]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordFrequencyConfig {
    pub dataset: TimestampedDatasetConfig,
    /// Starts from [NormalizerConfig::word_frequency], set fields overwrite the preset.
    #[serde(deserialize_with = "word_frequency_normalizer")]
    pub normalizer: NormalizerConfig,
    /// Hide the stopwords in the ranking.
    pub remove_stopwords: bool,
    /// Words hidden in the ranking in addition to the stopwords.
    pub extra_words_to_remove: Vec<String>,
    pub num_words: usize,
    /// Treat a missing text as an empty one instead of failing.
    pub substitute_missing_text: bool,
}

impl Default for WordFrequencyConfig {
    fn default() -> Self {
        Self {
            dataset: TimestampedDatasetConfig::default(),
            normalizer: NormalizerConfig::word_frequency(),
            remove_stopwords: true,
            extra_words_to_remove: Vec::new(),
            num_words: DEFAULT_NUM_WORDS,
            substitute_missing_text: false,
        }
    }
}

fn word_frequency_normalizer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NormalizerConfig, D::Error> {
    Ok(NormalizerConfigOverrides::deserialize(deserializer)?.apply_to(NormalizerConfig::word_frequency()))
}

/// Counts the words of a corpus and ranks them.
#[derive(Debug, Clone)]
pub struct WordFrequencyProcessor {
    loader: TimestampedDatasetLoader,
    normalizer: Normalizer,
    stopword_language: Language,
    stop_words: Option<Arc<StopWordList>>,
    substitute_missing_text: bool,
}

impl WordFrequencyProcessor {
    /// [stop_words] are only needed for rankings without stopwords.
    pub fn new(
        loader: TimestampedDatasetLoader,
        normalizer: Normalizer,
        stopword_language: Language,
        stop_words: Option<Arc<StopWordList>>,
        substitute_missing_text: bool,
    ) -> Self {
        Self {
            loader,
            normalizer,
            stopword_language,
            stop_words,
            substitute_missing_text,
        }
    }

    /// Creates the processor with the stopwords of [registry].
    pub fn from_registry(cfg: &WordFrequencyConfig, registry: &StopWordRegistry) -> Result<Self, ProcessingError> {
        let language = cfg.normalizer.stopword_language;
        Ok(
            Self::new(
                TimestampedDatasetLoader::new(cfg.dataset.clone()),
                Normalizer::from_registry(&cfg.normalizer, registry)?,
                language,
                registry.get_or_load(&language),
                cfg.substitute_missing_text,
            )
        )
    }

    /// Creates the processor with the global stopwords.
    pub fn from_config(cfg: &WordFrequencyConfig) -> Result<Self, ProcessingError> {
        Self::from_registry(cfg, StopWordRegistry::global())
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Counts the normalized tokens of every text in [corpus].
    pub fn frequency_table<C>(&self, corpus: &C) -> Result<FrequencyTable, ProcessingError>
    where
        C: TextCorpus + ?Sized
    {
        let total = corpus.len();
        let step = progress_step(total);
        let mut table = FrequencyTable::default();
        for (idx, text) in corpus.texts().enumerate() {
            if idx % step == 0 {
                log::debug!("Processing tweet: {idx}/{total}");
            }
            let text = match text {
                None if self.substitute_missing_text => Some(""),
                other => other,
            };
            let tokens = self.normalizer
                .normalize_value(text)
                .map_err(|source| ProcessingError::InvalidText { row: idx, source })?;
            table.add(tokens);
        }
        log::info!("Counted {} words in {total} tweets.", table.word_count());
        Ok(table)
    }

    /// Ranks the words of [table] without touching the counts. Stopwords are hidden
    /// if [remove_stopwords] is set, the words in [extra_words_to_remove] always.
    pub fn rank<E>(
        &self,
        table: &FrequencyTable,
        extra_words_to_remove: &E,
        remove_stopwords: bool,
        num_words: usize,
    ) -> Result<Vec<(String, u64)>, ProcessingError>
    where
        E: TokenExclusion + ?Sized
    {
        let stop_words = if remove_stopwords {
            let stop_words = self.stop_words
                .as_deref()
                .ok_or(ProcessingError::MissingStopwords(self.stopword_language))?;
            Some(stop_words)
        } else {
            None
        };
        Ok(table.top_n(num_words, &(stop_words, extra_words_to_remove)))
    }

    /// The [num_words] most common words of [corpus].
    pub fn most_common_words<C, E>(
        &self,
        corpus: &C,
        extra_words_to_remove: &E,
        remove_stopwords: bool,
        num_words: usize,
    ) -> Result<Vec<(String, u64)>, ProcessingError>
    where
        C: TextCorpus + ?Sized,
        E: TokenExclusion + ?Sized
    {
        let table = self.frequency_table(corpus)?;
        self.rank(&table, extra_words_to_remove, remove_stopwords, num_words)
    }

    /// Loads the timestamped dataset at [path] and ranks its words.
    pub fn process_file<E>(
        &self,
        path: impl AsRef<Utf8Path>,
        extra_words_to_remove: &E,
        remove_stopwords: bool,
        num_words: usize,
    ) -> Result<Vec<(String, u64)>, ProcessingError>
    where
        E: TokenExclusion + ?Sized
    {
        let dataset = self.loader.load(path)?;
        self.most_common_words(&dataset, extra_words_to_remove, remove_stopwords, num_words)
    }
}
