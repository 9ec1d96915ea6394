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

use std::fs::File;
use std::io::{BufWriter, Write};
use camino::Utf8Path;
use serde::{Deserialize, Deserializer, Serialize};
use text_processing::configs::{NormalizerConfig, NormalizerConfigOverrides};
use text_processing::stopword_registry::StopWordRegistry;
use text_processing::{Normalizer, ProcessedText};
use crate::dataset::{Dataset, DatasetConfig, DatasetLoader, RowLimit, TextCorpus};
use crate::processor::{progress_step, ProcessingError};

/// The config of the [SentimentProcessor]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub dataset: DatasetConfig,
    /// Starts from [NormalizerConfig::sentiment], set fields overwrite the preset.
    #[serde(deserialize_with = "sentiment_normalizer")]
    pub normalizer: NormalizerConfig,
    /// The number of rows read by default.
    pub rows: RowLimit,
    /// Treat a missing text as an empty one instead of failing.
    pub substitute_missing_text: bool,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            normalizer: NormalizerConfig::sentiment(),
            rows: RowLimit::All,
            substitute_missing_text: false,
        }
    }
}

fn sentiment_normalizer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NormalizerConfig, D::Error> {
    Ok(NormalizerConfigOverrides::deserialize(deserializer)?.apply_to(NormalizerConfig::sentiment()))
}

/// A label with its normalized text.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRow {
    label: String,
    tokens: ProcessedText,
}

impl ProcessedRow {
    pub fn new(label: String, tokens: ProcessedText) -> Self {
        Self { label, tokens }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tokens(&self) -> &ProcessedText {
        &self.tokens
    }
}

/// The table of labels and normalized texts, ready for a sentiment analysis.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessedFrame {
    rows: Vec<ProcessedRow>,
}

impl ProcessedFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ProcessedRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessedRow> {
        self.rows.iter()
    }

    /// Writes the frame with the columns `Label` and `Tokens`.
    /// Token sequences are joined by a whitespace.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), ProcessingError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(["Label", "Tokens"])?;
        for row in &self.rows {
            let tokens = row.tokens.as_joined();
            writer.write_record([row.label.as_str(), &*tokens])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: impl AsRef<Utf8Path>) -> Result<(), ProcessingError> {
        let path = path.as_ref();
        self.write_to(BufWriter::new(File::create(path)?))?;
        log::info!("Wrote {} processed tweets to {path}.", self.rows.len());
        Ok(())
    }
}

impl FromIterator<ProcessedRow> for ProcessedFrame {
    fn from_iter<T: IntoIterator<Item=ProcessedRow>>(iter: T) -> Self {
        Self { rows: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a ProcessedFrame {
    type Item = &'a ProcessedRow;
    type IntoIter = std::slice::Iter<'a, ProcessedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Turns a labeled dataset into a [ProcessedFrame].
#[derive(Debug, Clone)]
pub struct SentimentProcessor {
    loader: DatasetLoader,
    normalizer: Normalizer,
    substitute_missing_text: bool,
}

impl SentimentProcessor {
    pub fn new(loader: DatasetLoader, normalizer: Normalizer, substitute_missing_text: bool) -> Self {
        Self { loader, normalizer, substitute_missing_text }
    }

    /// Creates the processor with the stopwords of [registry].
    pub fn from_registry(cfg: &SentimentConfig, registry: &StopWordRegistry) -> Result<Self, ProcessingError> {
        Ok(
            Self::new(
                DatasetLoader::new(cfg.dataset.clone()),
                Normalizer::from_registry(&cfg.normalizer, registry)?,
                cfg.substitute_missing_text,
            )
        )
    }

    /// Creates the processor with the global stopwords.
    pub fn from_config(cfg: &SentimentConfig) -> Result<Self, ProcessingError> {
        Self::from_registry(cfg, StopWordRegistry::global())
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Normalizes the text of every row in [dataset].
    pub fn processed_frame(&self, dataset: &Dataset) -> Result<ProcessedFrame, ProcessingError> {
        let total = dataset.len();
        let step = progress_step(total);
        let mut rows = Vec::with_capacity(total);
        for (idx, row) in dataset.iter().enumerate() {
            if idx % step == 0 {
                log::debug!("Processing tweet: {idx}/{total}");
            }
            let text = match row.text() {
                None if self.substitute_missing_text => Some(""),
                other => other,
            };
            let tokens = self.normalizer
                .process(text)
                .map_err(|source| ProcessingError::InvalidText { row: idx, source })?;
            rows.push(ProcessedRow::new(row.label().to_string(), tokens));
        }
        log::info!("Processed {total} tweets.");
        Ok(ProcessedFrame { rows })
    }

    /// Loads [path] and processes it.
    pub fn process_file(&self, path: impl AsRef<Utf8Path>, limit: RowLimit) -> Result<ProcessedFrame, ProcessingError> {
        let dataset = self.loader.load(path, limit)?;
        self.processed_frame(&dataset)
    }
}
