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

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use crate::dataset::errors::DatasetError;
use crate::dataset::reader::{column_index, ensure_usable, open_csv, skip_record, text_cell};
use crate::dataset::{RowLimit, TextCorpus};

/// The columns and the delimiter of a labeled dataset.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct DatasetConfig {
    pub delimiter: char,
    pub text_column: String,
    pub label_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            text_column: "Text".to_string(),
            label_column: "Sentiment".to_string(),
        }
    }
}

/// A labeled text. The text is None if the cell was empty.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Row {
    text: Option<String>,
    label: String,
}

impl Row {
    pub fn new(text: Option<String>, label: String) -> Self {
        Self { text, label }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The rows of a labeled dataset in file order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Dataset {
    rows: Vec<Row>,
    skipped: usize,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows, skipped: 0 }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item=&str> {
        self.rows.iter().map(Row::label)
    }

    /// The number of malformed rows that were dropped while loading.
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }
}

impl TextCorpus for Dataset {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn texts(&self) -> impl Iterator<Item=Option<&str>> {
        self.rows.iter().map(Row::text)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Loads labeled datasets.
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    cfg: DatasetConfig,
}

impl DatasetLoader {
    pub fn new(cfg: DatasetConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.cfg
    }

    /// Reads up to [limit] rows of [path]. Malformed rows are skipped.
    pub fn load(&self, path: impl AsRef<Utf8Path>, limit: RowLimit) -> Result<Dataset, DatasetError> {
        let path = path.as_ref();
        let mut reader = open_csv(path, self.cfg.delimiter)?;
        let header = reader.headers()?.clone();
        let text_index = column_index(&header, &self.cfg.text_column, path)?;
        let label_index = column_index(&header, &self.cfg.label_column, path)?;

        let mut rows = Vec::new();
        let mut read = 0usize;
        let mut skipped = 0usize;
        for record in reader.records() {
            if !limit.allows(read) {
                break
            }
            read += 1;
            match record {
                Ok(record) => {
                    let label = record.get(label_index).unwrap_or_default().to_string();
                    rows.push(Row::new(text_cell(&record, text_index), label));
                }
                Err(err) => {
                    skip_record(err, path)?;
                    skipped += 1;
                }
            }
        }

        ensure_usable(path, read, rows.len())?;
        log::info!("Read {} tweets from {path} (limit: {limit}, skipped: {skipped}).", rows.len());
        Ok(Dataset { rows, skipped })
    }
}

/// Loads [path] with the default columns `Text` and `Sentiment`.
pub fn load(path: impl AsRef<Utf8Path>, limit: RowLimit) -> Result<Dataset, DatasetError> {
    DatasetLoader::default().load(path, limit)
}

#[cfg(test)]
mod test {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use camino::Utf8PathBuf;
    use camino_tempfile::{tempdir, Utf8TempDir};
    use itertools::Itertools;
    use crate::dataset::{load, DatasetConfig, DatasetError, DatasetLoader, RowLimit, TextCorpus};

    fn write_csv(dir: &Utf8TempDir, name: &str, lines: &[&str]) -> Utf8PathBuf {
        let path = dir.path().join(name);
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        for line in lines {
            writeln!(&mut writer, "{line}").unwrap();
        }
        writer.flush().unwrap();
        path
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "tweets.csv", &[
            "Sentiment,Text",
            "positive,I love this weather",
            "negative,too,many,fields",
            "neutral,Just a tweet",
        ]);
        let dataset = load(&path, RowLimit::All).unwrap();
        assert_eq!(2, dataset.len());
        assert_eq!(1, dataset.skipped_rows());
        assert_eq!(vec!["positive", "neutral"], dataset.labels().collect_vec());
        assert_eq!(vec![Some("I love this weather"), Some("Just a tweet")], dataset.texts().collect_vec());
    }

    #[test]
    fn rows_with_invalid_utf8_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        std::fs::write(&path, b"Text,Sentiment\nfine,1\n\xff\xfe broken,0\nalso fine,1\n").unwrap();
        let dataset = load(&path, RowLimit::All).unwrap();
        assert_eq!(2, dataset.len());
        assert_eq!(1, dataset.skipped_rows());
        assert_eq!(vec![Some("fine"), Some("also fine")], dataset.texts().collect_vec());
    }

    #[test]
    fn respects_the_row_limit() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "tweets.csv", &[
            "Text,Sentiment",
            "one,1",
            "two,0",
            "three,1",
        ]);
        assert_eq!(2, load(&path, RowLimit::First(2)).unwrap().len());
        assert_eq!(3, load(&path, RowLimit::All).unwrap().len());
        assert_eq!(3, load(&path, RowLimit::First(10)).unwrap().len());
        assert!(load(&path, RowLimit::First(0)).unwrap().is_empty());
    }

    #[test]
    fn empty_cells_are_missing_texts() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "tweets.csv", &[
            "Text,Sentiment",
            ",positive",
            "\"quoted, text\",negative",
        ]);
        let dataset = load(&path, RowLimit::All).unwrap();
        assert_eq!(vec![None, Some("quoted, text")], dataset.texts().collect_vec());
    }

    #[test]
    fn fails_if_nothing_is_usable() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "broken.csv", &[
            "Text,Sentiment",
            "a,b,c",
            "d",
        ]);
        assert!(matches!(load(&path, RowLimit::All), Err(DatasetError::MalformedRows { read: 2, .. })));

        let path = write_csv(&dir, "header_only.csv", &["Text,Sentiment"]);
        assert!(load(&path, RowLimit::All).unwrap().is_empty());
    }

    #[test]
    fn reports_missing_files_and_columns() {
        assert!(matches!(load("./does/not/exist.csv", RowLimit::All), Err(DatasetError::NotFound(_))));

        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "tweets.csv", &["Tweet,Sentiment", "hello,1"]);
        match load(&path, RowLimit::All) {
            Err(DatasetError::MissingColumn { column, .. }) => assert_eq!("Text", column),
            other => panic!("Expected a missing column but got {other:?}"),
        }
    }

    #[test]
    fn supports_other_delimiters() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, "tweets.csv", &["label;content", "1;hello, world"]);
        let loader = DatasetLoader::new(DatasetConfig {
            delimiter: ';',
            text_column: "content".to_string(),
            label_column: "label".to_string(),
        });
        let dataset = loader.load(&path, RowLimit::All).unwrap();
        assert_eq!(Some("hello, world"), dataset.rows()[0].text());
        assert_eq!("1", dataset.rows()[0].label());

        let loader = DatasetLoader::new(DatasetConfig { delimiter: 'ß', ..DatasetConfig::default() });
        assert!(matches!(loader.load(&path, RowLimit::All), Err(DatasetError::InvalidDelimiter('ß'))));
    }
}
