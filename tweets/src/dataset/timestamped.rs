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

use std::collections::BTreeMap;
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::parsing::Parsable;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use crate::dataset::errors::{DatasetError, TimestampError};
use crate::dataset::reader::{column_index, ensure_usable, open_csv, skip_record, text_cell};
use crate::dataset::TextCorpus;

/// The columns and the delimiter of a dataset with a timestamp per row.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct TimestampedDatasetConfig {
    pub delimiter: char,
    pub text_column: String,
    pub timestamp_column: String,
    /// Columns that are not kept as attributes.
    pub dropped_columns: Vec<String>,
}

impl Default for TimestampedDatasetConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            text_column: "text".to_string(),
            timestamp_column: "date".to_string(),
            dropped_columns: vec!["id".to_string(), "geo".to_string()],
        }
    }
}

/// Parses a timestamp of the form `YYYY-MM-DD HH:MM[:SS[.fff]]`, with either a space or
/// a `T` between date and time, or an RFC 3339 timestamp. An offset is dropped,
/// the wall clock time is kept.
pub fn parse_timestamp(value: &str) -> Result<PrimitiveDateTime, TimestampError> {
    fn parse_with(value: &str, description: &(impl Parsable + ?Sized)) -> Option<PrimitiveDateTime> {
        PrimitiveDateTime::parse(value, description).ok()
    }

    let value = value.trim();
    parse_with(value, format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"))
        .or_else(|| parse_with(value, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]")))
        .or_else(|| parse_with(value, format_description!("[year]-[month]-[day] [hour]:[minute]")))
        .or_else(|| parse_with(value, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]")))
        .or_else(|| parse_with(value, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]")))
        .or_else(|| parse_with(value, format_description!("[year]-[month]-[day]T[hour]:[minute]")))
        .or_else(|| {
            OffsetDateTime::parse(value, &Rfc3339)
                .ok()
                .map(|value| PrimitiveDateTime::new(value.date(), value.time()))
        })
        .ok_or_else(|| TimestampError { value: value.to_string() })
}

/// A text with the moment it was posted and the remaining columns of its row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TimestampedRow {
    date_time: PrimitiveDateTime,
    text: Option<String>,
    attributes: IndexMap<String, String>,
}

impl TimestampedRow {
    pub fn new(date_time: PrimitiveDateTime, text: Option<String>, attributes: IndexMap<String, String>) -> Self {
        Self { date_time, text, attributes }
    }

    pub fn date_time(&self) -> PrimitiveDateTime {
        self.date_time
    }

    pub fn date(&self) -> Date {
        self.date_time.date()
    }

    pub fn time(&self) -> Time {
        self.date_time.time()
    }

    pub fn hour(&self) -> u8 {
        self.date_time.hour()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The kept columns in header order.
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes.get(column).map(String::as_str)
    }
}

/// The rows of a timestamped dataset in file order, indexed by their date.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TimestampedDataset {
    rows: Vec<TimestampedRow>,
    by_date: BTreeMap<Date, Vec<usize>>,
    skipped: usize,
}

impl TimestampedDataset {
    pub fn new(rows: Vec<TimestampedRow>) -> Self {
        let mut by_date: BTreeMap<Date, Vec<usize>> = BTreeMap::new();
        for (idx, row) in rows.iter().enumerate() {
            by_date.entry(row.date()).or_default().push(idx);
        }
        Self { rows, by_date, skipped: 0 }
    }

    pub fn rows(&self) -> &[TimestampedRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimestampedRow> {
        self.rows.iter()
    }

    /// The distinct dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item=Date> + '_ {
        self.by_date.keys().copied()
    }

    /// All rows posted on [date] in file order.
    pub fn rows_on(&self, date: Date) -> impl Iterator<Item=&TimestampedRow> {
        self.by_date
            .get(&date)
            .into_iter()
            .flatten()
            .map(|&idx| &self.rows[idx])
    }

    /// The number of rows per hour of the day.
    pub fn rows_per_hour(&self) -> [usize; 24] {
        let mut counts = [0usize; 24];
        for row in &self.rows {
            counts[row.hour() as usize] += 1;
        }
        counts
    }

    /// The number of rows dropped while loading, malformed or with a broken timestamp.
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }
}

impl TextCorpus for TimestampedDataset {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn texts(&self) -> impl Iterator<Item=Option<&str>> {
        self.rows.iter().map(TimestampedRow::text)
    }
}

/// Loads timestamped datasets.
#[derive(Debug, Clone, Default)]
pub struct TimestampedDatasetLoader {
    cfg: TimestampedDatasetConfig,
}

impl TimestampedDatasetLoader {
    pub fn new(cfg: TimestampedDatasetConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &TimestampedDatasetConfig {
        &self.cfg
    }

    /// Reads every row of [path]. Rows that are malformed or carry an unparseable
    /// timestamp are skipped.
    pub fn load(&self, path: impl AsRef<Utf8Path>) -> Result<TimestampedDataset, DatasetError> {
        let path = path.as_ref();
        let mut reader = open_csv(path, self.cfg.delimiter)?;
        let header = reader.headers()?.clone();
        let timestamp_index = column_index(&header, &self.cfg.timestamp_column, path)?;
        let text_index = column_index(&header, &self.cfg.text_column, path)?;
        let attribute_columns: Vec<(usize, String)> = header
            .iter()
            .map(str::trim)
            .enumerate()
            .filter(|&(idx, name)| {
                idx != timestamp_index
                    && idx != text_index
                    && !self.cfg.dropped_columns.iter().any(|dropped| dropped == name)
            })
            .map(|(idx, name)| (idx, name.to_string()))
            .collect();

        let mut rows = Vec::new();
        let mut read = 0usize;
        let mut skipped = 0usize;
        for record in reader.records() {
            read += 1;
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    skip_record(err, path)?;
                    skipped += 1;
                    continue
                }
            };
            let date_time = match parse_timestamp(record.get(timestamp_index).unwrap_or_default()) {
                Ok(date_time) => date_time,
                Err(err) => {
                    log::warn!("Skip row {read} of {path}: {err}");
                    skipped += 1;
                    continue
                }
            };
            let attributes = attribute_columns
                .iter()
                .map(|(idx, name)| (name.clone(), record.get(*idx).unwrap_or_default().to_string()))
                .collect();
            rows.push(TimestampedRow::new(date_time, text_cell(&record, text_index), attributes));
        }

        ensure_usable(path, read, rows.len())?;
        log::info!("Read {} timestamped tweets from {path} (skipped: {skipped}).", rows.len());
        let mut dataset = TimestampedDataset::new(rows);
        dataset.skipped = skipped;
        Ok(dataset)
    }
}

/// Loads [path] with the default columns `text` and `date`, separated by `;`.
pub fn load_timestamped(path: impl AsRef<Utf8Path>) -> Result<TimestampedDataset, DatasetError> {
    TimestampedDatasetLoader::default().load(path)
}

#[cfg(test)]
mod test {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use camino::Utf8PathBuf;
    use camino_tempfile::{tempdir, Utf8TempDir};
    use itertools::Itertools;
    use time::macros::{date, datetime, time};
    use crate::dataset::{load_timestamped, parse_timestamp, DatasetError, TextCorpus, TimestampedDatasetConfig, TimestampedDatasetLoader};

    fn write_csv(dir: &Utf8TempDir, lines: &[&str]) -> Utf8PathBuf {
        let path = dir.path().join("tweets.csv");
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        for line in lines {
            writeln!(&mut writer, "{line}").unwrap();
        }
        writer.flush().unwrap();
        path
    }

    #[test]
    fn can_parse_timestamps() {
        assert_eq!(Ok(datetime!(2019-05-13 16:03:00)), parse_timestamp("2019-05-13 16:03"));
        assert_eq!(Ok(datetime!(2019-05-13 16:03:12)), parse_timestamp("2019-05-13 16:03:12"));
        assert_eq!(Ok(datetime!(2019-05-13 16:03:12.5)), parse_timestamp(" 2019-05-13 16:03:12.500 "));
        assert_eq!(Ok(datetime!(2019-05-13 16:03:12)), parse_timestamp("2019-05-13T16:03:12"));
        assert_eq!(Ok(datetime!(2019-05-13 16:03:12)), parse_timestamp("2019-05-13T16:03:12+02:00"));
        assert!(parse_timestamp("13.05.2019 16:03").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn decomposes_the_timestamp() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, &[
            "id;date;text;geo;retweets",
            "1;2019-05-13 16:03:12;First tweet;NaN;3",
            "2;2019-05-13 09:30:00;Second tweet;NaN;0",
            "3;2019-05-14 16:45:00;;NaN;7",
        ]);
        let dataset = load_timestamped(&path).unwrap();
        assert_eq!(3, dataset.len());

        let first = &dataset.rows()[0];
        assert_eq!(date!(2019-05-13), first.date());
        assert_eq!(time!(16:03:12), first.time());
        assert_eq!(16, first.hour());
        assert_eq!(Some("First tweet"), first.text());
        assert_eq!(vec!["retweets"], first.attributes().keys().map(String::as_str).collect_vec());
        assert_eq!(Some("3"), first.attribute("retweets"));
        assert_eq!(None, first.attribute("id"));

        assert_eq!(vec![date!(2019-05-13), date!(2019-05-14)], dataset.dates().collect_vec());
        assert_eq!(
            vec![Some("First tweet"), Some("Second tweet")],
            dataset.rows_on(date!(2019-05-13)).map(|row| row.text()).collect_vec()
        );
        assert_eq!(0, dataset.rows_on(date!(2020-01-01)).count());
        assert_eq!(vec![None], dataset.rows_on(date!(2019-05-14)).map(|row| row.text()).collect_vec());

        let per_hour = dataset.rows_per_hour();
        assert_eq!(2, per_hour[16]);
        assert_eq!(1, per_hour[9]);
        assert_eq!(3, per_hour.iter().sum::<usize>());
    }

    #[test]
    fn skips_unparseable_timestamps() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, &[
            "date;text",
            "yesterday;Broken",
            "2019-05-13 16:03;Fine",
            "2019-05-13 16:04;Too;many",
        ]);
        let dataset = load_timestamped(&path).unwrap();
        assert_eq!(vec![Some("Fine")], dataset.texts().collect_vec());
        assert_eq!(2, dataset.skipped_rows());

        let path = write_csv(&dir, &["date;text", "yesterday;Broken"]);
        assert!(matches!(load_timestamped(&path), Err(DatasetError::MalformedRows { read: 1, .. })));
    }

    #[test]
    fn columns_are_configurable() {
        let dir = tempdir().unwrap();
        let path = write_csv(&dir, &[
            "posted,content,user",
            "2019-05-13T16:03:12,Hello,someone",
        ]);
        let loader = TimestampedDatasetLoader::new(TimestampedDatasetConfig {
            delimiter: ',',
            text_column: "content".to_string(),
            timestamp_column: "posted".to_string(),
            dropped_columns: vec!["user".to_string()],
        });
        let dataset = loader.load(&path).unwrap();
        assert_eq!(Some("Hello"), dataset.rows()[0].text());
        assert!(dataset.rows()[0].attributes().is_empty());

        assert!(matches!(load_timestamped(&path), Err(DatasetError::MissingColumn { .. })));
    }
}
