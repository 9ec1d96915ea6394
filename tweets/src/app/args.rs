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

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use crate::dataset::RowLimit;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Normalizes tweets and counts their words
pub struct TweetsArgs {
    /// A config file, read after ./tweets and ./config.
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,
    /// overrides the log level from the config.
    #[arg(long, global = true)]
    pub log_level: Option<log::LevelFilter>,
    /// Log to file
    #[arg(long, global = true)]
    pub log_to_file: bool,

    /// What to do with the tweets
    #[command(subcommand)]
    pub mode: RunMode,
}

#[derive(Subcommand, Debug)]
pub enum RunMode {
    /// Normalizes a labeled dataset for a sentiment analysis.
    Sentiment {
        /// A csv file with a text and a label column.
        csv: Utf8PathBuf,
        /// The number of rows read, either a number or "all".
        #[arg(short, long)]
        rows: Option<RowLimit>,
        /// Writes the result to this file instead of stdout.
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
        /// Keeps the stopwords in the texts.
        #[arg(long)]
        keep_stopwords: bool,
    },
    /// Counts the words of a timestamped dataset and prints the most common ones.
    Words {
        /// A csv file with a text and a date column.
        csv: Utf8PathBuf,
        /// The number of words printed.
        #[arg(short, long)]
        num_words: Option<usize>,
        /// A word hidden in the result, can be used multiple times.
        #[arg(short, long)]
        exclude: Vec<String>,
        /// Counts stopwords like any other word.
        #[arg(long)]
        keep_stopwords: bool,
    },
}
