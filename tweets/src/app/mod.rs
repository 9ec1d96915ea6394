// Copyright 2024 Felix Engl
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

use std::io::Write;
use anyhow::Context;
use log::info;
use text_processing::stopword_registry::StopWordRegistry;
use crate::processor::{SentimentProcessor, WordFrequencyProcessor};

mod args;
mod config;
mod logging;

pub use self::args::{RunMode, TweetsArgs};
pub use self::config::{Configs, SystemConfig};
pub use self::logging::configure_logging;

/// Resolves the configs for [args] and runs the selected mode.
pub fn exec_args(args: TweetsArgs) -> anyhow::Result<()> {
    let mut configs = match &args.config {
        None => Configs::discover_or_default(),
        Some(path) => Configs::load_from(path),
    }.context("Failed to load the configs")?;

    if let Some(log_level) = args.log_level {
        configs.system.log_level = log_level;
    }
    if args.log_to_file {
        configs.system.log_to_file = true;
    }
    configure_logging(&configs).context("Failed to configure the logging")?;

    execute(args.mode, configs)
}

/// Runs [mode] with the already resolved [configs].
pub fn execute(mode: RunMode, configs: Configs) -> anyhow::Result<()> {
    let configured;
    let registry = if configs.stopwords.is_empty() {
        StopWordRegistry::global()
    } else {
        configured = StopWordRegistry::initialize(&configs.stopwords);
        &configured
    };

    match mode {
        RunMode::Sentiment { csv, rows, output, keep_stopwords } => {
            let mut cfg = configs.sentiment;
            if keep_stopwords {
                cfg.normalizer.remove_stopwords = false;
            }
            let limit = rows.unwrap_or(cfg.rows);
            info!("Processing {csv} for a sentiment analysis.");
            let frame = SentimentProcessor::from_registry(&cfg, registry)?.process_file(&csv, limit)?;
            match output {
                Some(output) => frame.write_csv(output)?,
                None => frame.write_to(std::io::stdout().lock())?,
            }
        }
        RunMode::Words { csv, num_words, exclude, keep_stopwords } => {
            let mut cfg = configs.words;
            let num_words = num_words.unwrap_or(cfg.num_words);
            let remove_stopwords = cfg.remove_stopwords && !keep_stopwords;
            cfg.extra_words_to_remove.extend(exclude);
            info!("Counting the words of {csv}.");
            let words = WordFrequencyProcessor::from_registry(&cfg, registry)?
                .process_file(&csv, &cfg.extra_words_to_remove, remove_stopwords, num_words)?;
            let mut out = std::io::stdout().lock();
            for (word, count) in words {
                writeln!(out, "{word}\t{count}")?;
            }
        }
    }
    Ok(())
}
