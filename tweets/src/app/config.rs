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

use camino::{Utf8Path, Utf8PathBuf};
use config::Config;
use serde::{Deserialize, Serialize};
use text_processing::configs::StopwordRegistryConfig;
use crate::processor::{SentimentConfig, WordFrequencyConfig};

/// Logging related settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename(serialize = "System"))]
pub struct SystemConfig {
    /// The log level of the application
    #[serde(default = "_default_log_level")]
    pub log_level: log::LevelFilter,

    /// Log to a file?
    #[serde(default)]
    pub log_to_file: bool,

    /// The file used when logging to a file.
    #[serde(default = "_default_log_file")]
    pub log_file: Utf8PathBuf,
}

const fn _default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

fn _default_log_file() -> Utf8PathBuf {
    Utf8PathBuf::from("tweets.log")
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: _default_log_level(),
            log_to_file: false,
            log_file: _default_log_file(),
        }
    }
}

/// All configs of the application.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename(serialize = "Config"), default)]
pub struct Configs {
    pub system: SystemConfig,
    /// Where the stopwords come from. If empty the built-in lists are used.
    pub stopwords: StopwordRegistryConfig,
    pub sentiment: SentimentConfig,
    pub words: WordFrequencyConfig,
}

impl Configs {
    /// Loads the configs in the working directory, overwritten by [file] and the environment.
    pub fn load_from<P: AsRef<Utf8Path>>(file: P) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("./tweets").required(false))
            .add_source(config::File::with_name("./config").required(false))
            .add_source(config::File::with_name(file.as_ref().as_str()))
            .add_source(config::Environment::with_prefix("TWEETS").separator("."))
            .build()?
            .try_deserialize()
    }

    /// Loads the configs in the working directory, falls back to the defaults.
    pub fn discover_or_default() -> Result<Self, config::ConfigError> {
        Self::discover_in(".")
    }

    /// Loads `tweets` and `config` from [dir] if present, overwritten by the environment.
    /// Missing files fall back to the defaults, broken files are an error.
    pub fn discover_in<P: AsRef<Utf8Path>>(dir: P) -> Result<Self, config::ConfigError> {
        let dir = dir.as_ref();
        Config::builder()
            .add_source(config::File::with_name(dir.join("tweets").as_str()).required(false))
            .add_source(config::File::with_name(dir.join("config").as_str()).required(false))
            .add_source(config::Environment::with_prefix("TWEETS").separator("."))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod test {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use camino_tempfile::tempdir;
    use text_processing::stopword_registry::StopWordRepository;
    use crate::app::config::Configs;
    use crate::dataset::RowLimit;

    #[test]
    fn can_load_a_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        write!(
            &mut writer,
            r#"{{
                "system": {{ "log_level": "debug", "log_to_file": true }},
                "stopwords": [{{ "iso_default": true }}],
                "sentiment": {{ "rows": 100 }},
                "words": {{ "num_words": 5, "extra_words_to_remove": ["rt"] }}
            }}"#
        ).unwrap();
        drop(writer);

        let configs = Configs::load_from(&path).unwrap();
        assert_eq!(log::LevelFilter::Debug, configs.system.log_level);
        assert!(configs.system.log_to_file);
        assert_eq!("tweets.log", configs.system.log_file);
        assert_eq!(&[StopWordRepository::IsoDefault], &*configs.stopwords);
        assert_eq!(RowLimit::First(100), configs.sentiment.rows);
        assert!(configs.sentiment.normalizer.remove_stopwords);
        assert!(configs.sentiment.normalizer.join_output);
        assert_eq!(5, configs.words.num_words);
        assert_eq!(vec!["rt".to_string()], configs.words.extra_words_to_remove);
        assert!(configs.words.remove_stopwords);
        assert!(!configs.words.normalizer.lowercase);
    }

    #[test]
    fn the_defaults_need_no_file() {
        let configs = Configs::default();
        assert_eq!(log::LevelFilter::Info, configs.system.log_level);
        assert!(configs.stopwords.is_empty());
        assert_eq!(RowLimit::All, configs.sentiment.rows);
        assert_eq!(10, configs.words.num_words);
        assert!(Configs::load_from("./does/not/exist.json").is_err());
    }

    #[test]
    fn an_empty_dir_yields_the_defaults() {
        let dir = tempdir().unwrap();
        let configs = Configs::discover_in(dir.path()).unwrap();
        assert_eq!(10, configs.words.num_words);
        assert_eq!(RowLimit::All, configs.sentiment.rows);
    }

    #[test]
    fn a_broken_config_file_is_reported() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("tweets.toml"), "[words\nnum_words = 3\n").unwrap();
        assert!(Configs::discover_in(dir.path()).is_err());
    }

    #[test]
    fn a_partial_normalizer_table_keeps_the_preset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{ "sentiment": { "normalizer": { "min_token_length": 2 } }, "words": { "normalizer": { "join_output": true } } }"#
        ).unwrap();

        let configs = Configs::load_from(&path).unwrap();
        let sentiment = &configs.sentiment.normalizer;
        assert_eq!(2, sentiment.min_token_length);
        assert!(sentiment.remove_stopwords);
        assert!(sentiment.join_output);
        let words = &configs.words.normalizer;
        assert!(words.join_output);
        assert!(!words.lowercase);
    }
}
