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

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use camino::Utf8PathBuf;
use compact_str::{CompactString, ToCompactString};
use isolang::Language;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use iso_stopwords::iso_stopwords_for;

use crate::configs::StopwordRegistryConfig;

/// The registry shared by the whole process. Only knows the compiled in lists.
static GLOBAL_REGISTRY: LazyLock<StopWordRegistry> = LazyLock::new(|| {
    log::debug!("Initialize the global stopword registry.");
    StopWordRegistry::with_repositories([StopWordRepository::IsoDefault])
});

/// A registry for stopwords.
/// May have multiple repositories, the list for a language is the union of the
/// lists provided by all registered repositories.
/// A list is loaded once per language and is read only afterwards.
#[derive(Debug, Default)]
pub struct StopWordRegistry {
    cached_stop_words: RwLock<HashMap<Language, Arc<StopWordList>>>,
    repositories: Vec<StopWordRepository>
}

impl StopWordRegistry {
    /// The process wide registry backed by the compiled in lists.
    pub fn global() -> &'static StopWordRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn initialize(cfg: &StopwordRegistryConfig) -> Self {
        Self::with_repositories(cfg.iter().cloned())
    }

    pub fn with_repositories(repositories: impl IntoIterator<Item=StopWordRepository>) -> Self {
        Self {
            cached_stop_words: RwLock::default(),
            repositories: repositories.into_iter().collect()
        }
    }

    fn load_stop_words(&self, language: &Language) -> Option<Vec<String>> {
        let mut collection = Vec::new();
        for repo in &self.repositories {
            if let Some(found) = repo.load_raw_stop_words(language) {
                collection.extend(found)
            }
        }
        (!collection.is_empty()).then_some(collection)
    }

    /// Returns the cached list for [language] or loads it from the repositories.
    pub fn get_or_load(&self, language: &Language) -> Option<Arc<StopWordList>> {
        let lock = self.cached_stop_words.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = lock.get(language).cloned() {
            return Some(found);
        }
        drop(lock);
        let mut lock = self.cached_stop_words.write().unwrap_or_else(PoisonError::into_inner);
        match lock.entry(*language) {
            Entry::Occupied(value) => {
                Some(value.get().clone())
            }
            Entry::Vacant(value) => {
                let raw: HashSet<CompactString> = self.load_stop_words(language)?
                    .into_iter()
                    .map(CompactString::from)
                    .collect();
                log::info!("Loaded {} stopwords for {}.", raw.len(), language.to_name());
                Some(value.insert(Arc::new(StopWordList::from_raw(raw))).clone())
            }
        }
    }
}


/// A set of stopwords, kept as written and in NFC.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StopWordList {
    raw: HashSet<CompactString>,
    normalized: HashSet<CompactString>
}

impl StopWordList {

    pub fn new(mut raw: HashSet<CompactString>, mut normalized: HashSet<CompactString>) -> Self {
        raw.shrink_to_fit();
        normalized.shrink_to_fit();
        Self { raw, normalized }
    }

    pub fn from_raw(raw: HashSet<CompactString>) -> Self {
        let normalized = raw
            .iter()
            .map(|value| value.nfc().collect::<CompactString>())
            .collect::<HashSet<_>>();
        Self::new(raw, normalized)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Iterates the words as they were loaded.
    pub fn iter(&self) -> impl Iterator<Item=&str> {
        self.raw.iter().map(CompactString::as_str)
    }

    /// True if [token] is a stopword as written or in NFC.
    #[inline]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.raw.contains(token) || self.normalized.contains(token)
    }
}

impl<Q> Extend<Q> for StopWordList where Q: ToCompactString {
    fn extend<T: IntoIterator<Item=Q>>(&mut self, iter: T) {
        for value in iter.into_iter() {
            let word = value.to_compact_string();
            let normalized = word.nfc().to_compact_string();
            self.raw.insert(word);
            self.normalized.insert(normalized);
        }
        self.raw.shrink_to_fit();
        self.normalized.shrink_to_fit();
    }
}

impl<Q> FromIterator<Q> for StopWordList where Q: ToCompactString {
    fn from_iter<T: IntoIterator<Item=Q>>(iter: T) -> Self {
        let mut new = Self::default();
        new.extend(iter);
        new
    }
}


/// Where a stopword list comes from.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(try_from = "StopWordRepositoryDev", into = "StopWordRepositoryDev")]
pub enum StopWordRepository {
    /// The lists compiled into [iso_stopwords].
    IsoDefault,
    /// A directory with one `<iso 639-3|639-1>.txt` file per language.
    DirRepo { with_iso_default: bool, dir: Utf8PathBuf },
    /// A single file for a single language.
    File { with_iso_default: bool, language: Language, file: Utf8PathBuf },
}

#[derive(Debug, Error)]
#[error("Was not able to properly convert the definition to a recognized StopWordRepository definition: {0:?}")]
#[repr(transparent)]
pub struct StopWordRepositoryConversionError(StopWordRepositoryDev);

impl TryFrom<StopWordRepositoryDev> for StopWordRepository {
    type Error = StopWordRepositoryConversionError;

    fn try_from(value: StopWordRepositoryDev) -> Result<Self, Self::Error> {
        match value {
            StopWordRepositoryDev { with_iso_default, dir: Some(dir), file: None, language: None } => {
                Ok(Self::DirRepo {with_iso_default, dir})
            }
            StopWordRepositoryDev { with_iso_default, dir: None, file: Some(file), language: Some(language) } => {
                Ok(Self::File {with_iso_default, file, language})
            }
            StopWordRepositoryDev { with_iso_default: true, dir: None, file: None, language: None } => {
                Ok(Self::IsoDefault)
            }
            err => Err(StopWordRepositoryConversionError(err))
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
struct StopWordRepositoryDev {
    #[serde(skip_serializing_if = "std::ops::Not::not", rename = "iso_default")]
    with_iso_default: bool,
    #[serde(skip_serializing_if = "Option::is_none", alias = "directory")]
    dir: Option<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<Language>,
}

impl From<StopWordRepository> for StopWordRepositoryDev {
    fn from(value: StopWordRepository) -> Self {
        match value {
            StopWordRepository::IsoDefault => {
                StopWordRepositoryDev {
                    with_iso_default: true,
                    ..Default::default()
                }
            }
            StopWordRepository::DirRepo { dir, with_iso_default} => {
                StopWordRepositoryDev {
                    dir: Some(dir),
                    with_iso_default,
                    ..Default::default()
                }
            }
            StopWordRepository::File { file, language, with_iso_default } => {
                StopWordRepositoryDev {
                    file: Some(file),
                    language: Some(language),
                    with_iso_default,
                    ..Default::default()
                }
            }
        }
    }
}

/// Provides stop word lists for a specific language
pub trait StopWordListRepository {
    fn load_raw_stop_words(&self, language: &Language) -> Option<Vec<String>>;
}

/// The compiled in list of [language].
fn compiled_words(language: &Language) -> Option<Vec<String>> {
    Some(iso_stopwords_for(language)?.iter().map(|value| value.to_string()).collect_vec())
}

/// One word per line, blank lines are ignored.
fn read_word_file(path: &Path) -> Option<Vec<String>> {
    let file = File::open(path)
        .inspect_err(|err| log::warn!("Failed to open the stopwords at {}: {err}", path.display()))
        .ok()?;
    let mut words = Vec::new();
    for line in BufReader::new(file).lines() {
        match line {
            Ok(line) => {
                let word = line.trim();
                if !word.is_empty() {
                    words.push(word.to_string());
                }
            }
            Err(err) => {
                log::warn!("Failed to read the stopwords from {}: {err}", path.display());
                return None
            }
        }
    }
    Some(words)
}

/// Reads [path] if it exists. The compiled in list is added if [with_iso_default] is set.
fn words_with_fallback(path: Option<&Path>, with_iso_default: bool, language: &Language) -> Option<Vec<String>> {
    let from_file = match path {
        Some(path) => Some(read_word_file(path)?),
        None => None,
    };
    let compiled = if with_iso_default { compiled_words(language) } else { None };
    match (from_file, compiled) {
        (Some(mut words), Some(compiled)) => {
            words.extend(compiled);
            Some(words)
        }
        (Some(words), None) | (None, Some(words)) => Some(words),
        (None, None) => None,
    }
}

impl StopWordListRepository for StopWordRepository {
    fn load_raw_stop_words(&self, language: &Language) -> Option<Vec<String>> {
        match self {
            StopWordRepository::IsoDefault => compiled_words(language),
            StopWordRepository::DirRepo { dir, with_iso_default } => {
                let found = if dir.is_dir() {
                    let candidates = std::iter::once(language.to_639_3()).chain(language.to_639_1());
                    let found = candidates
                        .map(|code| dir.join(format!("{code}.txt")))
                        .find(|path| path.is_file());
                    if found.is_none() {
                        log::warn!("{dir} has no stopwords for {}.", language.to_name());
                    }
                    found
                } else {
                    log::warn!("The stopword directory {dir} does not exist!");
                    None
                };
                words_with_fallback(found.as_ref().map(|path| path.as_std_path()), *with_iso_default, language)
            }
            StopWordRepository::File { file, language: file_language, with_iso_default } => {
                if language != file_language {
                    return None
                }
                let found = if file.is_file() {
                    Some(file.as_std_path())
                } else {
                    log::warn!("The stopword file {file} does not exist!");
                    None
                };
                words_with_fallback(found, *with_iso_default, language)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use camino_tempfile::tempdir;
    use isolang::Language;
    use crate::configs::StopwordRegistryConfig;
    use crate::stopword_registry::{StopWordList, StopWordRegistry, StopWordRepository};

    #[test]
    fn global_registry_knows_english() {
        let list = StopWordRegistry::global().get_or_load(&Language::Eng).expect("English is compiled in!");
        assert!(list.is_stopword("the"));
        assert!(list.is_stopword("because"));
        assert!(!list.is_stopword("great"));
        let again = StopWordRegistry::global().get_or_load(&Language::Eng).unwrap();
        assert!(std::sync::Arc::ptr_eq(&list, &again));
    }

    #[test]
    fn file_repository_is_merged_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.txt");
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        writeln!(&mut writer, "rt").unwrap();
        writeln!(&mut writer, "  amp ").unwrap();
        writeln!(&mut writer).unwrap();
        drop(writer);

        let registry = StopWordRegistry::with_repositories([
            StopWordRepository::File { with_iso_default: true, language: Language::Eng, file: path.clone() }
        ]);
        let list = registry.get_or_load(&Language::Eng).unwrap();
        assert!(list.is_stopword("rt"));
        assert!(list.is_stopword("amp"));
        assert!(list.is_stopword("the"));
        assert!(!list.is_stopword(""));

        let registry = StopWordRegistry::with_repositories([
            StopWordRepository::File { with_iso_default: false, language: Language::Eng, file: path }
        ]);
        let list = registry.get_or_load(&Language::Eng).unwrap();
        assert_eq!(2, list.len());
        assert!(registry.get_or_load(&Language::Deu).is_none());
    }

    #[test]
    fn dir_repository_resolves_iso_639_1_names() {
        let dir = tempdir().unwrap();
        let mut writer = BufWriter::new(File::create(dir.path().join("en.txt")).unwrap());
        writeln!(&mut writer, "lol").unwrap();
        drop(writer);

        let registry = StopWordRegistry::with_repositories([
            StopWordRepository::DirRepo { with_iso_default: false, dir: dir.path().to_path_buf() }
        ]);
        let list = registry.get_or_load(&Language::Eng).unwrap();
        assert!(list.is_stopword("lol"));
        assert!(!list.is_stopword("the"));
    }

    #[test]
    fn missing_sources_yield_nothing() {
        let registry = StopWordRegistry::with_repositories([
            StopWordRepository::DirRepo { with_iso_default: false, dir: "./does/not/exist".into() }
        ]);
        assert!(registry.get_or_load(&Language::Eng).is_none());
        assert!(StopWordRegistry::default().get_or_load(&Language::Eng).is_none());
    }

    #[test]
    fn config_round_trips() {
        let cfg: StopwordRegistryConfig = serde_json::from_str(
            r#"[{"iso_default": true}, {"dir": "data/stopwords"}, {"file": "words.txt", "language": "eng"}]"#
        ).unwrap();
        assert_eq!(3, cfg.len());
        assert_eq!(StopWordRepository::IsoDefault, cfg[0]);
        assert!(matches!(cfg[1], StopWordRepository::DirRepo { with_iso_default: false, .. }));
        assert!(matches!(cfg[2], StopWordRepository::File { language: Language::Eng, .. }));

        let bad = serde_json::from_str::<StopwordRegistryConfig>(r#"[{"file": "words.txt"}]"#);
        assert!(bad.is_err());

        let registry = StopWordRegistry::initialize(&cfg);
        assert!(registry.get_or_load(&Language::Eng).unwrap().is_stopword("the"));
    }

    #[test]
    fn lists_can_be_collected() {
        let list: StopWordList = ["Cafe\u{301}", "rt"].into_iter().collect();
        assert_eq!(2, list.len());
        assert!(list.is_stopword("Cafe\u{301}"));
        assert!(list.is_stopword("Caf\u{e9}"));
        assert!(!list.is_stopword("cafe"));
        assert!(!list.is_stopword("Rt"));
    }
}
