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

use std::io;
use text_processing::error::{NormalizeError, NormalizerCreationError};
use thiserror::Error;
use crate::dataset::DatasetError;

/// Errors of the processors
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Normalizer(#[from] NormalizerCreationError),
    #[error("There are no stopwords for {}!", .0.to_name())]
    MissingStopwords(isolang::Language),
    #[error("Failed to process the text of row {row}: {source}")]
    InvalidText {
        row: usize,
        #[source]
        source: NormalizeError,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
