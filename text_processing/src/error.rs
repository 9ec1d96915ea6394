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

use isolang::Language;
use thiserror::Error;

/// An error while normalizing a single text.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum NormalizeError {
    #[error("The value to normalize is not a text!")]
    InvalidInput,
}

/// An error from creating a normalizer
#[derive(Debug, Error)]
pub enum NormalizerCreationError {
    #[error("The link pattern {pattern:?} is not a valid regex: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Stopword removal was requested but there are no stopwords for {}!", .0.to_name())]
    MissingStopwords(Language),
    #[error("The token length bounds {min}..={max} are empty!")]
    InvalidTokenLength { min: usize, max: usize },
}
