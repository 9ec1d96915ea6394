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
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors when loading a dataset. Problems with single rows are not part of this,
/// these rows are skipped.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("The dataset {0} does not exist!")]
    NotFound(Utf8PathBuf),
    #[error("The delimiter {0:?} is not a single byte ascii char!")]
    InvalidDelimiter(char),
    #[error("The column {column:?} is missing in the header of {path}!")]
    MissingColumn {
        column: String,
        path: Utf8PathBuf,
    },
    #[error("All {read} rows read from {path} were malformed!")]
    MalformedRows {
        path: Utf8PathBuf,
        read: usize,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// The timestamp of a row could not be parsed.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("The value {value:?} is not a supported timestamp!")]
pub struct TimestampError {
    pub value: String,
}

/// A parsed row limit is neither `all` nor a number.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("The row limit {0:?} is neither \"all\" nor a number!")]
pub struct RowLimitError(pub String);
