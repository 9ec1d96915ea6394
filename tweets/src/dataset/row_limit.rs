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

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::dataset::errors::RowLimitError;

const ALL: &str = "all";

/// How many data rows of a file are read.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RowLimitDev", into = "RowLimitDev")]
pub enum RowLimit {
    #[default]
    All,
    First(usize),
}

impl RowLimit {
    /// True if another row can be read after [read] rows.
    #[inline]
    pub fn allows(&self, read: usize) -> bool {
        match self {
            RowLimit::All => true,
            RowLimit::First(limit) => read < *limit,
        }
    }
}

impl From<usize> for RowLimit {
    fn from(value: usize) -> Self {
        Self::First(value)
    }
}

impl From<Option<usize>> for RowLimit {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::All, Self::First)
    }
}

impl FromStr for RowLimit {
    type Err = RowLimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            Ok(Self::All)
        } else {
            s.parse::<usize>()
                .map(Self::First)
                .map_err(|_| RowLimitError(s.to_string()))
        }
    }
}

impl Display for RowLimit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RowLimit::All => write!(f, "{ALL}"),
            RowLimit::First(limit) => write!(f, "{limit}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RowLimitDev {
    Count(usize),
    Sentinel(String),
}

impl TryFrom<RowLimitDev> for RowLimit {
    type Error = RowLimitError;

    fn try_from(value: RowLimitDev) -> Result<Self, Self::Error> {
        match value {
            RowLimitDev::Count(limit) => Ok(Self::First(limit)),
            RowLimitDev::Sentinel(value) => value.parse(),
        }
    }
}

impl From<RowLimit> for RowLimitDev {
    fn from(value: RowLimit) -> Self {
        match value {
            RowLimit::All => RowLimitDev::Sentinel(ALL.to_string()),
            RowLimit::First(limit) => RowLimitDev::Count(limit),
        }
    }
}
