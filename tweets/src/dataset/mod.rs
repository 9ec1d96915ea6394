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

//! Loading of tweet datasets from delimited files.

mod errors;
mod loader;
mod reader;
mod row_limit;
mod timestamped;

pub use errors::*;
pub use loader::*;
pub use row_limit::RowLimit;
pub use timestamped::*;

/// Something that provides a text per row. A missing text is None.
pub trait TextCorpus {
    /// The number of rows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The texts in row order.
    fn texts(&self) -> impl Iterator<Item=Option<&str>>;
}
