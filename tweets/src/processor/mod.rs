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

//! The workflows over a loaded dataset.

mod error;
mod sentiment;
mod word_frequency;

pub use error::ProcessingError;
pub use sentiment::*;
pub use word_frequency::*;

/// Log the progress about ten times per run.
#[inline]
pub(crate) fn progress_step(total: usize) -> usize {
    (total / 10).max(1)
}
