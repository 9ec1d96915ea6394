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

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use camino::Utf8Path;
use csv::{Reader, StringRecord};
use crate::dataset::errors::DatasetError;

/// Opens [path] as a csv with a header.
pub(crate) fn open_csv(path: &Utf8Path, delimiter: char) -> Result<Reader<BufReader<File>>, DatasetError> {
    if !delimiter.is_ascii() {
        return Err(DatasetError::InvalidDelimiter(delimiter))
    }
    let file = File::open(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            DatasetError::NotFound(path.to_path_buf())
        } else {
            DatasetError::Io(err)
        }
    })?;
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).delimiter(delimiter as u8);
    Ok(builder.from_reader(BufReader::new(file)))
}

/// The position of [column] in [header].
pub(crate) fn column_index(header: &StringRecord, column: &str, path: &Utf8Path) -> Result<usize, DatasetError> {
    header
        .iter()
        .position(|value| value.trim() == column)
        .ok_or_else(|| DatasetError::MissingColumn { column: column.to_string(), path: path.to_path_buf() })
}

/// Decides if a broken record can be skipped. Only io errors are fatal.
pub(crate) fn skip_record(err: csv::Error, path: &Utf8Path) -> Result<(), DatasetError> {
    match err.kind() {
        csv::ErrorKind::Io(_) => Err(DatasetError::Csv(err)),
        _ => {
            match err.position() {
                Some(position) => log::warn!("Skip line {} of {path}: {err}", position.line()),
                None => log::warn!("Skip a row of {path}: {err}"),
            }
            Ok(())
        }
    }
}

/// A missing text is an empty cell.
#[inline]
pub(crate) fn text_cell(record: &StringRecord, index: usize) -> Option<String> {
    record.get(index).filter(|value| !value.is_empty()).map(str::to_string)
}

/// Fails if every row that was read got skipped.
pub(crate) fn ensure_usable(path: &Utf8Path, read: usize, usable: usize) -> Result<(), DatasetError> {
    if read > 0 && usable == 0 {
        Err(DatasetError::MalformedRows { path: path.to_path_buf(), read })
    } else {
        Ok(())
    }
}
