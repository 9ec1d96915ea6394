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

//! Stopword lists compiled into the binary from `data/stopwords-iso.json`.

use isolang::Language;

include!(concat!(env!("OUT_DIR"), "/stopwords.rs"));

#[cfg(test)]
mod test {
    use isolang::Language;
    use crate::iso_stopwords_for;

    #[test]
    fn english_is_available() {
        let words = iso_stopwords_for(&Language::Eng).expect("English should be compiled in!");
        assert!(words.contains(&"the"));
        assert!(words.contains(&"and"));
        assert!(words.contains(&"don't"));
    }

    #[test]
    fn lookup_works_for_parsed_languages() {
        let from_639_1 = Language::from_639_1("en").unwrap();
        let from_639_3 = Language::from_639_3("eng").unwrap();
        assert_eq!(iso_stopwords_for(&from_639_1), iso_stopwords_for(&from_639_3));
        assert_eq!(179, iso_stopwords_for(&from_639_3).unwrap().len());
    }

    #[test]
    fn unknown_languages_have_no_list() {
        assert!(iso_stopwords_for(&Language::Deu).is_none());
    }
}
