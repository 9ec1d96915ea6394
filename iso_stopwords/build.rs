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

use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tinyjson::JsonValue;

const SOURCE: &str = "./data/stopwords-iso.json";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={SOURCE}");
    generate_stop_word_lists();
}

fn generate_stop_word_lists() {
    let mut data = File::options().read(true).open(SOURCE).unwrap();
    let mut content = String::new();
    data.read_to_string(&mut content).unwrap();
    drop(data);
    let parsed: JsonValue = content.parse().unwrap();
    let object: &HashMap<_, _> = parsed.get().unwrap();
    build_stop_word_library(object);
}

fn build_stop_word_library(object: &HashMap<String, JsonValue>) {
    let out = Path::new(&env::var("OUT_DIR").unwrap()).join("stopwords.rs");
    let mut file = BufWriter::new(File::create(out).unwrap());

    let mut languages: Vec<_> = object.iter().collect();
    languages.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut arms = Vec::with_capacity(languages.len());
    for (k, v) in languages {
        let lang = isolang::Language::from_639_1(k.as_str()).expect(format!("Why is {k} not an iso language?").as_str());
        let code = lang.to_639_3();
        let constant = code.to_uppercase();
        let values: Vec<String> = v.get::<Vec<_>>().unwrap().iter().map(|value| value.get::<String>().unwrap().to_string()).collect();
        writeln!(&mut file, "const {constant}: &[&str] = &[").unwrap();
        for value in values {
            writeln!(&mut file, "    {value:?},").unwrap();
        }
        writeln!(&mut file, "];\n").unwrap();
        arms.push(format!("        {code:?} => Some({constant}),"));
    }

    writeln!(&mut file, "/// Returns the stopwords for a specific [language], if there are any.").unwrap();
    writeln!(&mut file, "pub fn iso_stopwords_for(language: &Language) -> Option<&'static [&'static str]> {{").unwrap();
    writeln!(&mut file, "    match language.to_639_3() {{").unwrap();
    for arm in arms {
        writeln!(&mut file, "{arm}").unwrap();
    }
    writeln!(&mut file, "        _ => None,").unwrap();
    writeln!(&mut file, "    }}").unwrap();
    writeln!(&mut file, "}}").unwrap();
}
