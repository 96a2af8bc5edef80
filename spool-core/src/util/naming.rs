// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Member and dictionary key naming policies.

use std::fmt;

/// Transforms a declared member name into its wire name.
#[derive(Clone, Copy)]
pub enum NamingPolicy {
    /// `first_name` -> `firstName`
    CamelCase,
    /// `first_name` -> `FirstName`
    PascalCase,
    /// `FirstName` -> `first_name`
    SnakeCase,
    /// `FirstName` -> `first-name`
    KebabCase,
    UpperCase,
    LowerCase,
    Custom(fn(&str) -> String),
}

impl fmt::Debug for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingPolicy::CamelCase => f.write_str("CamelCase"),
            NamingPolicy::PascalCase => f.write_str("PascalCase"),
            NamingPolicy::SnakeCase => f.write_str("SnakeCase"),
            NamingPolicy::KebabCase => f.write_str("KebabCase"),
            NamingPolicy::UpperCase => f.write_str("UpperCase"),
            NamingPolicy::LowerCase => f.write_str("LowerCase"),
            NamingPolicy::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl NamingPolicy {
    /// Parses the names accepted by `#[json(rename_all = "..")]`.
    pub fn from_name(name: &str) -> Option<NamingPolicy> {
        match name {
            "camelCase" => Some(NamingPolicy::CamelCase),
            "PascalCase" => Some(NamingPolicy::PascalCase),
            "snake_case" => Some(NamingPolicy::SnakeCase),
            "kebab-case" => Some(NamingPolicy::KebabCase),
            "UPPERCASE" => Some(NamingPolicy::UpperCase),
            "lowercase" => Some(NamingPolicy::LowerCase),
            _ => None,
        }
    }

    pub fn convert(&self, name: &str) -> String {
        match self {
            NamingPolicy::CamelCase => {
                let mut out = String::with_capacity(name.len());
                for (i, word) in split_words(name).iter().enumerate() {
                    if i == 0 {
                        out.push_str(&word.to_lowercase());
                    } else {
                        capitalize_into(word, &mut out);
                    }
                }
                out
            }
            NamingPolicy::PascalCase => {
                let mut out = String::with_capacity(name.len());
                for word in split_words(name) {
                    capitalize_into(word, &mut out);
                }
                out
            }
            NamingPolicy::SnakeCase => join_lower(name, '_'),
            NamingPolicy::KebabCase => join_lower(name, '-'),
            NamingPolicy::UpperCase => name.to_uppercase(),
            NamingPolicy::LowerCase => name.to_lowercase(),
            NamingPolicy::Custom(f) => f(name),
        }
    }
}

/// Splits on `_`, `-`, spaces, lower-to-upper transitions and the end of an
/// acronym (`HTTPServer` -> `HTTP`, `Server`).
fn split_words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut start: Option<usize> = None;
    for (i, &(pos, c)) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if let Some(s) = start.take() {
                words.push(&name[s..pos]);
            }
            continue;
        }
        match start {
            None => start = Some(pos),
            Some(s) if c.is_uppercase() => {
                let prev = chars[i - 1].1;
                let next_lower = chars.get(i + 1).is_some_and(|&(_, n)| n.is_lowercase());
                if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_lower)
                {
                    words.push(&name[s..pos]);
                    start = Some(pos);
                }
            }
            Some(_) => {}
        }
    }
    if let Some(s) = start {
        words.push(&name[s..]);
    }
    words
}

fn capitalize_into(word: &str, out: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
}

fn join_lower(name: &str, separator: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, word) in split_words(name).iter().enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(&word.to_lowercase());
    }
    out
}
