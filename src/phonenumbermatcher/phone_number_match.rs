// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 Kashin Vladislav (Rust adaptation author)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

use crate::proto_gen::phonenumber::PhoneNumber;

/// A phone number found in text, with the byte range it occupies in the
/// searched string.
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneNumberMatch {
    start: usize,
    raw_string: String,
    number: PhoneNumber,
}

impl PhoneNumberMatch {
    pub(crate) fn new(start: usize, raw_string: &str, number: PhoneNumber) -> Self {
        Self {
            start,
            raw_string: raw_string.to_owned(),
            number,
        }
    }

    /// Byte offset of the first character of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset right after the last character of the match.
    pub fn end(&self) -> usize {
        self.start + self.raw_string.len()
    }

    /// The matched text, exactly as it appears in the searched string.
    pub fn raw_string(&self) -> &str {
        &self.raw_string
    }

    pub fn number(&self) -> &PhoneNumber {
        &self.number
    }

    pub fn into_number(self) -> PhoneNumber {
        self.number
    }
}

impl fmt::Display for PhoneNumberMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhoneNumberMatch [{},{}) {}", self.start, self.end(), self.raw_string)
    }
}
