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

use std::num::ParseIntError;

use thiserror::Error;

use crate::regexp_cache::InvalidRegexError;

/// Parse failures as seen inside the crate, where a broken metadata pattern
/// is still a separate case.
#[derive(Debug, PartialEq, Error)]
pub enum ParseErrorInternal {
    #[error("{0}")]
    FailedToParse(#[from] ParseError),
    #[error("{0}")]
    RegexError(#[from] InvalidRegexError),
}

/// Why a string could not be turned into a `PhoneNumber`.
#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("Invalid country code")]
    InvalidCountryCode,
    #[error("Not a number: {0}")]
    NotANumber(#[from] NotANumberError),
    /// Nothing long enough to be a number follows the international prefix.
    #[error("Too short after idd")]
    TooShortAfterIdd,
    #[error("Too short nsn")]
    TooShortNsn,
    #[error("Too long nsn")]
    TooLongNsn,
}

#[derive(Debug, PartialEq, Error)]
pub enum NotANumberError {
    #[error("Number does not match the valid number pattern")]
    NotMatchedValidNumberPattern,
    #[error("Invalid phone context")]
    InvalidPhoneContext,
    #[error("{0}")]
    FailedToParseNumberAsInt(#[from] ParseIntError),
    #[error("{0}")]
    FailedToExtractNumber(#[from] ExtractNumberError),
}

#[derive(Debug, PartialEq, Error)]
pub enum ExtractNumberError {
    #[error("No valid start character found")]
    NoValidStartCharacter,
}

/// A string given for comparison that does not parse as a number.
#[derive(Error, Debug, PartialEq)]
#[error("Invalid number given: {0}")]
pub struct InvalidNumberError(#[from] pub ParseError);

/// Why a number is not possible, judged by its length and calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    #[error("The number has an invalid country calling code")]
    InvalidCountryCode,
    #[error("The number is shorter than all valid numbers for this region")]
    TooShort,
    /// Within the length range of the region but not one of its lengths.
    #[error("The number length is within range but matches no valid number length for this region")]
    InvalidLength,
    #[error("The number is longer than all valid numbers for this region")]
    TooLong,
}

impl From<ExtractNumberError> for ParseError {
    fn from(value: ExtractNumberError) -> Self {
        NotANumberError::FailedToExtractNumber(value).into()
    }
}

impl From<NotANumberError> for ParseErrorInternal {
    fn from(value: NotANumberError) -> Self {
        ParseError::NotANumber(value).into()
    }
}

impl ParseErrorInternal {
    /// Drops the internal regex case, which only broken metadata produces.
    ///
    /// # Panics
    ///
    /// Panics on `RegexError`.
    pub fn into_public(self) -> ParseError {
        match self {
            ParseErrorInternal::FailedToParse(err) => err,
            ParseErrorInternal::RegexError(err) => {
                panic!("metadata holds an invalid pattern: {err}")
            }
        }
    }
}
