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

use log::trace;
use regex::Regex;

use super::{matcher_patterns::MATCHER_PATTERNS, phone_number_match::PhoneNumberMatch, verification::verify};
use crate::phonenumberutil::{Leniency, phonenumberutil::PhoneNumberUtil};

/// Israeli four digit numbers can only be dialled with a leading star.
const REGION_CODE_FOR_STAR_NUMBERS: &str = "IL";

/// Finds phone numbers in text, yielding them in order of appearance.
///
/// Obtained from [`PhoneNumberUtil::find_numbers`]. Numbers not written in
/// international format are parsed with the default region given there. At
/// most `max_tries` candidates are examined, accepted or not, so the matcher
/// never yields more than `max_tries` numbers.
pub struct PhoneNumberMatcher<'a> {
    util: &'a PhoneNumberUtil,
    /// The text searched for phone numbers.
    text: &'a str,
    /// The region to assume for phone numbers without an international
    /// prefix.
    preferred_region: &'a str,
    leniency: Leniency,
    /// The number of candidates that may still be examined.
    max_tries: u64,
    /// The next byte offset to start searching at.
    search_index: usize,
}

/// Trims away any characters after the first match of `pattern` in
/// `candidate`, returning the trimmed version.
fn trim_after_first_match<'b>(pattern: &Regex, candidate: &'b str) -> &'b str {
    match pattern.find(candidate) {
        Some(trailing_chars) => &candidate[..trailing_chars.start()],
        None => candidate,
    }
}

/// Whether a character is a Latin-script letter or not. Combining marks are
/// also accepted since they are assumed to have been added to a preceding
/// Latin character.
fn is_latin_letter(letter: char) -> bool {
    let is_combining_mark = ('\u{0300}'..='\u{036F}').contains(&letter);
    if !letter.is_alphabetic() && !is_combining_mark {
        return false;
    }
    matches!(
        letter as u32,
        0x0000..=0x024F // Basic Latin to Latin Extended-B
        | 0x0300..=0x036F // Combining diacritical marks
        | 0x1E00..=0x1EFF // Latin Extended Additional
    )
}

fn is_invalid_punctuation_symbol(character: char) -> bool {
    let mut buf = [0u8; 4];
    MATCHER_PATTERNS
        .invalid_punctuation_symbol
        .is_match(character.encode_utf8(&mut buf))
}

impl<'a> PhoneNumberMatcher<'a> {
    pub(crate) fn new(
        util: &'a PhoneNumberUtil,
        text: &'a str,
        preferred_region: &'a str,
        leniency: Leniency,
        max_tries: u64,
    ) -> Self {
        Self {
            util,
            text,
            preferred_region,
            leniency,
            max_tries,
            search_index: 0,
        }
    }

    /// Attempts to find the next phone number in the text on or after
    /// `index`.
    fn find(&mut self, mut index: usize) -> Option<PhoneNumberMatch> {
        while self.max_tries > 0 {
            let found = MATCHER_PATTERNS.candidate.find_at(self.text, index)?;
            let start = found.start();
            // Check for extra numbers at the end.
            let candidate = trim_after_first_match(
                &self.util.reg_exps.second_number_start_pattern,
                found.as_str(),
            );
            if let Some(phone_number_match) = self.extract_match(candidate, start) {
                self.max_tries = self.max_tries.saturating_sub(1);
                return Some(phone_number_match);
            }
            trace!("Skipping candidate {:?} at {}", candidate, start);
            index = start + candidate.len();
            self.max_tries = self.max_tries.saturating_sub(1);
        }
        None
    }

    /// Attempts to extract a match from a candidate found at `offset`.
    fn extract_match(&mut self, candidate: &str, offset: usize) -> Option<PhoneNumberMatch> {
        // Skip a match that is more likely to be a date.
        if MATCHER_PATTERNS.slash_separated_dates.is_match(candidate) {
            return None;
        }
        // Skip potential time-stamps.
        if MATCHER_PATTERNS.time_stamps.is_match(candidate) {
            let following_text = &self.text[offset + candidate.len()..];
            if MATCHER_PATTERNS.time_stamps_suffix.is_match(following_text) {
                return None;
            }
        }
        // Try to come up with a valid match given the entire candidate.
        if let Some(phone_number_match) = self.parse_and_verify(candidate, offset) {
            return Some(phone_number_match);
        }
        // If that failed, try to find an "inner match", there might be a
        // phone number within this candidate.
        self.extract_inner_match(candidate, offset)
    }

    /// Attempts to extract a match from `candidate` if the whole candidate
    /// does not qualify as a match.
    fn extract_inner_match(&mut self, candidate: &str, offset: usize) -> Option<PhoneNumberMatch> {
        let util = self.util;
        let unwanted_end_char_pattern = &util.reg_exps.unwanted_end_char_pattern;
        for possible_inner_match in &MATCHER_PATTERNS.inner_matches {
            let mut is_first_match = true;
            for group_match in possible_inner_match.captures_iter(candidate) {
                if self.max_tries == 0 {
                    break;
                }
                let (Some(whole), Some(group)) = (group_match.get(0), group_match.get(1)) else {
                    continue;
                };
                if is_first_match {
                    // Any group before this one has to be handled too.
                    let group_before =
                        trim_after_first_match(unwanted_end_char_pattern, &candidate[..whole.start()]);
                    if let Some(phone_number_match) = self.parse_and_verify(group_before, offset) {
                        return Some(phone_number_match);
                    }
                    self.max_tries = self.max_tries.saturating_sub(1);
                    is_first_match = false;
                }
                let group_text = trim_after_first_match(unwanted_end_char_pattern, group.as_str());
                if let Some(phone_number_match) = self.parse_and_verify(group_text, offset + group.start()) {
                    return Some(phone_number_match);
                }
                self.max_tries = self.max_tries.saturating_sub(1);
            }
        }
        None
    }

    /// Parses a phone number from `candidate` and verifies it matches the
    /// requested leniency.
    fn parse_and_verify(&self, candidate: &str, offset: usize) -> Option<PhoneNumberMatch> {
        // Check the candidate doesn't contain any formatting which would
        // indicate that it really isn't a phone number.
        if !MATCHER_PATTERNS.matching_brackets.is_match(candidate)
            || MATCHER_PATTERNS.pub_pages.is_match(candidate)
        {
            return None;
        }

        let previous_char = self.text[..offset].chars().next_back();
        // If leniency is set to Valid or stricter, numbers surrounded by Latin
        // alphabetic characters are skipped, e.g. abc8005001234 or
        // 8005001234def.
        if self.leniency >= Leniency::Valid {
            // If the candidate is not at the start of the text, and does not
            // start with phone-number punctuation, check the previous
            // character.
            if !MATCHER_PATTERNS.lead_class.is_match(candidate)
                && previous_char.is_some_and(|c| is_invalid_punctuation_symbol(c) || is_latin_letter(c))
            {
                return None;
            }
            let next_char = self.text[offset + candidate.len()..].chars().next();
            if next_char.is_some_and(|c| is_invalid_punctuation_symbol(c) || is_latin_letter(c)) {
                return None;
            }
        }

        let mut number = self
            .util
            .parse_and_keep_raw_input(candidate, self.preferred_region)
            .ok()?;

        // Israeli four digit numbers are only accepted when preceded by a
        // star, at every leniency.
        if self.util.get_region_code_for_country_code(number.country_code()) == REGION_CODE_FOR_STAR_NUMBERS
            && PhoneNumberUtil::get_national_significant_number(&number).len() == 4
            && previous_char != Some('*')
        {
            return None;
        }

        if !verify(self.leniency, &number, candidate, self.util) {
            return None;
        }
        // Only the fields that identify the number are returned.
        number.clear_country_code_source();
        number.clear_raw_input();
        number.clear_preferred_domestic_carrier_code();
        Some(PhoneNumberMatch::new(offset, candidate, number))
    }
}

impl Iterator for PhoneNumberMatcher<'_> {
    type Item = PhoneNumberMatch;

    fn next(&mut self) -> Option<Self::Item> {
        let phone_number_match = self.find(self.search_index)?;
        self.search_index = phone_number_match.end();
        Some(phone_number_match)
    }
}

#[cfg(test)]
mod tests {
    use super::{is_invalid_punctuation_symbol, is_latin_letter};

    #[test]
    fn latin_letters() {
        assert!(is_latin_letter('c'));
        assert!(is_latin_letter('C'));
        assert!(is_latin_letter('\u{00C9}'));
        // Combining acute accent.
        assert!(is_latin_letter('\u{0301}'));
        assert!(!is_latin_letter(':'));
        assert!(!is_latin_letter('5'));
        assert!(!is_latin_letter('-'));
        assert!(!is_latin_letter('.'));
        assert!(!is_latin_letter(' '));
        // Chinese and Greek letters are not Latin.
        assert!(!is_latin_letter('\u{6211}'));
        assert!(!is_latin_letter('\u{03B1}'));
    }

    #[test]
    fn invalid_punctuation() {
        assert!(is_invalid_punctuation_symbol('%'));
        assert!(is_invalid_punctuation_symbol('$'));
        assert!(is_invalid_punctuation_symbol('\u{20AC}'));
        assert!(!is_invalid_punctuation_symbol('-'));
        assert!(!is_invalid_punctuation_symbol('a'));
    }
}
