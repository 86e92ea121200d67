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

use std::sync::LazyLock;

use log::{error, trace};

use super::formatting_template::{DIGIT_PLACEHOLDER, build_formatting_template};
use crate::{
    phonenumberutil::{
        helper_constants::{NANPA_COUNTRY_CODE, PLUS_CHARS, PLUS_SIGN, REGION_CODE_FOR_NON_GEO_ENTITY},
        phonenumberutil::PhoneNumberUtil,
    },
    proto_gen::phonemetadata::{NumberFormat, PhoneMetadata},
    regex_util::{RegexConsume, to_replacement_template},
    regexp_cache::InvalidRegexError,
};

/// Character used when appropriate to separate a prefix, such as a long NDD
/// or a country calling code, from the national number.
const SEPARATOR_BEFORE_NATIONAL_NUMBER: char = ' ';

/// The minimum length of national number accrued that is required to
/// trigger the formatter. The first element of the leading digits pattern of
/// each number format matches up to this number of digits.
const MIN_LEADING_DIGITS_LENGTH: usize = 3;

/// Used when the region is unknown, so that numbers entered with "+" can
/// still be formatted.
static EMPTY_METADATA: LazyLock<PhoneMetadata> = LazyLock::new(|| {
    let mut metadata = PhoneMetadata::new();
    metadata.set_international_prefix("NA".to_owned());
    metadata
});

/// Formats a phone number while it is being entered, one character at a
/// time.
///
/// The formatter is created by
/// [`PhoneNumberUtil::get_as_you_type_formatter`] for the region the user is
/// dialing from. Each call to [`input_digit`](Self::input_digit) returns the
/// whole number entered so far, formatted as well as the digits allow.
/// As soon as a character other than a digit (or a leading plus sign) is
/// entered, the formatter gives up and echoes the raw input back.
///
/// ```ignore
/// let mut formatter = util.get_as_you_type_formatter("US");
/// let mut formatted = String::new();
/// for c in "6502532222".chars() {
///     formatted = formatter.input_digit(c).to_owned();
/// }
/// assert_eq!("650 253 2222", formatted);
/// ```
pub struct AsYouTypeFormatter<'a> {
    util: &'a PhoneNumberUtil,
    default_country: String,
    default_metadata: &'a PhoneMetadata,
    session: FormatterSession<'a>,
}

/// Everything the formatter accumulates while a single number is entered.
struct FormatterSession<'a> {
    current_output: String,
    formatting_template: String,
    /// The pattern from the number format currently used to create
    /// `formatting_template`.
    current_formatting_pattern: String,
    accrued_input: String,
    /// Only ASCII digits and the leading plus sign.
    accrued_input_without_formatting: String,
    /// Whether the formatter is currently doing the formatting.
    able_to_format: bool,
    /// Set when users enter their own formatting; no formatting is done at
    /// all after that.
    input_has_formatting: bool,
    /// Set once a national prefix or an international dialing prefix was
    /// detected, so the full national significant number is being entered.
    /// Local formatting patterns are no longer used from then on.
    is_complete_number: bool,
    is_expecting_country_calling_code: bool,
    /// Byte offset into `formatting_template` of the last digit written.
    last_match_position: usize,
    /// Position in `accrued_input` (in chars) of the character remembered
    /// last.
    original_position: usize,
    /// Position in `accrued_input_without_formatting` of the digit
    /// remembered last.
    position_to_remember: usize,
    /// Anything entered before the national significant number, formatted:
    /// IDD, country calling code or national prefix.
    prefix_before_national_number: String,
    should_add_space_after_national_prefix: bool,
    /// The national prefix that has been extracted, digits only.
    extracted_national_prefix: String,
    national_number: String,
    possible_formats: Vec<&'a NumberFormat>,
    current_metadata: &'a PhoneMetadata,
}

impl<'a> FormatterSession<'a> {
    fn new(metadata: &'a PhoneMetadata) -> Self {
        Self {
            current_output: String::new(),
            formatting_template: String::new(),
            current_formatting_pattern: String::new(),
            accrued_input: String::new(),
            accrued_input_without_formatting: String::new(),
            able_to_format: true,
            input_has_formatting: false,
            is_complete_number: false,
            is_expecting_country_calling_code: false,
            last_match_position: 0,
            original_position: 0,
            position_to_remember: 0,
            prefix_before_national_number: String::new(),
            should_add_space_after_national_prefix: false,
            extracted_national_prefix: String::new(),
            national_number: String::new(),
            possible_formats: Vec::new(),
            current_metadata: metadata,
        }
    }
}

/// The metadata needed by the formatter is the same for all regions sharing
/// the same country calling code, so the one of the main region is returned.
fn get_metadata_for_region<'a>(util: &'a PhoneNumberUtil, region_code: &str) -> &'a PhoneMetadata {
    let country_calling_code = util.get_country_code_for_region(region_code);
    let main_country = util.get_region_code_for_country_code(country_calling_code);
    util.get_metadata_for_region(main_country)
        .unwrap_or(&*EMPTY_METADATA)
}

/// True if the national prefix formatting rule separates the prefix from
/// the number.
fn has_national_prefix_separator(national_prefix_formatting_rule: &str) -> bool {
    national_prefix_formatting_rule.contains([' ', '-'])
}

fn log_invalid_metadata(err: &InvalidRegexError) {
    error!("Invalid pattern in metadata, formatting disabled: {}", err);
}

impl<'a> AsYouTypeFormatter<'a> {
    pub(crate) fn new(util: &'a PhoneNumberUtil, region_code: &str) -> Self {
        let default_metadata = get_metadata_for_region(util, region_code);
        Self {
            util,
            default_country: region_code.to_owned(),
            default_metadata,
            session: FormatterSession::new(default_metadata),
        }
    }

    /// Clears the internal state of the formatter, so it can be reused for
    /// another number.
    pub fn clear(&mut self) {
        self.session = FormatterSession::new(self.default_metadata);
    }

    /// Formats a phone number on-the-fly as each digit is entered.
    ///
    /// Formatting characters are allowed, but as soon as they are
    /// encountered the number is returned as entered and is not formatted
    /// anymore. Full width digits and Arabic-indic digits are allowed, and
    /// are shown as they are.
    pub fn input_digit(&mut self, next_char: char) -> &str {
        self.session.current_output = self.input_digit_with_option_to_remember_position(next_char, false);
        &self.session.current_output
    }

    /// Same as [`input_digit`](Self::input_digit), but remembers the
    /// position where `next_char` is inserted, so that it can be retrieved
    /// later with [`get_remembered_position`](Self::get_remembered_position).
    pub fn input_digit_and_remember_position(&mut self, next_char: char) -> &str {
        self.session.current_output = self.input_digit_with_option_to_remember_position(next_char, true);
        &self.session.current_output
    }

    /// Returns the current position in the partially formatted phone number
    /// of the character which was previously passed to
    /// [`input_digit_and_remember_position`](Self::input_digit_and_remember_position).
    pub fn get_remembered_position(&self) -> usize {
        let session = &self.session;
        if !session.able_to_format {
            return session.original_position;
        }
        let accrued = session.accrued_input_without_formatting.as_bytes();
        let mut accrued_input_index = 0;
        let mut current_output_index = 0;
        for c in session.current_output.chars() {
            if accrued_input_index >= session.position_to_remember {
                break;
            }
            if accrued.get(accrued_input_index).is_some_and(|b| c == char::from(*b)) {
                accrued_input_index += 1;
            }
            current_output_index += 1;
        }
        current_output_index
    }

    pub(crate) fn extracted_national_prefix(&self) -> &str {
        &self.session.extracted_national_prefix
    }

    fn input_digit_with_option_to_remember_position(
        &mut self,
        next_char: char,
        remember_position: bool,
    ) -> String {
        self.session.accrued_input.push(next_char);
        if remember_position {
            self.session.original_position = self.session.accrued_input.chars().count();
        }
        // Formatting on-the-fly happens only while each character entered is
        // either a digit, or a plus sign accepted at the start of the number.
        let next_char = match self.normalize_digit_or_leading_plus_sign(next_char) {
            Some(normalized_char) => {
                self.accrue_digit_or_plus_sign(normalized_char, remember_position);
                normalized_char
            }
            None => {
                self.session.able_to_format = false;
                self.session.input_has_formatting = true;
                next_char
            }
        };

        if !self.session.able_to_format {
            // When we are unable to format because of reasons other than that
            // formatting chars have been entered, it can be due to really long
            // IDDs or NDDs. If that is the case, we might be able to do
            // formatting again after extracting them.
            if self.session.input_has_formatting {
                return self.session.accrued_input.clone();
            } else if self.attempt_to_extract_idd() {
                if self.attempt_to_extract_country_calling_code() {
                    return self.attempt_to_choose_pattern_with_prefix_extracted();
                }
            } else if self.able_to_extract_longer_ndd() {
                // Add an additional space to separate a long NDD from the
                // national significant number. should_add_space_after_national_prefix
                // stays unset so later template changes don't alter it.
                self.session
                    .prefix_before_national_number
                    .push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
                return self.attempt_to_choose_pattern_with_prefix_extracted();
            }
            return self.session.accrued_input.clone();
        }

        // Formatting starts only when at least MIN_LEADING_DIGITS_LENGTH digits
        // (the plus sign counts as a digit here) have been entered.
        match self.session.accrued_input_without_formatting.len() {
            0..=2 => return self.session.accrued_input.clone(),
            3 => {
                if self.attempt_to_extract_idd() {
                    self.session.is_expecting_country_calling_code = true;
                } else {
                    // No IDD or plus sign is found, might be entering in
                    // national format.
                    self.session.extracted_national_prefix =
                        self.remove_national_prefix_from_national_number();
                    return self.attempt_to_choose_formatting_pattern();
                }
            }
            _ => {}
        }

        if self.session.is_expecting_country_calling_code {
            if self.attempt_to_extract_country_calling_code() {
                self.session.is_expecting_country_calling_code = false;
            }
            return fast_cat::concat_str!(
                &self.session.prefix_before_national_number,
                &self.session.national_number
            );
        }
        if self.session.possible_formats.is_empty() {
            return self.attempt_to_choose_formatting_pattern();
        }

        // The formatting patterns are already chosen.
        let temp_national_number = self.input_digit_helper(next_char);
        // See if the accrued digits can be formatted properly already. If not,
        // use the results from input_digit_helper, which does formatting based
        // on the formatting pattern chosen.
        if let Some(formatted_number) = self.attempt_to_format_accrued_digits() {
            return formatted_number;
        }
        let national_number = self.session.national_number.clone();
        self.narrow_down_possible_formats(&national_number);
        if self.maybe_create_new_template() {
            return self.input_accrued_national_number();
        }
        if self.session.able_to_format {
            self.append_national_number(&temp_national_number)
        } else {
            self.session.accrued_input.clone()
        }
    }

    /// Returns the character to accrue: the ASCII digit for any decimal
    /// digit, or '+' for a plus sign entered first.
    fn normalize_digit_or_leading_plus_sign(&self, next_char: char) -> Option<char> {
        if self.session.accrued_input.chars().count() == 1 && PLUS_CHARS.contains(next_char) {
            return Some('+');
        }
        let mut buf = [0u8; 4];
        let normalized = PhoneNumberUtil::normalize_digits_only(next_char.encode_utf8(&mut buf));
        let mut chars = normalized.chars();
        match (chars.next(), chars.next()) {
            (Some(digit), None) if digit.is_ascii_digit() => Some(digit),
            _ => None,
        }
    }

    fn accrue_digit_or_plus_sign(&mut self, normalized_char: char, remember_position: bool) {
        let session = &mut self.session;
        session.accrued_input_without_formatting.push(normalized_char);
        if normalized_char != '+' {
            session.national_number.push(normalized_char);
        }
        if remember_position {
            session.position_to_remember = session.accrued_input_without_formatting.len();
        }
    }

    fn attempt_to_choose_pattern_with_prefix_extracted(&mut self) -> String {
        let session = &mut self.session;
        session.able_to_format = true;
        session.is_expecting_country_calling_code = false;
        session.possible_formats.clear();
        session.last_match_position = 0;
        session.formatting_template.clear();
        session.current_formatting_pattern.clear();
        self.attempt_to_choose_formatting_pattern()
    }

    /// Some national prefixes are a substring of others. If extracting the
    /// shorter NDD doesn't result in a number we can format, we try to see if
    /// we can extract a longer version here.
    fn able_to_extract_longer_ndd(&mut self) -> bool {
        let session = &mut self.session;
        if !session.extracted_national_prefix.is_empty() {
            // Put the extracted NDD back to the national number before
            // attempting to extract a new NDD.
            session
                .national_number
                .insert_str(0, &session.extracted_national_prefix);
            // Remove the previously extracted NDD from the prefix. It can't
            // simply be emptied, because people incorrectly enter the national
            // prefix after the country code, e.g. +44 (0)20-1234-5678.
            if let Some(index_of_previous_ndd) = session
                .prefix_before_national_number
                .rfind(&session.extracted_national_prefix)
            {
                session.prefix_before_national_number.truncate(index_of_previous_ndd);
            }
        }
        let new_national_prefix = self.remove_national_prefix_from_national_number();
        self.session.extracted_national_prefix != new_national_prefix
    }

    /// Checks whether the accrued national number matches the pattern of one
    /// of the candidate formats exactly. If so, that format is used instead of
    /// any template whose leading digits pattern also matches.
    fn attempt_to_format_accrued_digits(&mut self) -> Option<String> {
        let regexp_cache = self.util.regexp_cache();
        for format in self.session.possible_formats.clone() {
            let pattern = match regexp_cache.get_full_match_regex(format.pattern()) {
                Ok(pattern) => pattern,
                Err(err) => {
                    log_invalid_metadata(&err);
                    continue;
                }
            };
            if !pattern.is_match(&self.session.national_number) {
                continue;
            }
            self.session.should_add_space_after_national_prefix =
                has_national_prefix_separator(format.national_prefix_formatting_rule());
            let formatted_number = pattern
                .replace_all(
                    &self.session.national_number,
                    to_replacement_template(format.format()).as_ref(),
                )
                .into_owned();
            let full_output = self.append_national_number(&formatted_number);
            // A format may swallow or add digits; such output is not a
            // faithful rendering of what was typed.
            let output_digits_only = full_output
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+');
            if output_digits_only.eq(self.session.accrued_input_without_formatting.chars()) {
                return Some(full_output);
            }
        }
        None
    }

    /// Combines the national number with any prefix (IDD/+ and country code
    /// or national prefix) that was collected. A space is inserted between
    /// them if the current formatting template indicates this to be
    /// suitable.
    fn append_national_number(&self, national_number: &str) -> String {
        let prefix = &self.session.prefix_before_national_number;
        if self.session.should_add_space_after_national_prefix
            && !prefix.is_empty()
            && !prefix.ends_with(SEPARATOR_BEFORE_NATIONAL_NUMBER)
        {
            // The exception is the case where a space was already appended
            // because the NDD was surprisingly long.
            let mut buf = [0u8; 4];
            fast_cat::concat_str!(
                prefix,
                SEPARATOR_BEFORE_NATIONAL_NUMBER.encode_utf8(&mut buf),
                national_number
            )
        } else {
            fast_cat::concat_str!(prefix, national_number)
        }
    }

    /// Attempts to set the formatting template and returns the formatted
    /// version of the digits entered so far.
    fn attempt_to_choose_formatting_pattern(&mut self) -> String {
        // Formatting starts only when at least MIN_LEADING_DIGITS_LENGTH
        // digits of the national number (excluding the national prefix) have
        // been entered.
        if self.session.national_number.len() < MIN_LEADING_DIGITS_LENGTH {
            return self.append_national_number(&self.session.national_number);
        }
        let national_number = self.session.national_number.clone();
        self.get_available_formats(&national_number);
        // See if the accrued digits can be formatted properly already.
        if let Some(formatted_number) = self.attempt_to_format_accrued_digits() {
            return formatted_number;
        }
        if self.maybe_create_new_template() {
            self.input_accrued_national_number()
        } else {
            self.session.accrued_input.clone()
        }
    }

    /// Feeds every digit of the accrued national number through the
    /// template and returns the formatted result.
    fn input_accrued_national_number(&mut self) -> String {
        if self.session.national_number.is_empty() {
            return self.session.prefix_before_national_number.clone();
        }
        let national_number = self.session.national_number.clone();
        let mut temp_national_number = String::new();
        for digit in national_number.chars() {
            temp_national_number = self.input_digit_helper(digit);
        }
        if self.session.able_to_format {
            self.append_national_number(&temp_national_number)
        } else {
            self.session.accrued_input.clone()
        }
    }

    /// For NANPA numbers beginning with 1[2-9], the 1 is treated as the
    /// national prefix: national significant numbers in NANPA always start
    /// with [2-9], numbers beginning with 1[01] can only be short or
    /// emergency numbers.
    fn is_nanpa_number_with_national_prefix(&self) -> bool {
        let mut digits = self.session.national_number.chars();
        self.session.current_metadata.country_code() == NANPA_COUNTRY_CODE
            && digits.next() == Some('1')
            && digits.next().is_some_and(|d| d != '0' && d != '1')
    }

    /// Returns the national prefix extracted, or an empty string if it is
    /// not present.
    fn remove_national_prefix_from_national_number(&mut self) -> String {
        let mut start_of_national_number = 0;
        if self.is_nanpa_number_with_national_prefix() {
            start_of_national_number = 1;
            let session = &mut self.session;
            session.prefix_before_national_number.push('1');
            session
                .prefix_before_national_number
                .push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
            session.is_complete_number = true;
        } else {
            let national_prefix_for_parsing = self.session.current_metadata.national_prefix_for_parsing();
            if !national_prefix_for_parsing.is_empty() {
                match self.util.regexp_cache().get_regex(national_prefix_for_parsing) {
                    Ok(pattern) => {
                        let session = &mut self.session;
                        // Since some national prefix patterns are entirely
                        // optional, check that a national prefix could
                        // actually be extracted.
                        if let Some(found) = pattern
                            .find_start(&session.national_number)
                            .filter(|found| found.end() > 0)
                        {
                            // National formatting rules could contain local
                            // rules for numbers entered without area code, so
                            // international ones are used from now on.
                            session.is_complete_number = true;
                            start_of_national_number = found.end();
                            session
                                .prefix_before_national_number
                                .push_str(&session.national_number[..start_of_national_number]);
                        }
                    }
                    Err(err) => log_invalid_metadata(&err),
                }
            }
        }
        self.session
            .national_number
            .drain(..start_of_national_number)
            .collect()
    }

    /// Extracts IDD and plus sign to the prefix when they are available, and
    /// places the remaining input into the national number.
    ///
    /// Returns true when the accrued digits begin with the plus sign or a
    /// valid IDD for the current region.
    fn attempt_to_extract_idd(&mut self) -> bool {
        let international_prefix = fast_cat::concat_str!(
            "\\",
            PLUS_SIGN,
            "|",
            self.session.current_metadata.international_prefix()
        );
        let pattern = match self.util.regexp_cache().get_regex(&international_prefix) {
            Ok(pattern) => pattern,
            Err(err) => {
                log_invalid_metadata(&err);
                return false;
            }
        };
        let session = &mut self.session;
        let Some(idd) = pattern.find_start(&session.accrued_input_without_formatting) else {
            return false;
        };
        session.is_complete_number = true;
        let start_of_country_calling_code = idd.end();
        let accrued = &session.accrued_input_without_formatting;
        session.national_number.clear();
        session
            .national_number
            .push_str(&accrued[start_of_country_calling_code..]);
        session.prefix_before_national_number.clear();
        session
            .prefix_before_national_number
            .push_str(&accrued[..start_of_country_calling_code]);
        if !accrued.starts_with(PLUS_SIGN) {
            session
                .prefix_before_national_number
                .push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
        }
        true
    }

    /// Extracts the country calling code from the beginning of the national
    /// number to the prefix when it is available, and places the remaining
    /// input into the national number.
    ///
    /// Returns true when a valid country calling code can be found.
    fn attempt_to_extract_country_calling_code(&mut self) -> bool {
        let util = self.util;
        let Some((country_code, number_without_country_calling_code)) =
            util.extract_country_code(&self.session.national_number)
        else {
            return false;
        };
        self.session.national_number = number_without_country_calling_code.to_owned();

        let new_region_code = util.get_region_code_for_country_code(country_code);
        if new_region_code == REGION_CODE_FOR_NON_GEO_ENTITY {
            self.session.current_metadata = util
                .get_metadata_for_non_geographical_region(country_code)
                .unwrap_or(&*EMPTY_METADATA);
        } else if new_region_code != self.default_country {
            self.session.current_metadata = get_metadata_for_region(util, new_region_code);
        }
        trace!(
            "Extracted country calling code {} for region {}",
            country_code, new_region_code
        );

        let session = &mut self.session;
        let mut buf = itoa::Buffer::new();
        session
            .prefix_before_national_number
            .push_str(buf.format(country_code));
        session
            .prefix_before_national_number
            .push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
        // When the IDD was extracted successfully, the previously extracted
        // NDD is no longer valid.
        session.extracted_national_prefix.clear();
        true
    }

    /// Returns true if a new template is created as opposed to reusing the
    /// existing template.
    fn maybe_create_new_template(&mut self) -> bool {
        // When there are multiple available formats, the formatter uses the
        // first format where a formatting template could be created.
        while let Some(number_format) = self.session.possible_formats.first().copied() {
            let pattern = number_format.pattern();
            if self.session.current_formatting_pattern == pattern {
                return false;
            }
            let template = build_formatting_template(
                self.util.regexp_cache(),
                number_format,
                self.session.national_number.len(),
            )
            .unwrap_or_else(|err| {
                log_invalid_metadata(&err);
                None
            });
            match template {
                Some(template) => {
                    let session = &mut self.session;
                    session.formatting_template = template;
                    session.current_formatting_pattern = pattern.to_owned();
                    session.should_add_space_after_national_prefix =
                        has_national_prefix_separator(number_format.national_prefix_formatting_rule());
                    // With a new formatting template, the matched position
                    // using the old template needs to be reset.
                    session.last_match_position = 0;
                    return true;
                }
                None => {
                    self.session.possible_formats.remove(0);
                }
            }
        }
        self.session.able_to_format = false;
        false
    }

    fn get_available_formats(&mut self, leading_digits: &str) {
        let metadata = self.session.current_metadata;
        let number_formats = if self.session.is_complete_number && !metadata.intl_number_format.is_empty() {
            &metadata.intl_number_format
        } else {
            &metadata.number_format
        };
        let national_prefix_is_used_by_country = !metadata.national_prefix().is_empty();
        for format in number_formats {
            if (!national_prefix_is_used_by_country
                || self.session.is_complete_number
                || format.national_prefix_optional_when_formatting()
                || self
                    .util
                    .formatting_rule_has_first_group_only(format.national_prefix_formatting_rule()))
                && self
                    .util
                    .is_format_eligible_for_as_you_type_formatter(format.format())
            {
                self.session.possible_formats.push(format);
            }
        }
        self.narrow_down_possible_formats(leading_digits);
    }

    fn narrow_down_possible_formats(&mut self, leading_digits: &str) {
        let index_of_leading_digits_pattern = leading_digits.len().saturating_sub(MIN_LEADING_DIGITS_LENGTH);
        let regexp_cache = self.util.regexp_cache();
        self.session.possible_formats.retain(|format| {
            let Some(last_index) = format.leading_digits_pattern.len().checked_sub(1) else {
                // Keep everything that isn't restricted by leading digits.
                return true;
            };
            let leading_digits_pattern =
                &format.leading_digits_pattern[index_of_leading_digits_pattern.min(last_index)];
            match regexp_cache.get_regex(leading_digits_pattern) {
                Ok(pattern) => pattern.matches_start(leading_digits),
                Err(err) => {
                    log_invalid_metadata(&err);
                    false
                }
            }
        });
    }

    /// Writes `next_char` into the first free slot of the template and
    /// returns the template up to and including it.
    fn input_digit_helper(&mut self, next_char: char) -> String {
        let session = &mut self.session;
        // The template is not guaranteed to have a value, it could be empty,
        // e.g. when the next digit is entered after extracting an IDD or NDD.
        let placeholder = session
            .formatting_template
            .get(session.last_match_position..)
            .and_then(|rest| rest.find(DIGIT_PLACEHOLDER))
            .map(|index| index + session.last_match_position);
        match placeholder {
            Some(index) => {
                let mut buf = [0u8; 4];
                session.formatting_template.replace_range(
                    index..index + DIGIT_PLACEHOLDER.len(),
                    next_char.encode_utf8(&mut buf),
                );
                session.last_match_position = index;
                session.formatting_template[..index + next_char.len_utf8()].to_owned()
            }
            None => {
                if session.possible_formats.len() == 1 {
                    // More digits are entered than we could handle, and there
                    // are no other valid patterns to try.
                    session.able_to_format = false;
                }
                // Otherwise only the formatting pattern is reset.
                session.current_formatting_pattern.clear();
                session.accrued_input.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{has_national_prefix_separator, EMPTY_METADATA};

    #[test]
    fn national_prefix_separators() {
        assert!(has_national_prefix_separator("$NP $FG"));
        assert!(has_national_prefix_separator("$NP-$FG"));
        assert!(!has_national_prefix_separator("($NP$FG)"));
        assert!(!has_national_prefix_separator(""));
    }

    #[test]
    fn empty_metadata_only_knows_plus() {
        assert_eq!("NA", EMPTY_METADATA.international_prefix());
        assert_eq!(0, EMPTY_METADATA.country_code());
        assert!(EMPTY_METADATA.number_format.is_empty());
    }
}
