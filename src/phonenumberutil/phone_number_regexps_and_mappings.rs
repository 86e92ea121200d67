// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 The Kashin Vladislav (Rust adaptation author)
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


use std::collections::HashMap;

use regex::Regex;

use crate::{phonenumberutil::{helper_constants::{
    DIGITS, MIN_LENGTH_FOR_NSN, PLUS_CHARS, PLUS_SIGN, RFC3966_VISUAL_SEPARATOR,
    SECOND_NUMBER_START, STAR_SIGN, VALID_ALPHA, VALID_ALPHA_INCL_UPPERCASE, VALID_PUNCTUATION
}, helper_functions::create_extn_pattern}, regexp_cache::RegexCache};

/// Builds one of the constant patterns below. They are part of the library,
/// not of the metadata, so failing to compile them is a programming error.
fn constant_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid constant pattern {}: {}", pattern, err),
    }
}

pub(crate) struct PhoneNumberRegExpsAndMappings {
    /// Cache for patterns coming from metadata. Shared by the util, every
    /// as-you-type formatter and every matcher created from it.
    pub regexp_cache: RegexCache,

    /// Maps letters of vanity numbers (uppercase only, like the keypad) and
    /// ASCII digits to the digit that should replace them for normalization
    /// purposes.
    pub alpha_phone_mappings: HashMap<char, char>,

    /// Regular expression of acceptable characters that may start a phone number
    /// for the purposes of parsing. This allows us to strip away meaningless
    /// prefixes to phone numbers that may be mistakenly given to us. This consists
    /// of digits, the plus symbol and arabic-indic digits. This does not contain
    /// alpha characters, although they may be used later in the number. It also
    /// does not include other punctuation, as this will be stripped later during
    /// parsing and is of no information value when parsing a number.
    pub valid_start_char_pattern: Regex,

    /// Marker that might indicate a second number, see [`SECOND_NUMBER_START`].
    pub second_number_start_pattern: Regex,

    /// Trailing characters that we want to remove. We remove all characters
    /// that are not alpha or numerical characters. The hash character is
    /// retained here, as it may signify the previous block was an extension.
    pub unwanted_end_char_pattern: Regex,

    /// Regular expression of groups of valid punctuation characters.
    pub separator_pattern: Regex,

    pub non_digits_pattern: Regex,

    /// Regexp of all known extension prefixes used by different regions followed
    /// by 1 or more valid digits, for use when parsing.
    pub extn_pattern: Regex,

    /// Regular expression of viable phone numbers. This is location independent.
    /// Checks we have at least three leading digits, and only valid punctuation,
    /// alpha characters and digits in the phone number. Does not include extension
    /// data. The symbol 'x' is allowed here as valid punctuation since it is often
    /// used as a placeholder for carrier codes, for example in Brazilian phone
    /// numbers. We also allow multiple plus-signs at the start.
    ///
    /// The short alternative allows two digit numbers such as "15" to be parsed
    /// only if there is no punctuation in them. An extension may follow.
    pub valid_phone_number_pattern: Regex,

    /// We use this pattern to check if the phone number has at least three letters
    /// in it - if so, then we treat it as a number where some phone-number digits
    /// are represented by letters.
    pub valid_alpha_phone_pattern: Regex,

    /// The first_group_capturing_pattern was originally set to $1 but there
    /// are some countries for which the first group is not used in the
    /// national pattern (e.g. Argentina) so the $1 group does not match
    /// correctly. Therefore, we use \d, so that the first group actually
    /// used in the pattern will be matched.
    pub first_group_capturing_pattern: Regex,

    /// Leading run of plus signs.
    pub plus_chars_pattern: Regex,

    pub capturing_digit_pattern: Regex,

    /// Regular expression of valid global-number-digits for the phone-context
    /// parameter, following the syntax defined in RFC3966.
    pub rfc3966_global_number_digits_pattern: Regex,

    /// Regular expression of valid domainname for the phone-context parameter,
    /// following the syntax defined in RFC3966.
    pub rfc3966_domainname_pattern: Regex,

    /// A pattern that is used to determine if a number format is eligible to
    /// be used by the as-you-type formatter. It is eligible when the format
    /// contains groups of the dollar sign followed by a single digit, separated
    /// by valid phone number punctuation. This prevents invalid punctuation
    /// (such as the star sign in Israeli star numbers) getting into the output.
    pub is_format_eligible_as_you_type_formatting_regex: Regex,

    /// A pattern that is used to determine if the national prefix formatting rule
    /// has the first group only, i.e., does not start with the national prefix.
    /// Note that the pattern explicitly allows for unbalanced parentheses.
    pub formatting_rule_has_first_group_only_regex: Regex,
}

impl PhoneNumberRegExpsAndMappings {
    fn initialize_regexp_mappings(&mut self) {
        // Simple ASCII digits map used to populate alpha_phone_mappings.
        let mut ascii_digit_mappings = HashMap::with_capacity(10);
        for d in '0'..='9' {
            ascii_digit_mappings.insert(d, d);
        }

        let mut alpha_map = HashMap::with_capacity(40);
        for (letters, digit) in [
            ("ABC", '2'), ("DEF", '3'), ("GHI", '4'), ("JKL", '5'),
            ("MNO", '6'), ("PQRS", '7'), ("TUV", '8'), ("WXYZ", '9'),
        ] {
            for letter in letters.chars() {
                alpha_map.insert(letter, digit);
            }
        }
        // Letters are looked up upper-cased by normalize_helper.

        let mut combined_map = HashMap::with_capacity(100);
        combined_map.extend(alpha_map);
        combined_map.extend(ascii_digit_mappings);
        self.alpha_phone_mappings = combined_map;
    }

    pub fn new() -> Self {
        let alphanum = fast_cat::concat_str!(VALID_ALPHA_INCL_UPPERCASE, DIGITS);
        let extn_patterns_for_parsing = create_extn_pattern(true);
        let valid_phone_number = format!(
                // moved 2-digits pattern to an end for match full number first
                "[{}]*(?:[{}{}]*{}){{3,}}[{}{}{}{}]*|{}{{{}}}",
                PLUS_CHARS,
                VALID_PUNCTUATION, STAR_SIGN, DIGITS,
                VALID_PUNCTUATION, STAR_SIGN, DIGITS, VALID_ALPHA,
                DIGITS, MIN_LENGTH_FOR_NSN,
            );

        let rfc3966_phone_digit = format!("(?:{}|{})", DIGITS, RFC3966_VISUAL_SEPARATOR);
        let rfc3966_domainlabel = format!("[{}]+(?:-*[{}])*", alphanum, alphanum);
        let rfc3966_toplabel = format!("[{}]+(?:-*[{}])*", VALID_ALPHA_INCL_UPPERCASE, alphanum);
        let punctuation_class = format!("[{}]", VALID_PUNCTUATION);

        let mut instance = Self {
            // it'll be initialized only once, so we can use slow format!
            regexp_cache: RegexCache::with_capacity(128),
            alpha_phone_mappings: Default::default(),
            valid_start_char_pattern: constant_regex(&format!("[{}{}]", PLUS_CHARS, DIGITS)),
            second_number_start_pattern: constant_regex(SECOND_NUMBER_START),
            unwanted_end_char_pattern: constant_regex("[^\\p{N}\\p{L}#]+$"),
            separator_pattern: constant_regex(&format!("{}+", punctuation_class)),
            non_digits_pattern: constant_regex("\\D+"),
            extn_pattern: constant_regex(&format!("(?i)(?:{})$", &extn_patterns_for_parsing)),
            valid_phone_number_pattern: constant_regex(&format!("(?i)^(?:{})(?:{})?$",
                &valid_phone_number,
                &extn_patterns_for_parsing
            )),
            // At least three letters anywhere in the number.
            valid_alpha_phone_pattern: constant_regex("^(?:.*?[A-Za-z]){3}"),
            first_group_capturing_pattern: constant_regex("(\\$\\d)"),
            plus_chars_pattern: constant_regex(&format!("^[{}]+", PLUS_CHARS)),
            capturing_digit_pattern: constant_regex(&format!("({})", DIGITS)),
            rfc3966_global_number_digits_pattern: constant_regex(
                &format!("^\\{}{}*{}{}*$", PLUS_SIGN, &rfc3966_phone_digit, DIGITS, rfc3966_phone_digit)
            ),
            rfc3966_domainname_pattern: constant_regex(
                &format!("^(?:{}\\.)*{}\\.?$", rfc3966_domainlabel, rfc3966_toplabel)
            ),
            is_format_eligible_as_you_type_formatting_regex: constant_regex(&format!(
                "^{p}*\\$1{p}*(?:\\$\\d{p}*)*$", p = punctuation_class
            )),
            formatting_rule_has_first_group_only_regex: constant_regex("^\\(?\\$1\\)?$"),
        };
        instance.initialize_regexp_mappings();
        instance
    }
}

#[cfg(test)]
mod tests {
    use super::PhoneNumberRegExpsAndMappings;

    #[test]
    fn check_regexps_are_compiling() {
        PhoneNumberRegExpsAndMappings::new();
    }

    #[test]
    fn valid_phone_number_pattern() {
        let reg_exps = PhoneNumberRegExpsAndMappings::new();
        let pattern = &reg_exps.valid_phone_number_pattern;
        assert!(pattern.is_match("+1 (650) 253-0000"));
        assert!(pattern.is_match("0800-FLOWERS"));
        assert!(pattern.is_match("15"));
        assert!(pattern.is_match("[650] 253 0000"));
        assert!(pattern.is_match("650 253 0000 ext. 1234"));
        assert!(!pattern.is_match("1"));
        assert!(!pattern.is_match("1-5"));
        assert!(!pattern.is_match("abc"));
    }

    #[test]
    fn format_eligibility_pattern() {
        let reg_exps = PhoneNumberRegExpsAndMappings::new();
        let pattern = &reg_exps.is_format_eligible_as_you_type_formatting_regex;
        assert!(pattern.is_match("$1 $2 $3"));
        assert!(pattern.is_match("($1) $2-$3"));
        assert!(pattern.is_match("$1/$2"));
        assert!(!pattern.is_match("*$1"));
        assert!(!pattern.is_match("$2 15 $3-$4"));
        assert!(!pattern.is_match("$2 $1"));
    }
}
