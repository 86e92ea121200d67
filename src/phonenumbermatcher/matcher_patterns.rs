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

use regex::{Regex, RegexBuilder};

use crate::phonenumberutil::{
    helper_constants::{MAX_LENGTH_COUNTRY_CODE, MAX_LENGTH_FOR_NSN, PLUS_CHARS, VALID_PUNCTUATION},
    helper_functions::create_extn_pattern,
};

const OPENING_PARENS: &str = "(\\[\u{FF08}\u{FF3B}";
const CLOSING_PARENS: &str = ")\\]\u{FF09}\u{FF3D}";

/// The candidate pattern expands every bounded repetition, which is far
/// beyond the default compiled size limit.
const CANDIDATE_PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Holds all patterns used while scanning text for phone numbers. Built once
/// and shared by every matcher.
pub(super) struct MatcherPatterns {
    /// The phone number pattern used to find candidates, similar to the
    /// valid phone number pattern used for parsing, but with the following
    /// differences:
    /// - All captures are limited in order to place an upper bound to the
    ///   text matched by the pattern: leading punctuation and plus signs,
    ///   consecutive punctuation and the number of digits are limited.
    /// - No whitespace is allowed at the start or end.
    /// - No alpha digits (vanity numbers such as 1-800-SIX-FLAGS) are
    ///   supported.
    pub candidate: Regex,

    /// Matches strings that look like publication pages. Example:
    /// "Chen Li. VLDB J. 12(3): 211-227 (2003)." The string "211-227 (2003)"
    /// is not a telephone number.
    pub pub_pages: Regex,

    /// Matches strings that look like dates using "/" as a separator.
    /// Examples: 3/10/2011, 31/10/96 or 08/31/95.
    pub slash_separated_dates: Regex,

    /// Matches timestamps such as "2012-01-02 08:00". The trailing ":\d\d"
    /// is covered by `time_stamps_suffix`.
    pub time_stamps: Regex,
    pub time_stamps_suffix: Regex,

    /// Checks that brackets match. Opening brackets should be closed within
    /// a phone number, and there should be something inside them. Having no
    /// brackets at all is also fine. Anchored on both ends.
    pub matching_brackets: Regex,

    /// Patterns used to extract phone numbers from a larger
    /// phone-number-like pattern, ordered according to specificity.
    /// White-space is last since that is frequently used in numbers, not
    /// just to separate two numbers. Text found up to the first match is
    /// always checked as well.
    pub inner_matches: Vec<Regex>,

    /// Punctuation that may be at the start of a phone number: brackets and
    /// plus signs.
    pub lead_class: Regex,

    /// A percent sign or any currency symbol.
    pub invalid_punctuation_symbol: Regex,
}

pub(super) static MATCHER_PATTERNS: LazyLock<MatcherPatterns> = LazyLock::new(MatcherPatterns::new);

/// Returns a regular expression quantifier with an upper and lower limit.
fn limit(lower: usize, upper: usize) -> String {
    debug_assert!(lower <= upper && upper > 0);
    format!("{{{},{}}}", lower, upper)
}

fn constant_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid constant pattern!")
}

impl MatcherPatterns {
    fn new() -> Self {
        let non_parens = format!("[^{}{}]", OPENING_PARENS, CLOSING_PARENS);
        // Limit on the number of pairs of brackets in a phone number.
        let bracket_pair_limit = limit(0, 3);
        // An opening bracket at the beginning may not be closed, but
        // subsequent ones should be. It's also possible that the leading
        // bracket was dropped, so a closing bracket may come first.
        let matching_brackets = format!(
            "^(?:[{open}])?(?:{np}+[{close}])?{np}+(?:[{open}]{np}+[{close}]){limit}{np}*$",
            open = OPENING_PARENS,
            close = CLOSING_PARENS,
            np = non_parens,
            limit = bracket_pair_limit,
        );

        // Limit on the number of leading (plus) characters.
        let lead_limit = limit(0, 2);
        // Limit on the number of consecutive punctuation characters.
        let punctuation_limit = limit(0, 4);
        // All digits may come in a single block, so a block has to hold the
        // entire national number and the country code.
        let digit_block_limit = MAX_LENGTH_FOR_NSN + MAX_LENGTH_COUNTRY_CODE;
        // Some formats use spaces to separate each digit.
        let block_limit = limit(0, digit_block_limit);
        let punctuation = format!("[{}]{}", VALID_PUNCTUATION, punctuation_limit);
        let digit_sequence = format!("\\p{{Nd}}{}", limit(1, digit_block_limit));
        let lead_class = format!("[{}{}]", OPENING_PARENS, PLUS_CHARS);

        let candidate = format!(
            "(?:{lead}{punct}){lead_limit}{digits}(?:{punct}{digits}){block_limit}(?:{extn})?",
            lead = lead_class,
            punct = punctuation,
            lead_limit = lead_limit,
            digits = digit_sequence,
            block_limit = block_limit,
            extn = create_extn_pattern(false),
        );

        Self {
            candidate: RegexBuilder::new(&candidate)
                .case_insensitive(true)
                .size_limit(CANDIDATE_PATTERN_SIZE_LIMIT)
                .dfa_size_limit(CANDIDATE_PATTERN_SIZE_LIMIT)
                .build()
                .expect("Invalid constant pattern!"),
            pub_pages: constant_regex(r"\d{1,5}-+\d{1,5}\s{0,4}\(\d{1,4}"),
            slash_separated_dates: constant_regex(
                r"(?:(?:[0-3]?\d/[01]?\d)|(?:[01]?\d/[0-3]?\d))/(?:[12]\d)?\d{2}",
            ),
            time_stamps: constant_regex(r"[12]\d{3}[-/]?[01]\d[-/]?[0-3]\d +[0-2]\d$"),
            time_stamps_suffix: constant_regex(r"^:[0-5]\d"),
            matching_brackets: constant_regex(&matching_brackets),
            inner_matches: [
                // Breaks on the slash - e.g. "651-234-2345/332-445-1234"
                r"/+(.*)",
                // The bracket is inside the capturing group, since it is part
                // of the phone number. Matches "(650) 223 3345 (754) 223 3321".
                r"(\([^(]*)",
                // Breaks on a hyphen - e.g. "12345 - 332-445-1234 is my number."
                // A space is required on either side of the hyphen.
                r"(?:\p{Z}-|-\p{Z})\p{Z}*(.+)",
                // Various types of wide hyphens. No space is enforced here,
                // they are rarely used within a number.
                r"[\x{2012}-\x{2015}\x{FF0D}]\p{Z}*(.+)",
                // Breaks on a full stop - e.g. "12345. 332-445-1234 is my number."
                r"\.+\p{Z}*([^.]+)",
                // Breaks on space - e.g. "3324451234 8002341234"
                r"\p{Z}+(\P{Z}+)",
            ]
            .into_iter()
            .map(constant_regex)
            .collect(),
            lead_class: constant_regex(&format!("^{}", lead_class)),
            invalid_punctuation_symbol: constant_regex(r"^[%\p{Sc}]$"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MATCHER_PATTERNS;

    #[test]
    fn candidate_pattern_compiles_and_finds_numbers() {
        let candidate = &MATCHER_PATTERNS.candidate;
        let found = candidate.find("Call me at +1 650-253-0000 tomorrow").unwrap();
        assert_eq!("+1 650-253-0000", found.as_str());
        let found = candidate.find("(650) 253 0000 EXT. 1234.").unwrap();
        assert_eq!("(650) 253 0000 EXT. 1234", found.as_str());
        assert!(candidate.find("no digits here").is_none());
    }

    #[test]
    fn matching_brackets() {
        let brackets = &MATCHER_PATTERNS.matching_brackets;
        assert!(brackets.is_match("650 253 0000"));
        assert!(brackets.is_match("(650) 253 0000"));
        assert!(brackets.is_match("650) 253 0000"));
        assert!(!brackets.is_match("650 (253 0000"));
        assert!(!brackets.is_match("650 253 0000()"));
    }

    #[test]
    fn false_positive_shapes() {
        assert!(MATCHER_PATTERNS.pub_pages.is_match("211-227 (2003)"));
        assert!(MATCHER_PATTERNS.slash_separated_dates.is_match("08/31/95"));
        assert!(MATCHER_PATTERNS.time_stamps.is_match("2012-01-02 08"));
        assert!(MATCHER_PATTERNS.time_stamps_suffix.is_match(":00 meeting"));
        assert!(MATCHER_PATTERNS.invalid_punctuation_symbol.is_match("$"));
        assert!(MATCHER_PATTERNS.invalid_punctuation_symbol.is_match("%"));
        assert!(!MATCHER_PATTERNS.invalid_punctuation_symbol.is_match("-"));
    }
}
