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

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use crate::{
    proto_gen::phonemetadata::NumberFormat,
    regex_util::to_replacement_template,
    regexp_cache::{InvalidRegexError, RegexCache},
};

/// The digits that have not been entered yet are represented by the
/// punctuation space.
pub(super) const DIGIT_PLACEHOLDER: &str = "\u{2008}";

/// A run of nines at least as long as any national number plus country code,
/// used to find the longest string a format pattern can match.
const LONGEST_PHONE_NUMBER: &str = "999999999999999";

/// A pattern that is used to match character classes in regular expressions.
/// An example of a character class is [1-4].
static CHARACTER_CLASS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]])*\]").expect("Invalid constant pattern!"));

/// Replaces any digit of the pattern that actually denotes a digit with `\d`.
/// In `80[0-2]\d{6,10}` the first two digits (8 and 0) are standalone, the
/// ones inside the quantifier are not. A digit counts as standalone when the
/// next two characters are neither ',' nor '}', since the quantifier bound
/// may itself have two digits.
fn replace_standalone_digits(pattern: &str) -> Cow<'_, str> {
    if !pattern.bytes().any(|b| b.is_ascii_digit()) {
        return Cow::Borrowed(pattern);
    }
    let chars: Vec<char> = pattern.chars().collect();
    let mut result = String::with_capacity(pattern.len() + 8);
    for (i, c) in chars.iter().enumerate() {
        let is_standalone = c.is_ascii_digit()
            && chars
                .get(i + 1..i + 3)
                .is_some_and(|next| next.iter().all(|n| *n != ',' && *n != '}'));
        if is_standalone {
            result.push_str(r"\d");
        } else {
            result.push(*c);
        }
    }
    Cow::Owned(result)
}

/// Builds a template which can be used to efficiently format a partial
/// number where digits are added one by one. Every position a digit goes to
/// holds [`DIGIT_PLACEHOLDER`].
///
/// Returns `None` when the format can't be turned into a template: its
/// pattern has an alternation, or it can't hold `national_number_length`
/// digits.
pub(super) fn build_formatting_template(
    regexp_cache: &RegexCache,
    format: &NumberFormat,
    national_number_length: usize,
) -> Result<Option<String>, InvalidRegexError> {
    let number_pattern = format.pattern();
    // The formatter doesn't format numbers when number_pattern contains "|",
    // e.g. (20|3)\d{4}. In those cases we quickly return.
    if number_pattern.contains('|') {
        return Ok(None);
    }
    // Replace anything in the form of [..] with \d
    let number_pattern = CHARACTER_CLASS_PATTERN.replace_all(number_pattern, r"\d");
    // Replace any standalone digit (not the one in d{}) with \d
    let number_pattern = replace_standalone_digits(&number_pattern);

    let regex = regexp_cache.get_regex(&number_pattern)?;
    let Some(a_phone_number) = regex.find(LONGEST_PHONE_NUMBER).map(|m| m.as_str()) else {
        return Ok(None);
    };
    // No formatting template can be created if the number of digits entered so
    // far is longer than the maximum the current formatting rule can
    // accommodate.
    if a_phone_number.len() < national_number_length {
        return Ok(None);
    }
    let template = regex
        .replace_all(a_phone_number, to_replacement_template(format.format()).as_ref())
        .replace('9', DIGIT_PLACEHOLDER);
    if template.is_empty() {
        return Ok(None);
    }
    Ok(Some(template))
}

#[cfg(test)]
mod tests {
    use super::{build_formatting_template, replace_standalone_digits};
    use crate::{proto_gen::phonemetadata::NumberFormat, regexp_cache::RegexCache};

    fn number_format(pattern: &str, format: &str) -> NumberFormat {
        let mut number_format = NumberFormat::new();
        number_format.set_pattern(pattern.to_owned());
        number_format.set_format(format.to_owned());
        number_format
    }

    #[test]
    fn standalone_digits() {
        assert_eq!(r"\d\d\d{6,10}", replace_standalone_digits(r"80\d{6,10}"));
        assert_eq!(r"(\d{3})(\d{5,6})", replace_standalone_digits(r"(\d{3})(\d{5,6})"));
        assert_eq!(r"(\d)(\d{3})", replace_standalone_digits(r"(9)(\d{3})"));
    }

    #[test]
    fn builds_template_with_placeholders() {
        let cache = RegexCache::new();
        let template = build_formatting_template(
            &cache,
            &number_format(r"(\d{3})(\d{3})(\d{4})", "$1 $2 $3"),
            3,
        )
        .unwrap();
        assert_eq!(
            Some("\u{2008}\u{2008}\u{2008} \u{2008}\u{2008}\u{2008} \u{2008}\u{2008}\u{2008}\u{2008}"),
            template.as_deref()
        );

        let template = build_formatting_template(
            &cache,
            &number_format(r"([2-9]\d{2})(\d{4})", "$1-$2"),
            4,
        )
        .unwrap();
        assert_eq!(
            Some("\u{2008}\u{2008}\u{2008}-\u{2008}\u{2008}\u{2008}\u{2008}"),
            template.as_deref()
        );
    }

    #[test]
    fn rejects_unusable_formats() {
        let cache = RegexCache::new();
        let too_short = number_format(r"(\d{3})(\d{4})", "$1 $2");
        assert_eq!(Ok(None), build_formatting_template(&cache, &too_short, 8));
        let alternation = number_format(r"(20|3)\d{4}", "$1 $2");
        assert_eq!(Ok(None), build_formatting_template(&cache, &alternation, 3));
        let invalid = number_format(r"(\d{3}", "$1");
        assert!(build_formatting_template(&cache, &invalid, 3).is_err());
    }
}
