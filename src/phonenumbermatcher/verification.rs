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

use log::error;

use crate::{
    phonenumberutil::{
        Leniency, MatchType, PhoneNumberFormat, phonenumberutil::PhoneNumberUtil,
    },
    proto_gen::{
        phonemetadata::NumberFormat,
        phonenumber::{PhoneNumber, phone_number::CountryCodeSource},
    },
    regex_util::RegexConsume,
    regexp_cache::InvalidRegexError,
};

/// Checks whether the groups of digits found in the candidate match the
/// groups the number would be formatted with.
type CheckGroups = fn(&PhoneNumberUtil, &PhoneNumber, &str, &[&str]) -> bool;

/// Returns true if `number`, parsed from `candidate`, is acceptable at the
/// given leniency.
pub(super) fn verify(
    leniency: Leniency,
    number: &PhoneNumber,
    candidate: &str,
    util: &PhoneNumberUtil,
) -> bool {
    match leniency {
        Leniency::Possible => util.is_possible_number(number),
        Leniency::Valid => {
            util.is_valid_number(number)
                && contains_only_valid_x_chars(number, candidate, util)
                && is_national_prefix_present_if_required(number, util)
        }
        Leniency::StrictGrouping => {
            is_valid_with_formatting(number, candidate, util)
                && check_number_grouping_is_valid(
                    number,
                    candidate,
                    util,
                    all_number_groups_remain_grouped,
                )
        }
        Leniency::ExactGrouping => {
            is_valid_with_formatting(number, candidate, util)
                && check_number_grouping_is_valid(
                    number,
                    candidate,
                    util,
                    all_number_groups_are_exactly_present,
                )
        }
    }
}

fn is_valid_with_formatting(number: &PhoneNumber, candidate: &str, util: &PhoneNumberUtil) -> bool {
    util.is_valid_number(number)
        && contains_only_valid_x_chars(number, candidate, util)
        && !contains_more_than_one_slash_in_national_number(number, candidate)
        && is_national_prefix_present_if_required(number, util)
}

/// Splits `text` on runs of non digits. Trailing empty groups are dropped, a
/// leading one is kept.
fn split_on_non_digits<'b>(util: &PhoneNumberUtil, text: &'b str) -> Vec<&'b str> {
    let mut groups: Vec<&str> = util.reg_exps.non_digits_pattern.split(text).collect();
    while groups.last().is_some_and(|group| group.is_empty()) {
        groups.pop();
    }
    groups
}

fn all_number_groups_remain_grouped(
    util: &PhoneNumberUtil,
    number: &PhoneNumber,
    normalized_candidate: &str,
    formatted_number_groups: &[&str],
) -> bool {
    let mut from_index = 0;
    if number.country_code_source() != CountryCodeSource::FROM_DEFAULT_COUNTRY {
        // First skip the country code if the normalized candidate contained it.
        let mut buf = itoa::Buffer::new();
        let country_code = buf.format(number.country_code());
        from_index = normalized_candidate
            .find(country_code)
            .map_or(0, |index| index + country_code.len());
    }
    // Check each group of consecutive digits are not broken into separate
    // groupings in the normalized candidate.
    for (i, group) in formatted_number_groups.iter().enumerate() {
        let Some(found) = normalized_candidate
            .get(from_index..)
            .and_then(|rest| rest.find(group))
        else {
            return false;
        };
        from_index += found + group.len();
        if i == 0 && from_index < normalized_candidate.len() {
            // We are at the position right after the NDC. The region is taken
            // from the country code, different countries with the same code
            // don't need to be distinguished here.
            let region = util.get_region_code_for_country_code(number.country_code());
            let next_is_digit = normalized_candidate[from_index..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit());
            if util.get_ndd_prefix_for_region(region, true).is_some() && next_is_digit {
                // There is no formatting symbol after the NDC. In this case,
                // the number is only accepted if there is no formatting
                // symbol at all in the number, except for extensions. This is
                // only important for countries with national prefixes.
                let national_significant_number = PhoneNumberUtil::get_national_significant_number(number);
                return normalized_candidate[from_index - group.len()..]
                    .starts_with(&national_significant_number);
            }
        }
    }
    // The extension must not have been used to match the last group of the
    // subscriber number. The extension cannot have formatting in-between
    // digits.
    normalized_candidate[from_index..].contains(number.extension())
}

fn all_number_groups_are_exactly_present(
    util: &PhoneNumberUtil,
    number: &PhoneNumber,
    normalized_candidate: &str,
    formatted_number_groups: &[&str],
) -> bool {
    let candidate_groups = split_on_non_digits(util, normalized_candidate);
    // Set this to the last group, skipping it if the number has an extension.
    let mut candidate_number_group_index =
        candidate_groups.len() as isize - if number.has_extension() { 2 } else { 1 };
    // First check if the national significant number is formatted as a
    // block. The national significant number may be present with a prefix
    // such as a national number prefix, or the country code itself.
    if candidate_groups.len() == 1
        || group_at(&candidate_groups, candidate_number_group_index)
            .is_some_and(|group| group.contains(&PhoneNumberUtil::get_national_significant_number(number)))
    {
        return true;
    }
    // Starting from the end, go through in reverse, excluding the first
    // group, and check the candidate and number groups are the same.
    let mut formatted_number_group_index = formatted_number_groups.len() as isize - 1;
    while formatted_number_group_index > 0 && candidate_number_group_index >= 0 {
        if group_at(&candidate_groups, candidate_number_group_index)
            != group_at(formatted_number_groups, formatted_number_group_index)
        {
            return false;
        }
        formatted_number_group_index -= 1;
        candidate_number_group_index -= 1;
    }
    // Now check the first group. There may be a national prefix at the
    // start, so only check that the candidate group ends with the formatted
    // number group.
    match (
        group_at(&candidate_groups, candidate_number_group_index),
        formatted_number_groups.first(),
    ) {
        (Some(candidate_group), Some(first_group)) => candidate_group.ends_with(first_group),
        _ => false,
    }
}

fn group_at<'b>(groups: &[&'b str], index: isize) -> Option<&'b str> {
    usize::try_from(index).ok().and_then(|index| groups.get(index).copied())
}

/// Returns the national-number part of a number, formatted without any
/// national prefix, as the blocks of digits that are written together.
fn get_national_number_groups(
    util: &PhoneNumberUtil,
    number: &PhoneNumber,
) -> Result<Vec<String>, InvalidRegexError> {
    // This will be in the format +CC-DG;ext=EXT where DG represents groups of
    // digits.
    let rfc3966_format = util.format(number, PhoneNumberFormat::RFC3966)?;
    // The extension part is removed before splitting into groups.
    let end_index = rfc3966_format.find(';').unwrap_or(rfc3966_format.len());
    // The country code has a '-' following it.
    let start_index = rfc3966_format.find('-').map_or(0, |index| index + 1);
    Ok(rfc3966_format
        .get(start_index..end_index)
        .unwrap_or_default()
        .split('-')
        .map(str::to_owned)
        .collect())
}

fn get_national_number_groups_for_pattern(
    util: &PhoneNumberUtil,
    number: &PhoneNumber,
    formatting_pattern: &NumberFormat,
) -> Result<Vec<String>, InvalidRegexError> {
    // The NSN is formatted alone and split according to the separator.
    let national_significant_number = PhoneNumberUtil::get_national_significant_number(number);
    let formatted = util.format_nsn_using_pattern(
        &national_significant_number,
        formatting_pattern,
        PhoneNumberFormat::RFC3966,
    )?;
    Ok(formatted.split('-').map(str::to_owned).collect())
}

fn check_groups(
    checker: CheckGroups,
    util: &PhoneNumberUtil,
    number: &PhoneNumber,
    normalized_candidate: &str,
    groups: &[String],
) -> bool {
    let groups: Vec<&str> = groups.iter().map(String::as_str).collect();
    checker(util, number, normalized_candidate, &groups)
}

fn check_number_grouping_is_valid(
    number: &PhoneNumber,
    candidate: &str,
    util: &PhoneNumberUtil,
    checker: CheckGroups,
) -> bool {
    let normalized_candidate = PhoneNumberUtil::normalize_digits(candidate, true);
    match get_national_number_groups(util, number) {
        Ok(groups) => {
            if check_groups(checker, util, number, &normalized_candidate, &groups) {
                return true;
            }
        }
        Err(err) => error!("Failed to format a found number: {}", err),
    }
    // If this didn't pass, see if there are any alternate formats that match,
    // and try them instead.
    let Some(alternate_formats) = util.get_alternate_formats_for_country(number.country_code()) else {
        return false;
    };
    let national_significant_number = PhoneNumberUtil::get_national_significant_number(number);
    for alternate_format in &alternate_formats.number_format {
        if let Some(leading_digits) = alternate_format.leading_digits_pattern.first() {
            // There is only one leading digits pattern for alternate formats.
            let matches_leading_digits = util
                .regexp_cache()
                .get_regex(leading_digits)
                .map(|pattern| pattern.matches_start(&national_significant_number))
                .unwrap_or_else(|err| {
                    error!("Invalid leading digits in alternate formats: {}", err);
                    false
                });
            if !matches_leading_digits {
                continue;
            }
        }
        match get_national_number_groups_for_pattern(util, number, alternate_format) {
            Ok(groups) => {
                if check_groups(checker, util, number, &normalized_candidate, &groups) {
                    return true;
                }
            }
            Err(err) => error!("Failed to format with an alternate format: {}", err),
        }
    }
    false
}

fn contains_more_than_one_slash_in_national_number(number: &PhoneNumber, candidate: &str) -> bool {
    let Some(first_slash_in_body_index) = candidate.find('/') else {
        // No slashes, this is okay.
        return false;
    };
    let Some(second_slash_in_body_index) = candidate[first_slash_in_body_index + 1..]
        .find('/')
        .map(|index| index + first_slash_in_body_index + 1)
    else {
        // Only one slash, this is okay.
        return false;
    };
    // If the first slash is after the country calling code, this is
    // permitted.
    let candidate_has_country_code = matches!(
        number.country_code_source(),
        CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN | CountryCodeSource::FROM_NUMBER_WITHOUT_PLUS_SIGN
    );
    let mut buf = itoa::Buffer::new();
    if candidate_has_country_code
        && PhoneNumberUtil::normalize_digits_only(&candidate[..first_slash_in_body_index])
            == buf.format(number.country_code())
    {
        // Any more slashes and this is illegal.
        return candidate[second_slash_in_body_index + 1..].contains('/');
    }
    true
}

/// The characters 'x' and 'X' can be (1) a carrier code, in which case they
/// always precede the national significant number or (2) an extension sign,
/// in which case they always precede the extension number. A carrier code is
/// assumed to be more than 1 digit, so the first case has to have more than
/// one consecutive 'x' or 'X', whereas the second case can only have exactly
/// one. The character is ignored if it is the last one of the string.
fn contains_only_valid_x_chars(number: &PhoneNumber, candidate: &str, util: &PhoneNumberUtil) -> bool {
    let chars: Vec<(usize, char)> = candidate.char_indices().collect();
    let mut index = 0;
    while index + 1 < chars.len() {
        let (_, char_at_index) = chars[index];
        if char_at_index == 'x' || char_at_index == 'X' {
            let (next_offset, char_at_next_index) = chars[index + 1];
            if char_at_next_index == 'x' || char_at_next_index == 'X' {
                // This is the carrier code case, in which the 'X's always
                // precede the national significant number.
                index += 1;
                let match_type = util.is_number_match_with_one_string(number, &candidate[next_offset..]);
                if match_type != Ok(MatchType::NsnMatch) {
                    return false;
                }
            } else {
                // This is the extension sign case, in which the 'x' or 'X'
                // should always precede the extension number.
                let (offset, _) = chars[index];
                if PhoneNumberUtil::normalize_digits_only(&candidate[offset..]) != number.extension() {
                    return false;
                }
            }
        }
        index += 1;
    }
    true
}

fn is_national_prefix_present_if_required(number: &PhoneNumber, util: &PhoneNumberUtil) -> bool {
    // If the number was written in international format, the national
    // prefix is not required.
    if number.country_code_source() != CountryCodeSource::FROM_DEFAULT_COUNTRY {
        return true;
    }
    let phone_number_region = util.get_region_code_for_country_code(number.country_code());
    let Some(metadata) = util.get_metadata_for_region(phone_number_region) else {
        return true;
    };
    // Check if a national prefix should be present when formatting this
    // number.
    let national_number = PhoneNumberUtil::get_national_significant_number(number);
    let format_rule = match util.choose_formatting_pattern_for_number(&metadata.number_format, &national_number) {
        Ok(format_rule) => format_rule,
        Err(err) => {
            error!("Invalid format pattern in metadata: {}", err);
            return false;
        }
    };
    // A national prefix formatting rule has to be present, and it must not be
    // just the first-group symbol ($1) with punctuation.
    let Some(format_rule) = format_rule.filter(|rule| !rule.national_prefix_formatting_rule().is_empty()) else {
        return true;
    };
    if format_rule.national_prefix_optional_when_formatting() {
        // The national prefix is optional in these cases, so there is no
        // need to check if it was present.
        return true;
    }
    if util.formatting_rule_has_first_group_only(format_rule.national_prefix_formatting_rule()) {
        // National prefix not needed for this number.
        return true;
    }
    // Check if a national prefix and/or carrier code is at the start of the
    // raw input.
    let raw_input = PhoneNumberUtil::normalize_digits_only(number.raw_input());
    match util.maybe_strip_national_prefix_and_carrier_code(&raw_input, metadata) {
        Ok(stripped) => stripped.is_some(),
        Err(err) => {
            error!("Invalid national prefix pattern in metadata: {}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{contains_more_than_one_slash_in_national_number, group_at};
    use crate::proto_gen::phonenumber::{PhoneNumber, phone_number::CountryCodeSource};

    #[test]
    fn slashes_in_national_number() {
        let mut number = PhoneNumber::new();
        number.set_country_code(49);
        number.set_national_number(30123456);
        number.set_country_code_source(CountryCodeSource::FROM_DEFAULT_COUNTRY);
        assert!(!contains_more_than_one_slash_in_national_number(&number, "030/123456"));
        assert!(contains_more_than_one_slash_in_national_number(&number, "030/12/3456"));

        number.set_country_code_source(CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN);
        assert!(!contains_more_than_one_slash_in_national_number(&number, "+49/30/123456"));
        assert!(contains_more_than_one_slash_in_national_number(&number, "+49/30/12/3456"));
    }

    #[test]
    fn group_lookup_with_negative_index() {
        let groups = ["650", "253", "0000"];
        assert_eq!(Some("0000"), group_at(&groups, 2));
        assert_eq!(None, group_at(&groups, -1));
        assert_eq!(None, group_at(&groups, 3));
    }
}
