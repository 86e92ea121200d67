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

use std::collections::{HashMap, HashSet};

use dec_from_char::DecimalExtended;
use protobuf::Message;
use strum::IntoEnumIterator;

use crate::{
    interfaces::MatcherApi,
    proto_gen::{
        phonemetadata::{PhoneMetadata, PhoneNumberDesc},
        phonenumber::PhoneNumber,
    },
};

use super::{
    NumberLengthType, PhoneNumberFormat, PhoneNumberType,
    errors::ValidationError,
    helper_constants::{
        DIGITS, OPTIONAL_EXT_SUFFIX, PLUS_SIGN, POSSIBLE_CHARS_AFTER_EXT_LABEL,
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL, RFC3966_EXTN_PREFIX, RFC3966_PREFIX,
    },
};

/// The desc of `metadata` describing `phone_number_type`. Fixed-line data
/// stands for FixedLineOrMobile, the general desc for Unknown.
pub(super) fn get_number_desc_by_type(
    metadata: &PhoneMetadata,
    phone_number_type: PhoneNumberType,
) -> &PhoneNumberDesc {
    match phone_number_type {
        PhoneNumberType::PremiumRate => &*metadata.premium_rate,
        PhoneNumberType::TollFree => &*metadata.toll_free,
        PhoneNumberType::Mobile => &*metadata.mobile,
        PhoneNumberType::FixedLine | PhoneNumberType::FixedLineOrMobile => &*metadata.fixed_line,
        PhoneNumberType::SharedCost => &*metadata.shared_cost,
        PhoneNumberType::VoIP => &*metadata.voip,
        PhoneNumberType::PersonalNumber => &*metadata.personal_number,
        PhoneNumberType::Pager => &*metadata.pager,
        PhoneNumberType::UAN => &*metadata.uan,
        PhoneNumberType::VoiceMail => &*metadata.voicemail,
        PhoneNumberType::Unknown => &*metadata.general_desc,
    }
}

/// Puts the country calling code in front of `formatted_number` the way
/// `number_format` writes it. National numbers are left alone.
pub(super) fn prefix_number_with_country_calling_code(
    country_calling_code: i32,
    number_format: PhoneNumberFormat,
    formatted_number: &mut String,
) {
    let mut buf = itoa::Buffer::new();
    let code = buf.format(country_calling_code);
    *formatted_number = match number_format {
        PhoneNumberFormat::National => return,
        PhoneNumberFormat::E164 => fast_cat::concat_str!(PLUS_SIGN, code, formatted_number),
        PhoneNumberFormat::International => {
            fast_cat::concat_str!(PLUS_SIGN, code, " ", formatted_number)
        }
        PhoneNumberFormat::RFC3966 => {
            fast_cat::concat_str!(RFC3966_PREFIX, PLUS_SIGN, code, "-", formatted_number)
        }
    };
}

/// True when the national numbers are equal or one ends with the other.
pub(super) fn is_national_number_suffix_of_the_other(
    first_number: &PhoneNumber,
    second_number: &PhoneNumber,
) -> bool {
    let mut first_buf = itoa::Buffer::new();
    let first = first_buf.format(first_number.national_number());
    let mut second_buf = itoa::Buffer::new();
    let second = second_buf.format(second_number.national_number());
    first.ends_with(second) || second.ends_with(first)
}

/// A capturing group of one to `max_length` digits.
pub(super) fn extn_digits(max_length: u32) -> String {
    let mut buf = itoa::Buffer::new();
    fast_cat::concat_str!("([", DIGITS, "]{1,", buf.format(max_length), "})")
}

/// Builds the pattern matching an extension at the end of a number. Only the
/// extension digits are captured, one group per alternative.
///
/// The parsing flavour also accepts auto dialling separators (",," and ";")
/// and bare commas, which are too ambiguous when scanning free text.
pub(crate) fn create_extn_pattern(for_parsing: bool) -> String {
    // The fewer clues there are that digits form an extension, the fewer of
    // them are accepted.
    let ext_limit_after_explicit_label = 20;
    let ext_limit_after_likely_label = 15;
    let ext_limit_after_ambiguous_char = 9;
    let ext_limit_when_not_sure = 6;

    // Accented letters are accepted both composed and decomposed.
    let explicit_ext_labels = "(?:e?xt(?:ensi(?:o\u{0301}?|\u{00F3}))?n?|(?:\u{FF45})?\u{FF58}\u{FF54}(?:\u{FF4E})?|\u{0434}\u{043E}\u{0431}|anexo)";
    // One-character symbols that can be used to indicate an extension, and less
    // commonly used or more ambiguous extension labels.
    let ambiguous_ext_labels = "(?:[x\u{FF58}#\u{FF03}~\u{FF5E}]|int|\u{FF49}\u{FF4E}\u{FF54})";
    // When extension is not separated clearly.
    let ambiguous_separator = "[- ]+";

    let rfc_extn = fast_cat::concat_str!(
        RFC3966_EXTN_PREFIX,
        &extn_digits(ext_limit_after_explicit_label)
    );
    let explicit_extn = fast_cat::concat_str!(
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL,
        explicit_ext_labels,
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        &extn_digits(ext_limit_after_explicit_label),
        OPTIONAL_EXT_SUFFIX
    );
    let ambiguous_extn = fast_cat::concat_str!(
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL,
        ambiguous_ext_labels,
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        &extn_digits(ext_limit_after_ambiguous_char),
        OPTIONAL_EXT_SUFFIX
    );

    let american_style_extn_with_suffix = fast_cat::concat_str!(
        ambiguous_separator,
        &extn_digits(ext_limit_when_not_sure),
        "#"
    );

    // In order: RFC3966 ";ext=", explicit labels, single character or rare
    // labels, and the American "- 503#" style.
    let extension_pattern = fast_cat::concat_str!(
        &rfc_extn,
        "|",
        &explicit_extn,
        "|",
        &ambiguous_extn,
        "|",
        &american_style_extn_with_suffix
    );
    if for_parsing {
        let auto_dialling_and_ext_labels_found = "(?:,{2}|;)";
        // Commas may be the label itself here.
        let possible_separators_number_ext_label_no_comma = "[ \u{00A0}\t]*";

        let auto_dialling_extn = fast_cat::concat_str!(
            possible_separators_number_ext_label_no_comma,
            auto_dialling_and_ext_labels_found,
            POSSIBLE_CHARS_AFTER_EXT_LABEL,
            &extn_digits(ext_limit_after_likely_label),
            OPTIONAL_EXT_SUFFIX
        );
        let only_commas_extn = fast_cat::concat_str!(
            possible_separators_number_ext_label_no_comma,
            "(?:,)+",
            POSSIBLE_CHARS_AFTER_EXT_LABEL,
            &extn_digits(ext_limit_after_ambiguous_char),
            OPTIONAL_EXT_SUFFIX
        );
        return fast_cat::concat_str!(
            &extension_pattern,
            "|",
            &auto_dialling_extn,
            "|",
            &only_commas_extn
        );
    }
    extension_pattern
}

/// Replaces every character of `phone_number` found in
/// `normalization_replacements` (looked up in upper case). Other characters
/// are dropped when `remove_non_matches` is set and kept otherwise.
pub(super) fn normalize_helper(
    normalization_replacements: &HashMap<char, char>,
    remove_non_matches: bool,
    phone_number: &mut String,
) {
    *phone_number = phone_number
        .chars()
        .filter_map(|c| match normalization_replacements.get(&c.to_ascii_uppercase()) {
            Some(replacement) => Some(*replacement),
            None if remove_non_matches => None,
            None => Some(c),
        })
        .collect();
}

/// Converts a decimal digit of any script to its ASCII form. Returns `None`
/// for everything that is not a decimal digit.
pub(super) fn to_ascii_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }
    if !c.is_decimal_utf8() {
        return None;
    }
    let mut buf = [0u8; 4];
    dec_from_char::normalize_decimals(c.encode_utf8(&mut buf))
        .chars()
        .next()
        .filter(|d| d.is_ascii_digit())
}

/// False only for a desc marked as having no numbers (a single -1 length).
/// An empty length list means the lengths of the general desc apply.
pub(super) fn desc_has_possible_number_data(desc: &PhoneNumberDesc) -> bool {
    desc.possible_length != [-1]
}

/// Whether `desc` describes any numbers. A desc left unset in the metadata
/// describes none.
pub(super) fn desc_has_data(desc: &PhoneNumberDesc) -> bool {
    if desc == PhoneNumberDesc::default_instance() {
        return false;
    }
    desc.has_example_number()
        || desc_has_possible_number_data(desc)
        || desc.has_national_number_pattern()
}

/// Returns the number types `metadata` describes.
pub(super) fn get_supported_types_for_metadata(metadata: &PhoneMetadata) -> HashSet<PhoneNumberType> {
    PhoneNumberType::iter()
        // FixedLineOrMobile only stands for an undecided type and Unknown is
        // the absence of one.
        .filter(|number_type| {
            !matches!(
                number_type,
                PhoneNumberType::FixedLineOrMobile | PhoneNumberType::Unknown
            )
        })
        .filter(|number_type| desc_has_data(get_number_desc_by_type(metadata, *number_type)))
        .collect()
}

/// Checks the length of `phone_number` against the possible lengths of
/// `phone_number_type` in the metadata.
pub(super) fn test_number_length(
    phone_number: &str,
    phone_metadata: &PhoneMetadata,
    phone_number_type: PhoneNumberType,
) -> Result<NumberLengthType, ValidationError> {
    // A desc without lengths of its own shares those of the general desc.
    let lengths_of = |desc: &PhoneNumberDesc| -> Vec<i32> {
        if desc.possible_length.is_empty() {
            phone_metadata.general_desc.possible_length.clone()
        } else {
            desc.possible_length.clone()
        }
    };
    let desc_for_type = get_number_desc_by_type(phone_metadata, phone_number_type);
    let mut possible_lengths = lengths_of(desc_for_type);
    let mut local_lengths = desc_for_type.possible_length_local_only.clone();

    if phone_number_type == PhoneNumberType::FixedLineOrMobile {
        if !desc_has_possible_number_data(desc_for_type) {
            // Some non-geographical entities have no fixed-line data at all.
            return test_number_length(phone_number, phone_metadata, PhoneNumberType::Mobile);
        }
        let mobile_desc = get_number_desc_by_type(phone_metadata, PhoneNumberType::Mobile);
        if desc_has_possible_number_data(mobile_desc) {
            possible_lengths.extend(lengths_of(mobile_desc));
            possible_lengths.sort_unstable();
            local_lengths.extend_from_slice(&mobile_desc.possible_length_local_only);
            local_lengths.sort_unstable();
        }
    }

    // A single -1 marks a type without any numbers.
    let (Some(&minimum_length), Some(&maximum_length)) = (possible_lengths.first(), possible_lengths.last())
    else {
        return Err(ValidationError::InvalidLength);
    };
    if minimum_length == -1 {
        return Err(ValidationError::InvalidLength);
    }

    let actual_length = phone_number.len() as i32;
    // Local-only lengths never overlap with the possible ones.
    if local_lengths.contains(&actual_length) {
        Ok(NumberLengthType::IsPossibleLocalOnly)
    } else if actual_length < minimum_length {
        Err(ValidationError::TooShort)
    } else if actual_length > maximum_length {
        Err(ValidationError::TooLong)
    } else if possible_lengths.contains(&actual_length) {
        Ok(NumberLengthType::IsPossible)
    } else {
        Err(ValidationError::InvalidLength)
    }
}

/// Checks the length of `phone_number` against any type of the region.
pub(super) fn test_number_length_with_unknown_type(
    phone_number: &str,
    phone_metadata: &PhoneMetadata,
) -> Result<NumberLengthType, ValidationError> {
    test_number_length(phone_number, phone_metadata, PhoneNumberType::Unknown)
}

/// Copies the fields that identify a number, leaving out those describing how
/// it was entered (the ones only `parse_and_keep_raw_input` sets).
pub(crate) fn copy_core_fields_only(from_number: &PhoneNumber, to_number: &mut PhoneNumber) {
    to_number.set_country_code(from_number.country_code());
    to_number.set_national_number(from_number.national_number());
    if let Some(extension) = &from_number.extension {
        to_number.set_extension(extension.clone());
    }
    if from_number.italian_leading_zero() {
        to_number.set_italian_leading_zero(true);
        // This field is only relevant if there are leading zeros at all.
        to_number.set_number_of_leading_zeros(from_number.number_of_leading_zeros());
    }
}

/// Matches `number` against the national number pattern of `number_desc`.
/// Possible lengths are not checked.
pub(super) fn is_match(
    matcher_api: &dyn MatcherApi,
    number: &str,
    number_desc: &PhoneNumberDesc,
) -> bool {
    matcher_api.match_national_number(number, number_desc, false)
}
