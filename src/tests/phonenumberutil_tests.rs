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

use std::collections::HashSet;

use protobuf::Message;

use crate::{
    MatcherApi, MatchType, NumberLengthType, PhoneNumberFormat, PhoneNumberType, PhoneNumberUtil,
    errors::{ParseError, ValidationError},
    phonemetadata::PhoneNumberDesc,
    phonenumber::{PhoneNumber, phone_number::CountryCodeSource},
};

use super::{get_phone_util, region_code::RegionCode, test_metadata::build_test_metadata};

fn number(country_code: i32, national_number: u64) -> PhoneNumber {
    let mut phone_number = PhoneNumber::new();
    phone_number.set_country_code(country_code);
    phone_number.set_national_number(national_number);
    phone_number
}

#[test]
fn supported_regions_and_codes() {
    let phone_util = get_phone_util();
    let mut regions: Vec<&str> = phone_util.get_supported_regions().collect();
    regions.sort();
    assert_eq!(vec!["BY", "CN", "GB", "IL", "PL", "SG", "US"], regions);
    assert!(phone_util.get_supported_global_network_calling_codes().any(|code| code == 800));
    assert!(phone_util.get_supported_calling_codes().any(|code| code == 375));
    assert_eq!(RegionCode::un001(), phone_util.get_region_code_for_country_code(800));
    assert_eq!(RegionCode::zz(), phone_util.get_region_code_for_country_code(999));
    assert_eq!(44, phone_util.get_country_code_for_region(RegionCode::gb()));
    assert_eq!(0, phone_util.get_country_code_for_region(RegionCode::zz()));
}

#[test]
fn supported_types() {
    let phone_util = get_phone_util();
    assert_eq!(
        Some(HashSet::from([
            PhoneNumberType::FixedLine,
            PhoneNumberType::Mobile,
            PhoneNumberType::TollFree,
            PhoneNumberType::PremiumRate,
        ])),
        phone_util.get_supported_types_for_region(RegionCode::us())
    );
    assert_eq!(
        Some(HashSet::from([
            PhoneNumberType::FixedLine,
            PhoneNumberType::Mobile,
            PhoneNumberType::UAN,
        ])),
        phone_util.get_supported_types_for_region(RegionCode::il())
    );
    // FixedLineOrMobile and Unknown are never reported.
    assert!(phone_util
        .get_supported_types_for_region(RegionCode::gb())
        .is_some_and(|types| !types.contains(&PhoneNumberType::FixedLineOrMobile)
            && !types.contains(&PhoneNumberType::Unknown)));
    assert_eq!(None, phone_util.get_supported_types_for_region(RegionCode::zz()));
}

#[test]
fn supported_types_for_non_geo_entity() {
    let phone_util = get_phone_util();
    assert_eq!(
        Some(HashSet::from([PhoneNumberType::TollFree])),
        phone_util.get_supported_types_for_non_geo_entity(800)
    );
    // 44 belongs to a region.
    assert_eq!(None, phone_util.get_supported_types_for_non_geo_entity(44));
    assert_eq!(None, phone_util.get_supported_types_for_non_geo_entity(999));
}

#[test]
fn nanpa_countries() {
    let phone_util = get_phone_util();
    assert!(phone_util.is_nanpa_country(RegionCode::us()));
    assert!(!phone_util.is_nanpa_country(RegionCode::gb()));
    assert!(!phone_util.is_nanpa_country(RegionCode::zz()));
}

#[test]
fn convert_alpha_characters() {
    let phone_util = get_phone_util();
    assert_eq!("1-800-3569377", phone_util.convert_alpha_characters_in_number("1-800-FLOWERS"));
    assert_eq!("1-800-3569377", phone_util.convert_alpha_characters_in_number("1-800-flowers"));
    // Punctuation and digits are left as they are.
    assert_eq!("(650) 253-0000", phone_util.convert_alpha_characters_in_number("(650) 253-0000"));
}

#[test]
fn metadata_round_trips_through_bytes() {
    let bytes = build_test_metadata().write_to_bytes().unwrap();
    let phone_util = PhoneNumberUtil::from_metadata_bytes(&bytes).unwrap();
    assert!(phone_util.is_valid_region_code(RegionCode::us()));
    assert!(PhoneNumberUtil::from_metadata_bytes(&[0xFF, 0xFF]).is_err());
}

#[test]
fn ndd_prefix_for_region() {
    let phone_util = get_phone_util();
    assert_eq!(Some("1".to_owned()), phone_util.get_ndd_prefix_for_region(RegionCode::us(), true));
    assert_eq!(Some("8".to_owned()), phone_util.get_ndd_prefix_for_region(RegionCode::by(), false));
    // Poland has no national prefix.
    assert_eq!(None, phone_util.get_ndd_prefix_for_region(RegionCode::pl(), true));
    assert_eq!(None, phone_util.get_ndd_prefix_for_region(RegionCode::zz(), true));
}

#[test]
fn extract_country_code() {
    let phone_util = get_phone_util();
    assert_eq!(Some((44, "2070313000")), phone_util.extract_country_code("442070313000"));
    assert_eq!(Some((800, "1234")), phone_util.extract_country_code("8001234"));
    assert_eq!(None, phone_util.extract_country_code("0442070313000"));
    assert_eq!(None, phone_util.extract_country_code("999"));
    assert_eq!(None, phone_util.extract_country_code(""));
}

#[test]
fn strip_national_prefix() {
    let phone_util = get_phone_util();
    let metadata = phone_util.get_metadata_for_region(RegionCode::by()).unwrap();
    let stripped = phone_util
        .maybe_strip_national_prefix_and_carrier_code("80291234567", metadata)
        .unwrap()
        .unwrap();
    assert_eq!("291234567", stripped.national_number);
    assert_eq!("", stripped.carrier_code);
    assert!(phone_util
        .maybe_strip_national_prefix_and_carrier_code("291234567", metadata)
        .unwrap()
        .is_none());
}

#[test]
fn normalize_digits() {
    assert_eq!("6502530000", PhoneNumberUtil::normalize_digits_only("(650) 253-0000"));
    assert_eq!("650", PhoneNumberUtil::normalize_digits_only("\u{FF16}\u{FF15}\u{FF10}"));
    assert_eq!("650-253", PhoneNumberUtil::normalize_digits("\u{FF16}50-253", true));
}

#[test]
fn parse_national_numbers() {
    let phone_util = get_phone_util();
    assert_eq!(number(1, 6502530000), phone_util.parse("650 253 0000", RegionCode::us()).unwrap());
    assert_eq!(number(1, 6502530000), phone_util.parse("1 (650) 253-0000", RegionCode::us()).unwrap());
    assert_eq!(number(44, 2070313000), phone_util.parse("020 7031 3000", RegionCode::gb()).unwrap());
    assert_eq!(number(375, 291234567), phone_util.parse("8 029 123-45-67", RegionCode::by()).unwrap());
}

#[test]
fn parse_international_numbers() {
    let phone_util = get_phone_util();
    let expected = number(44, 2070313000);
    assert_eq!(expected, phone_util.parse("+44 20 7031 3000", RegionCode::us()).unwrap());
    assert_eq!(expected, phone_util.parse("011 44 20 7031 3000", RegionCode::us()).unwrap());
    assert_eq!(expected, phone_util.parse("+44 20 7031 3000", RegionCode::zz()).unwrap());
    assert_eq!(number(800, 12345678), phone_util.parse("+800 1234 5678", RegionCode::zz()).unwrap());
}

#[test]
fn parse_extension() {
    let phone_util = get_phone_util();
    let mut expected = number(1, 6502530000);
    expected.set_extension("1234".to_owned());
    assert_eq!(expected, phone_util.parse("650 253 0000 ext. 1234", RegionCode::us()).unwrap());
    assert_eq!(expected, phone_util.parse("650 253 0000 x1234", RegionCode::us()).unwrap());
}

#[test]
fn parse_and_keep_raw_input() {
    let phone_util = get_phone_util();
    let parsed = phone_util
        .parse_and_keep_raw_input("+44 20 7031 3000", RegionCode::us())
        .unwrap();
    assert_eq!("+44 20 7031 3000", parsed.raw_input());
    assert_eq!(CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN, parsed.country_code_source());

    let parsed = phone_util
        .parse_and_keep_raw_input("650 253 0000", RegionCode::us())
        .unwrap();
    assert_eq!(CountryCodeSource::FROM_DEFAULT_COUNTRY, parsed.country_code_source());
}

#[test]
fn parse_failures() {
    let phone_util = get_phone_util();
    assert!(matches!(
        phone_util.parse("This is not a number", RegionCode::us()),
        Err(ParseError::NotANumber(_))
    ));
    assert_eq!(
        Err(ParseError::InvalidCountryCode),
        phone_util.parse("2070313000", RegionCode::zz())
    );
    assert_eq!(
        Err(ParseError::InvalidCountryCode),
        phone_util.parse("+999 1234 5678", RegionCode::us())
    );
    assert_eq!(Err(ParseError::TooShortAfterIdd), phone_util.parse("011 12", RegionCode::us()));
}

#[test]
fn format_numbers() {
    let phone_util = get_phone_util();
    let us_number = number(1, 6502530000);
    assert_eq!("650 253 0000", phone_util.format(&us_number, PhoneNumberFormat::National).unwrap());
    assert_eq!("+1 650 253 0000", phone_util.format(&us_number, PhoneNumberFormat::International).unwrap());
    assert_eq!("+16502530000", phone_util.format(&us_number, PhoneNumberFormat::E164).unwrap());
    assert_eq!("tel:+1-650-253-0000", phone_util.format(&us_number, PhoneNumberFormat::RFC3966).unwrap());

    let gb_number = number(44, 2070313000);
    assert_eq!("020 7031 3000", phone_util.format(&gb_number, PhoneNumberFormat::National).unwrap());
    assert_eq!("+44 20 7031 3000", phone_util.format(&gb_number, PhoneNumberFormat::International).unwrap());

    let by_number = number(375, 291234567);
    assert_eq!("8 029 123-45-67", phone_util.format(&by_number, PhoneNumberFormat::National).unwrap());
    assert_eq!("+375 29 123-45-67", phone_util.format(&by_number, PhoneNumberFormat::International).unwrap());

    let toll_free = number(800, 12345678);
    assert_eq!("+800 1234 5678", phone_util.format(&toll_free, PhoneNumberFormat::International).unwrap());
}

#[test]
fn format_with_extension() {
    let phone_util = get_phone_util();
    let mut us_number = number(1, 6502530000);
    us_number.set_extension("1234".to_owned());
    assert_eq!(
        "650 253 0000 extn. 1234",
        phone_util.format(&us_number, PhoneNumberFormat::National).unwrap()
    );
    assert_eq!(
        "tel:+1-650-253-0000;ext=1234",
        phone_util.format(&us_number, PhoneNumberFormat::RFC3966).unwrap()
    );
}

#[test]
fn choose_formatting_pattern() {
    let phone_util = get_phone_util();
    let metadata = phone_util.get_metadata_for_region(RegionCode::gb()).unwrap();
    let chosen = phone_util
        .choose_formatting_pattern_for_number(&metadata.number_format, "7912345678")
        .unwrap()
        .unwrap();
    assert_eq!(r"(\d{4})(\d{3})(\d{3})", chosen.pattern());
    assert!(phone_util
        .choose_formatting_pattern_for_number(&metadata.number_format, "12345")
        .unwrap()
        .is_none());
    assert_eq!(
        "07912 345 678",
        phone_util.format_nsn_using_pattern("7912345678", chosen, PhoneNumberFormat::National).unwrap()
    );
}

#[test]
fn number_types() {
    let phone_util = get_phone_util();
    assert_eq!(PhoneNumberType::FixedLineOrMobile, phone_util.get_number_type(&number(1, 6502530000)));
    assert_eq!(PhoneNumberType::TollFree, phone_util.get_number_type(&number(1, 8005551234)));
    assert_eq!(PhoneNumberType::PremiumRate, phone_util.get_number_type(&number(1, 9005551234)));
    assert_eq!(PhoneNumberType::FixedLine, phone_util.get_number_type(&number(44, 2070313000)));
    assert_eq!(PhoneNumberType::Mobile, phone_util.get_number_type(&number(44, 7912345678)));
    assert_eq!(PhoneNumberType::UAN, phone_util.get_number_type(&number(972, 2665)));
    assert_eq!(PhoneNumberType::TollFree, phone_util.get_number_type(&number(800, 12345678)));
    assert_eq!(PhoneNumberType::Unknown, phone_util.get_number_type(&number(44, 123)));
}

#[test]
fn validity() {
    let phone_util = get_phone_util();
    assert!(phone_util.is_valid_number(&number(1, 6502530000)));
    assert!(phone_util.is_valid_number(&number(800, 12345678)));
    assert!(!phone_util.is_valid_number(&number(1, 2530000)));
    assert!(!phone_util.is_valid_number(&number(999, 2530000)));
    assert!(phone_util.is_valid_number_for_region(&number(44, 2070313000), RegionCode::gb()));
    assert!(!phone_util.is_valid_number_for_region(&number(44, 2070313000), RegionCode::us()));
    assert_eq!(RegionCode::gb(), phone_util.get_region_code_for_number(&number(44, 2070313000)));
}

#[test]
fn possible_lengths() {
    let phone_util = get_phone_util();
    assert_eq!(
        Ok(NumberLengthType::IsPossible),
        phone_util.is_possible_number_with_reason(&number(1, 6502530000))
    );
    assert_eq!(
        Ok(NumberLengthType::IsPossibleLocalOnly),
        phone_util.is_possible_number_with_reason(&number(1, 2530000))
    );
    assert_eq!(
        Err(ValidationError::TooShort),
        phone_util.is_possible_number_with_reason(&number(1, 12345))
    );
    assert_eq!(
        Err(ValidationError::TooLong),
        phone_util.is_possible_number_with_reason(&number(44, 207031300012))
    );
    assert_eq!(
        Err(ValidationError::InvalidLength),
        phone_util.is_possible_number_with_reason(&number(972, 123456))
    );
    assert_eq!(
        Err(ValidationError::InvalidCountryCode),
        phone_util.is_possible_number_with_reason(&number(999, 12345678))
    );
}

#[test]
fn number_match() {
    let phone_util = get_phone_util();
    let us_number = number(1, 6502530000);
    assert_eq!(MatchType::ExactMatch, phone_util.is_number_match(&us_number, &number(1, 6502530000)));
    assert_eq!(MatchType::NoMatch, phone_util.is_number_match(&us_number, &number(44, 6502530000)));
    assert_eq!(MatchType::ShortNsnMatch, phone_util.is_number_match(&us_number, &number(1, 2530000)));

    let mut with_extension = number(1, 6502530000);
    with_extension.set_extension("12".to_owned());
    let mut other_extension = number(1, 6502530000);
    other_extension.set_extension("34".to_owned());
    assert_eq!(MatchType::NoMatch, phone_util.is_number_match(&with_extension, &other_extension));
    assert_eq!(MatchType::ShortNsnMatch, phone_util.is_number_match(&with_extension, &us_number));
}

#[test]
fn number_match_with_one_string() {
    let phone_util = get_phone_util();
    let us_number = number(1, 6502530000);
    assert_eq!(Ok(MatchType::ExactMatch), phone_util.is_number_match_with_one_string(&us_number, "+1 650 253 0000"));
    assert_eq!(Ok(MatchType::NsnMatch), phone_util.is_number_match_with_one_string(&us_number, "650 253 0000"));
    assert_eq!(Ok(MatchType::NoMatch), phone_util.is_number_match_with_one_string(&us_number, "+44 20 7031 3000"));
    assert!(phone_util.is_number_match_with_one_string(&us_number, "not a number").is_err());
}

#[test]
fn format_eligibility_for_as_you_type() {
    let phone_util = get_phone_util();
    assert!(phone_util.is_format_eligible_for_as_you_type_formatter("$1 $2 $3"));
    assert!(phone_util.is_format_eligible_for_as_you_type_formatter("$1-$2"));
    assert!(!phone_util.is_format_eligible_for_as_you_type_formatter("$2 $1"));
    assert!(!phone_util.is_format_eligible_for_as_you_type_formatter("*$1"));
    assert!(phone_util.formatting_rule_has_first_group_only("($1)"));
    assert!(phone_util.formatting_rule_has_first_group_only(""));
    assert!(!phone_util.formatting_rule_has_first_group_only("0$1"));
}

/// A backend that never matches, to check the util goes through the
/// installed one.
struct RejectingMatcher;

impl MatcherApi for RejectingMatcher {
    fn match_national_number(&self, _: &str, _: &PhoneNumberDesc, _: bool) -> bool {
        false
    }

    fn match_possible_number(&self, _: &str, _: &PhoneNumberDesc) -> bool {
        false
    }
}

#[test]
fn custom_matcher_api() {
    let phone_util = get_phone_util().with_matcher_api(Box::new(RejectingMatcher));
    assert!(!phone_util.is_valid_number(&number(1, 6502530000)));
    // Length checks don't consult the matcher.
    assert!(phone_util.is_possible_number(&number(1, 6502530000)));
}
