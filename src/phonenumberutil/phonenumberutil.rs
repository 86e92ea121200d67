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

use std::{
    borrow::Cow,
    collections::{HashMap, HashSet, VecDeque},
};

use log::{error, trace, warn};
use protobuf::Message;
use regex::Regex;

use super::{
    Leniency, MatchType, NumberLengthType, PhoneNumberFormat, PhoneNumberType,
    errors::{
        ExtractNumberError, InvalidNumberError, NotANumberError, ParseError, ParseErrorInternal,
        ValidationError,
    },
    helper_constants::{
        DEFAULT_EXTN_PREFIX, MAX_INPUT_STRING_LENGTH, MAX_LENGTH_COUNTRY_CODE, MAX_LENGTH_FOR_NSN,
        MIN_LENGTH_FOR_NSN, NANPA_COUNTRY_CODE, PLUS_SIGN, REGION_CODE_FOR_NON_GEO_ENTITY,
        RFC3966_EXTN_PREFIX, RFC3966_ISDN_SUBADDRESS, RFC3966_PHONE_CONTEXT, RFC3966_PREFIX,
    },
    helper_functions::{
        self, copy_core_fields_only, get_supported_types_for_metadata,
        is_national_number_suffix_of_the_other, normalize_helper,
        prefix_number_with_country_calling_code, test_number_length,
        test_number_length_with_unknown_type, to_ascii_digit,
    },
    helper_types::{PhoneNumberWithCountryCodeSource, StrippedNationalPrefix},
    phone_number_regexps_and_mappings::PhoneNumberRegExpsAndMappings,
};
use crate::{
    asyoutypeformatter::AsYouTypeFormatter,
    i18n,
    interfaces::MatcherApi,
    phonenumbermatcher::PhoneNumberMatcher,
    proto_gen::{
        phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection, PhoneNumberDesc},
        phonenumber::{PhoneNumber, phone_number::CountryCodeSource},
    },
    regex_based_matcher::RegexBasedMatcher,
    regex_util::{RegexConsume, to_replacement_template},
    regexp_cache::{InvalidRegexError, RegexCache},
};

// Helper type for Result
pub type Result<T> = std::result::Result<T, InvalidRegexError>;

/// Utility for international phone numbers. Holds the metadata of every
/// region it was built with and is safe to share between threads; the
/// as-you-type formatters and matchers it creates borrow it.
pub struct PhoneNumberUtil {
    /// An API for validation checking.
    matcher_api: Box<dyn MatcherApi>,

    /// Helper class holding useful regular expressions and character mappings.
    pub(crate) reg_exps: PhoneNumberRegExpsAndMappings,

    /// A mapping from a country calling code to the region codes which denote
    /// the regions represented by that country calling code. The main country
    /// for a code comes first. Note regions under NANPA share the country
    /// calling code 1. This is implemented as a sorted vector to achieve
    /// better performance.
    country_calling_code_to_region_code_map: Vec<(i32, Vec<String>)>,

    /// The set of regions that share country calling code 1.
    nanpa_regions: HashSet<String>,

    /// A mapping from a region code to a PhoneMetadata for that region.
    region_to_metadata_map: HashMap<String, PhoneMetadata>,

    /// A mapping from a country calling code for a non-geographical entity to the
    /// PhoneMetadata for that country calling code. Examples of the country
    /// calling codes include 800 (International Toll Free Service) and 808
    /// (International Shared Cost Service).
    country_code_to_non_geographical_metadata_map: HashMap<i32, PhoneMetadata>,

    /// Alternate formats keyed by country calling code. Only used when
    /// checking the grouping of numbers found in text.
    alternate_formats_map: HashMap<i32, PhoneMetadata>,
}

impl PhoneNumberUtil {
    /// Builds a util over the given metadata. Entries with the unknown region
    /// id are skipped, entries with the "001" id are non-geographical
    /// entities.
    pub fn new_for_metadata(metadata_collection: PhoneMetadataCollection) -> Self {
        let mut instance = Self {
            matcher_api: Box::new(RegexBasedMatcher::new()),
            reg_exps: PhoneNumberRegExpsAndMappings::new(),
            country_calling_code_to_region_code_map: Default::default(),
            nanpa_regions: Default::default(),
            region_to_metadata_map: Default::default(),
            country_code_to_non_geographical_metadata_map: Default::default(),
            alternate_formats_map: Default::default(),
        };
        // Storing data in a temporary map to make it easier to find other regions
        // that share a country calling code when inserting data.
        let mut country_calling_code_to_region_map = HashMap::<i32, VecDeque<String>>::new();
        for metadata in metadata_collection.metadata {
            let region_code = metadata.id().to_owned();
            let main_country_code = metadata.main_country_for_code();
            if i18n::RegionCode::get_unknown() == region_code {
                continue;
            }

            let country_calling_code = metadata.country_code();
            if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
                instance
                    .country_code_to_non_geographical_metadata_map
                    .insert(country_calling_code, metadata);
            } else {
                instance
                    .region_to_metadata_map
                    .insert(region_code.clone(), metadata);
            }

            if country_calling_code == NANPA_COUNTRY_CODE {
                instance.nanpa_regions.insert(region_code.clone());
            }
            match country_calling_code_to_region_map.get_mut(&country_calling_code) {
                Some(region_codes) if main_country_code => region_codes.push_front(region_code),
                Some(region_codes) => region_codes.push_back(region_code),
                None => {
                    // For most country calling codes, there will be only one region code.
                    country_calling_code_to_region_map
                        .insert(country_calling_code, VecDeque::from([region_code]));
                }
            }
        }

        instance.country_calling_code_to_region_code_map.extend(
            country_calling_code_to_region_map
                .into_iter()
                .map(|(k, v)| (k, Vec::from(v))),
        );
        // Sort all the pairs in ascending order according to country calling code.
        instance
            .country_calling_code_to_region_code_map
            .sort_by_key(|(a, _)| *a);
        instance
    }

    /// Decodes a serialized `PhoneMetadataCollection` and builds a util over it.
    pub fn from_metadata_bytes(bytes: &[u8]) -> std::result::Result<Self, protobuf::Error> {
        let metadata_collection = PhoneMetadataCollection::parse_from_bytes(bytes).map_err(|err| {
            error!("Could not parse metadata: {}", err);
            err
        })?;
        Ok(Self::new_for_metadata(metadata_collection))
    }

    /// Registers alternate formats, used when checking the grouping of numbers
    /// found in text. Entries are keyed by their country calling code.
    pub fn with_alternate_formats(mut self, alternate_formats: PhoneMetadataCollection) -> Self {
        for metadata in alternate_formats.metadata {
            self.alternate_formats_map
                .insert(metadata.country_code(), metadata);
        }
        self
    }

    /// Replaces the regex based validation backend.
    pub fn with_matcher_api(mut self, matcher_api: Box<dyn MatcherApi>) -> Self {
        self.matcher_api = matcher_api;
        self
    }

    pub(crate) fn regexp_cache(&self) -> &RegexCache {
        &self.reg_exps.regexp_cache
    }

    pub fn get_supported_regions(&self) -> impl Iterator<Item = &str> {
        self.region_to_metadata_map.keys().map(|k| k.as_str())
    }

    pub fn get_supported_global_network_calling_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.country_code_to_non_geographical_metadata_map
            .keys()
            .copied()
    }

    pub fn get_supported_calling_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.country_calling_code_to_region_code_map
            .iter()
            .map(|(code, _)| *code)
    }

    pub fn get_supported_types_for_region(
        &self,
        region_code: &str,
    ) -> Option<HashSet<PhoneNumberType>> {
        self.region_to_metadata_map
            .get(region_code)
            .map(get_supported_types_for_metadata)
            .or_else(|| {
                warn!("Invalid or unknown region code provided: {}", region_code);
                None
            })
    }

    pub fn get_supported_types_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Option<HashSet<PhoneNumberType>> {
        self.country_code_to_non_geographical_metadata_map
            .get(&country_calling_code)
            .map(get_supported_types_for_metadata)
            .or_else(|| {
                warn!(
                    "Unknown country calling code for a non-geographical entity provided: {}",
                    country_calling_code
                );
                None
            })
    }

    pub fn get_metadata_for_region(&self, region_code: &str) -> Option<&PhoneMetadata> {
        self.region_to_metadata_map.get(region_code)
    }

    pub fn get_metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Option<&PhoneMetadata> {
        self.country_code_to_non_geographical_metadata_map
            .get(&country_calling_code)
    }

    pub fn get_metadata_for_region_or_calling_code(
        &self,
        country_calling_code: i32,
        region_code: &str,
    ) -> Option<&PhoneMetadata> {
        if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
            self.get_metadata_for_non_geographical_region(country_calling_code)
        } else {
            self.get_metadata_for_region(region_code)
        }
    }

    /// Returns the alternate formats registered for the country calling code,
    /// if any.
    pub fn get_alternate_formats_for_country(
        &self,
        country_calling_code: i32,
    ) -> Option<&PhoneMetadata> {
        self.alternate_formats_map.get(&country_calling_code)
    }

    pub fn is_nanpa_country(&self, region_code: &str) -> bool {
        self.nanpa_regions.contains(region_code)
    }

    /// Returns the national dialling prefix for a specific region, with the
    /// '~' (wait for dialtone) marks removed if `strip_non_digits` is set.
    pub fn get_ndd_prefix_for_region(
        &self,
        region_code: &str,
        strip_non_digits: bool,
    ) -> Option<String> {
        let Some(metadata) = self.region_to_metadata_map.get(region_code) else {
            warn!("Invalid or unknown region code ({}) provided.", region_code);
            return None;
        };
        let national_prefix = metadata.national_prefix();
        // If no national prefix was found, we return None.
        if national_prefix.is_empty() {
            return None;
        }
        Some(if strip_non_digits {
            national_prefix.replace('~', "")
        } else {
            national_prefix.to_owned()
        })
    }

    pub fn is_valid_region_code(&self, region_code: &str) -> bool {
        self.region_to_metadata_map.contains_key(region_code)
    }

    pub fn has_valid_country_calling_code(&self, country_calling_code: i32) -> bool {
        self.country_calling_code_to_region_code_map
            .binary_search_by_key(&country_calling_code, |(k, _)| *k)
            .is_ok()
    }

    /// Returns the region code that matches the specific country calling code. In
    /// the case of no region code being found, the unknown region code will be
    /// returned.
    pub fn get_region_code_for_country_code(&self, country_calling_code: i32) -> &str {
        self.get_region_codes_for_country_calling_code(country_calling_code)
            .first()
            .copied()
            .unwrap_or(i18n::RegionCode::get_unknown())
    }

    /// Returns the region codes that match the specific country calling code,
    /// main country first. Empty when the code is unknown.
    pub fn get_region_codes_for_country_calling_code(
        &self,
        country_calling_code: i32,
    ) -> Vec<&str> {
        self.country_calling_code_to_region_code_map
            .binary_search_by_key(&country_calling_code, |(code, _)| *code)
            .map(|index| {
                self.country_calling_code_to_region_code_map[index]
                    .1
                    .iter()
                    .map(|v| v.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the country calling code for a specific region, or 0 when the
    /// region is unknown.
    pub fn get_country_code_for_region(&self, region_code: &str) -> i32 {
        match self.region_to_metadata_map.get(region_code) {
            Some(metadata) => metadata.country_code(),
            None => {
                warn!("Invalid or unknown region code ({}) provided.", region_code);
                0
            }
        }
    }

    /// Keeps only the decimal digits of the input, converted to ASCII.
    pub fn normalize_digits_only(number: &str) -> String {
        Self::normalize_digits(number, false)
    }

    /// Converts every decimal digit of the input to ASCII; other characters are
    /// kept or dropped depending on `keep_non_digits`.
    pub fn normalize_digits(number: &str, keep_non_digits: bool) -> String {
        let mut normalized = String::with_capacity(number.len());
        for c in number.chars() {
            match to_ascii_digit(c) {
                Some(digit) => normalized.push(digit),
                None if keep_non_digits => normalized.push(c),
                None => {}
            }
        }
        normalized
    }

    /// Converts all alpha characters in a number to their respective digits on
    /// a keypad, leaving the other characters untouched.
    pub fn convert_alpha_characters_in_number(&self, number: &str) -> String {
        let mut number = number.to_owned();
        normalize_helper(&self.reg_exps.alpha_phone_mappings, false, &mut number);
        number
    }

    /// Normalizes a string of characters representing a phone number. If the
    /// number contains at least three letters they are converted to digits
    /// (vanity numbers), and every other non digit is removed.
    pub(crate) fn normalize(&self, number: &str) -> String {
        if self.reg_exps.valid_alpha_phone_pattern.is_match(number) {
            let mut normalized = Self::normalize_digits(number, true);
            normalize_helper(&self.reg_exps.alpha_phone_mappings, true, &mut normalized);
            normalized
        } else {
            Self::normalize_digits_only(number)
        }
    }

    /// Checks to see if the string of characters could possibly be a phone
    /// number at all. At the moment, checks to see that the string begins with
    /// at least 2 digits, ignoring any punctuation commonly found in phone
    /// numbers.
    pub fn is_viable_phone_number(&self, number: &str) -> bool {
        if number.chars().count() < MIN_LENGTH_FOR_NSN {
            return false;
        }
        self.reg_exps.valid_phone_number_pattern.is_match(number)
    }

    /// Attempts to extract a possible number from the string passed in. This
    /// strips leading characters that could not be the start of a phone number,
    /// trailing punctuation and anything after a second number marker.
    pub fn extract_possible_number<'b>(
        &self,
        number: &'b str,
    ) -> std::result::Result<&'b str, ExtractNumberError> {
        let Some(start) = self.reg_exps.valid_start_char_pattern.find(number) else {
            return Err(ExtractNumberError::NoValidStartCharacter);
        };
        let mut number = &number[start.start()..];
        // Remove trailing non-alpha non-numerical characters.
        if let Some(trailing_chars) = self.reg_exps.unwanted_end_char_pattern.find(number) {
            number = &number[..trailing_chars.start()];
        }
        // Check for extra numbers at the end.
        if let Some(second_number) = self.reg_exps.second_number_start_pattern.find(number) {
            number = &number[..second_number.start()];
        }
        Ok(number)
    }

    pub fn formatting_rule_has_first_group_only(&self, national_prefix_formatting_rule: &str) -> bool {
        national_prefix_formatting_rule.is_empty()
            || self
                .reg_exps
                .formatting_rule_has_first_group_only_regex
                .is_match(national_prefix_formatting_rule)
    }

    /// We require that the first group is present in the output pattern to
    /// ensure no data is lost while formatting; when we format as you type,
    /// this should always be the case.
    pub fn is_format_eligible_for_as_you_type_formatter(&self, format: &str) -> bool {
        self.reg_exps
            .is_format_eligible_as_you_type_formatting_regex
            .is_match(format)
    }

    /// Extracts the country calling code from the beginning of `full_number`,
    /// a string of ASCII digits. Returns the code together with the remaining
    /// national number when a known code of up to three digits is found.
    pub fn extract_country_code<'b>(&self, full_number: &'b str) -> Option<(i32, &'b str)> {
        if full_number.is_empty() || full_number.starts_with('0') {
            // Country codes do not begin with a '0'.
            return None;
        }
        for i in 1..=MAX_LENGTH_COUNTRY_CODE.min(full_number.len()) {
            let Some(potential_country_code) = full_number
                .get(..i)
                .and_then(|prefix| prefix.parse::<i32>().ok())
            else {
                return None;
            };
            if self.has_valid_country_calling_code(potential_country_code) {
                return Some((potential_country_code, &full_number[i..]));
            }
        }
        None
    }

    /// Strips any national prefix (such as 0, 1) present in the number
    /// provided, and captures the carrier code when the region's prefix
    /// pattern has one. The number is left alone when stripping would turn a
    /// number matching the general pattern into one that does not.
    pub fn maybe_strip_national_prefix_and_carrier_code(
        &self,
        number: &str,
        metadata: &PhoneMetadata,
    ) -> Result<Option<StrippedNationalPrefix>> {
        let possible_national_prefix = metadata.national_prefix_for_parsing();
        if number.is_empty() || possible_national_prefix.is_empty() {
            return Ok(None);
        }
        // Attempt to parse the first digits as a national prefix.
        let prefix_pattern = self.reg_exps.regexp_cache.get_regex(possible_national_prefix)?;
        let Some(prefix_captures) = prefix_pattern.captures_start(number) else {
            return Ok(None);
        };
        let prefix_end = prefix_captures.get(0).map(|m| m.end()).unwrap_or(0);
        let general_desc = &metadata.general_desc;
        // Check if the original number is viable.
        let is_viable_original_number =
            self.matcher_api.match_national_number(number, general_desc, false);
        // If the last group captured nothing, no transformation is necessary,
        // and we just remove the national prefix.
        let num_of_groups = prefix_captures.len() - 1;
        let last_group_matched = prefix_captures.get(num_of_groups).is_some();
        let transform_rule = metadata.national_prefix_transform_rule();
        if transform_rule.is_empty() || !last_group_matched {
            let national_number = &number[prefix_end..];
            // If the original number was viable, and the resultant number is
            // not, we return.
            if is_viable_original_number
                && !self.matcher_api.match_national_number(national_number, general_desc, false)
            {
                return Ok(None);
            }
            let carrier_code = if num_of_groups > 0 && last_group_matched {
                prefix_captures.get(1).map(|m| m.as_str()).unwrap_or_default()
            } else {
                ""
            };
            return Ok(Some(StrippedNationalPrefix {
                national_number: national_number.to_owned(),
                carrier_code: carrier_code.to_owned(),
            }));
        }
        // Check that the resultant number is still viable. If not, return.
        // Check this by making the transformation on a copy first.
        let transformed_number = prefix_pattern
            .replacen(number, 1, to_replacement_template(transform_rule).as_ref())
            .into_owned();
        if is_viable_original_number
            && !self.matcher_api.match_national_number(&transformed_number, general_desc, false)
        {
            return Ok(None);
        }
        let carrier_code = if num_of_groups > 1 {
            prefix_captures.get(1).map(|m| m.as_str()).unwrap_or_default()
        } else {
            ""
        };
        Ok(Some(StrippedNationalPrefix {
            national_number: transformed_number,
            carrier_code: carrier_code.to_owned(),
        }))
    }

    /// Parses a string and returns it as a phone number. `default_region` is
    /// only used when the number is not written in international format.
    pub fn parse(
        &self,
        number_to_parse: &str,
        default_region: &str,
    ) -> std::result::Result<PhoneNumber, ParseError> {
        self.parse_helper(number_to_parse, default_region, false, true)
            .map_err(ParseErrorInternal::into_public)
    }

    /// Parses a string like [`Self::parse`], additionally recording the raw
    /// input, the country code source and the preferred carrier code.
    pub fn parse_and_keep_raw_input(
        &self,
        number_to_parse: &str,
        default_region: &str,
    ) -> std::result::Result<PhoneNumber, ParseError> {
        self.parse_helper(number_to_parse, default_region, true, true)
            .map_err(ParseErrorInternal::into_public)
    }

    fn parse_helper(
        &self,
        number_to_parse: &str,
        default_region: &str,
        keep_raw_input: bool,
        check_region: bool,
    ) -> std::result::Result<PhoneNumber, ParseErrorInternal> {
        if number_to_parse.chars().count() > MAX_INPUT_STRING_LENGTH {
            trace!("The string supplied was too long to parse.");
            return Err(ParseError::TooLongNsn.into());
        }
        let national_number = self.build_national_number_for_parsing(number_to_parse)?;
        if !self.is_viable_phone_number(&national_number) {
            trace!("The string supplied did not seem to be a phone number '{}'.", number_to_parse);
            return Err(NotANumberError::NotMatchedValidNumberPattern.into());
        }
        // Check the region supplied is valid, or that the extracted number starts
        // with some sort of + sign so the number's region can be determined.
        if check_region && !self.check_region_for_parsing(&national_number, default_region) {
            trace!("Missing or invalid default country '{}'.", default_region);
            return Err(ParseError::InvalidCountryCode.into());
        }
        let mut phone_number = PhoneNumber::new();
        if keep_raw_input {
            phone_number.set_raw_input(number_to_parse.to_owned());
        }
        // Attempt to parse extension first, since it doesn't require
        // region-specific data and we want to have the non-normalised number here.
        let (national_number, extension) = self.maybe_strip_extension(&national_number);
        if let Some(extension) = extension {
            phone_number.set_extension(extension.to_owned());
        }

        let mut region_metadata = self.region_to_metadata_map.get(default_region);
        // Check to see if the number is given in international format so we know
        // whether this number is from the default region or not.
        let (mut country_code, mut normalized_national_number) = match self
            .maybe_extract_country_code(national_number, region_metadata, keep_raw_input, &mut phone_number)
        {
            Ok(extracted) => extracted,
            Err(ParseErrorInternal::FailedToParse(ParseError::InvalidCountryCode)) => {
                let Some(plus_chars) = self.reg_exps.plus_chars_pattern.find(national_number) else {
                    return Err(ParseError::InvalidCountryCode.into());
                };
                // Strip the plus-char, and try again.
                let extracted = self.maybe_extract_country_code(
                    &national_number[plus_chars.end()..],
                    region_metadata,
                    keep_raw_input,
                    &mut phone_number,
                )?;
                if extracted.0 == 0 {
                    trace!("Could not interpret numbers after plus-sign.");
                    return Err(ParseError::InvalidCountryCode.into());
                }
                extracted
            }
            Err(err) => return Err(err),
        };

        if country_code != 0 {
            let phone_number_region = self.get_region_code_for_country_code(country_code);
            if phone_number_region != default_region {
                // Metadata cannot be None because the country calling code is valid.
                region_metadata =
                    self.get_metadata_for_region_or_calling_code(country_code, phone_number_region);
            }
        } else {
            // If no extracted country calling code, use the region supplied
            // instead. The national number is just the normalized version of the
            // number we were given to parse.
            normalized_national_number = self.normalize(national_number);
            match region_metadata {
                Some(metadata) => country_code = metadata.country_code(),
                None if keep_raw_input => phone_number.clear_country_code_source(),
                None => {}
            }
        }
        phone_number.set_country_code(country_code);

        if normalized_national_number.len() < MIN_LENGTH_FOR_NSN {
            return Err(ParseError::TooShortNsn.into());
        }
        if let Some(region_metadata) = region_metadata {
            if let Some(stripped) = self
                .maybe_strip_national_prefix_and_carrier_code(&normalized_national_number, region_metadata)?
            {
                // We require that the NSN remaining after stripping the national
                // prefix and carrier code be long enough to be a possible length
                // for the region. Otherwise, we don't do the stripping, since the
                // original number could be a valid short number.
                let validation_result =
                    test_number_length_with_unknown_type(&stripped.national_number, region_metadata);
                if matches!(
                    validation_result,
                    Ok(NumberLengthType::IsPossible) | Err(ValidationError::TooLong)
                ) {
                    normalized_national_number = stripped.national_number;
                    if keep_raw_input && !stripped.carrier_code.is_empty() {
                        phone_number.set_preferred_domestic_carrier_code(stripped.carrier_code);
                    }
                }
            }
        }
        let length_of_national_number = normalized_national_number.len();
        if length_of_national_number < MIN_LENGTH_FOR_NSN {
            return Err(ParseError::TooShortNsn.into());
        }
        if length_of_national_number > MAX_LENGTH_FOR_NSN {
            return Err(ParseError::TooLongNsn.into());
        }
        Self::set_italian_leading_zeros_for_phone_number(&normalized_national_number, &mut phone_number);
        let national_number = normalized_national_number
            .parse::<u64>()
            .map_err(NotANumberError::FailedToParseNumberAsInt)?;
        phone_number.set_national_number(national_number);
        Ok(phone_number)
    }

    /// Converts `number_to_parse` to a form that we can parse: handles the
    /// RFC3966 "phone-context" parameter and drops the isdn-subaddress.
    fn build_national_number_for_parsing(
        &self,
        number_to_parse: &str,
    ) -> std::result::Result<String, ParseErrorInternal> {
        let mut national_number = String::with_capacity(number_to_parse.len());
        if let Some(index_of_phone_context) = number_to_parse.find(RFC3966_PHONE_CONTEXT) {
            let phone_context = Self::extract_phone_context(number_to_parse, index_of_phone_context);
            if !self.is_phone_context_valid(phone_context) {
                trace!("The phone-context value '{}' is invalid.", phone_context);
                return Err(NotANumberError::InvalidPhoneContext.into());
            }
            // If the phone context contains a phone number prefix, we need to
            // capture it, whereas domains will be ignored.
            if phone_context.starts_with(PLUS_SIGN) {
                national_number.push_str(phone_context);
            }
            // Now append everything between the "tel:" prefix and the
            // phone-context. This should include the national number, an
            // optional extension or isdn-subaddress component. Note we also
            // handle the case when "tel:" is missing.
            let index_of_national_number = number_to_parse
                .find(RFC3966_PREFIX)
                .map(|index| index + RFC3966_PREFIX.len())
                .filter(|index| *index <= index_of_phone_context)
                .unwrap_or(0);
            national_number.push_str(&number_to_parse[index_of_national_number..index_of_phone_context]);
        } else {
            // Extract a possible number from the string passed in (this strips
            // leading characters that could not be the start of a phone number.)
            national_number.push_str(
                self.extract_possible_number(number_to_parse)
                    .map_err(ParseError::from)?,
            );
        }
        // Delete the isdn-subaddress and everything after it if it is present.
        // Note extension won't appear at the same time with isdn-subaddress
        // according to paragraph 5.3 of the RFC3966 spec.
        if let Some(index_of_isdn) = national_number.find(RFC3966_ISDN_SUBADDRESS) {
            if index_of_isdn > 0 {
                national_number.truncate(index_of_isdn);
            }
        }
        // If both phone context and isdn-subaddress are absent but other
        // parameters are present, the parameters are left in national_number.
        Ok(national_number)
    }

    fn extract_phone_context(number_to_extract_from: &str, index_of_phone_context: usize) -> &str {
        let phone_context_start = index_of_phone_context + RFC3966_PHONE_CONTEXT.len();
        // If phone-context parameter is empty
        if phone_context_start >= number_to_extract_from.len() {
            return "";
        }
        let phone_context = &number_to_extract_from[phone_context_start..];
        // If phone-context is not the last parameter
        match phone_context.find(';') {
            Some(phone_context_end) => &phone_context[..phone_context_end],
            None => phone_context,
        }
    }

    fn is_phone_context_valid(&self, phone_context: &str) -> bool {
        if phone_context.is_empty() {
            return false;
        }
        // Does phone-context value match pattern of global-number-digits or
        // domainname.
        self.reg_exps
            .rfc3966_global_number_digits_pattern
            .is_match(phone_context)
            || self.reg_exps.rfc3966_domainname_pattern.is_match(phone_context)
    }

    /// Checks the region supplied is valid, or that the number starts with
    /// some sort of + sign so its region can be determined.
    fn check_region_for_parsing(&self, number_to_parse: &str, default_region: &str) -> bool {
        self.is_valid_region_code(default_region)
            || self.reg_exps.plus_chars_pattern.is_match(number_to_parse)
    }

    /// Strips any extension (as in, the part of the number dialled after the
    /// call is connected, usually indicated with extn, ext, x or similar) from
    /// the end of the number. Returns the number without the extension and the
    /// extension digits.
    fn maybe_strip_extension<'b>(&self, number: &'b str) -> (&'b str, Option<&'b str>) {
        let Some(captures) = self.reg_exps.extn_pattern.captures(number) else {
            return (number, None);
        };
        let Some(full_match) = captures.get(0) else {
            return (number, None);
        };
        // If we find a potential extension, and the number preceding this is a
        // viable number, we assume it is an extension.
        if !self.is_viable_phone_number(&number[..full_match.start()]) {
            return (number, None);
        }
        // The numbers are captured into groups in the regular expression. We go
        // through them until we find one that captured some digits.
        match captures.iter().skip(1).flatten().next() {
            Some(extension) => (&number[..full_match.start()], Some(extension.as_str())),
            None => (number, None),
        }
    }

    /// Tries to extract a country calling code from a number. Returns the
    /// country calling code and the national number that follows it, or 0 and
    /// an empty string if the number has no recognisable calling code.
    fn maybe_extract_country_code(
        &self,
        number: &str,
        default_region_metadata: Option<&PhoneMetadata>,
        keep_raw_input: bool,
        phone_number: &mut PhoneNumber,
    ) -> std::result::Result<(i32, String), ParseErrorInternal> {
        if number.is_empty() {
            return Ok((0, String::new()));
        }
        // Set the default prefix to be something that will never match.
        let possible_country_idd_prefix = default_region_metadata
            .map(|metadata| metadata.international_prefix())
            .unwrap_or("NonMatch");
        let PhoneNumberWithCountryCodeSource {
            phone_number: full_number,
            country_code_source,
        } = self.maybe_strip_international_prefix_and_normalize(number, possible_country_idd_prefix)?;

        if keep_raw_input {
            phone_number.set_country_code_source(country_code_source);
        }
        if country_code_source != CountryCodeSource::FROM_DEFAULT_COUNTRY {
            if full_number.len() <= MIN_LENGTH_FOR_NSN {
                trace!("Phone number had an IDD, but after this was not long enough to be a viable phone number.");
                return Err(ParseError::TooShortAfterIdd.into());
            }
            if let Some((country_code, national_number)) = self.extract_country_code(&full_number) {
                return Ok((country_code, national_number.to_owned()));
            }
            // If this fails, they must be using a strange country calling code
            // that we don't recognize, or that doesn't exist.
            return Err(ParseError::InvalidCountryCode.into());
        }
        if let Some(default_region_metadata) = default_region_metadata {
            // Check to see if the number starts with the country calling code for
            // the default region. If so, we remove the country calling code, and
            // do some checks on the validity of the number before and after.
            let default_country_code = default_region_metadata.country_code();
            let mut buf = itoa::Buffer::new();
            if let Some(potential_national_number) =
                full_number.strip_prefix(buf.format(default_country_code))
            {
                let general_desc = &default_region_metadata.general_desc;
                let potential_national_number = match self
                    .maybe_strip_national_prefix_and_carrier_code(potential_national_number, default_region_metadata)?
                {
                    Some(stripped) => stripped.national_number,
                    None => potential_national_number.to_owned(),
                };
                // If the number was not valid before but is valid now, or if it
                // was too long before, we consider the number with the country
                // calling code stripped to be a better result and keep that
                // instead.
                if (!self.matcher_api.match_national_number(&full_number, general_desc, false)
                    && self
                        .matcher_api
                        .match_national_number(&potential_national_number, general_desc, false))
                    || test_number_length_with_unknown_type(&full_number, default_region_metadata)
                        == Err(ValidationError::TooLong)
                {
                    if keep_raw_input {
                        phone_number.set_country_code_source(CountryCodeSource::FROM_NUMBER_WITHOUT_PLUS_SIGN);
                    }
                    return Ok((default_country_code, potential_national_number));
                }
            }
        }
        // No country calling code present.
        Ok((0, String::new()))
    }

    /// Strips any international prefix (such as +, 00, 011) present in the
    /// number provided, normalizes the resulting number, and indicates if an
    /// international prefix was present.
    fn maybe_strip_international_prefix_and_normalize(
        &self,
        number: &str,
        possible_idd_prefix: &str,
    ) -> Result<PhoneNumberWithCountryCodeSource> {
        if number.is_empty() {
            return Ok(PhoneNumberWithCountryCodeSource::new(
                String::new(),
                CountryCodeSource::FROM_DEFAULT_COUNTRY,
            ));
        }
        // Check to see if the number begins with one or more plus signs.
        if let Some(plus_chars) = self.reg_exps.plus_chars_pattern.find(number) {
            // Can now normalize the rest of the number since we've consumed the
            // "+" sign at the start.
            return Ok(PhoneNumberWithCountryCodeSource::new(
                self.normalize(&number[plus_chars.end()..]),
                CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN,
            ));
        }
        // Attempt to parse the first digits as an international prefix.
        let idd_pattern = self.reg_exps.regexp_cache.get_regex(possible_idd_prefix)?;
        let normalized_number = self.normalize(number);
        Ok(match self.parse_prefix_as_idd(&idd_pattern, &normalized_number) {
            Some(idd_end) => PhoneNumberWithCountryCodeSource::new(
                normalized_number[idd_end..].to_owned(),
                CountryCodeSource::FROM_NUMBER_WITH_IDD,
            ),
            None => PhoneNumberWithCountryCodeSource::new(
                normalized_number,
                CountryCodeSource::FROM_DEFAULT_COUNTRY,
            ),
        })
    }

    /// Returns the end of the international prefix when `number` starts with
    /// one. The prefix is only stripped if the first digit after it is not a
    /// 0, since country calling codes cannot begin with 0.
    fn parse_prefix_as_idd(&self, idd_pattern: &Regex, number: &str) -> Option<usize> {
        let match_end = idd_pattern.find_start(number)?.end();
        // An empty match means the region has no usable prefix.
        if match_end == 0 {
            return None;
        }
        let next_digit = self
            .reg_exps
            .capturing_digit_pattern
            .captures(&number[match_end..])
            .and_then(|captures| captures.get(1));
        if let Some(next_digit) = next_digit {
            if Self::normalize_digits_only(next_digit.as_str()) == "0" {
                return None;
            }
        }
        Some(match_end)
    }

    /// A helper function to set the values related to leading zeros in a
    /// PhoneNumber.
    fn set_italian_leading_zeros_for_phone_number(national_number: &str, phone_number: &mut PhoneNumber) {
        if national_number.len() > 1 && national_number.starts_with('0') {
            phone_number.set_italian_leading_zero(true);
            // Note that if the national number is all "0"s, the last "0" is not
            // counted as a leading zero.
            let number_of_leading_zeros = national_number[..national_number.len() - 1]
                .bytes()
                .take_while(|b| *b == b'0')
                .count() as i32;
            if number_of_leading_zeros != 1 {
                phone_number.set_number_of_leading_zeros(number_of_leading_zeros);
            }
        }
    }

    pub fn get_national_significant_number(phone_number: &PhoneNumber) -> String {
        // If leading zero(s) have been set, we prefix this now. Note this is not a
        // national prefix. Ensure the number of leading zeros is at least 0 so we
        // don't crash in the case of malicious input.
        let zeros_start = if phone_number.italian_leading_zero() {
            "0".repeat(phone_number.number_of_leading_zeros().max(0) as usize)
        } else {
            String::new()
        };

        let mut buf = itoa::Buffer::new();
        let national_number = buf.format(phone_number.national_number());
        fast_cat::concat_str!(&zeros_start, national_number)
    }

    /// Gets the length checks of a number without consulting the number
    /// patterns.
    pub fn is_possible_number_with_reason(
        &self,
        phone_number: &PhoneNumber,
    ) -> std::result::Result<NumberLengthType, ValidationError> {
        self.is_possible_number_for_type_with_reason(phone_number, PhoneNumberType::Unknown)
    }

    pub fn is_possible_number_for_type_with_reason(
        &self,
        phone_number: &PhoneNumber,
        phone_number_type: PhoneNumberType,
    ) -> std::result::Result<NumberLengthType, ValidationError> {
        let national_number = Self::get_national_significant_number(phone_number);
        let country_code = phone_number.country_code();
        // Note: For regions that share a country calling code, like NANPA
        // numbers, we just use the rules from the default region (US in this
        // case) since the get_region_code_for_number will not work if the number
        // is possible but not valid. There is in fact one country calling code
        // (290) where the possible number pattern differs between various
        // regions (Saint Helena and Tristan da Cuñha), but this is handled by
        // putting all possible lengths for any country with this country calling
        // code in the metadata for the default region in this case.
        if !self.has_valid_country_calling_code(country_code) {
            return Err(ValidationError::InvalidCountryCode);
        }
        let region_code = self.get_region_code_for_country_code(country_code);
        let Some(metadata) = self.get_metadata_for_region_or_calling_code(country_code, region_code) else {
            return Err(ValidationError::InvalidCountryCode);
        };
        test_number_length(&national_number, metadata, phone_number_type)
    }

    /// Convenience wrapper around [`Self::is_possible_number_with_reason`].
    pub fn is_possible_number(&self, phone_number: &PhoneNumber) -> bool {
        self.is_possible_number_with_reason(phone_number).is_ok()
    }

    /// Tests whether a phone number matches a valid pattern. Note this doesn't
    /// verify the number is actually in use, which is impossible to tell by
    /// just looking at a number itself.
    pub fn is_valid_number(&self, phone_number: &PhoneNumber) -> bool {
        let region_code = self.get_region_code_for_number(phone_number);
        self.is_valid_number_for_region(phone_number, region_code)
    }

    pub fn is_valid_number_for_region(&self, phone_number: &PhoneNumber, region_code: &str) -> bool {
        let country_code = phone_number.country_code();
        let Some(metadata) = self.get_metadata_for_region_or_calling_code(country_code, region_code) else {
            return false;
        };
        if REGION_CODE_FOR_NON_GEO_ENTITY != region_code && country_code != metadata.country_code() {
            // Either the region code was invalid, or the country calling code
            // for this number does not match that of the region code.
            return false;
        }
        let national_significant_number = Self::get_national_significant_number(phone_number);
        self.get_number_type_helper(&national_significant_number, metadata) != PhoneNumberType::Unknown
    }

    pub fn get_number_type(&self, phone_number: &PhoneNumber) -> PhoneNumberType {
        let region_code = self.get_region_code_for_number(phone_number);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(phone_number.country_code(), region_code)
        else {
            return PhoneNumberType::Unknown;
        };
        let national_significant_number = Self::get_national_significant_number(phone_number);
        self.get_number_type_helper(&national_significant_number, metadata)
    }

    /// Returns the region where a phone number is from, or the unknown region
    /// when it cannot be determined.
    pub fn get_region_code_for_number(&self, phone_number: &PhoneNumber) -> &str {
        let country_calling_code = phone_number.country_code();
        let region_codes = self.get_region_codes_for_country_calling_code(country_calling_code);
        match region_codes.len() {
            0 => {
                trace!("Missing/invalid country calling code ({})", country_calling_code);
                i18n::RegionCode::get_unknown()
            }
            1 => region_codes[0],
            _ => self.get_region_code_for_number_from_region_list(phone_number, &region_codes),
        }
    }

    fn get_region_code_for_number_from_region_list<'b>(
        &self,
        phone_number: &PhoneNumber,
        region_codes: &[&'b str],
    ) -> &'b str {
        let national_number = Self::get_national_significant_number(phone_number);
        for code in region_codes {
            // Metadata cannot be None because the region codes come from the
            // country calling code map.
            let Some(metadata) = self.region_to_metadata_map.get(*code) else {
                continue;
            };
            if metadata.has_leading_digits() {
                if self.matches_leading_digits(metadata.leading_digits(), &national_number) {
                    return code;
                }
            } else if self.get_number_type_helper(&national_number, metadata) != PhoneNumberType::Unknown {
                return code;
            }
        }
        i18n::RegionCode::get_unknown()
    }

    fn matches_leading_digits(&self, pattern: &str, national_number: &str) -> bool {
        match self.reg_exps.regexp_cache.get_regex(pattern) {
            Ok(regex) => regex.matches_start(national_number),
            Err(err) => {
                error!("Invalid leading digits pattern '{}': {}", pattern, err);
                false
            }
        }
    }

    fn get_number_type_helper(&self, national_number: &str, metadata: &PhoneMetadata) -> PhoneNumberType {
        if !self.is_number_matching_desc(national_number, &metadata.general_desc) {
            trace!("Number '{national_number}' type unknown - doesn't match general national number pattern");
            return PhoneNumberType::Unknown;
        }
        if self.is_number_matching_desc(national_number, &metadata.premium_rate) {
            trace!("Number '{national_number}' is a premium number.");
            return PhoneNumberType::PremiumRate;
        }
        if self.is_number_matching_desc(national_number, &metadata.toll_free) {
            trace!("Number '{national_number}' is a toll-free number.");
            return PhoneNumberType::TollFree;
        }
        if self.is_number_matching_desc(national_number, &metadata.shared_cost) {
            trace!("Number '{national_number}' is a shared cost number.");
            return PhoneNumberType::SharedCost;
        }
        if self.is_number_matching_desc(national_number, &metadata.voip) {
            trace!("Number '{national_number}' is a VOIP (Voice over IP) number.");
            return PhoneNumberType::VoIP;
        }
        if self.is_number_matching_desc(national_number, &metadata.personal_number) {
            trace!("Number '{national_number}' is a personal number.");
            return PhoneNumberType::PersonalNumber;
        }
        if self.is_number_matching_desc(national_number, &metadata.pager) {
            trace!("Number '{national_number}' is a pager number.");
            return PhoneNumberType::Pager;
        }
        if self.is_number_matching_desc(national_number, &metadata.uan) {
            trace!("Number '{national_number}' is a UAN.");
            return PhoneNumberType::UAN;
        }
        if self.is_number_matching_desc(national_number, &metadata.voicemail) {
            trace!("Number '{national_number}' is a voicemail number.");
            return PhoneNumberType::VoiceMail;
        }

        if self.is_number_matching_desc(national_number, &metadata.fixed_line) {
            if metadata.same_mobile_and_fixed_line_pattern() {
                trace!("Number '{national_number}': fixed-line and mobile patterns equal, number is fixed-line or mobile");
                return PhoneNumberType::FixedLineOrMobile;
            } else if self.is_number_matching_desc(national_number, &metadata.mobile) {
                trace!("Number '{national_number}': Fixed-line and mobile patterns differ, but number is still fixed-line or mobile");
                return PhoneNumberType::FixedLineOrMobile;
            }
            trace!("Number '{national_number}' is a fixed line number.");
            return PhoneNumberType::FixedLine;
        }
        // Otherwise, test to see if the number is mobile. Only do this if certain
        // that the patterns for mobile and fixed line aren't the same.
        if !metadata.same_mobile_and_fixed_line_pattern()
            && self.is_number_matching_desc(national_number, &metadata.mobile)
        {
            trace!("Number '{national_number}' is a mobile number.");
            return PhoneNumberType::Mobile;
        }
        trace!("Number '{national_number}' type unknown - doesn't match any specific number type pattern.");
        PhoneNumberType::Unknown
    }

    fn is_number_matching_desc(&self, national_number: &str, number_desc: &PhoneNumberDesc) -> bool {
        // Check if any possible number lengths are present; if so, we use them to
        // avoid checking the validation pattern if they don't match. If they are
        // absent, this means they match the general description, which we have
        // already checked before checking a specific number type.
        let actual_length = national_number.len() as i32;
        if !number_desc.possible_length.is_empty() && !number_desc.possible_length.contains(&actual_length) {
            return false;
        }
        if number_desc.has_possible_number_pattern()
            && !self.matcher_api.match_possible_number(national_number, number_desc)
        {
            return false;
        }
        // very common name, so specify mod
        helper_functions::is_match(self.matcher_api.as_ref(), national_number, number_desc)
    }

    /// Formats a phone number in the specified format using default rules.
    pub fn format<'b>(
        &self,
        phone_number: &'b PhoneNumber,
        number_format: PhoneNumberFormat,
    ) -> Result<Cow<'b, str>> {
        if phone_number.national_number() == 0 {
            let raw_input = phone_number.raw_input();
            if !raw_input.is_empty() {
                // Unparseable numbers that kept their raw input just use that.
                // This is the only case where a number can be formatted as E164
                // without a leading '+' symbol (but the original number wasn't
                // parseable anyway).
                return Ok(Cow::Borrowed(raw_input));
            }
        }
        let country_calling_code = phone_number.country_code();
        let mut formatted_number = Self::get_national_significant_number(phone_number);

        if number_format == PhoneNumberFormat::E164 {
            // Early exit for E164 case (even if the country calling code is
            // invalid) since no formatting of the national number needs to be
            // applied. Extensions are not formatted.
            prefix_number_with_country_calling_code(
                country_calling_code,
                PhoneNumberFormat::E164,
                &mut formatted_number,
            );
            return Ok(Cow::Owned(formatted_number));
        }
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(Cow::Owned(formatted_number));
        }
        // Note here that all NANPA formatting rules are contained by US, so we
        // use that to format NANPA numbers.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return Ok(Cow::Owned(formatted_number));
        };

        formatted_number = self
            .format_nsn(&formatted_number, metadata, number_format)?
            .into_owned();
        if let Some(formatted_extension) =
            Self::get_formatted_extension(phone_number, metadata, number_format)
        {
            formatted_number.push_str(&formatted_extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            number_format,
            &mut formatted_number,
        );
        Ok(Cow::Owned(formatted_number))
    }

    fn format_nsn<'b>(
        &self,
        phone_number: &'b str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> Result<Cow<'b, str>> {
        // When the intl_number_formats exists, we use that to format national
        // number for the INTERNATIONAL format instead of using the
        // number_formats.
        let available_formats =
            if metadata.intl_number_format.is_empty() || number_format == PhoneNumberFormat::National {
                &metadata.number_format
            } else {
                &metadata.intl_number_format
            };
        match self.choose_formatting_pattern_for_number(available_formats, phone_number)? {
            Some(formatting_pattern) => {
                self.format_nsn_using_pattern(phone_number, formatting_pattern, number_format)
            }
            None => Ok(Cow::Borrowed(phone_number)),
        }
    }

    /// Returns the first format whose last leading digits pattern matches the
    /// start of the number and whose pattern matches the whole number.
    pub fn choose_formatting_pattern_for_number<'b>(
        &self,
        available_formats: &'b [NumberFormat],
        national_number: &str,
    ) -> Result<Option<&'b NumberFormat>> {
        for format in available_formats {
            // We always use the last leading_digits_pattern, as it is the most
            // detailed.
            if let Some(last) = format.leading_digits_pattern.last() {
                if !self
                    .reg_exps
                    .regexp_cache
                    .get_regex(last)?
                    .matches_start(national_number)
                {
                    continue;
                }
            }
            let pattern_to_match = self.reg_exps.regexp_cache.get_full_match_regex(format.pattern())?;
            if pattern_to_match.is_match(national_number) {
                return Ok(Some(format));
            }
        }
        Ok(None)
    }

    /// Formats a national number with the given pattern. The national prefix
    /// formatting rule of the pattern is applied for the national format, and
    /// separators are turned into dashes for RFC3966.
    pub fn format_nsn_using_pattern<'b>(
        &self,
        national_number: &'b str,
        formatting_pattern: &NumberFormat,
        number_format: PhoneNumberFormat,
    ) -> Result<Cow<'b, str>> {
        let mut number_format_rule = Cow::Borrowed(formatting_pattern.format());
        let national_prefix_formatting_rule = formatting_pattern.national_prefix_formatting_rule();
        if number_format == PhoneNumberFormat::National && !national_prefix_formatting_rule.is_empty() {
            // Apply the national_prefix_formatting_rule as the formatting_pattern
            // contains only information on how the national significant number
            // should be formatted at this point.
            if let Cow::Owned(s) = self.reg_exps.first_group_capturing_pattern.replace(
                &number_format_rule,
                to_replacement_template(national_prefix_formatting_rule).as_ref(),
            ) {
                number_format_rule = Cow::Owned(s);
            }
        }

        let pattern_to_match = self.reg_exps.regexp_cache.get_regex(formatting_pattern.pattern())?;
        let mut formatted_number = pattern_to_match.replace_all(
            national_number,
            to_replacement_template(&number_format_rule).as_ref(),
        );

        if number_format == PhoneNumberFormat::RFC3966 {
            // First consume any leading punctuation, if any was present.
            if let Some(leading) = self.reg_exps.separator_pattern.find_start(&formatted_number) {
                formatted_number = Cow::Owned(formatted_number[leading.end()..].to_owned());
            }
            // Then replace all separators with a "-".
            if let Cow::Owned(s) = self.reg_exps.separator_pattern.replace_all(&formatted_number, "-") {
                formatted_number = Cow::Owned(s)
            }
        }
        Ok(formatted_number)
    }

    // Returns the formatted extension of a phone number, if the phone number had
    // an extension specified else None.
    fn get_formatted_extension(
        phone_number: &PhoneNumber,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> Option<String> {
        if !phone_number.has_extension() || phone_number.extension().is_empty() {
            return None;
        }
        let prefix = if number_format == PhoneNumberFormat::RFC3966 {
            RFC3966_EXTN_PREFIX
        } else if metadata.has_preferred_extn_prefix() {
            metadata.preferred_extn_prefix()
        } else {
            DEFAULT_EXTN_PREFIX
        };
        Some(fast_cat::concat_str!(prefix, phone_number.extension()))
    }

    /// Compares two numbers and returns how well they match. Only the fields
    /// that uniquely define a number are taken into account.
    pub fn is_number_match(&self, first_number_in: &PhoneNumber, second_number_in: &PhoneNumber) -> MatchType {
        // We only care about the fields that uniquely define a number, so we
        // copy these across explicitly.
        let mut first_number = PhoneNumber::new();
        copy_core_fields_only(first_number_in, &mut first_number);
        let mut second_number = PhoneNumber::new();
        copy_core_fields_only(second_number_in, &mut second_number);

        // Early exit if both had extensions and these are different.
        if first_number.has_extension()
            && second_number.has_extension()
            && first_number.extension() != second_number.extension()
        {
            return MatchType::NoMatch;
        }
        let first_number_country_code = first_number.country_code();
        let second_number_country_code = second_number.country_code();
        // Both had country calling code specified.
        if first_number_country_code != 0 && second_number_country_code != 0 {
            if first_number == second_number {
                return MatchType::ExactMatch;
            } else if first_number_country_code == second_number_country_code
                && is_national_number_suffix_of_the_other(&first_number, &second_number)
            {
                // A SHORT_NSN_MATCH occurs if there is a difference because of the
                // presence or absence of an 'Italian leading zero', the presence
                // or absence of an extension, or one NSN being a shorter variant
                // of the other.
                return MatchType::ShortNsnMatch;
            }
            // This is not a match.
            return MatchType::NoMatch;
        }
        // Checks cases where one or both country calling codes were not
        // specified. To make equality checks easier, we first set the country
        // calling codes to be equal.
        first_number.set_country_code(second_number_country_code);
        // If all else was the same, then this is an NSN_MATCH.
        if first_number == second_number {
            return MatchType::NsnMatch;
        }
        if is_national_number_suffix_of_the_other(&first_number, &second_number) {
            return MatchType::ShortNsnMatch;
        }
        MatchType::NoMatch
    }

    /// Compares a number with a string. The string is parsed without a default
    /// region first; if it has no country calling code it is parsed with the
    /// region of the first number, and an exact match is downgraded to an
    /// NSN match.
    pub fn is_number_match_with_one_string(
        &self,
        first_number: &PhoneNumber,
        second_number: &str,
    ) -> std::result::Result<MatchType, InvalidNumberError> {
        match self.parse(second_number, i18n::RegionCode::get_unknown()) {
            Ok(second_number_as_proto) => {
                return Ok(self.is_number_match(first_number, &second_number_as_proto));
            }
            Err(ParseError::InvalidCountryCode) => {}
            Err(err) => return Err(InvalidNumberError(err)),
        }
        // The second number has no country calling code. EXACT_MATCH is no
        // longer possible. We parse it as if the region was the same as that
        // for the first number, and if EXACT_MATCH is returned, we replace this
        // with NSN_MATCH.
        let first_number_region = self.get_region_code_for_country_code(first_number.country_code());
        if first_number_region != i18n::RegionCode::get_unknown() {
            let second_number_with_first_number_region = self.parse(second_number, first_number_region)?;
            return Ok(
                match self.is_number_match(first_number, &second_number_with_first_number_region) {
                    MatchType::ExactMatch => MatchType::NsnMatch,
                    match_type => match_type,
                },
            );
        }
        // If the first number didn't have a valid country calling code, then we
        // parse the second number without one as well.
        let second_number_proto = self
            .parse_helper(second_number, i18n::RegionCode::get_unknown(), false, false)
            .map_err(ParseErrorInternal::into_public)?;
        Ok(self.is_number_match(first_number, &second_number_proto))
    }

    /// Creates an as-you-type formatter for the given region.
    pub fn get_as_you_type_formatter(&self, region_code: &str) -> AsYouTypeFormatter<'_> {
        AsYouTypeFormatter::new(self, region_code)
    }

    /// Returns an iterator over the phone numbers found in `text`.
    pub fn find_numbers<'a>(
        &'a self,
        text: &'a str,
        default_region: &'a str,
        leniency: Leniency,
        max_tries: u64,
    ) -> PhoneNumberMatcher<'a> {
        PhoneNumberMatcher::new(self, text, default_region, leniency, max_tries)
    }
}
