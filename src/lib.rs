mod interfaces;
/// This module is automatically generated from /resources/*.proto
mod proto_gen;
mod phonenumberutil;
mod asyoutypeformatter;
mod phonenumbermatcher;
mod regexp_cache;
mod regex_based_matcher;
pub mod i18n;
pub(crate) mod regex_util;

#[cfg(test)]
mod tests;

pub use asyoutypeformatter::AsYouTypeFormatter;
pub use interfaces::MatcherApi;
pub use phonenumbermatcher::{PhoneNumberMatch, PhoneNumberMatcher};
pub use phonenumberutil::{
    enums, errors,
    phonenumberutil::PhoneNumberUtil,
    Leniency, MatchType, NumberLengthType, PhoneNumberFormat, PhoneNumberType,
    StrippedNationalPrefix,
};
pub use proto_gen::{phonemetadata, phonenumber};
pub use regex_based_matcher::RegexBasedMatcher;
pub use regexp_cache::InvalidRegexError;
