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

use crate::AsYouTypeFormatter;

use super::{get_phone_util, region_code::RegionCode};

/// Feeds `input` one character at a time, checking the output after each.
fn assert_outputs(formatter: &mut AsYouTypeFormatter, input: &str, expected: &[&str]) {
    assert_eq!(input.chars().count(), expected.len(), "one expected output per input character");
    for (c, expected_output) in input.chars().zip(expected) {
        assert_eq!(*expected_output, formatter.input_digit(c), "after entering {:?}", c);
    }
}

#[test]
fn formats_us_national_number() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(
        &mut formatter,
        "6502532222",
        &[
            "6",
            "65",
            "650",
            "650 2",
            "650 25",
            "650 253",
            // Local number without area code.
            "650 2532",
            "650 253 22",
            "650 253 222",
            "650 253 2222",
        ],
    );
}

#[test]
fn formats_us_number_with_national_prefix() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(
        &mut formatter,
        "16502532222",
        &[
            "1",
            "16",
            "1 65",
            "1 650",
            "1 650 2",
            "1 650 25",
            "1 650 253",
            "1 650 253 2",
            "1 650 253 22",
            "1 650 253 222",
            "1 650 253 2222",
        ],
    );
    assert_eq!("1", formatter.extracted_national_prefix());
}

#[test]
fn formats_number_dialed_with_idd() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(
        &mut formatter,
        "011446123123123",
        &[
            "0",
            "01",
            "011 ",
            "011 4",
            "011 44 ",
            "011 44 6",
            "011 44 61",
            "011 44 6 12",
            "011 44 6 123",
            "011 44 6 123 1",
            "011 44 6 123 12",
            "011 44 6 123 123",
            "011 44 6 123 123 1",
            "011 44 6 123 123 12",
            "011 44 6 123 123 123",
        ],
    );
}

#[test]
fn formats_number_dialed_with_plus_sign() {
    let expected = [
        "+",
        "+4",
        "+48 ",
        "+48 8",
        "+48 88",
        "+48 88 1",
        "+48 88 12",
        "+48 88 123",
        "+48 88 123 1",
        "+48 88 123 12",
        "+48 88 123 12 1",
        "+48 88 123 12 12",
    ];
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(&mut formatter, "+48881231212", &expected);

    // The region the user dials from does not matter once a plus sign is
    // entered, even if it is unknown.
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::zz());
    assert_outputs(&mut formatter, "+48881231212", &expected);
}

#[test]
fn full_width_plus_sign_is_accepted() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(
        &mut formatter,
        "\u{FF0B}4888",
        &["\u{FF0B}", "\u{FF0B}4", "+48 ", "+48 8", "+48 88"],
    );
    assert_eq!("+48 88 1", formatter.input_digit('1'));
}

#[test]
fn unknown_region_leaves_national_numbers_alone() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::zz());
    assert_outputs(&mut formatter, "65025", &["6", "65", "650", "6502", "65025"]);
}

#[test]
fn formats_non_geographical_number() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(
        &mut formatter,
        "+80012345678",
        &[
            "+",
            "+8",
            "+80",
            "+800 ",
            "+800 1",
            "+800 12",
            "+800 123",
            "+800 1234",
            "+800 1234 5",
            "+800 1234 56",
            "+800 1234 567",
            "+800 1234 5678",
        ],
    );
}

#[test]
fn formats_gb_fixed_line_and_remembers_position() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::gb());
    assert_eq!("0", formatter.input_digit('0'));
    assert_eq!("02", formatter.input_digit('2'));
    assert_eq!("020", formatter.input_digit('0'));
    assert_eq!("020 7", formatter.input_digit_and_remember_position('7'));
    assert_eq!(5, formatter.get_remembered_position());
    assert_eq!("020 70", formatter.input_digit('0'));
    assert_eq!("020 703", formatter.input_digit('3'));
    assert_eq!(5, formatter.get_remembered_position());
    assert_eq!("020 7031", formatter.input_digit('1'));
    assert_eq!("020 7031 3", formatter.input_digit('3'));
    assert_eq!("020 7031 30", formatter.input_digit('0'));
    assert_eq!("020 7031 300", formatter.input_digit('0'));
    assert_eq!("020 7031 3000", formatter.input_digit('0'));
    assert_eq!(5, formatter.get_remembered_position());
    assert_eq!("0", formatter.extracted_national_prefix());
}

#[test]
fn separates_national_prefix_when_the_rule_does() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::by());
    assert_outputs(
        &mut formatter,
        "80291234567",
        &[
            "8",
            "80",
            "802",
            "8029",
            "80 29 1",
            "80 29 12",
            "80 29 123",
            "80 29 123-4",
            "80 29 123-45",
            "80 29 123-45-6",
            "80 29 123-45-67",
        ],
    );
    assert_eq!("80", formatter.extracted_national_prefix());
}

#[test]
fn remembered_position_follows_inserted_separators() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!("1", formatter.input_digit_and_remember_position('1'));
    assert_eq!(1, formatter.get_remembered_position());
    assert_eq!("16", formatter.input_digit('6'));
    assert_eq!("1 65", formatter.input_digit('5'));
    assert_eq!(1, formatter.get_remembered_position());
    assert_eq!("1 650", formatter.input_digit_and_remember_position('0'));
    assert_eq!(5, formatter.get_remembered_position());
    assert_eq!("1 650 2", formatter.input_digit('2'));
    assert_eq!("1 650 25", formatter.input_digit('5'));
    // The space before the area code shifts the remembered digit by one.
    assert_eq!(5, formatter.get_remembered_position());
    assert_eq!("1 650 253", formatter.input_digit('3'));
    assert_eq!("1 650 253 2", formatter.input_digit('2'));
    assert_eq!(5, formatter.get_remembered_position());
}

#[test]
fn stops_formatting_once_user_formats() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!("6", formatter.input_digit('6'));
    assert_eq!("65", formatter.input_digit('5'));
    assert_eq!("650", formatter.input_digit_and_remember_position('0'));
    assert_eq!(3, formatter.get_remembered_position());
    assert_eq!("650-", formatter.input_digit('-'));
    // The remembered position is now taken from the raw input.
    assert_eq!(3, formatter.get_remembered_position());
    assert_eq!("650-2", formatter.input_digit('2'));
    assert_eq!("650-25", formatter.input_digit('5'));

    formatter.clear();
    assert_eq!("6", formatter.input_digit('6'));
    assert_eq!("65", formatter.input_digit('5'));
    assert_eq!("650", formatter.input_digit('0'));
    assert_eq!("650 2", formatter.input_digit('2'));
}

#[test]
fn full_width_digits_are_normalized_once_formatted() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!("\u{FF16}", formatter.input_digit('\u{FF16}'));
    assert_eq!("\u{FF16}\u{FF15}", formatter.input_digit('\u{FF15}'));
    assert_eq!("650", formatter.input_digit('\u{FF10}'));
    assert_eq!("650 2", formatter.input_digit('\u{FF12}'));
    assert_eq!("650 25", formatter.input_digit('\u{FF15}'));
}

#[test]
fn too_many_digits_are_returned_unformatted() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    for c in "6502532222".chars() {
        formatter.input_digit(c);
    }
    assert_eq!("65025322221", formatter.input_digit('1'));
    assert_eq!("650253222212", formatter.input_digit('2'));

    formatter.clear();
    assert_eq!("1", formatter.input_digit('1'));
    assert_eq!("", formatter.extracted_national_prefix());
}

#[test]
fn extracts_long_national_prefix() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::sg());
    assert_outputs(
        &mut formatter,
        "77777798767890",
        &[
            "7",
            "77",
            "777",
            "7777",
            "77777",
            "777777 ",
            "777777 9",
            "777777 98",
            "777777 987",
            "777777 9876",
            "777777 9876 7",
            "777777 9876 78",
            "777777 9876 789",
            "777777 9876 7890",
        ],
    );
}

#[test]
fn narrows_formats_with_the_last_leading_digits_pattern() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(
        &mut formatter,
        "+86988101234",
        &[
            "+",
            "+8",
            "+86 ",
            "+86 9",
            "+86 98",
            "+86 988",
            "+86 988 1",
            "+86 988 10",
            "+86 988 101",
            "+86 988 1012",
            "+86 988 10123",
            "+86 988 101234",
        ],
    );

    // "98812" fails the third pattern. Once formatting stops, the plus sign
    // and country code are extracted again, and longer numbers are still
    // checked against the last pattern.
    formatter.clear();
    assert_outputs(
        &mut formatter,
        "+8698812345",
        &[
            "+",
            "+8",
            "+86 ",
            "+86 9",
            "+86 98",
            "+86 988",
            "+86 988 1",
            "+8698812",
            "+86988123",
            "+869881234",
            "+8698812345",
        ],
    );
}

#[test]
fn no_digit_is_lost() {
    let phone_util = get_phone_util();
    for (region, input) in [
        (RegionCode::us(), "6502532222"),
        (RegionCode::us(), "011446123123123"),
        (RegionCode::gb(), "02070313000"),
        (RegionCode::by(), "80291234567"),
        (RegionCode::zz(), "+48881231212"),
        (RegionCode::sg(), "77777798767890"),
        (RegionCode::us(), "+8698812345"),
    ] {
        let mut formatter = phone_util.get_as_you_type_formatter(region);
        let mut entered = String::new();
        for c in input.chars() {
            entered.push(c);
            let output: String = formatter
                .input_digit(c)
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect();
            assert_eq!(entered, output, "region {}", region);
        }
    }
}

#[test]
fn clear_behaves_like_a_fresh_formatter() {
    let phone_util = get_phone_util();
    let mut reused = phone_util.get_as_you_type_formatter(RegionCode::us());
    for c in "+48881231212".chars() {
        reused.input_digit(c);
    }
    reused.clear();

    let mut fresh = phone_util.get_as_you_type_formatter(RegionCode::us());
    for c in "16502532222".chars() {
        assert_eq!(fresh.input_digit(c).to_owned(), reused.input_digit(c));
    }
    assert_eq!(fresh.get_remembered_position(), reused.get_remembered_position());
}
