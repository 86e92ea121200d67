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

mod as_you_type_formatter_tests;
mod phonenumberutil_tests;

use crate::PhoneNumberUtil;

static ONCE: std::sync::Once = std::sync::Once::new();

fn init_logger() {
    ONCE.call_once(|| {
        colog::default_builder()
            .filter_level(log::LevelFilter::Trace)
            .init()
    });
}

/// A util over the test metadata, with the alternate formats registered.
fn get_phone_util() -> PhoneNumberUtil {
    init_logger();
    PhoneNumberUtil::new_for_metadata(test_metadata::build_test_metadata())
        .with_alternate_formats(test_metadata::build_alternate_formats())
}

/// A util over the test metadata without any alternate formats.
fn get_phone_util_without_alternate_formats() -> PhoneNumberUtil {
    init_logger();
    PhoneNumberUtil::new_for_metadata(test_metadata::build_test_metadata())
}
