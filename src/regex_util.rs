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

use std::borrow::Cow;

use regex::{Captures, Match, Regex};

/// Matching anchored at the start of the input, like `lookingAt` in Java.
///
/// The leftmost match always starts at the smallest possible offset, so if
/// any match starts at 0 the leftmost one does too.
pub trait RegexConsume {
    fn matches_start(&self, s: &str) -> bool {
        self.find_start(s).is_some()
    }

    fn captures_start<'a>(&self, s: &'a str) -> Option<Captures<'a>>;
    fn find_start<'a>(&self, s: &'a str) -> Option<Match<'a>>;
}

impl RegexConsume for Regex {
    fn captures_start<'a>(&self, s: &'a str) -> Option<Captures<'a>> {
        let captures = self.captures(s)?;
        let full_capture = captures.get(0)?;
        if full_capture.start() != 0 {
            return None
        }

        Some(captures)
    }

    fn find_start<'a>(&self, s: &'a str) -> Option<Match<'a>> {
        let found = self.find(s)?;
        if found.start() != 0 {
            return None
        }
        Some(found)
    }
}

/// Metadata formats use `$1`, `$2`... group references. The regex crate
/// treats `$1x` as a group named "1x", so references are rewritten to the
/// braced `${1}` form before being used as a replacement.
pub fn to_replacement_template(format: &str) -> Cow<'_, str> {
    if !format.contains('$') {
        return Cow::Borrowed(format);
    }
    let mut template = String::with_capacity(format.len() + 8);
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            template.push(c);
            continue;
        }
        match chars.peek() {
            Some(d) if d.is_ascii_digit() => {
                template.push_str("${");
                while let Some(d) = chars.next_if(|d| d.is_ascii_digit()) {
                    template.push(d);
                }
                template.push('}');
            }
            // Anything else is a literal dollar sign.
            _ => template.push_str("$$"),
        }
    }
    Cow::Owned(template)
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::{RegexConsume, to_replacement_template};

    #[test]
    fn consume_only_at_start() {
        let regex = Regex::new(r"\d{2}").unwrap();
        assert_eq!(Some("12"), regex.find_start("123").map(|m| m.as_str()));
        assert!(!regex.matches_start("a12"));
        assert!(regex.captures_start("x").is_none());
    }

    #[test]
    fn rewrites_group_references() {
        assert_eq!("${1} ${2}", to_replacement_template("$1 $2"));
        assert_eq!("${1}x${2}", to_replacement_template("$1x$2"));
        assert_eq!("0${1}", to_replacement_template("0$1"));
        assert_eq!("$$NP", to_replacement_template("$NP"));
        assert_eq!("no groups", to_replacement_template("no groups"));

        let regex = Regex::new(r"(\d{3})(\d{4})").unwrap();
        assert_eq!(
            "253x2222",
            regex.replace("2532222", to_replacement_template("$1x$2").as_ref())
        );
    }
}
