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

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
#[error("An error occurred while trying to create regex: {0}")]
pub struct InvalidRegexError(#[from] regex::Error);

/// Thread safe cache of compiled patterns. Metadata patterns are reused by
/// every formatter and matcher session, so they are compiled once and shared.
pub struct RegexCache {
    cache: DashMap<String, Arc<regex::Regex>>,
    /// Anchored `^(?:...)$` versions, kept apart so the key stays the
    /// original pattern text.
    full_match_cache: DashMap<String, Arc<regex::Regex>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
            full_match_cache: DashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: DashMap::with_capacity(capacity),
            full_match_cache: DashMap::with_capacity(capacity),
        }
    }

    pub fn get_regex(&self, pattern: &str) -> Result<Arc<regex::Regex>, InvalidRegexError> {
        Self::get_or_compile(&self.cache, pattern, || regex::Regex::new(pattern))
    }

    /// Returns a regex that only matches when `pattern` covers the whole input.
    pub fn get_full_match_regex(&self, pattern: &str) -> Result<Arc<regex::Regex>, InvalidRegexError> {
        Self::get_or_compile(&self.full_match_cache, pattern, || {
            regex::Regex::new(&fast_cat::concat_str!("^(?:", pattern, ")$"))
        })
    }

    pub fn len(&self) -> usize {
        self.cache.len() + self.full_match_cache.len()
    }

    fn get_or_compile(
        cache: &DashMap<String, Arc<regex::Regex>>,
        pattern: &str,
        compile: impl FnOnce() -> Result<regex::Regex, regex::Error>,
    ) -> Result<Arc<regex::Regex>, InvalidRegexError> {
        if let Some(regex) = cache.get(pattern) {
            Ok(regex.value().clone())
        } else {
            let entry = cache
                .entry(pattern.to_string())
                .or_try_insert_with(|| compile().map(Arc::new))?;
            Ok(entry.value().clone())
        }
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new()
    }
}
