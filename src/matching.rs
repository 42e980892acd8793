//! Glob matching over qualified entity names.
//!
//! Patterns work on dotted names the way path globs work on file paths:
//! - `**` matches any run of characters, dots included
//! - `*` matches within a single name segment
//! - `?` matches one character other than `.`
//! - `[seq]` / `[!seq]` match a character (not) in `seq`

use std::collections::HashMap;

use parking_lot::Mutex;
use regex::Regex;

use crate::error::{BuildError, Result};

lazy_static::lazy_static! {
    /// Cache for compiled patterns
    static ref PATTERN_CACHE: Mutex<HashMap<String, Regex>> = Mutex::new(HashMap::new());
}

/// Translates a name glob into an anchored regex.
pub fn translate_pattern(pattern: &str) -> String {
    let mut regex_pattern = String::new();
    let chars: Vec<char> = pattern.chars().collect();
    let n = chars.len();
    let mut i = 0;

    while i < n {
        let c = chars[i];
        match c {
            '*' => {
                if i + 1 < n && chars[i + 1] == '*' {
                    if i + 2 < n && chars[i + 2] == '.' {
                        // `**.` also matches zero leading segments
                        regex_pattern.push_str("(?:[^.]+\\.)*");
                        i += 3;
                    } else {
                        regex_pattern.push_str(".*");
                        i += 2;
                    }
                } else {
                    regex_pattern.push_str("[^.]*");
                    i += 1;
                }
            }
            '?' => {
                regex_pattern.push_str("[^.]");
                i += 1;
            }
            '[' => {
                let mut j = i + 1;
                if j < n && (chars[j] == '!' || chars[j] == '^') {
                    j += 1;
                }
                if j < n && chars[j] == ']' {
                    j += 1;
                }
                while j < n && chars[j] != ']' {
                    j += 1;
                }
                if j >= n {
                    regex_pattern.push_str("\\[");
                    i += 1;
                } else {
                    let mut k = i + 1;
                    regex_pattern.push('[');
                    if chars[k] == '!' || chars[k] == '^' {
                        regex_pattern.push('^');
                        k += 1;
                    }
                    while k < j {
                        if chars[k] == '\\' && k + 1 < j {
                            regex_pattern.push('\\');
                            regex_pattern.push(chars[k + 1]);
                            k += 2;
                        } else {
                            regex_pattern.push(chars[k]);
                            k += 1;
                        }
                    }
                    regex_pattern.push(']');
                    i = j + 1;
                }
            }
            '\\' | '.' | '^' | '$' | '+' | '{' | '}' | '|' | '(' | ')' => {
                regex_pattern.push('\\');
                regex_pattern.push(c);
                i += 1;
            }
            _ => {
                regex_pattern.push(c);
                i += 1;
            }
        }
    }

    format!("^{}$", regex_pattern)
}

/// Compiles a pattern, reusing earlier compilations.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    let mut cache = PATTERN_CACHE.lock();
    if let Some(regex) = cache.get(pattern) {
        return Ok(regex.clone());
    }

    let regex = Regex::new(&translate_pattern(pattern)).map_err(|source| BuildError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;
    cache.insert(pattern.to_string(), regex.clone());
    Ok(regex)
}

/// Tests if a qualified name matches a glob pattern.
pub fn pattern_match(name: &str, pattern: &str) -> Result<bool> {
    Ok(compile_pattern(pattern)?.is_match(name))
}

/// Include/exclude filter over qualified names. Exclusions win.
#[derive(Debug, Clone)]
pub struct EntityFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl EntityFilter {
    /// An empty include list includes everything.
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Result<Self> {
        let include = if include_patterns.is_empty() {
            vec![compile_pattern("**")?]
        } else {
            include_patterns
                .iter()
                .map(|p| compile_pattern(p))
                .collect::<Result<Vec<_>>>()?
        };
        let exclude = exclude_patterns
            .iter()
            .map(|p| compile_pattern(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { include, exclude })
    }

    pub fn accepts(&self, qualified_name: &str) -> bool {
        self.include.iter().any(|r| r.is_match(qualified_name)) && !self.excludes(qualified_name)
    }

    /// Whether an exclude pattern names `qualified_name` explicitly.
    pub fn excludes(&self, qualified_name: &str) -> bool {
        self.exclude.iter().any(|r| r.is_match(qualified_name))
    }
}
