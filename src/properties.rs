//! Reading and writing `.properties` style `key=value` files.
//!
//! Supports the subset of the format found in hand-written files: `#` and `!`
//! comments, `=`, `:` or whitespace separators, backslash line continuations
//! and the usual escapes (`\t`, `\n`, `\r`, `\f`, `\uXXXX`, escaped
//! separators).

use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Parse properties content into key/value pairs, in file order
pub fn parse(content: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = String::new();
        let mut current = trimmed.to_string();
        loop {
            if ends_with_continuation(&current) {
                current.pop();
                logical.push_str(&current);
                match lines.next() {
                    Some(next) => current = next.trim_start().to_string(),
                    None => break,
                }
            } else {
                logical.push_str(&current);
                break;
            }
        }

        entries.push(split_entry(&logical));
    }

    entries
}

/// Load a properties file into a sorted map
pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse(&content).into_iter().collect())
}

/// Write entries as `key=value` lines, escaping as needed
pub fn store<'a, W, I>(writer: &mut W, entries: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    for (key, value) in entries {
        writeln!(writer, "{}={}", escape(key, true), escape(value, false))?;
    }
    Ok(())
}

fn ends_with_continuation(line: &str) -> bool {
    let backslashes = line.chars().rev().take_while(|c| *c == '\\').count();
    backslashes % 2 == 1
}

fn split_entry(line: &str) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();
    let mut index = 0;
    let mut key_end = chars.len();

    while index < chars.len() {
        match chars[index] {
            '\\' => index += 2,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                key_end = index;
                break;
            }
            _ => index += 1,
        }
    }

    let key: String = chars[..key_end.min(chars.len())].iter().collect();
    let mut rest = key_end;
    while rest < chars.len() && matches!(chars[rest], ' ' | '\t' | '\u{c}') {
        rest += 1;
    }
    if rest < chars.len() && matches!(chars[rest], '=' | ':') {
        rest += 1;
    }
    while rest < chars.len() && matches!(chars[rest], ' ' | '\t' | '\u{c}') {
        rest += 1;
    }
    let value: String = chars[rest.min(chars.len())..].iter().collect();

    (unescape(&key), unescape(&value))
}

fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => result.push(decoded),
                    None => {
                        result.push_str("\\u");
                        result.push_str(&hex);
                    }
                }
            }
            Some(other) => result.push(other),
            None => {}
        }
    }

    result
}

fn escape(raw: &str, is_key: bool) -> String {
    let mut result = String::with_capacity(raw.len());
    for (index, c) in raw.chars().enumerate() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\t' => result.push_str("\\t"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\u{c}' => result.push_str("\\f"),
            '=' | ':' | '#' | '!' if is_key || index == 0 => {
                result.push('\\');
                result.push(c);
            }
            ' ' if is_key || index == 0 => result.push_str("\\ "),
            _ => result.push(c),
        }
    }
    result
}
