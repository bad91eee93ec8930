//! The INI collaborator.
//!
//! Config files are INI: `[section]` headers followed by `key=value` lines.
//! A key assigned more than once in a section becomes a list, as does the
//! explicit `key[]=value` spelling; the merger decides whether the target
//! option actually accepts multiple values. Lines starting with `#` are
//! comments. Keys and values are not trimmed; the format is strict.

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IniValue {
    Scalar(String),
    List(Vec<String>),
}

/// A parsed INI document. Sections and keys keep their order of first
/// appearance.
#[derive(Debug, Default)]
pub struct Ini {
    sections: Vec<(String, Vec<(String, IniValue)>)>,
}

impl Ini {
    pub fn parse(text: &str) -> Result<Ini, ConfigError> {
        let mut ini = Ini::default();
        let mut current: Option<usize> = None;

        for (line_idx, raw) in text.lines().enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let line_no = line_idx + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let Some(name) = rest.strip_suffix(']') else {
                    return Err(ConfigError::format(format!(
                        "section should end with ']' at line {line_no}: {line}"
                    )));
                };
                if name.is_empty() {
                    return Err(ConfigError::format(format!(
                        "section is zero-length at line {line_no}: {line}"
                    )));
                }
                current = Some(ini.section_idx(name));
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::format(format!(
                    "missing '=' in key/value at line {line_no}: {line}"
                )));
            };

            let (key, list_form) = match key.strip_suffix("[]") {
                Some(stripped) => (stripped, true),
                None => (key, false),
            };
            if key.is_empty() {
                return Err(ConfigError::format(format!(
                    "key is zero-length at line {line_no}: {line}"
                )));
            }

            let Some(section_idx) = current else {
                return Err(ConfigError::format(format!(
                    "key/value found outside of a section at line {line_no}: {line}"
                )));
            };

            ini.add(section_idx, key, value.to_string(), list_form);
        }

        Ok(ini)
    }

    fn section_idx(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|(section, _)| section == name) {
            Some(idx) => idx,
            None => {
                self.sections.push((name.to_string(), Vec::new()));
                self.sections.len() - 1
            }
        }
    }

    fn add(&mut self, section_idx: usize, key: &str, value: String, list_form: bool) {
        let keys = &mut self.sections[section_idx].1;

        match keys.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, IniValue::List(values))) => values.push(value),
            Some(entry) => {
                let IniValue::Scalar(first) = entry.1.clone() else {
                    return;
                };
                entry.1 = IniValue::List(vec![first, value]);
            }
            None => {
                let stored = if list_form {
                    IniValue::List(vec![value])
                } else {
                    IniValue::Scalar(value)
                };
                keys.push((key.to_string(), stored));
            }
        }
    }

    /// Keys of a section in order of first appearance; empty when the section
    /// does not exist.
    pub fn section_key_list(&self, section: &str) -> Vec<&str> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, keys)| keys.iter().map(|(key, _)| key.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&IniValue> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .and_then(|(_, keys)| keys.iter().find(|(existing, _)| existing == key))
            .map(|(_, value)| value)
    }
}
