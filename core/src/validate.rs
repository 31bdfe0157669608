//! Structural validation for option descriptors and argument schemas.
//!
//! Parsing never fails, so nothing upstream guarantees that two help lines
//! did not claim the same alias or that a hand-built schema is consistent.
//! These checks catch that before a consumer wires the data into a parser.
//!
//! # Examples
//!
//! ```
//! use pandoc_schema_core::*;
//!
//! let options = vec![
//!     OptionDescriptor::required_value(["t", "to"]).unwrap(),
//!     OptionDescriptor::flag(["s", "standalone"]).unwrap(),
//! ];
//! assert!(validate_options(&options).is_empty());
//!
//! let clash = vec![
//!     OptionDescriptor::required_value(["t", "to"]).unwrap(),
//!     OptionDescriptor::flag(["t"]).unwrap(),
//! ];
//! assert_eq!(
//!     validate_options(&clash),
//!     vec![ValidationError::DuplicateAlias("t".to_string())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ArgumentSchema, OUTPUT_FORMAT_SLOT, OptionDescriptor};

/// Descriptor/schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A descriptor has no aliases (only reachable through deserialization).
    #[error("option at position {0} has no aliases")]
    EmptyAliases(usize),
    /// Alias is not a bare option name (leading dash, whitespace, etc.).
    #[error("invalid option alias: {0:?}")]
    InvalidAlias(String),
    /// Two descriptors share an alias.
    #[error("duplicate option alias: {0}")]
    DuplicateAlias(String),
    /// Schema key is not `-x` or `--name`.
    #[error("invalid flag token: {0:?}")]
    InvalidFlagToken(String),
    /// The schema does not start with the required output-format slot.
    #[error("schema must reserve a leading required `output_format` positional")]
    MissingOutputFormatSlot,
    /// A flag's alias group is inconsistent with the entries it names.
    #[error("alias group mismatch at flag: {0}")]
    AliasGroupMismatch(String),
}

/// Validates a parsed option sequence.
///
/// Stops at the first problem found, like the schema checks below.
pub fn validate_options(options: &[OptionDescriptor]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, option) in options.iter().enumerate() {
        if option.aliases().is_empty() {
            errors.push(ValidationError::EmptyAliases(index));
            return errors;
        }
        for alias in option.aliases() {
            if !is_valid_alias(alias) {
                errors.push(ValidationError::InvalidAlias(alias.clone()));
                return errors;
            }
            if !seen.insert(alias.as_str()) {
                errors.push(ValidationError::DuplicateAlias(alias.clone()));
                return errors;
            }
        }
    }

    errors
}

/// Validates an argument schema.
///
/// # Examples
///
/// ```
/// use pandoc_schema_core::*;
///
/// let schema = ArgumentSchema::new();
/// assert!(validate_argument_schema(&schema).is_empty());
///
/// let mut bad = ArgumentSchema::new();
/// bad.positionals.clear();
/// assert_eq!(
///     validate_argument_schema(&bad),
///     vec![ValidationError::MissingOutputFormatSlot]
/// );
/// ```
pub fn validate_argument_schema(schema: &ArgumentSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let has_slot = schema
        .positionals
        .first()
        .is_some_and(|slot| slot.name == OUTPUT_FORMAT_SLOT && slot.required);
    if !has_slot {
        errors.push(ValidationError::MissingOutputFormatSlot);
        return errors;
    }

    for (token, spec) in &schema.flags {
        if !is_valid_flag_token(token) {
            errors.push(ValidationError::InvalidFlagToken(token.clone()));
            return errors;
        }
        if !spec.aliases.contains(token) {
            errors.push(ValidationError::AliasGroupMismatch(token.clone()));
            return errors;
        }
        let consistent = spec
            .aliases
            .iter()
            .all(|alias| schema.flags.get(alias).is_some_and(|other| other == spec));
        if !consistent {
            errors.push(ValidationError::AliasGroupMismatch(token.clone()));
            return errors;
        }
    }

    errors
}

fn is_valid_alias(alias: &str) -> bool {
    let mut chars = alias.chars();
    chars.next().is_some_and(|ch| ch.is_ascii_alphabetic())
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

fn is_valid_flag_token(token: &str) -> bool {
    if let Some(long) = token.strip_prefix("--") {
        return long.chars().count() >= 2 && is_valid_alias(long);
    }
    if let Some(short) = token.strip_prefix('-') {
        return short.chars().count() == 1 && is_valid_alias(short);
    }
    false
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::{Arity, FlagSpec, PositionalSpec};

    use super::*;

    fn spec(aliases: &[&str], arity: Arity) -> FlagSpec {
        FlagSpec {
            arity,
            repeatable: false,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_validate_options_rejects_dashed_alias() {
        let options = vec![OptionDescriptor::flag(["--standalone"]).unwrap()];
        assert_eq!(
            validate_options(&options),
            vec![ValidationError::InvalidAlias("--standalone".to_string())]
        );
    }

    #[test]
    fn test_validate_options_rejects_empty_aliases_from_json() {
        let options: Vec<OptionDescriptor> =
            serde_json::from_str(r#"[{"aliases": [], "arity": "flag"}]"#).unwrap();
        assert_eq!(
            validate_options(&options),
            vec![ValidationError::EmptyAliases(0)]
        );
    }

    #[test]
    fn test_validate_schema_rejects_bad_tokens() {
        let mut schema = ArgumentSchema::new();
        schema
            .flags
            .insert("-to".to_string(), spec(&["-to"], Arity::RequiredValue));
        assert_eq!(
            validate_argument_schema(&schema),
            vec![ValidationError::InvalidFlagToken("-to".to_string())]
        );

        let mut schema = ArgumentSchema::new();
        schema
            .flags
            .insert("--t".to_string(), spec(&["--t"], Arity::RequiredValue));
        assert_eq!(
            validate_argument_schema(&schema),
            vec![ValidationError::InvalidFlagToken("--t".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_split_alias_group() {
        let mut flags = BTreeMap::new();
        flags.insert("-t".to_string(), spec(&["-t", "--to"], Arity::RequiredValue));
        flags.insert("--to".to_string(), spec(&["-t", "--to"], Arity::OptionalValue));
        let schema = ArgumentSchema {
            positionals: vec![PositionalSpec::required(OUTPUT_FORMAT_SLOT)],
            flags,
        };
        assert_eq!(
            validate_argument_schema(&schema),
            vec![ValidationError::AliasGroupMismatch("--to".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_accepts_consistent_group() {
        let mut schema = ArgumentSchema::new();
        let group = spec(&["-t", "--to"], Arity::RequiredValue);
        schema.flags.insert("-t".to_string(), group.clone());
        schema.flags.insert("--to".to_string(), group);
        assert!(validate_argument_schema(&schema).is_empty());
    }
}
