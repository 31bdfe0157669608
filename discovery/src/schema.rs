//! Argument schema construction from parsed options.
//!
//! The schema is data only. A generic parser (see the `clap_adapter`
//! module) turns it into something that accepts concrete argument lists.

use pandoc_schema_core::{ArgumentSchema, FlagSpec, OptionDescriptor, flag_token};
use tracing::debug;

/// Single-letter uppercase alias that is *not* treated as repeatable.
///
/// pandoc's uppercase short options (`-V`, `-M`, `-H`, `-B`, `-A`, ...) tend
/// to accumulate values; `-T` (title prefix) does not.
pub const NON_REPEATABLE_UPPERCASE: char = 'T';

/// Long options that always accumulate values even without an uppercase alias.
pub const ALWAYS_REPEATABLE: &[&str] = &["bibliography"];

/// Repeatability heuristic for one option.
///
/// Observed convention, not a documented rule: an option may be given more
/// than once if it has a single-uppercase-letter alias other than
/// [`NON_REPEATABLE_UPPERCASE`], or an alias listed in [`ALWAYS_REPEATABLE`].
///
/// # Examples
///
/// ```
/// use pandoc_schema_core::OptionDescriptor;
/// use pandoc_schema_discovery::schema::is_repeatable;
///
/// assert!(is_repeatable(&OptionDescriptor::required_value(["V", "variable"]).unwrap()));
/// assert!(!is_repeatable(&OptionDescriptor::required_value(["T", "title-prefix"]).unwrap()));
/// assert!(is_repeatable(&OptionDescriptor::required_value(["bibliography"]).unwrap()));
/// assert!(!is_repeatable(&OptionDescriptor::required_value(["t", "to"]).unwrap()));
/// ```
pub fn is_repeatable(option: &OptionDescriptor) -> bool {
    option
        .aliases()
        .iter()
        .any(|alias| is_accumulating_short(alias) || ALWAYS_REPEATABLE.contains(&alias.as_str()))
}

fn is_accumulating_short(alias: &str) -> bool {
    let mut chars = alias.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => ch.is_ascii_uppercase() && ch != NON_REPEATABLE_UPPERCASE,
        _ => false,
    }
}

/// Builds the argument schema for a sequence of options.
///
/// Total over any input: each alias becomes one canonical token (`-x` or
/// `--name`) sharing its option's arity and repeatability. When two options
/// claim the same token the earlier one keeps it.
///
/// # Examples
///
/// ```
/// use pandoc_schema_core::{Arity, OptionDescriptor};
/// use pandoc_schema_discovery::schema::build_schema;
///
/// let schema = build_schema(&[
///     OptionDescriptor::required_value(["t", "to"]).unwrap(),
///     OptionDescriptor::flag(["standalone"]).unwrap(),
/// ]);
///
/// assert_eq!(schema.len(), 3);
/// assert_eq!(schema.flag("-t").unwrap().arity, Arity::RequiredValue);
/// assert_eq!(schema.flag("--to").unwrap().aliases, ["-t", "--to"]);
/// assert_eq!(schema.flag("--standalone").unwrap().arity, Arity::Flag);
/// ```
pub fn build_schema(options: &[OptionDescriptor]) -> ArgumentSchema {
    let mut schema = ArgumentSchema::new();

    for option in options {
        let tokens: Vec<String> = option
            .aliases()
            .iter()
            .map(|alias| flag_token(alias))
            .filter(|token| {
                let taken = schema.flags.contains_key(token);
                if taken {
                    debug!(token = token.as_str(), "Flag token already claimed by an earlier option");
                }
                !taken
            })
            .collect();
        if tokens.is_empty() {
            continue;
        }

        let spec = FlagSpec {
            arity: option.arity(),
            repeatable: is_repeatable(option),
            aliases: tokens.clone(),
        };
        for token in tokens {
            schema.flags.insert(token, spec.clone());
        }
    }

    schema
}
