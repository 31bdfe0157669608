//! Dynamic `clap` parser built from an [`ArgumentSchema`].
//!
//! The schema only describes pandoc's command line; this module turns it
//! into a [`clap::Command`] at runtime so concrete argument lists can be
//! checked and decomposed.

use std::collections::BTreeMap;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use pandoc_schema_core::{ArgumentSchema, Arity, FlagSpec, OUTPUT_FORMAT_SLOT};
use serde::Serialize;

/// What one option contributed to a parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Number of times a switch was given.
    Count(u8),
    /// Values in command-line order; empty for a bare optional-value flag.
    Values(Vec<String>),
}

/// Result of parsing one pandoc argument list against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedInvocation {
    pub output_format: String,
    /// Keyed by each option's canonical token (its first long token, or its
    /// only short one). Options that were not given are absent.
    pub flags: BTreeMap<String, FlagValue>,
}

impl ParsedInvocation {
    /// Looks up an option by any of its tokens.
    pub fn get<'a>(&'a self, schema: &ArgumentSchema, token: &str) -> Option<&'a FlagValue> {
        let spec = schema.flag(token)?;
        self.flags.get(canonical_token(&spec.aliases)?)
    }
}

/// Builds a `clap::Command` that accepts exactly the schema's arguments.
///
/// clap's own `--help`/`--version` are disabled since pandoc defines both.
/// Giving a non-repeatable option twice keeps the last occurrence.
///
/// # Examples
///
/// ```
/// use pandoc_schema_core::OptionDescriptor;
/// use pandoc_schema_discovery::clap_adapter::to_clap_command;
/// use pandoc_schema_discovery::schema::build_schema;
///
/// let schema = build_schema(&[OptionDescriptor::flag(["s", "standalone"]).unwrap()]);
/// let command = to_clap_command(&schema);
///
/// assert!(command.clone().try_get_matches_from(["html", "-s"]).is_ok());
/// assert!(command.try_get_matches_from(["html", "--bogus"]).is_err());
/// ```
pub fn to_clap_command(schema: &ArgumentSchema) -> Command {
    let mut command = Command::new("pandoc")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true);

    for (index, positional) in schema.positionals.iter().enumerate() {
        command = command.arg(
            Arg::new(positional.name.clone())
                .index(index + 1)
                .required(positional.required)
                .action(ArgAction::Set),
        );
    }

    for (tokens, spec) in schema.groups() {
        if let Some(arg) = group_arg(tokens, spec) {
            command = command.arg(arg);
        }
    }

    command
}

/// Parses `args` (without the program name) against the schema.
///
/// # Errors
///
/// Returns clap's error for unknown flags, missing values or a missing
/// output format. `err.kind()` tells them apart.
pub fn parse_invocation<I, T>(schema: &ArgumentSchema, args: I) -> Result<ParsedInvocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let matches = to_clap_command(schema).try_get_matches_from(args)?;

    let output_format = matches
        .get_one::<String>(OUTPUT_FORMAT_SLOT)
        .cloned()
        .unwrap_or_default();

    let mut flags = BTreeMap::new();
    for (tokens, spec) in schema.groups() {
        let Some(key) = canonical_token(tokens) else {
            continue;
        };
        if let Some(value) = flag_value(&matches, arg_id(key), spec) {
            flags.insert(key.to_string(), value);
        }
    }

    Ok(ParsedInvocation {
        output_format,
        flags,
    })
}

fn canonical_token(tokens: &[String]) -> Option<&str> {
    tokens
        .iter()
        .find(|token| token.starts_with("--"))
        .or_else(|| tokens.first())
        .map(String::as_str)
}

fn arg_id(token: &str) -> &str {
    token.trim_start_matches('-')
}

fn group_arg(tokens: &[String], spec: &FlagSpec) -> Option<Arg> {
    let key = canonical_token(tokens)?;
    let mut shorts = tokens
        .iter()
        .filter(|token| !token.starts_with("--"))
        .filter_map(|token| token.strip_prefix('-')?.chars().next());
    let mut longs = tokens.iter().filter_map(|token| token.strip_prefix("--"));

    let mut arg = Arg::new(arg_id(key).to_string());
    if let Some(short) = shorts.next() {
        arg = arg.short(short).visible_short_aliases(shorts);
    }
    if let Some(long) = longs.next() {
        arg = arg
            .long(long.to_string())
            .visible_aliases(longs.map(str::to_string).collect::<Vec<_>>());
    }

    let arg = match (spec.arity, spec.repeatable) {
        (Arity::Flag, false) => arg.action(ArgAction::SetTrue),
        (Arity::Flag, true) => arg.action(ArgAction::Count),
        (Arity::RequiredValue, false) => arg.action(ArgAction::Set).num_args(1),
        (Arity::RequiredValue, true) => arg.action(ArgAction::Append).num_args(1),
        (Arity::OptionalValue, repeatable) => arg
            .action(if repeatable {
                ArgAction::Append
            } else {
                ArgAction::Set
            })
            .num_args(0..=1)
            .require_equals(true),
    };
    Some(arg)
}

fn flag_value(matches: &ArgMatches, id: &str, spec: &FlagSpec) -> Option<FlagValue> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    let value = match (spec.arity, spec.repeatable) {
        (Arity::Flag, false) => FlagValue::Count(u8::from(matches.get_flag(id))),
        (Arity::Flag, true) => FlagValue::Count(matches.get_count(id)),
        _ => FlagValue::Values(
            matches
                .get_many::<String>(id)
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        ),
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use pandoc_schema_core::OptionDescriptor;

    use super::*;
    use crate::schema::build_schema;

    fn sample_schema() -> ArgumentSchema {
        build_schema(&[
            OptionDescriptor::required_value(["t", "w", "to", "write"]).unwrap(),
            OptionDescriptor::flag(["s", "standalone"]).unwrap(),
            OptionDescriptor::required_value(["V", "variable"]).unwrap(),
            OptionDescriptor::optional_value(["webtex"]).unwrap(),
            OptionDescriptor::flag(["toc", "table-of-contents"]).unwrap(),
            OptionDescriptor::required_value(["bibliography"]).unwrap(),
        ])
    }

    fn values(items: &[&str]) -> FlagValue {
        FlagValue::Values(items.iter().map(|item| item.to_string()).collect())
    }

    #[test]
    fn test_parses_values_and_switches() {
        let schema = sample_schema();
        let parsed = parse_invocation(
            &schema,
            ["pdf", "-s", "--to=latex", "-V", "a=1", "--variable", "b=2"],
        )
        .unwrap();

        assert_eq!(parsed.output_format, "pdf");
        assert_eq!(parsed.flags.get("--standalone"), Some(&FlagValue::Count(1)));
        assert_eq!(parsed.flags.get("--to"), Some(&values(&["latex"])));
        assert_eq!(parsed.flags.get("--variable"), Some(&values(&["a=1", "b=2"])));
        assert!(!parsed.flags.contains_key("--toc"));
    }

    #[test]
    fn test_every_alias_reaches_the_same_option() {
        let schema = sample_schema();
        let parsed = parse_invocation(&schema, ["html", "-w", "docx", "--table-of-contents"]).unwrap();
        assert_eq!(parsed.get(&schema, "-t"), Some(&values(&["docx"])));
        assert_eq!(parsed.get(&schema, "--toc"), Some(&FlagValue::Count(1)));
    }

    #[test]
    fn test_repeatable_values_accumulate() {
        let schema = sample_schema();
        let parsed = parse_invocation(
            &schema,
            ["html", "--bibliography", "a.bib", "--bibliography", "b.bib"],
        )
        .unwrap();
        assert_eq!(parsed.flags.get("--bibliography"), Some(&values(&["a.bib", "b.bib"])));
    }

    #[test]
    fn test_non_repeatable_keeps_last_value() {
        let schema = sample_schema();
        let parsed = parse_invocation(&schema, ["html", "-t", "rst", "-t", "docx"]).unwrap();
        assert_eq!(parsed.flags.get("--to"), Some(&values(&["docx"])));
    }

    #[test]
    fn test_optional_value_with_and_without_value() {
        let schema = sample_schema();

        let bare = parse_invocation(&schema, ["html", "--webtex"]).unwrap();
        assert_eq!(bare.flags.get("--webtex"), Some(&FlagValue::Values(Vec::new())));

        let with_url = parse_invocation(&schema, ["html", "--webtex=https://example.org/"]).unwrap();
        assert_eq!(with_url.flags.get("--webtex"), Some(&values(&["https://example.org/"])));
    }

    #[test]
    fn test_missing_output_format_is_an_error() {
        let err = parse_invocation(&sample_schema(), ["-s"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let err = parse_invocation(&sample_schema(), ["html", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_missing_required_value_is_an_error() {
        assert!(parse_invocation(&sample_schema(), ["html", "--to"]).is_err());
    }

    #[test]
    fn test_pandoc_help_and_version_flags_are_not_hijacked() {
        let schema = build_schema(&[
            OptionDescriptor::flag(["h", "help"]).unwrap(),
            OptionDescriptor::flag(["v", "version"]).unwrap(),
        ]);
        let parsed = parse_invocation(&schema, ["html", "-h", "--version"]).unwrap();
        assert_eq!(parsed.flags.get("--help"), Some(&FlagValue::Count(1)));
        assert_eq!(parsed.flags.get("--version"), Some(&FlagValue::Count(1)));
    }
}
