//! Data model for pandoc capability snapshots and derived argument schemas.
//!
//! Everything in this module is plain data. Parsing lives in the discovery
//! crate; this crate only defines the shapes that parsing produces and that
//! consumers (format validators, argument parsers, editor integrations) read.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Name of the positional slot every [`ArgumentSchema`] reserves for the
/// target output format.
pub const OUTPUT_FORMAT_SLOT: &str = "output_format";

/// How many values a flag consumes.
///
/// Shared by [`OptionDescriptor`] (what the help text says) and
/// [`FlagSpec`] (what an argument parser should enforce).
///
/// # Examples
///
/// ```
/// use pandoc_schema_core::Arity;
///
/// assert!(!Arity::Flag.takes_argument());
/// assert!(Arity::OptionalValue.takes_argument());
/// assert!(Arity::OptionalValue.argument_optional());
/// assert!(!Arity::RequiredValue.argument_optional());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Boolean switch, no value.
    Flag,
    /// A value must follow (`--to=FORMAT`, `-t FORMAT`).
    RequiredValue,
    /// A value may be attached inline (`--extract-media[=PATH]`).
    OptionalValue,
}

impl Arity {
    /// Maps the two help-text booleans onto an arity.
    ///
    /// Returns `None` for the impossible combination of an optional
    /// argument on a flag that takes no argument.
    pub fn from_flags(takes_argument: bool, argument_optional: bool) -> Option<Self> {
        match (takes_argument, argument_optional) {
            (false, false) => Some(Self::Flag),
            (true, false) => Some(Self::RequiredValue),
            (true, true) => Some(Self::OptionalValue),
            (false, true) => None,
        }
    }

    pub fn takes_argument(self) -> bool {
        !matches!(self, Self::Flag)
    }

    pub fn argument_optional(self) -> bool {
        matches!(self, Self::OptionalValue)
    }
}

/// One command-line option recognized in the tool's help listing.
///
/// Aliases are bare names without leading dashes (`"t"`, `"to"`), kept in
/// the order they appear on the help line and never empty when built
/// through the constructors.
///
/// # Examples
///
/// ```
/// use pandoc_schema_core::{Arity, OptionDescriptor};
///
/// let to = OptionDescriptor::required_value(["t", "to"]).unwrap();
/// assert_eq!(to.aliases(), ["t", "to"]);
/// assert!(to.takes_argument());
/// assert!(!to.argument_optional());
///
/// assert!(OptionDescriptor::flag(Vec::<String>::new()).is_none());
/// assert_eq!(OptionDescriptor::new(["toc"], false, true), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionDescriptor {
    aliases: Vec<String>,
    arity: Arity,
}

impl OptionDescriptor {
    /// Builds a descriptor from the help-text booleans.
    pub fn new<I, S>(aliases: I, takes_argument: bool, argument_optional: bool) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let arity = Arity::from_flags(takes_argument, argument_optional)?;
        Self::with_arity(aliases, arity)
    }

    /// Builds a descriptor with an explicit arity.
    ///
    /// Duplicate aliases are collapsed, keeping the first occurrence.
    /// Returns `None` when no alias remains.
    pub fn with_arity<I, S>(aliases: I, arity: Arity) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let aliases: Vec<String> = aliases
            .into_iter()
            .map(Into::into)
            .filter(|alias| !alias.is_empty() && seen.insert(alias.clone()))
            .collect();
        if aliases.is_empty() {
            return None;
        }
        Some(Self { aliases, arity })
    }

    pub fn flag<I, S>(aliases: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_arity(aliases, Arity::Flag)
    }

    pub fn required_value<I, S>(aliases: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_arity(aliases, Arity::RequiredValue)
    }

    pub fn optional_value<I, S>(aliases: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_arity(aliases, Arity::OptionalValue)
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn takes_argument(&self) -> bool {
        self.arity.takes_argument()
    }

    pub fn argument_optional(&self) -> bool {
        self.arity.argument_optional()
    }

    /// Checks whether `name` (without dashes) is one of this option's aliases.
    pub fn has_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias == name)
    }
}

/// Everything one refresh learned about an installed pandoc.
///
/// A snapshot is constructed in one step from all five pieces of tool
/// output, so there is no way to observe a partially populated one. It is
/// never mutated afterwards; a later refresh produces a new value.
///
/// Sets are ordered so that two snapshots built from identical tool output
/// compare equal and serialize byte-for-byte identically.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use pandoc_schema_core::{CapabilitySnapshot, OptionDescriptor};
///
/// let snapshot = CapabilitySnapshot::new(
///     "2.9",
///     vec![
///         OptionDescriptor::required_value(["t", "to"]).unwrap(),
///         OptionDescriptor::flag(["standalone"]).unwrap(),
///     ],
///     BTreeSet::from(["footnotes".to_string()]),
///     BTreeSet::from(["markdown".to_string()]),
///     BTreeSet::from(["html".to_string(), "docx".to_string()]),
/// );
///
/// assert_eq!(snapshot.version(), "2.9");
/// assert_eq!(snapshot.option_names(), vec!["t", "to", "standalone"]);
/// assert!(snapshot.output_formats().contains("docx"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    version: String,
    options: Vec<OptionDescriptor>,
    extensions: BTreeSet<String>,
    input_formats: BTreeSet<String>,
    output_formats: BTreeSet<String>,
}

impl CapabilitySnapshot {
    pub fn new(
        version: impl Into<String>,
        options: Vec<OptionDescriptor>,
        extensions: BTreeSet<String>,
        input_formats: BTreeSet<String>,
        output_formats: BTreeSet<String>,
    ) -> Self {
        Self {
            version: version.into(),
            options,
            extensions,
            input_formats,
            output_formats,
        }
    }

    /// `MAJOR.MINOR` version reported by the tool.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Options in help-listing order.
    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    /// Every alias of every option, flattened, in order of first appearance.
    pub fn option_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.options
            .iter()
            .flat_map(|option| option.aliases().iter().map(String::as_str))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Finds the option that owns `name` (given without dashes).
    pub fn find_option(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options.iter().find(|option| option.has_alias(name))
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn input_formats(&self) -> &BTreeSet<String> {
        &self.input_formats
    }

    pub fn output_formats(&self) -> &BTreeSet<String> {
        &self.output_formats
    }
}

/// A positional slot in an [`ArgumentSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalSpec {
    pub name: String,
    pub required: bool,
}

impl PositionalSpec {
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_string(),
            required: true,
        }
    }
}

/// Parsing rules for one flag token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSpec {
    pub arity: Arity,
    /// May be supplied several times, accumulating values.
    pub repeatable: bool,
    /// Every token that belongs to the same option, this one included.
    pub aliases: Vec<String>,
}

/// Declarative description of the tool's command line.
///
/// Maps every canonical flag token (`-t`, `--to`) to its [`FlagSpec`] and
/// lists the positional slots. Carries no parsing behavior of its own; a
/// generic argument parser consumes it.
///
/// # Examples
///
/// ```
/// use pandoc_schema_core::{ArgumentSchema, Arity, FlagSpec, OUTPUT_FORMAT_SLOT};
///
/// let mut schema = ArgumentSchema::new();
/// schema.flags.insert(
///     "--standalone".to_string(),
///     FlagSpec {
///         arity: Arity::Flag,
///         repeatable: false,
///         aliases: vec!["--standalone".to_string()],
///     },
/// );
///
/// assert_eq!(schema.positionals[0].name, OUTPUT_FORMAT_SLOT);
/// assert!(schema.flag("--standalone").is_some());
/// assert!(schema.flag("-s").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSchema {
    pub positionals: Vec<PositionalSpec>,
    pub flags: BTreeMap<String, FlagSpec>,
}

impl ArgumentSchema {
    /// Creates a schema holding only the required output-format slot.
    pub fn new() -> Self {
        Self {
            positionals: vec![PositionalSpec::required(OUTPUT_FORMAT_SLOT)],
            flags: BTreeMap::new(),
        }
    }

    pub fn flag(&self, token: &str) -> Option<&FlagSpec> {
        self.flags.get(token)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns each option once, as its alias tokens plus shared spec.
    ///
    /// Groups come out ordered by their first token.
    pub fn groups(&self) -> Vec<(&[String], &FlagSpec)> {
        let mut seen: HashSet<&[String]> = HashSet::new();
        let mut groups: Vec<(&[String], &FlagSpec)> = self
            .flags
            .values()
            .filter(|spec| seen.insert(spec.aliases.as_slice()))
            .map(|spec| (spec.aliases.as_slice(), spec))
            .collect();
        groups.sort_by(|a, b| a.0.first().cmp(&b.0.first()));
        groups
    }
}

impl Default for ArgumentSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a bare alias as the token a user types.
///
/// One-character aliases get a single dash, everything else two.
///
/// # Examples
///
/// ```
/// use pandoc_schema_core::flag_token;
///
/// assert_eq!(flag_token("t"), "-t");
/// assert_eq!(flag_token("to"), "--to");
/// ```
pub fn flag_token(alias: &str) -> String {
    if alias.chars().count() == 1 {
        format!("-{alias}")
    } else {
        format!("--{alias}")
    }
}
