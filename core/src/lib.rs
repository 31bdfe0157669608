//! Core types for modeling an installed pandoc's capabilities.
//!
//! This crate defines plain data shared by discovery and its consumers:
//!
//! - [`OptionDescriptor`]: one command-line option recognized in the help
//!   listing (aliases plus [`Arity`]).
//! - [`CapabilitySnapshot`]: version, options, extensions, input and output
//!   formats from a single refresh.
//! - [`ArgumentSchema`]: flag tokens mapped to [`FlagSpec`]s, ready for a
//!   generic argument parser.
//!
//! Validation ([`validate_options`], [`validate_argument_schema`]) catches
//! structural problems such as duplicate aliases and malformed flag tokens.
//!
//! # Example
//!
//! ```
//! use pandoc_schema_core::*;
//!
//! let to = OptionDescriptor::required_value(["t", "to"]).unwrap();
//! assert_eq!(to.arity(), Arity::RequiredValue);
//! assert_eq!(flag_token("t"), "-t");
//!
//! let schema = ArgumentSchema::new();
//! assert_eq!(schema.positionals[0].name, OUTPUT_FORMAT_SLOT);
//! assert!(validate_argument_schema(&schema).is_empty());
//! ```

mod types;
mod validate;

pub use types::*;
pub use validate::{ValidationError, validate_argument_schema, validate_options};
