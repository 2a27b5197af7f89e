//! Field-validation rules shared by the login and task-editing flows.
//!
//! Each rule is a pure predicate over a string slice that either accepts the
//! value or names the violation. Rules compose into per-field validators
//! with required-first semantics: an empty value yields [`Violation::Required`]
//! before any other rule is consulted.

pub mod limits;
mod rules;

pub use rules::{
    length_between, no_whitespace, not_only_whitespace, strict_email, validate_login_email,
    validate_task_description, validate_task_title,
};

use thiserror::Error;

/// A named validation failure for a single field value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("This field is required")]
    Required,

    #[error("Whitespace is not allowed")]
    Whitespace,

    #[error("Value cannot be only whitespace")]
    OnlyWhitespace,

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Too short: {len} characters (min: {min})")]
    TooShort { min: usize, len: usize },

    #[error("Too long: {len} characters (max: {max})")]
    TooLong { max: usize, len: usize },
}
