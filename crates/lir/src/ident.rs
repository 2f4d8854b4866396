//! Local identifiers of named values.

use std::fmt;

use derive_more::{Display, Error};

/// Identifier of a local value: an optional user-assigned name plus the
/// numeric ID handed out by [`IrContext::assign_ids`](crate::IrContext::assign_ids).
///
/// A value without a name is "unnamed" and is rendered by its ID (`%3`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: Option<String>,
    pub id: Option<u32>,
}

impl Ident {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            id: None,
        }
    }

    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn is_unnamed(&self) -> bool {
        self.name.is_none()
    }

    /// Set or clear the name. Any assigned ID is dropped.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
        self.id = None;
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, self.id) {
            (Some(name), _) => write!(f, "{}", QuotedName(name)),
            (None, Some(id)) => write!(f, "{id}"),
            (None, None) => f.write_str("?"),
        }
    }
}

/// Renders a name bare when it is a valid identifier, quoted otherwise.
pub struct QuotedName<'a>(pub &'a str);

impl fmt::Display for QuotedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.0;
        let plain = !name.is_empty()
            && !name.starts_with(|c: char| c.is_ascii_digit())
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | '-'));
        if plain {
            f.write_str(name)
        } else {
            write!(f, "\"{}\"", crate::printer::escape(name.as_bytes()))
        }
    }
}

/// Errors reported by the numbering pass.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum IdError {
    /// An unnamed value already carries an ID that breaks the sequence.
    #[display("invalid local ID in function @{func}: expected %{expected}, found %{found}")]
    OutOfOrder {
        func: String,
        expected: u32,
        found: u32,
    },
}
