//! Error types for schema validation and output.

use std::{fmt, io, path::Path, path::PathBuf};

use thiserror::Error;

use crate::span::Spanned;

/// Why a single category produced no output.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// A schema that cannot be turned into source code.
///
/// Raised before any emission work starts for the offending category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{message}")]
    Syntax { message: String },

    #[error("invalid category name {category:?}, expected an identifier")]
    InvalidCategory { category: String },

    #[error("duplicate category `{category}`")]
    DuplicateCategory { category: String },

    #[error("category `{category}`: expected `Kind: fields`, found {line:?}")]
    MissingColon { category: String, line: String },

    #[error("category `{category}`: invalid kind name {kind:?}, expected an identifier")]
    InvalidKind { category: String, kind: String },

    #[error("category `{category}`: duplicate kind `{kind}`")]
    DuplicateKind { category: String, kind: String },

    #[error("category `{category}`, kind `{kind}`: duplicate field `{field}`")]
    DuplicateField {
        category: String,
        kind: String,
        field: String,
    },

    #[error(
        "category `{category}`, kind `{kind}`: field descriptor {descriptor:?} \
         must be `<type> <name>`, found {tokens} token(s)"
    )]
    MalformedField {
        category: String,
        kind: String,
        descriptor: String,
        tokens: usize,
    },
}

impl SchemaError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// The category this error belongs to, if it is scoped to one.
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Syntax { .. } => None,
            Self::InvalidCategory { category }
            | Self::DuplicateCategory { category }
            | Self::MissingColon { category, .. }
            | Self::InvalidKind { category, .. }
            | Self::DuplicateKind { category, .. }
            | Self::DuplicateField { category, .. }
            | Self::MalformedField { category, .. } => Some(category),
        }
    }
}

/// Failure to open or commit an output sink.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create output directory `{}`: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to open output for `{}`: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to write `{}`: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to commit `{}`: {source}", .path.display())]
    Persist { path: PathBuf, source: io::Error },

    #[error("failed to read `{}`: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config `{}`: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl<E: fmt::Display> Spanned<E> {
    /// Render the error together with the source line it points at.
    ///
    /// `origin` names the schema file in the `-->` line. Errors without a span
    /// render as a single line.
    pub fn render<'a>(&'a self, src: &'a str, origin: Option<&'a Path>) -> Rendered<'a, E> {
        Rendered {
            error: self,
            src,
            origin,
        }
    }
}

pub struct Rendered<'a, E> {
    error: &'a Spanned<E>,
    src: &'a str,
    origin: Option<&'a Path>,
}

impl<E: fmt::Display> fmt::Display for Rendered<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.error.span;
        write!(f, "error: {}", self.error)?;
        if span.is_empty() || span.end() > self.src.len() {
            return Ok(());
        }

        let (line, column) = span.location(self.src);
        let origin = match self.origin {
            Some(path) => path.display().to_string(),
            None => "<schema>".to_owned(),
        };
        let line_start = self.src[..span.start()]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let line_end = self.src[span.start()..]
            .find('\n')
            .map(|i| span.start() + i)
            .unwrap_or(self.src.len());
        let text = self.src[line_start..line_end].trim_end();
        let underline = self.src[span.start()..span.end().min(line_end)]
            .chars()
            .count()
            .max(1);

        let gutter = " ".repeat(line.to_string().len());
        writeln!(f)?;
        writeln!(f, "{gutter}--> {origin}:{line}:{column}")?;
        writeln!(f, "{gutter} |")?;
        writeln!(f, "{line} | {text}")?;
        write!(
            f,
            "{gutter} | {}{}",
            " ".repeat(column - 1),
            "^".repeat(underline)
        )
    }
}
