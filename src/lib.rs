//! Generates visitor-pattern AST classes from node schemas.
//!
//! Each category in a schema goes through the same pipeline on its own:
//! validation into a [`Schema`], rendering with [`emit`], and an atomic
//! commit through a [`Writer`]. A category that fails at any step produces no
//! output and does not stop the categories after it.

pub mod config;
pub mod emit;
pub mod error;
pub mod schema;
pub mod span;
pub mod syntax;
pub mod writer;

use std::{
    io::{self, Write as _},
    path::{Path, PathBuf},
};

pub use crate::{
    config::Config,
    emit::{EmitOptions, emit},
    error::{ConfigError, Error, SchemaError, WriteError},
    schema::{Field, NodeKind, Schema, SchemaRegistry},
    writer::Writer,
};

use crate::{span::Spanned, syntax::parse_document};

/// The Lox `Expr` and `Stmt` categories, used when no schema file is given.
pub const BUILTIN_SCHEMA: &str = include_str!("../schema/lox.ast");

#[derive(Debug, Clone)]
pub struct SchemaSource {
    /// File the text was read from, `None` for the built-in schema.
    pub origin: Option<PathBuf>,
    pub text: String,
}

impl SchemaSource {
    pub fn builtin() -> Self {
        Self {
            origin: None,
            text: BUILTIN_SCHEMA.to_owned(),
        }
    }

    pub fn read(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)?;
        Ok(Self {
            origin: Some(path),
            text,
        })
    }

    pub fn from_text(origin: Option<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
        }
    }

    fn name(&self) -> String {
        match &self.origin {
            Some(path) => path.display().to_string(),
            None => "<builtin>".to_owned(),
        }
    }
}

/// Where generated text goes.
#[derive(Debug, Clone)]
pub enum Output {
    /// Commit one file per category.
    Dir(Writer),
    /// Compare against the committed files without touching them.
    Check(Writer),
    Stdout,
}

#[derive(Debug)]
pub enum Status {
    Written(PathBuf),
    Printed,
    UpToDate(PathBuf),
    Stale(PathBuf),
    Failed(Failure),
}

#[derive(Debug)]
pub struct Failure {
    pub error: Error,
    /// Human-readable rendering, with a source excerpt where available.
    pub diagnostic: String,
}

impl Failure {
    fn schema(error: Spanned<SchemaError>, source: &SchemaSource) -> Self {
        let diagnostic = error
            .render(&source.text, source.origin.as_deref())
            .to_string();
        Self {
            error: error.into_inner().into(),
            diagnostic,
        }
    }

    fn write(error: WriteError) -> Self {
        Self {
            diagnostic: format!("error: {error}"),
            error: error.into(),
        }
    }
}

#[derive(Debug)]
pub struct Outcome {
    /// `None` when the schema file could not be split into categories.
    pub category: Option<String>,
    pub origin: Option<PathBuf>,
    pub status: Status,
}

#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| !matches!(o.status, Status::Failed(_) | Status::Stale(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Outcome, &Failure)> + '_ {
        self.outcomes.iter().filter_map(|o| match &o.status {
            Status::Failed(failure) => Some((o, failure)),
            _ => None,
        })
    }

    pub fn stale(&self) -> impl Iterator<Item = &Path> + '_ {
        self.outcomes.iter().filter_map(|o| match &o.status {
            Status::Stale(path) => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn outcome(&self, category: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|o| o.category.as_deref() == Some(category))
    }
}

/// Generate every category of every source, in order.
pub fn generate(sources: &[SchemaSource], options: &EmitOptions, output: &Output) -> Report {
    let mut registry = SchemaRegistry::new();
    let mut report = Report::default();

    for source in sources {
        let document = match parse_document(&source.text) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(source = %source.name(), "failed to parse schema: {err}");
                report.outcomes.push(Outcome {
                    category: None,
                    origin: source.origin.clone(),
                    status: Status::Failed(Failure::schema(err, source)),
                });
                continue;
            }
        };

        for block in &document.categories {
            let status = match block.register(&mut registry) {
                Ok(schema) => generate_category(schema, options, output),
                Err(err) => Status::Failed(Failure::schema(err, source)),
            };
            if let Status::Failed(failure) = &status {
                tracing::warn!(category = *block.name, "{}", failure.error);
            }
            report.outcomes.push(Outcome {
                category: Some(block.name.to_string()),
                origin: source.origin.clone(),
                status,
            });
        }
    }

    report
}

fn generate_category(schema: &Schema, options: &EmitOptions, output: &Output) -> Status {
    let category = schema.category();
    let text = emit(schema, options);

    match output {
        Output::Dir(writer) => match writer.commit(category, &text) {
            Ok(path) => {
                tracing::info!(category, path = %path.display(), "generated");
                Status::Written(path)
            }
            Err(err) => Status::Failed(Failure::write(err)),
        },
        Output::Check(writer) => match writer.is_up_to_date(category, &text) {
            Ok(true) => Status::UpToDate(writer.path_for(category)),
            Ok(false) => {
                tracing::info!(category, "out of date");
                Status::Stale(writer.path_for(category))
            }
            Err(err) => Status::Failed(Failure::write(err)),
        },
        Output::Stdout => {
            let mut stdout = io::stdout().lock();
            match stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
            {
                Ok(()) => Status::Printed,
                Err(source) => Status::Failed(Failure::write(WriteError::Write {
                    path: PathBuf::from("-"),
                    source,
                })),
            }
        }
    }
}
