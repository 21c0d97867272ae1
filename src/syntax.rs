//! The schema text format.
//!
//! ```text
//! # comments run to the end of the line
//! [Expr]
//! Binary:  Expr left, Token operator, Expr right
//! Literal: Object value
//!
//! [Stmt]
//! Block:   List<Stmt> statements
//! ```
//!
//! A `[Name]` header opens a category, every following `Kind: fields` line
//! belongs to it. Parsing a document only groups lines under their headers;
//! headers and kind lines are checked when their category is registered, so
//! an error in one category leaves the others intact. Only kind lines before
//! the first header fail the whole document.

use crate::{
    error::SchemaError,
    schema::{KindSource, Schema, SchemaRegistry, is_identifier},
    span::Spanned,
};

#[cfg(test)]
mod tests;

#[derive(Debug)]
pub struct Document<'src> {
    pub categories: Vec<CategoryBlock<'src>>,
}

#[derive(Debug)]
pub struct CategoryBlock<'src> {
    pub name: Spanned<&'src str>,
    pub lines: Vec<Spanned<&'src str>>,
    /// Set when the header itself is malformed.
    pub error: Option<Spanned<SchemaError>>,
}

pub fn parse_document(src: &str) -> Result<Document<'_>, Spanned<SchemaError>> {
    let whole = Spanned::new(src, 0..src.len());
    let mut categories: Vec<CategoryBlock<'_>> = Vec::new();

    for line in src.split('\n') {
        let line = strip_comment(whole.slice(line)).trim();
        let text: &str = *line;
        if text.is_empty() {
            continue;
        }

        if let Some(header) = text.strip_prefix('[') {
            // an unterminated header still opens a block, so its lines fail with it
            let (name, error) = match header.strip_suffix(']') {
                Some(name) => (name, None),
                None => (
                    header,
                    Some(line.map(|_| {
                        SchemaError::syntax("unterminated category header, expected `]`")
                    })),
                ),
            };
            categories.push(CategoryBlock {
                name: line.slice(name).trim(),
                lines: Vec::new(),
                error,
            });
            continue;
        }

        let Some(category) = categories.last_mut() else {
            return Err(line.map(|_| {
                SchemaError::syntax("expected a `[Category]` header before the first kind")
            }));
        };
        category.lines.push(line);
    }

    Ok(Document { categories })
}

fn strip_comment(line: Spanned<&str>) -> Spanned<&str> {
    let text: &str = *line;
    match text.find('#') {
        Some(i) => line.slice(&text[..i]),
        None => line,
    }
}

impl<'src> CategoryBlock<'src> {
    /// Split each line into a kind name and its field list.
    fn kinds(&self) -> Result<Vec<KindSource<'src>>, Spanned<SchemaError>> {
        let category = *self.name;
        let mut kinds = Vec::with_capacity(self.lines.len());

        for &line in &self.lines {
            let text: &'src str = *line;
            let Some((name, fields)) = text.split_once(':') else {
                return Err(line.map(|line| SchemaError::MissingColon {
                    category: category.to_owned(),
                    line: line.to_owned(),
                }));
            };

            let name = line.slice(name).trim();
            if !is_identifier(&name) {
                return Err(name.map(|kind| SchemaError::InvalidKind {
                    category: category.to_owned(),
                    kind: kind.to_owned(),
                }));
            }

            kinds.push(KindSource {
                name,
                fields: line.slice(fields),
            });
        }

        Ok(kinds)
    }

    /// Validate this block and add it to `registry`.
    pub fn register<'r>(
        &self,
        registry: &'r mut SchemaRegistry,
    ) -> Result<&'r Schema, Spanned<SchemaError>> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        registry.claim(self.name)?;
        let schema = Schema::build(self.name, self.kinds()?)?;
        Ok(registry.insert(schema))
    }
}
