//! Node schemas: for one category, an ordered mapping from kind name to
//! that kind's fields.
//!
//! Field descriptors are opaque `<type> <name>` pairs. The type-token is
//! carried through to the output verbatim and never interpreted, so
//! `List<Expr>` is as valid as `Token`. Field lists are split on every
//! comma, which rules out type-tokens like `Map<K,V>`.

use indexmap::{IndexMap, IndexSet, map::Entry};

use crate::{error::SchemaError, span::Spanned};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub ty: String,
    pub name: String,
}

impl Field {
    /// Split a descriptor into its type-token and name-token.
    ///
    /// On failure, returns the number of whitespace-separated tokens found.
    pub fn parse(descriptor: &str) -> Result<Field, usize> {
        let mut tokens = descriptor.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(ty), Some(name), None) => Ok(Field {
                ty: ty.to_owned(),
                name: name.to_owned(),
            }),
            _ => Err(descriptor.split_whitespace().count()),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// A single node variant, borrowed from its [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKind<'a> {
    pub name: &'a str,
    pub fields: &'a [Field],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    category: String,
    kinds: IndexMap<String, Vec<Field>>,
}

/// One `Kind: fields` entry before validation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KindSource<'a> {
    pub name: Spanned<&'a str>,
    pub fields: Spanned<&'a str>,
}

impl Schema {
    /// Validate and build the schema of `category`.
    ///
    /// Each entry maps a kind name to its comma-separated field list, e.g.
    /// `("Binary", "Expr left, Token operator, Expr right")`. Entry order is
    /// emission order.
    pub fn register<K, F>(
        category: &str,
        kinds: impl IntoIterator<Item = (K, F)>,
    ) -> Result<Schema, SchemaError>
    where
        K: AsRef<str>,
        F: AsRef<str>,
    {
        let kinds: Vec<(K, F)> = kinds.into_iter().collect();
        let sources = kinds.iter().map(|(name, fields)| KindSource {
            name: Spanned::empty(name.as_ref()),
            fields: Spanned::empty(fields.as_ref()),
        });
        Schema::build(Spanned::empty(category), sources).map_err(Spanned::into_inner)
    }

    pub(crate) fn build<'a>(
        category: Spanned<&'a str>,
        kinds: impl IntoIterator<Item = KindSource<'a>>,
    ) -> Result<Schema, Spanned<SchemaError>> {
        if !is_identifier(&category) {
            return Err(category.map(|category| SchemaError::InvalidCategory {
                category: category.to_owned(),
            }));
        }

        let mut schema = Schema {
            category: category.to_string(),
            kinds: IndexMap::new(),
        };

        for kind in kinds {
            let fields = schema.parse_fields(kind)?;
            match schema.kinds.entry(kind.name.to_string()) {
                Entry::Occupied(_) => {
                    return Err(kind.name.map(|name| SchemaError::DuplicateKind {
                        category: schema.category.clone(),
                        kind: name.to_owned(),
                    }));
                }
                Entry::Vacant(entry) => {
                    entry.insert(fields);
                }
            }
        }

        Ok(schema)
    }

    fn parse_fields(&self, kind: KindSource<'_>) -> Result<Vec<Field>, Spanned<SchemaError>> {
        let list = kind.fields;
        let text: &str = *list;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut names = IndexSet::new();
        let mut fields = Vec::new();
        for descriptor in text.split(',') {
            let descriptor = list.slice(descriptor).trim();
            let field = Field::parse(&descriptor).map_err(|tokens| {
                descriptor.map(|descriptor| SchemaError::MalformedField {
                    category: self.category.clone(),
                    kind: kind.name.to_string(),
                    descriptor: descriptor.to_owned(),
                    tokens,
                })
            })?;

            if !names.insert(field.name.clone()) {
                return Err(descriptor.map(|_| SchemaError::DuplicateField {
                    category: self.category.clone(),
                    kind: kind.name.to_string(),
                    field: field.name,
                }));
            }
            fields.push(field);
        }

        Ok(fields)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Kinds in registration order.
    pub fn kinds(&self) -> impl ExactSizeIterator<Item = NodeKind<'_>> + '_ {
        self.kinds.iter().map(|(name, fields)| NodeKind {
            name,
            fields,
        })
    }

    pub fn kind(&self, name: &str) -> Option<NodeKind<'_>> {
        self.kinds
            .get_key_value(name)
            .map(|(name, fields)| NodeKind { name, fields })
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Every schema registered during one run, in registration order.
///
/// A category name may be registered once per run, even if the first
/// attempt failed validation.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    seen: IndexSet<String>,
    schemas: IndexMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<K, F>(
        &mut self,
        category: &str,
        kinds: impl IntoIterator<Item = (K, F)>,
    ) -> Result<&Schema, SchemaError>
    where
        K: AsRef<str>,
        F: AsRef<str>,
    {
        self.claim(Spanned::empty(category))
            .map_err(Spanned::into_inner)?;
        let schema = Schema::register(category, kinds)?;
        Ok(self.insert(schema))
    }

    pub(crate) fn claim(&mut self, category: Spanned<&str>) -> Result<(), Spanned<SchemaError>> {
        if self.seen.insert(category.to_string()) {
            Ok(())
        } else {
            Err(category.map(|category| SchemaError::DuplicateCategory {
                category: category.to_owned(),
            }))
        }
    }

    pub(crate) fn insert(&mut self, schema: Schema) -> &Schema {
        tracing::debug!(
            category = schema.category(),
            kinds = schema.len(),
            "registered schema"
        );
        let (index, _) = self
            .schemas
            .insert_full(schema.category.clone(), schema);
        &self.schemas[index]
    }

    pub fn get(&self, category: &str) -> Option<&Schema> {
        self.schemas.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> + '_ {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Java-style identifier: a letter, `_` or `$`, followed by letters, digits,
/// `_` or `$`. Reserved words are not identifiers.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !is_keyword(s)
}

/// Java keywords and literals, none of which may name a type or variable.
pub fn is_keyword(s: &str) -> bool {
    matches!(
        s,
        "_" | "abstract"
            | "assert"
            | "boolean"
            | "break"
            | "byte"
            | "case"
            | "catch"
            | "char"
            | "class"
            | "const"
            | "continue"
            | "default"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "extends"
            | "false"
            | "final"
            | "finally"
            | "float"
            | "for"
            | "goto"
            | "if"
            | "implements"
            | "import"
            | "instanceof"
            | "int"
            | "interface"
            | "long"
            | "native"
            | "new"
            | "null"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "return"
            | "short"
            | "static"
            | "strictfp"
            | "super"
            | "switch"
            | "synchronized"
            | "this"
            | "throw"
            | "throws"
            | "transient"
            | "true"
            | "try"
            | "void"
            | "volatile"
            | "while"
    )
}
