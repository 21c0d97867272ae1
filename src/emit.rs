//! Renders a [`Schema`] as a Java source file.
//!
//! For category `C` with kinds `K1..Kn` the output contains:
//! - `abstract class C`, the base type,
//! - `interface Visitor<R>` nested in `C`, with one `R visit<K><C>(K c)` per kind,
//! - `abstract <R> R accept(Visitor<R> visitor)` on `C`,
//! - one `static class K extends C` per kind, holding a constructor over all
//!   fields, an `accept` override calling `visitor.visit<K><C>(this)`, and one
//!   `final` declaration per field.
//!
//! Kinds, fields and visitor methods keep schema order. The output depends
//! only on the schema and the options, so regenerating an unchanged schema is
//! byte-for-byte stable.

use std::fmt::{self, Write};

use heck::AsLowerCamelCase;

use crate::schema::{NodeKind, Schema, is_keyword};


macro_rules! ln {
    ($f:ident, $($tt:tt)*) => (writeln!($f, $($tt)*)?);
    ($f:ident) => (writeln!($f)?);
}

/// Extension of generated files, without the dot.
pub const EXTENSION: &str = "java";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// `package` declaration placed at the top of each file.
    pub package: Option<String>,
    /// Fully-qualified names to `import`, in order.
    pub imports: Vec<String>,
    /// One level of indentation.
    pub indent: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            package: None,
            imports: vec!["java.util.List".to_owned()],
            indent: "    ".to_owned(),
        }
    }
}

/// Parameter name of the visitor methods of `category`.
///
/// The category in lowerCamelCase, or `node` when that is empty (`$`, `__`)
/// or reserved (`Class`, `If`).
pub fn visitor_param_name(category: &str) -> String {
    let name = AsLowerCamelCase(category).to_string();
    if name.is_empty() || is_keyword(&name) {
        "node".to_owned()
    } else {
        name
    }
}

/// Name of the visitor method dispatched to by `kind` in `category`.
pub fn visit_method_name(kind: &str, category: &str) -> String {
    format!("visit{kind}{category}")
}

pub fn emit(schema: &Schema, options: &EmitOptions) -> String {
    let mut out = String::new();
    // formatting into a `String` does not fail
    let _ = emit_to(&mut out, schema, options);
    out
}

pub fn emit_to(out: &mut impl Write, schema: &Schema, options: &EmitOptions) -> fmt::Result {
    let category = schema.category();
    let i1 = Indent(&options.indent, 1);

    emit_prelude(out, category, options)?;
    ln!(out, "abstract class {category} {{");
    emit_visitor(out, schema, options)?;
    ln!(out);
    ln!(out, "{i1}abstract <R> R accept(Visitor<R> visitor);");
    for kind in schema.kinds() {
        ln!(out);
        emit_kind(out, category, kind, options)?;
    }
    ln!(out, "}}");

    Ok(())
}

fn emit_prelude(out: &mut impl Write, category: &str, options: &EmitOptions) -> fmt::Result {
    ln!(
        out,
        "// Generated by generate-ast from the `{category}` schema. Do not edit."
    );
    if let Some(package) = &options.package {
        ln!(out);
        ln!(out, "package {package};");
    }
    if !options.imports.is_empty() {
        ln!(out);
        for import in &options.imports {
            ln!(out, "import {import};");
        }
    }
    ln!(out);

    Ok(())
}

fn emit_visitor(out: &mut impl Write, schema: &Schema, options: &EmitOptions) -> fmt::Result {
    let category = schema.category();
    let param = visitor_param_name(category);
    let i1 = Indent(&options.indent, 1);
    let i2 = Indent(&options.indent, 2);

    ln!(out, "{i1}interface Visitor<R> {{");
    for kind in schema.kinds() {
        let name = kind.name;
        let method = visit_method_name(name, category);
        ln!(out, "{i2}R {method}({name} {param});");
    }
    ln!(out, "{i1}}}");

    Ok(())
}

fn emit_kind(
    out: &mut impl Write,
    category: &str,
    kind: NodeKind<'_>,
    options: &EmitOptions,
) -> fmt::Result {
    let NodeKind { name, fields } = kind;
    let i1 = Indent(&options.indent, 1);
    let i2 = Indent(&options.indent, 2);
    let i3 = Indent(&options.indent, 3);

    ln!(out, "{i1}static class {name} extends {category} {{");

    ln!(out, "{i2}{name}({}) {{", fields.iter().join(", "));
    for field in fields {
        ln!(out, "{i3}this.{0} = {0};", field.name);
    }
    ln!(out, "{i2}}}");
    ln!(out);

    let method = visit_method_name(name, category);
    ln!(out, "{i2}@Override");
    ln!(out, "{i2}<R> R accept(Visitor<R> visitor) {{");
    ln!(out, "{i3}return visitor.{method}(this);");
    ln!(out, "{i2}}}");

    if !fields.is_empty() {
        ln!(out);
        for field in fields {
            ln!(out, "{i2}final {} {};", field.ty, field.name);
        }
    }

    ln!(out, "{i1}}}");

    Ok(())
}

struct Indent<'a>(&'a str, usize);

impl fmt::Display for Indent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.1 {
            f.write_str(self.0)?;
        }
        Ok(())
    }
}

struct Join<Iter, Sep>
where
    Iter: Iterator,
{
    iter: Iter,
    sep: Sep,
}

impl<Iter, Sep> fmt::Display for Join<Iter, Sep>
where
    Iter: Iterator + Clone,
    <Iter as Iterator>::Item: fmt::Display,
    Sep: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.iter.clone().peekable();
        while let Some(item) = iter.next() {
            write!(f, "{item}")?;
            if iter.peek().is_some() {
                write!(f, "{}", self.sep)?;
            }
        }
        Ok(())
    }
}

trait JoinIter: Sized + Iterator {
    fn join<Sep>(self, sep: Sep) -> Join<Self, Sep>;
}

impl<Iter> JoinIter for Iter
where
    Iter: Sized + Iterator + Clone,
{
    fn join<Sep>(self, sep: Sep) -> Join<Self, Sep> {
        Join { iter: self, sep }
    }
}
