//! Value shapes and type expressions.
//!
//! A [`Shape`] describes what an operation parameter or return slot accepts.
//! A [`TypeExpr`] describes the declared type of a field, including generic
//! arguments, so structure checks can match on e.g. `HashMap<Sports, Level>`.

use crate::error::ConfigError;
use std::fmt;

/// Primitive value kinds. Primitive slots never receive the absence marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// Returns all primitive kinds.
    pub fn all() -> &'static [PrimitiveKind] {
        &[
            PrimitiveKind::Bool,
            PrimitiveKind::Char,
            PrimitiveKind::I8,
            PrimitiveKind::I16,
            PrimitiveKind::I32,
            PrimitiveKind::I64,
            PrimitiveKind::F32,
            PrimitiveKind::F64,
        ]
    }

    /// Returns the Rust spelling of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
        }
    }

    /// Parses the Rust spelling of a primitive kind.
    pub fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == name)
    }
}

/// The shape of a parameter or return slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shape {
    /// No value (return slots only).
    Void,
    /// A primitive value.
    Primitive(PrimitiveKind),
    /// A reference-shaped value of the named type. May be absent.
    Reference(String),
}

impl Shape {
    pub fn reference(type_name: impl Into<String>) -> Self {
        Shape::Reference(type_name.into())
    }

    pub fn string() -> Self {
        Shape::Reference("String".to_string())
    }

    pub fn bool() -> Self {
        Shape::Primitive(PrimitiveKind::Bool)
    }

    pub fn i32() -> Self {
        Shape::Primitive(PrimitiveKind::I32)
    }

    pub fn i64() -> Self {
        Shape::Primitive(PrimitiveKind::I64)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Shape::Primitive(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Shape::Void)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Void => write!(f, "()"),
            Shape::Primitive(kind) => write!(f, "{}", kind.as_str()),
            Shape::Reference(name) => write!(f, "{}", name),
        }
    }
}

/// A declared type with its generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
}

impl TypeExpr {
    /// A non-generic type.
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A generic type with the given arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Parses expressions like `HashMap<Sports, Level>` or `Vec<Option<Member>>`.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut parser = TypeExprParser {
            input,
            chars: input.char_indices().peekable(),
        };
        let expr = parser.parse_expr()?;
        parser.skip_ws();
        if let Some((_, c)) = parser.chars.next() {
            return Err(parser.error(format!("unexpected trailing '{}'", c)));
        }
        Ok(expr)
    }

    /// Returns true if this is the named type, ignoring generic arguments.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Returns the n-th generic argument, if any.
    pub fn arg(&self, index: usize) -> Option<&TypeExpr> {
        self.args.get(index)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

struct TypeExprParser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl TypeExprParser<'_> {
    fn error(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidTypeExpr {
            input: self.input.to_string(),
            reason: reason.into(),
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn parse_expr(&mut self) -> Result<TypeExpr, ConfigError> {
        self.skip_ws();
        let mut name = String::new();
        while let Some((_, c)) = self
            .chars
            .next_if(|(_, c)| c.is_alphanumeric() || *c == '_' || *c == ':')
        {
            name.push(c);
        }
        if name.is_empty() {
            return Err(self.error("expected a type name"));
        }

        self.skip_ws();
        let mut args = Vec::new();
        if self.chars.next_if(|(_, c)| *c == '<').is_some() {
            loop {
                args.push(self.parse_expr()?);
                self.skip_ws();
                match self.chars.next() {
                    Some((_, ',')) => continue,
                    Some((_, '>')) => break,
                    Some((_, c)) => return Err(self.error(format!("unexpected '{}'", c))),
                    None => return Err(self.error("unclosed '<'")),
                }
            }
        }
        Ok(TypeExpr { name, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let expr = TypeExpr::parse("String").unwrap();
        assert_eq!(expr, TypeExpr::simple("String"));
    }

    #[test]
    fn test_parse_generic_with_whitespace() {
        let expr = TypeExpr::parse(" HashMap < Sports ,Level > ").unwrap();
        assert!(expr.is("HashMap"));
        assert_eq!(expr.arg(0), Some(&TypeExpr::simple("Sports")));
        assert_eq!(expr.arg(1), Some(&TypeExpr::simple("Level")));
        assert_eq!(expr.to_string(), "HashMap<Sports, Level>");
    }

    #[test]
    fn test_parse_nested() {
        let expr = TypeExpr::parse("Vec<Option<Member>>").unwrap();
        assert_eq!(expr.to_string(), "Vec<Option<Member>>");
        assert_eq!(expr.arg(0).unwrap().arg(0).unwrap().name, "Member");
    }

    #[test]
    fn test_parse_path_names() {
        let expr = TypeExpr::parse("std::collections::BTreeSet<u32>").unwrap();
        assert_eq!(expr.name, "std::collections::BTreeSet");
    }

    #[test]
    fn test_parse_errors() {
        assert!(TypeExpr::parse("").is_err());
        assert!(TypeExpr::parse("Vec<u8").is_err());
        assert!(TypeExpr::parse("Vec<u8>>").is_err());
        assert!(TypeExpr::parse("Map<,>").is_err());
    }

    #[test]
    fn test_shape_display_and_kinds() {
        assert_eq!(Shape::Void.to_string(), "()");
        assert_eq!(Shape::i32().to_string(), "i32");
        assert_eq!(Shape::string().to_string(), "String");
        assert!(Shape::bool().is_primitive());
        assert!(!Shape::string().is_primitive());
        assert_eq!(PrimitiveKind::parse("f64"), Some(PrimitiveKind::F64));
        assert_eq!(PrimitiveKind::parse("usize"), None);
    }
}
