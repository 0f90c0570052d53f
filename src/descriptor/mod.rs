//! Type descriptors for Bot API annotations.
//!
//! A descriptor is the classified form of an annotation such as
//! `Optional[List[MessageEntity]]`. Descriptors are parsed once, when the
//! registry is built, and never re-parsed during decoding.
//!
//! ```
//! use botwire::descriptor::{Shape, TypeDesc};
//!
//! let desc: TypeDesc = "Optional[List[List[PhotoSize]]]".parse().unwrap();
//! assert_eq!(desc.shape(), Shape::Optional);
//!
//! let inner = desc.unwrap_optional().unwrap();
//! assert!(inner.is_list_of_list());
//! assert_eq!(inner.element_type().unwrap().record_name(), Some("PhotoSize"));
//! ```

mod lexer;
mod parser;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

pub use lexer::ParseError;
pub(crate) use lexer::{Parser, Token};
pub(crate) use parser::parse_type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    Bool,
    Str,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::Str => "str",
        }
    }
}

/// The fieldless classification of a [`TypeDesc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Primitive,
    Optional,
    List,
    ListOfList,
    Union,
    Record,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Primitive => "primitive",
            Shape::Optional => "optional",
            Shape::List => "list",
            Shape::ListOfList => "list-of-list",
            Shape::Union => "union",
            Shape::Record => "record",
        };
        f.write_str(name)
    }
}

/// A classified type annotation.
///
/// `Optional` never wraps another `Optional`, and `List` never holds a list
/// element: `List[List[X]]` is always `ListOfList(X)`. Use the constructors
/// to keep those invariants when building descriptors by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    Primitive(Primitive),
    Optional(Box<TypeDesc>),
    List(Box<TypeDesc>),
    ListOfList(Box<TypeDesc>),
    Union(Vec<TypeDesc>),
    Record(String),
}

impl TypeDesc {
    /// Parse and classify an annotation.
    pub fn classify(raw: &str) -> Result<TypeDesc> {
        let malformed = |err: ParseError| Error::malformed(raw, err.to_string());
        let mut parser = Parser::new(raw).map_err(malformed)?;
        if parser.is_eof() {
            return Err(Error::malformed(raw, "empty annotation"));
        }
        let ty = parse_type(&mut parser).map_err(malformed)?;
        parser.expect_eof().map_err(malformed)?;
        Ok(ty)
    }

    pub fn record(name: impl Into<String>) -> TypeDesc {
        TypeDesc::Record(name.into())
    }

    /// Wrap in `Optional`, unless already optional.
    pub fn optional(inner: TypeDesc) -> TypeDesc {
        match inner {
            TypeDesc::Optional(_) => inner,
            other => TypeDesc::Optional(Box::new(other)),
        }
    }

    /// `List[elem]`, folding a list element into `ListOfList`.
    pub fn list(elem: TypeDesc) -> TypeDesc {
        match elem {
            TypeDesc::List(inner) => TypeDesc::ListOfList(inner),
            TypeDesc::ListOfList(inner) => TypeDesc::ListOfList(Box::new(TypeDesc::list(*inner))),
            other => TypeDesc::List(Box::new(other)),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            TypeDesc::Primitive(_) => Shape::Primitive,
            TypeDesc::Optional(_) => Shape::Optional,
            TypeDesc::List(_) => Shape::List,
            TypeDesc::ListOfList(_) => Shape::ListOfList,
            TypeDesc::Union(_) => Shape::Union,
            TypeDesc::Record(_) => Shape::Record,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeDesc::Primitive(_))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeDesc::Optional(_))
    }

    pub fn unwrap_optional(&self) -> Result<&TypeDesc> {
        match self {
            TypeDesc::Optional(inner) => Ok(inner),
            other => Err(Error::NotOptional(other.to_string())),
        }
    }

    /// Strip one level of `Optional`, if present.
    pub fn strip_optional(&self) -> &TypeDesc {
        match self {
            TypeDesc::Optional(inner) => inner,
            other => other,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypeDesc::List(_))
    }

    pub fn is_list_of_list(&self) -> bool {
        matches!(self, TypeDesc::ListOfList(_))
    }

    /// Element type of a `List`, or the innermost element of a `ListOfList`.
    pub fn element_type(&self) -> Result<&TypeDesc> {
        match self {
            TypeDesc::List(elem) | TypeDesc::ListOfList(elem) => Ok(elem),
            other => Err(Error::NotList(other.to_string())),
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self, TypeDesc::Union(_))
    }

    pub fn branches(&self) -> Result<&[TypeDesc]> {
        match self {
            TypeDesc::Union(branches) => Ok(branches),
            other => Err(Error::NotUnion(other.to_string())),
        }
    }

    pub fn record_name(&self) -> Option<&str> {
        match self {
            TypeDesc::Record(name) => Some(name),
            _ => None,
        }
    }

    /// Primitive once one level of `Optional` is removed.
    pub fn is_scalar_field(&self) -> bool {
        self.strip_optional().is_primitive()
    }

    /// Every record name mentioned anywhere in the descriptor.
    pub fn referenced_records(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_records(&mut names);
        names
    }

    fn collect_records<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeDesc::Primitive(_) => {}
            TypeDesc::Optional(inner) | TypeDesc::List(inner) | TypeDesc::ListOfList(inner) => {
                inner.collect_records(out)
            }
            TypeDesc::Union(branches) => {
                for branch in branches {
                    branch.collect_records(out);
                }
            }
            TypeDesc::Record(name) => out.push(name),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Primitive(p) => f.write_str(p.name()),
            TypeDesc::Optional(inner) => write!(f, "Optional[{inner}]"),
            TypeDesc::List(elem) => write!(f, "List[{elem}]"),
            TypeDesc::ListOfList(elem) => write!(f, "List[List[{elem}]]"),
            TypeDesc::Union(branches) => {
                f.write_str("Union[")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{branch}")?;
                }
                f.write_str("]")
            }
            TypeDesc::Record(name) => f.write_str(name),
        }
    }
}

impl FromStr for TypeDesc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TypeDesc::classify(s)
    }
}

impl Serialize for TypeDesc {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Strip runtime qualification from a type string.
///
/// Removes `<class '...'>` wrappers and dotted prefixes such as `typing.` or
/// `telegrambotapiwrapper.typelib.`, so that `typing.Optional[mod.User]`
/// becomes `Optional[User]`.
pub fn sanitize(raw: &str) -> String {
    let unwrapped = raw.replace("<class '", "").replace("'>", "");
    let mut out = String::with_capacity(unwrapped.len());
    let mut word = String::new();

    for ch in unwrapped.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
            word.push(ch);
        } else {
            push_last_segment(&mut out, &mut word);
            out.push(ch);
        }
    }
    push_last_segment(&mut out, &mut word);

    out.trim().to_string()
}

fn push_last_segment(out: &mut String, word: &mut String) {
    match word.rsplit_once('.') {
        Some((_, last)) => out.push_str(last),
        None => out.push_str(word),
    }
    word.clear();
}
