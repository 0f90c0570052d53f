//! Recursive-descent parser for type annotations.
//!
//! ```text
//! type := "int" | "float" | "bool" | "str"
//!       | "Optional" "[" type "]"
//!       | "List" "[" type "]"
//!       | "Union" "[" type ("," type)+ ","? "]"
//!       | RecordName
//! ```

use super::lexer::{ParseError, Parser};
use super::{Primitive, TypeDesc};

pub(crate) fn parse_type(parser: &mut Parser) -> Result<TypeDesc, ParseError> {
    let ident = parser.expect_ident()?;
    match ident.as_str() {
        "int" => Ok(TypeDesc::Primitive(Primitive::Int)),
        "float" => Ok(TypeDesc::Primitive(Primitive::Float)),
        "bool" => Ok(TypeDesc::Primitive(Primitive::Bool)),
        "str" => Ok(TypeDesc::Primitive(Primitive::Str)),
        "Optional" => {
            let inner = parse_single_param(parser)?;
            if inner.is_optional() {
                return Err(ParseError::Invalid(
                    "Optional cannot wrap another Optional".to_string(),
                ));
            }
            Ok(TypeDesc::optional(inner))
        }
        "List" => parse_single_param(parser).map(TypeDesc::list),
        "Union" => parse_union(parser),
        _ if ident.starts_with(|c: char| c.is_ascii_uppercase()) => Ok(TypeDesc::Record(ident)),
        _ => Err(ParseError::Invalid(format!("unknown primitive `{ident}`"))),
    }
}

fn parse_single_param(parser: &mut Parser) -> Result<TypeDesc, ParseError> {
    parser.expect_symbol('[')?;
    let inner = parse_type(parser)?;
    parser.expect_symbol(']')?;
    Ok(inner)
}

fn parse_union(parser: &mut Parser) -> Result<TypeDesc, ParseError> {
    parser.expect_symbol('[')?;
    let mut branches = Vec::new();
    loop {
        branches.push(parse_type(parser)?);
        if parser.accept_symbol(']') {
            break;
        }
        parser.expect_symbol(',')?;
        if parser.accept_symbol(']') {
            break;
        }
    }

    if branches.len() < 2 {
        return Err(ParseError::Invalid(
            "Union needs at least two branches".to_string(),
        ));
    }
    Ok(TypeDesc::Union(branches))
}
