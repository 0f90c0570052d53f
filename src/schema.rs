//! Parser for record and method declarations.
//!
//! ```text
//! // comment
//! record User {
//!     id: int
//!     last_name: Optional[str]
//! }
//! method getMe() -> User
//! ```
//!
//! Parsing only checks syntax. Name resolution happens when the declarations
//! are loaded into a [`Registry`](crate::registry::Registry).

use crate::codec::rename::{INTERNAL_FROM, WIRE_FROM};
use crate::descriptor::{parse_type, ParseError, Parser, Token};
use crate::registry::{FieldDef, MethodDef, RecordDef};

#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub records: Vec<RecordDef>,
    pub methods: Vec<MethodDef>,
}

pub fn parse_schema(src: &str) -> Result<Schema, ParseError> {
    let mut parser = Parser::new(src)?;
    let mut schema = Schema::default();

    while !parser.is_eof() {
        if parser.accept_ident("record") {
            schema.records.push(parse_record(&mut parser)?);
        } else if parser.accept_ident("method") {
            schema.methods.push(parse_method(&mut parser)?);
        } else {
            return Err(parser.error_here());
        }
    }

    Ok(schema)
}

fn parse_record(parser: &mut Parser) -> Result<RecordDef, ParseError> {
    let name = parser.expect_ident()?;
    if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Err(ParseError::Invalid(format!(
            "record name `{name}` must start with an uppercase letter"
        )));
    }
    parser.expect_symbol('{')?;

    let mut fields = Vec::new();
    while !parser.accept_symbol('}') {
        let field = parse_field(parser)?;
        if field.name == WIRE_FROM {
            return Err(ParseError::Invalid(format!(
                "{name}: declare `{WIRE_FROM}` as `{INTERNAL_FROM}`"
            )));
        }
        fields.push(field);
        parser.accept_symbol(',');
    }

    Ok(RecordDef::new(name, fields))
}

fn parse_method(parser: &mut Parser) -> Result<MethodDef, ParseError> {
    let name = parser.expect_ident()?;
    parser.expect_symbol('(')?;

    let mut params = Vec::new();
    while !parser.accept_symbol(')') {
        params.push(parse_field(parser)?);
        if matches!(parser.peek(), Token::Symbol(')')) {
            continue;
        }
        parser.expect_symbol(',')?;
    }

    parser.expect_symbol('-')?;
    parser.expect_symbol('>')?;
    let returns = parse_type(parser)?;

    Ok(MethodDef::new(name, params, returns))
}

fn parse_field(parser: &mut Parser) -> Result<FieldDef, ParseError> {
    let name = parser.expect_ident()?;
    parser.expect_symbol(':')?;
    let ty = parse_type(parser)?;
    Ok(FieldDef::new(name, ty))
}
