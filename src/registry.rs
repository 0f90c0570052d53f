//! Record and method registry.
//!
//! The registry is the static table the codec consults: record name to
//! ordered field list, and method name to parameters and return type. It is
//! built once, validated, and read-only afterwards.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::descriptor::TypeDesc;
use crate::error::{Error, Result};
use crate::schema::{parse_schema, Schema};

/// Declarations for Telegram Bot API 4.2.
pub const BOT_API_SCHEMA: &str = include_str!("../schema/bot_api.schema");

static BOT_API: OnceCell<Registry> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDesc,
    /// False for `Optional` fields, which may be absent.
    pub required: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        let required = !ty.is_optional();
        Self {
            name: name.into(),
            ty,
            required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn scalar_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.ty.is_scalar_field())
    }

    pub fn compound_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.ty.is_scalar_field())
    }

    /// Every field is primitive after one `Optional` unwrap. True for
    /// records without fields.
    pub fn is_scalar(&self) -> bool {
        self.fields.iter().all(|f| f.ty.is_scalar_field())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<FieldDef>,
    pub returns: TypeDesc,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, params: Vec<FieldDef>, returns: TypeDesc) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
        }
    }

    pub fn param(&self, name: &str) -> Option<&FieldDef> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<RecordDef>,
    record_index: HashMap<String, usize>,
    methods: Vec<MethodDef>,
    method_index: HashMap<String, usize>,
}

impl Registry {
    /// The embedded Bot API registry, parsed on first use.
    pub fn bot_api() -> Result<&'static Registry> {
        BOT_API.get_or_try_init(|| Registry::from_schema(BOT_API_SCHEMA))
    }

    pub fn from_schema(src: &str) -> Result<Registry> {
        let Schema { records, methods } = parse_schema(src)?;
        Registry::from_parts(records, methods)
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    fn from_parts(records: Vec<RecordDef>, methods: Vec<MethodDef>) -> Result<Registry> {
        let mut registry = Registry::default();

        for record in records {
            if registry.record_index.contains_key(&record.name) {
                return Err(Error::DuplicateDefinition(format!("record {}", record.name)));
            }
            registry
                .record_index
                .insert(record.name.clone(), registry.records.len());
            registry.records.push(record);
        }

        for method in methods {
            if registry.method_index.contains_key(&method.name) {
                return Err(Error::DuplicateDefinition(format!("method {}", method.name)));
            }
            registry
                .method_index
                .insert(method.name.clone(), registry.methods.len());
            registry.methods.push(method);
        }

        registry.validate()?;
        Ok(registry)
    }

    /// Every record named by a field, parameter or return type must exist.
    fn validate(&self) -> Result<()> {
        let field_types = self
            .records
            .iter()
            .flat_map(|r| r.fields.iter().map(|f| &f.ty));
        let method_types = self
            .methods
            .iter()
            .flat_map(|m| m.params.iter().map(|p| &p.ty).chain(Some(&m.returns)));

        for ty in field_types.chain(method_types) {
            for name in ty.referenced_records() {
                if !self.contains_record(name) {
                    return Err(Error::UnknownRecord(name.to_string()));
                }
            }
        }
        Ok(())
    }

    pub fn record(&self, name: &str) -> Option<&RecordDef> {
        self.record_index.get(name).map(|&i| &self.records[i])
    }

    pub fn contains_record(&self, name: &str) -> bool {
        self.record_index.contains_key(name)
    }

    pub fn fields_of(&self, name: &str) -> Result<&[FieldDef]> {
        self.record(name)
            .map(|r| r.fields.as_slice())
            .ok_or_else(|| Error::UnknownRecord(name.to_string()))
    }

    pub fn is_scalar_record(&self, name: &str) -> Result<bool> {
        self.record(name)
            .map(RecordDef::is_scalar)
            .ok_or_else(|| Error::UnknownRecord(name.to_string()))
    }

    /// Records in declaration order.
    pub fn records(&self) -> &[RecordDef] {
        &self.records
    }

    pub fn method(&self, name: &str) -> Result<&MethodDef> {
        self.method_index
            .get(name)
            .map(|&i| &self.methods[i])
            .ok_or_else(|| Error::UnknownMethod(name.to_string()))
    }

    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    records: Vec<RecordDef>,
    methods: Vec<MethodDef>,
}

impl RegistryBuilder {
    pub fn record(mut self, record: RecordDef) -> Self {
        self.records.push(record);
        self
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn build(self) -> Result<Registry> {
        Registry::from_parts(self.records, self.methods)
    }
}
