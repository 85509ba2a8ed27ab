//! Content entity records, write payloads and catalog validation.
//!
//! # Responsibility
//! - Define the stored shape of list entities and section-keyed content.
//! - Define create drafts and partial patches, from Rust builders or JSON.
//! - Validate field sets against the entity catalog.
//!
//! # Invariants
//! - Stored `Fields` only contain names declared by the kind's schema, with
//!   values of the declared type.
//! - Every localized field carries a non-empty default-language value.
//! - Patches replace fields wholesale; localized maps are never deep-merged.

use crate::model::catalog::{ContentKind, FieldSpec, FieldType, KindSchema};
use crate::model::localized::{is_valid_language_code, LocalizedText, DEFAULT_LANGUAGE};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque entity identifier, unique within its kind.
pub type EntityId = String;

static ENTITY_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$").expect("valid id regex"));
static SECTION_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]{0,63}$").expect("valid section regex"));

const KEY_ID: &str = "id";
const KEY_SECTION: &str = "section";
const KEY_DISPLAY_ORDER: &str = "displayOrder";
const KEY_IS_ACTIVE: &str = "isActive";
const KEY_CREATED_AT: &str = "createdAt";
const KEY_UPDATED_AT: &str = "updatedAt";

/// Catalog contract violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Request body is not a JSON object.
    PayloadNotObject,
    UnknownField {
        kind: ContentKind,
        field: String,
    },
    MissingField {
        kind: ContentKind,
        field: &'static str,
    },
    MissingDefaultLanguage {
        kind: ContentKind,
        field: &'static str,
    },
    FieldTypeMismatch {
        field: String,
        expected: FieldType,
        found: FieldType,
    },
    /// Value shape cannot be mapped to any field type.
    InvalidFieldValue {
        field: String,
        message: &'static str,
    },
    /// Array field contains non-string elements.
    MalformedArray {
        field: String,
    },
    InvalidLanguageCode {
        field: String,
        code: String,
    },
    /// `displayOrder`/`isActive` sent for a kind that does not support it.
    UnsupportedAttribute {
        kind: ContentKind,
        attribute: &'static str,
    },
    InvalidId(String),
    DuplicateId(String),
    InvalidSection(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayloadNotObject => write!(f, "payload must be a JSON object"),
            Self::UnknownField { kind, field } => {
                write!(f, "unknown field `{field}` for {kind}")
            }
            Self::MissingField { kind, field } => {
                write!(f, "missing required field `{field}` for {kind}")
            }
            Self::MissingDefaultLanguage { kind, field } => write!(
                f,
                "field `{field}` for {kind} requires a non-empty `{DEFAULT_LANGUAGE}` value"
            ),
            Self::FieldTypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field `{field}` expects {}, got {}",
                expected.as_str(),
                found.as_str()
            ),
            Self::InvalidFieldValue { field, message } => {
                write!(f, "invalid value for field `{field}`: {message}")
            }
            Self::MalformedArray { field } => {
                write!(f, "field `{field}` must be an array of strings")
            }
            Self::InvalidLanguageCode { field, code } => {
                write!(f, "field `{field}` has invalid language code `{code}`")
            }
            Self::UnsupportedAttribute { kind, attribute } => {
                write!(f, "{kind} does not support `{attribute}`")
            }
            Self::InvalidId(id) => write!(f, "invalid entity id `{id}`"),
            Self::DuplicateId(id) => write!(f, "entity id already exists: {id}"),
            Self::InvalidSection(section) => write!(f, "invalid section key `{section}`"),
        }
    }
}

impl Error for ValidationError {}

/// Returns whether `id` is an acceptable caller-supplied entity id.
pub fn is_valid_entity_id(id: &str) -> bool {
    ENTITY_ID_RE.is_match(id)
}

/// Validates a section key used by section-keyed kinds.
pub fn validate_section_key(section: &str) -> Result<(), ValidationError> {
    if SECTION_KEY_RE.is_match(section) {
        Ok(())
    } else {
        Err(ValidationError::InvalidSection(section.to_string()))
    }
}

/// Typed value of one content field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Localized(LocalizedText),
    List(Vec<String>),
    Integer(i64),
    Bool(bool),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text(_) => FieldType::Text,
            Self::Localized(_) => FieldType::Localized,
            Self::List(_) => FieldType::List,
            Self::Integer(_) => FieldType::Integer,
            Self::Bool(_) => FieldType::Bool,
        }
    }

    /// Maps a JSON value onto a field value by shape.
    ///
    /// `null` is not a value; callers decide what it means.
    pub fn from_json(field: &str, value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::String(text) => Ok(Self::Text(text.clone())),
            Value::Bool(flag) => Ok(Self::Bool(*flag)),
            Value::Number(number) => {
                number
                    .as_i64()
                    .map(Self::Integer)
                    .ok_or_else(|| ValidationError::InvalidFieldValue {
                        field: field.to_string(),
                        message: "numbers must be integers",
                    })
            }
            Value::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(text) => values.push(text.clone()),
                        _ => {
                            return Err(ValidationError::MalformedArray {
                                field: field.to_string(),
                            });
                        }
                    }
                }
                Ok(Self::List(values))
            }
            Value::Object(entries) => {
                let mut text = LocalizedText::new();
                for (language, value) in entries {
                    match value {
                        Value::String(translated) => text.set(language.as_str(), translated.as_str()),
                        Value::Null => {}
                        _ => {
                            return Err(ValidationError::InvalidFieldValue {
                                field: field.to_string(),
                                message: "localized values must be strings",
                            });
                        }
                    }
                }
                Ok(Self::Localized(text))
            }
            Value::Null => Err(ValidationError::InvalidFieldValue {
                field: field.to_string(),
                message: "null is not a field value",
            }),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Localized(text) => Value::Object(
                text.languages()
                    .filter_map(|language| {
                        text.get(language)
                            .map(|value| (language.to_string(), Value::String(value.to_string())))
                    })
                    .collect(),
            ),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Self::Integer(value) => Value::from(*value),
            Self::Bool(flag) => Value::Bool(*flag),
        }
    }

    /// Public projection: localized values collapse to one resolved string.
    pub fn to_resolved_json(&self, language: &str) -> Value {
        match self {
            Self::Localized(text) => Value::String(text.resolve(language)),
            other => other.to_json(),
        }
    }
}

/// Validated field set of one stored record.
///
/// Keys are the catalog's static field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<&'static str, FieldValue>);

impl Fields {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn localized(&self, name: &str) -> Option<&LocalizedText> {
        match self.get(name) {
            Some(FieldValue::Localized(text)) => Some(text),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.get(name) {
            Some(FieldValue::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(FieldValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(FieldValue::Bool(flag)) => Some(*flag),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes a stored JSON object, rejecting anything the schema does not
    /// declare.
    pub fn from_stored_json(schema: &KindSchema, value: &Value) -> Result<Self, ValidationError> {
        let entries = value.as_object().ok_or(ValidationError::PayloadNotObject)?;
        let mut fields = BTreeMap::new();
        for (name, raw) in entries {
            if raw.is_null() {
                continue;
            }
            let (spec, value) = typed_value(schema, name, FieldValue::from_json(name, raw)?)?;
            fields.insert(spec.name, value);
        }
        let fields = Self(fields);
        check_required(schema, &fields)?;
        Ok(fields)
    }

    fn write_json(&self, target: &mut Map<String, Value>, language: Option<&str>) {
        for (name, value) in &self.0 {
            let json = match language {
                Some(language) => value.to_resolved_json(language),
                None => value.to_json(),
            };
            target.insert((*name).to_string(), json);
        }
    }
}

/// One row of a list-shaped kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntity {
    pub id: EntityId,
    pub kind: ContentKind,
    pub fields: Fields,
    /// Ascending presentation order; not unique.
    pub display_order: i64,
    /// `false` hides the entity from public reads.
    pub is_active: bool,
    /// Epoch milliseconds, immutable after creation.
    pub created_at: i64,
    /// Epoch milliseconds, strictly increasing across mutations.
    pub updated_at: i64,
}

impl ContentEntity {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.text(name)
    }

    pub fn localized(&self, name: &str) -> Option<&LocalizedText> {
        self.fields.localized(name)
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.fields.list(name)
    }

    /// Admin JSON shape: every language of every localized field.
    pub fn to_json(&self) -> Value {
        self.render(None)
    }

    /// Public JSON shape: localized fields resolved for `language`.
    pub fn to_public_json(&self, language: &str) -> Value {
        self.render(Some(language))
    }

    fn render(&self, language: Option<&str>) -> Value {
        let mut object = Map::new();
        object.insert(KEY_ID.to_string(), Value::String(self.id.clone()));
        self.fields.write_json(&mut object, language);
        let schema = self.kind.schema();
        if schema.ordered {
            object.insert(
                KEY_DISPLAY_ORDER.to_string(),
                Value::from(self.display_order),
            );
        }
        if schema.toggleable {
            object.insert(KEY_IS_ACTIVE.to_string(), Value::Bool(self.is_active));
        }
        object.insert(KEY_CREATED_AT.to_string(), Value::from(self.created_at));
        object.insert(KEY_UPDATED_AT.to_string(), Value::from(self.updated_at));
        Value::Object(object)
    }
}

/// The single row of a section-keyed kind for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionContent {
    pub kind: ContentKind,
    pub section: String,
    pub fields: Fields,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SectionContent {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.text(name)
    }

    pub fn localized(&self, name: &str) -> Option<&LocalizedText> {
        self.fields.localized(name)
    }

    pub fn to_json(&self) -> Value {
        self.render(None)
    }

    pub fn to_public_json(&self, language: &str) -> Value {
        self.render(Some(language))
    }

    fn render(&self, language: Option<&str>) -> Value {
        let mut object = Map::new();
        object.insert(
            KEY_SECTION.to_string(),
            Value::String(self.section.clone()),
        );
        self.fields.write_json(&mut object, language);
        object.insert(KEY_CREATED_AT.to_string(), Value::from(self.created_at));
        object.insert(KEY_UPDATED_AT.to_string(), Value::from(self.updated_at));
        Value::Object(object)
    }
}

/// Input for creating one list entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityDraft {
    /// Caller-supplied id. Generated when `None`.
    pub id: Option<EntityId>,
    pub fields: BTreeMap<String, FieldValue>,
    /// Defaults to `0`.
    pub display_order: Option<i64>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

impl EntityDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn set(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, FieldValue::Text(value.into()))
    }

    pub fn localized(self, name: impl Into<String>, value: LocalizedText) -> Self {
        self.set(name, FieldValue::Localized(value))
    }

    /// Shorthand for a localized field holding only the default language.
    pub fn default_text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.localized(name, LocalizedText::from_pairs([(DEFAULT_LANGUAGE, value)]))
    }

    pub fn list<I, S>(self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(
            name,
            FieldValue::List(items.into_iter().map(Into::into).collect()),
        )
    }

    pub fn integer(self, name: impl Into<String>, value: i64) -> Self {
        self.set(name, FieldValue::Integer(value))
    }

    pub fn flag(self, name: impl Into<String>, value: bool) -> Self {
        self.set(name, FieldValue::Bool(value))
    }

    pub fn display_order(mut self, order: i64) -> Self {
        self.display_order = Some(order);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Parses a create payload.
    ///
    /// `createdAt`/`updatedAt` are ignored; `null` fields are treated as
    /// absent.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let entries = payload.as_object().ok_or(ValidationError::PayloadNotObject)?;
        let mut draft = Self::new();
        for (key, value) in entries {
            match key.as_str() {
                KEY_CREATED_AT | KEY_UPDATED_AT => {}
                KEY_ID => {
                    draft.id = match value {
                        Value::Null => None,
                        Value::String(id) => Some(id.clone()),
                        _ => return Err(ValidationError::InvalidId(value.to_string())),
                    };
                }
                KEY_DISPLAY_ORDER => draft.display_order = parse_display_order(value)?,
                KEY_IS_ACTIVE => draft.is_active = parse_is_active(value)?,
                _ if value.is_null() => {}
                _ => {
                    draft
                        .fields
                        .insert(key.clone(), FieldValue::from_json(key, value)?);
                }
            }
        }
        Ok(draft)
    }

    /// Validates fields and attributes against `schema`.
    pub fn validate(&self, schema: &KindSchema) -> Result<Fields, ValidationError> {
        if let Some(id) = self.id.as_deref() {
            if !is_valid_entity_id(id) {
                return Err(ValidationError::InvalidId(id.to_string()));
            }
        }
        check_attributes(schema, self.display_order, self.is_active)?;
        build_fields(schema, &self.fields)
    }
}

/// Partial update for one entity or section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityPatch {
    /// Fields replaced wholesale.
    pub set: BTreeMap<String, FieldValue>,
    /// Optional fields removed.
    pub clear: BTreeSet<String>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
}

impl EntityPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        let name = name.into();
        self.clear.remove(&name);
        self.set.insert(name, value);
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, FieldValue::Text(value.into()))
    }

    pub fn localized(self, name: impl Into<String>, value: LocalizedText) -> Self {
        self.set(name, FieldValue::Localized(value))
    }

    pub fn default_text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.localized(name, LocalizedText::from_pairs([(DEFAULT_LANGUAGE, value)]))
    }

    pub fn list<I, S>(self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(
            name,
            FieldValue::List(items.into_iter().map(Into::into).collect()),
        )
    }

    pub fn clear(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.set.remove(&name);
        self.clear.insert(name);
        self
    }

    pub fn display_order(mut self, order: i64) -> Self {
        self.display_order = Some(order);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
            && self.clear.is_empty()
            && self.display_order.is_none()
            && self.is_active.is_none()
    }

    /// Parses an update payload.
    ///
    /// `id`, `section`, `createdAt` and `updatedAt` are ignored since they are
    /// immutable; `null` clears an optional field.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let entries = payload.as_object().ok_or(ValidationError::PayloadNotObject)?;
        let mut patch = Self::new();
        for (key, value) in entries {
            match key.as_str() {
                KEY_ID | KEY_SECTION | KEY_CREATED_AT | KEY_UPDATED_AT => {}
                KEY_DISPLAY_ORDER => patch.display_order = parse_display_order(value)?,
                KEY_IS_ACTIVE => patch.is_active = parse_is_active(value)?,
                _ if value.is_null() => {
                    patch.clear.insert(key.clone());
                }
                _ => {
                    patch
                        .set
                        .insert(key.clone(), FieldValue::from_json(key, value)?);
                }
            }
        }
        Ok(patch)
    }

    /// Merges this patch over `current`, returning the validated result.
    pub fn apply_to(&self, schema: &KindSchema, current: &Fields) -> Result<Fields, ValidationError> {
        check_attributes(schema, self.display_order, self.is_active)?;
        let mut merged = current.0.clone();
        for name in &self.clear {
            let spec = schema
                .field(name)
                .ok_or_else(|| ValidationError::UnknownField {
                    kind: schema.kind,
                    field: name.clone(),
                })?;
            merged.remove(spec.name);
        }
        for (name, value) in &self.set {
            let (spec, value) = typed_value(schema, name, value.clone())?;
            merged.insert(spec.name, value);
        }
        let merged = Fields(merged);
        check_required(schema, &merged)?;
        Ok(merged)
    }

    /// Validates this patch as a complete draft (upsert-as-create).
    pub fn validate_as_new(&self, schema: &KindSchema) -> Result<Fields, ValidationError> {
        check_attributes(schema, self.display_order, self.is_active)?;
        build_fields(schema, &self.set)
    }
}

fn parse_display_order(value: &Value) -> Result<Option<i64>, ValidationError> {
    match value {
        Value::Number(number) => number.as_i64().map(Some).ok_or_else(|| {
            ValidationError::InvalidFieldValue {
                field: KEY_DISPLAY_ORDER.to_string(),
                message: "must be an integer",
            }
        }),
        _ => Err(ValidationError::InvalidFieldValue {
            field: KEY_DISPLAY_ORDER.to_string(),
            message: "must be an integer",
        }),
    }
}

fn parse_is_active(value: &Value) -> Result<Option<bool>, ValidationError> {
    match value {
        Value::Bool(flag) => Ok(Some(*flag)),
        _ => Err(ValidationError::InvalidFieldValue {
            field: KEY_IS_ACTIVE.to_string(),
            message: "must be a boolean",
        }),
    }
}

fn check_attributes(
    schema: &KindSchema,
    display_order: Option<i64>,
    is_active: Option<bool>,
) -> Result<(), ValidationError> {
    if display_order.is_some() && !schema.ordered {
        return Err(ValidationError::UnsupportedAttribute {
            kind: schema.kind,
            attribute: KEY_DISPLAY_ORDER,
        });
    }
    if is_active.is_some() && !schema.toggleable {
        return Err(ValidationError::UnsupportedAttribute {
            kind: schema.kind,
            attribute: KEY_IS_ACTIVE,
        });
    }
    Ok(())
}

fn build_fields(
    schema: &KindSchema,
    input: &BTreeMap<String, FieldValue>,
) -> Result<Fields, ValidationError> {
    let mut fields = BTreeMap::new();
    for (name, value) in input {
        let (spec, value) = typed_value(schema, name, value.clone())?;
        fields.insert(spec.name, value);
    }
    let fields = Fields(fields);
    check_required(schema, &fields)?;
    Ok(fields)
}

/// Resolves the field declaration for `name` and checks the value against it.
///
/// A plain string sent for a localized field is its default-language value.
fn typed_value(
    schema: &KindSchema,
    name: &str,
    value: FieldValue,
) -> Result<(&'static FieldSpec, FieldValue), ValidationError> {
    let spec = schema
        .field(name)
        .ok_or_else(|| ValidationError::UnknownField {
            kind: schema.kind,
            field: name.to_string(),
        })?;
    let value = match (spec.ty, value) {
        (FieldType::Localized, FieldValue::Text(text)) => {
            FieldValue::Localized(LocalizedText::from_pairs([(DEFAULT_LANGUAGE, text)]))
        }
        (_, value) => value,
    };
    if value.field_type() != spec.ty {
        return Err(ValidationError::FieldTypeMismatch {
            field: name.to_string(),
            expected: spec.ty,
            found: value.field_type(),
        });
    }
    if let FieldValue::Localized(text) = &value {
        if let Some(code) = text.languages().find(|code| !is_valid_language_code(code)) {
            return Err(ValidationError::InvalidLanguageCode {
                field: name.to_string(),
                code: code.to_string(),
            });
        }
    }
    Ok((spec, value))
}

fn check_required(schema: &KindSchema, fields: &Fields) -> Result<(), ValidationError> {
    for spec in schema.fields {
        let present = match fields.get(spec.name) {
            Some(FieldValue::Text(text)) => !text.trim().is_empty(),
            Some(FieldValue::Localized(text)) => {
                if !text.has_default() {
                    return Err(ValidationError::MissingDefaultLanguage {
                        kind: schema.kind,
                        field: spec.name,
                    });
                }
                true
            }
            Some(_) => true,
            None => false,
        };
        if spec.is_required() && !present {
            return Err(ValidationError::MissingField {
                kind: schema.kind,
                field: spec.name,
            });
        }
    }
    Ok(())
}
