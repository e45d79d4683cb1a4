//! Domain types for data type synchronization.
//!
//! A [`DataTypeModel`] is what the application code declares; a
//! [`DataTypeDefinition`] is the record the CMS persisted for it. Pre-values
//! are the per-definition configuration entries an editor reads.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Author-assigned identifier of a model; the durable key across renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableId(pub Uuid);

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for StableId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for StableId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|source| CoreError::InvalidStableId {
                value: s.to_owned(),
                source,
            })
    }
}

/// Identifier the CMS assigns to a definition when it is first saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageId(pub i64);

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for StorageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Alias of the property editor that renders and stores values of a data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorAlias(pub String);

impl EditorAlias {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EditorAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EditorAlias {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EditorAlias {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Value type a model declares for its values.
///
/// Parsing never fails: names that are not recognised are kept as
/// [`ValueType::Other`] and stored as long text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    Integer,
    DateTime,
    Boolean,
    Decimal,
    #[default]
    String,
    Other(String),
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => write!(f, "integer"),
            ValueType::DateTime => write!(f, "date_time"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Decimal => write!(f, "decimal"),
            ValueType::String => write!(f, "string"),
            ValueType::Other(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for ValueType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "i32" | "i64" => ValueType::Integer,
            "date_time" | "datetime" | "date" => ValueType::DateTime,
            "boolean" | "bool" => ValueType::Boolean,
            "decimal" => ValueType::Decimal,
            "string" | "text" => ValueType::String,
            _ => ValueType::Other(s.trim().to_owned()),
        })
    }
}

impl From<String> for ValueType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }
}

impl From<ValueType> for String {
    fn from(v: ValueType) -> Self {
        v.to_string()
    }
}

/// How the CMS stores values of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseType {
    Integer,
    Date,
    Ntext,
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseType::Integer => write!(f, "integer"),
            DatabaseType::Date => write!(f, "date"),
            DatabaseType::Ntext => write!(f, "long text"),
        }
    }
}

impl From<&ValueType> for DatabaseType {
    /// Integers and dates get their own columns; everything else is long text.
    fn from(value_type: &ValueType) -> Self {
        match value_type {
            ValueType::Integer => DatabaseType::Integer,
            ValueType::DateTime => DatabaseType::Date,
            _ => DatabaseType::Ntext,
        }
    }
}

// ---------------------------------------------------------------------------
// Model descriptor
// ---------------------------------------------------------------------------

/// Code-declared description of one data type.
///
/// `pre_values` distinguishes "no opinion" (`None`) from "no pre-values"
/// (`Some` of an empty map).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeModel {
    pub name: String,
    pub value_type: ValueType,
    pub editor: EditorAlias,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StableId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_values: Option<BTreeMap<String, String>>,
}

impl DataTypeModel {
    /// Build a descriptor without a stable id or pre-values.
    ///
    /// Returns [`CoreError::EmptyName`] / [`CoreError::EmptyEditor`] for blank
    /// names or editor aliases.
    pub fn new(
        name: impl Into<String>,
        editor: impl Into<EditorAlias>,
        value_type: ValueType,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let editor = editor.into();
        if name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        if editor.0.trim().is_empty() {
            return Err(CoreError::EmptyEditor { name });
        }
        Ok(Self {
            name,
            value_type,
            editor,
            id: None,
            pre_values: None,
        })
    }

    pub fn with_id(mut self, id: impl Into<StableId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_pre_values<I, K, V>(mut self, pre_values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.pre_values = Some(
            pre_values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Storage representation derived from the declared value type.
    pub fn database_type(&self) -> DatabaseType {
        DatabaseType::from(&self.value_type)
    }
}

// ---------------------------------------------------------------------------
// Persisted definitions
// ---------------------------------------------------------------------------

/// A data type definition as persisted by the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeDefinition {
    pub id: StorageId,
    pub name: String,
    pub editor: EditorAlias,
    pub database_type: DatabaseType,
}

/// A definition that has not been saved yet and therefore has no storage id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDataTypeDefinition {
    pub name: String,
    pub editor: EditorAlias,
    pub database_type: DatabaseType,
}

// ---------------------------------------------------------------------------
// Pre-values
// ---------------------------------------------------------------------------

/// One pre-value entry.
///
/// `id` and `sort_order` belong to the store; a fresh entry has no id until
/// the CMS saves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub value: String,
    #[serde(default)]
    pub sort_order: i32,
}

impl PreValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: None,
            value: value.into(),
            sort_order: 0,
        }
    }
}

/// Key-addressed pre-values, the shape every save uses.
pub type PreValueMap = BTreeMap<String, PreValue>;

/// Existing pre-values of a definition as the CMS returns them.
///
/// Legacy definitions keep their pre-values as a positional list; only the
/// dictionary form can be merged by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum PreValueCollection {
    Dictionary(PreValueMap),
    List(Vec<PreValue>),
}

impl Default for PreValueCollection {
    fn default() -> Self {
        PreValueCollection::Dictionary(PreValueMap::new())
    }
}

impl PreValueCollection {
    pub fn is_key_addressable(&self) -> bool {
        matches!(self, PreValueCollection::Dictionary(_))
    }

    pub fn as_dictionary(&self) -> Option<&PreValueMap> {
        match self {
            PreValueCollection::Dictionary(map) => Some(map),
            PreValueCollection::List(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PreValueCollection::Dictionary(map) => map.len(),
            PreValueCollection::List(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ValueType::Integer, DatabaseType::Integer)]
    #[case(ValueType::DateTime, DatabaseType::Date)]
    #[case(ValueType::Boolean, DatabaseType::Ntext)]
    #[case(ValueType::Decimal, DatabaseType::Ntext)]
    #[case(ValueType::String, DatabaseType::Ntext)]
    #[case(ValueType::Other("Guid".into()), DatabaseType::Ntext)]
    fn database_type_derivation(#[case] value_type: ValueType, #[case] expected: DatabaseType) {
        assert_eq!(DatabaseType::from(&value_type), expected);
    }

    #[test]
    fn database_type_display() {
        assert_eq!(DatabaseType::Integer.to_string(), "integer");
        assert_eq!(DatabaseType::Date.to_string(), "date");
        assert_eq!(DatabaseType::Ntext.to_string(), "long text");
    }

    #[test]
    fn snapshots_only_carry_derivable_database_types() {
        for (raw, expected) in [
            ("\"integer\"", DatabaseType::Integer),
            ("\"date\"", DatabaseType::Date),
            ("\"ntext\"", DatabaseType::Ntext),
        ] {
            assert_eq!(serde_json::from_str::<DatabaseType>(raw).unwrap(), expected);
        }
        assert!(serde_json::from_str::<DatabaseType>("\"nvarchar\"").is_err());
        assert!(serde_json::from_str::<DatabaseType>("\"decimal\"").is_err());
    }

    #[rstest]
    #[case("int", ValueType::Integer)]
    #[case("DateTime", ValueType::DateTime)]
    #[case("bool", ValueType::Boolean)]
    #[case("string", ValueType::String)]
    #[case("Guid", ValueType::Other("Guid".into()))]
    fn value_type_parsing_is_total(#[case] input: &str, #[case] expected: ValueType) {
        assert_eq!(input.parse::<ValueType>().unwrap(), expected);
    }

    #[test]
    fn model_rejects_blank_name_and_editor() {
        assert!(matches!(
            DataTypeModel::new("  ", "Umbraco.Textbox", ValueType::String),
            Err(CoreError::EmptyName)
        ));
        assert!(matches!(
            DataTypeModel::new("Title", "", ValueType::String),
            Err(CoreError::EmptyEditor { .. })
        ));
    }

    #[test]
    fn model_distinguishes_absent_and_empty_pre_values() {
        let untouched = DataTypeModel::new("A", "ed", ValueType::String).unwrap();
        let cleared = untouched.clone().with_pre_values(Vec::<(String, String)>::new());
        assert!(untouched.pre_values.is_none());
        assert_eq!(cleared.pre_values, Some(BTreeMap::new()));
    }

    #[test]
    fn stable_id_parse_errors_name_the_value() {
        let err = "not-a-guid".parse::<StableId>().unwrap_err();
        assert!(err.to_string().contains("not-a-guid"));
    }

    #[test]
    fn pre_value_collection_serde_is_tagged() {
        let legacy = PreValueCollection::List(vec![PreValue::new("red")]);
        let json = serde_json::to_string(&legacy).unwrap();
        assert!(json.contains(r#""kind":"list""#));
        let back: PreValueCollection = serde_json::from_str(&json).unwrap();
        assert!(!back.is_key_addressable());
    }
}
