//! [`Record`] definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::fmt;

use common::Date;
use derive_more::Display;
use itertools::Itertools as _;
#[cfg(feature = "postgres")]
use postgres_types::{private::BytesMut, to_sql_checked, IsNull, ToSql, Type};
use rust_decimal::Decimal;

use super::{Entity, Field, Role, Schema, ValidationError};

/// Normalized value of a single [`Field`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Value {
    /// Absent value.
    #[display("")]
    Null,

    /// Integer, like an ID or a year.
    Int(i32),

    /// Text, including labels of kind enums.
    Text(String),

    /// Decimal, like a money amount or a percentage.
    Decimal(Decimal),

    /// Calendar [`Date`].
    Date(Date),
}

impl Value {
    /// Indicates whether this [`Value`] is absent.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer of this [`Value`], if it holds one.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Null | Self::Text(_) | Self::Decimal(_) | Self::Date(_) => {
                None
            }
        }
    }

    /// Returns the decimal of this [`Value`], if it holds one.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            Self::Null | Self::Int(_) | Self::Text(_) | Self::Date(_) => None,
        }
    }

    /// Returns the [`Date`] of this [`Value`], if it holds one.
    #[must_use]
    pub fn as_date(&self) -> Option<Date> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Null | Self::Int(_) | Self::Text(_) | Self::Decimal(_) => {
                None
            }
        }
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Value {
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Int(i) => i.to_sql(ty, w),
            Self::Text(s) => s.to_sql(ty, w),
            Self::Decimal(d) => d.to_sql(ty, w),
            Self::Date(d) => d.to_sql(ty, w),
        }
    }

    // Every statement casts its parameters explicitly, so the actual type
    // is checked by the inner values.
    fn accepts(_: &Type) -> bool {
        true
    }
}

/// Primary key of a [`Record`].
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Key {
    /// [`Entity`] of the identified [`Record`].
    entity: Entity,

    /// Values of the key [`Field`]s in the [`Schema`] order.
    parts: Vec<i32>,
}

impl Key {
    /// Creates a new [`Key`] of the provided [`Entity`].
    ///
    /// # Panics
    ///
    /// If the number of `parts` doesn't match the key [`Field`]s of the
    /// [`Entity`].
    #[must_use]
    pub fn new(entity: Entity, parts: impl Into<Vec<i32>>) -> Self {
        let parts = parts.into();
        assert_eq!(
            parts.len(),
            entity.schema().key_fields().count(),
            "wrong number of `{entity}` key parts",
        );
        Self { entity, parts }
    }

    /// Parses a [`Key`] of the provided [`Entity`] out of `raw` inputs, one
    /// per key [`Field`].
    ///
    /// # Errors
    ///
    /// If any of the `raw` inputs is not a valid ID.
    pub fn parse(
        entity: Entity,
        raw: &[&str],
    ) -> Result<Self, ValidationError> {
        let fields = entity.schema().key_fields().collect::<Vec<_>>();
        if raw.len() != fields.len() {
            return Err(ValidationError::record(format!(
                "`{entity}` key consists of {} parts",
                fields.len(),
            )));
        }
        let parts = fields
            .into_iter()
            .zip(raw)
            .map(|(f, raw)| {
                f.parse(raw)?.as_int().ok_or_else(|| {
                    ValidationError::of(f.label, "must be a whole number")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entity, parts })
    }

    /// Returns the [`Entity`] of this [`Key`].
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Returns the values of the key [`Field`]s.
    #[must_use]
    pub fn parts(&self) -> &[i32] {
        &self.parts
    }

    /// Returns the key [`Field`]s paired with their values.
    pub fn columns(
        &self,
    ) -> impl Iterator<Item = (&'static Field, i32)> + '_ {
        self.entity
            .schema()
            .key_fields()
            .zip(self.parts.iter().copied())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.entity,
            self.columns()
                .format_with(", ", |(field, id), f| f(&format_args!(
                    "{}: {id}",
                    field.column,
                ))),
        )
    }
}

/// Stored (or to be stored) row of an [`Entity`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// [`Entity`] of this [`Record`].
    entity: Entity,

    /// [`Value`]s in the [`Schema`] [`Field`]s order.
    values: Vec<Value>,
}

impl Record {
    /// Creates a new [`Record`] out of the provided [`Value`]s.
    ///
    /// # Panics
    ///
    /// If the number of `values` doesn't match the [`Field`]s of the
    /// [`Entity`].
    #[must_use]
    pub fn new(entity: Entity, values: Vec<Value>) -> Self {
        assert_eq!(
            values.len(),
            entity.schema().fields.len(),
            "wrong number of `{entity}` values",
        );
        Self { entity, values }
    }

    /// Creates a new [`Record`] of the provided [`Entity`] with all its
    /// [`Value`]s absent.
    #[must_use]
    pub fn empty(entity: Entity) -> Self {
        Self {
            entity,
            values: vec![Value::Null; entity.schema().fields.len()],
        }
    }

    /// Returns the [`Entity`] of this [`Record`].
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Returns the [`Schema`] of this [`Record`].
    #[must_use]
    pub fn schema(&self) -> &'static Schema {
        self.entity.schema()
    }

    /// Returns the [`Value`]s of this [`Record`] in the [`Field`]s order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the [`Field`]s of this [`Record`] paired with their
    /// [`Value`]s.
    pub fn fields(
        &self,
    ) -> impl Iterator<Item = (&'static Field, &Value)> + '_ {
        self.schema().fields.iter().zip(&self.values)
    }

    /// Returns the [`Value`] of the provided `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.schema()
            .position(column)
            .and_then(|i| self.values.get(i))
    }

    /// Replaces the [`Value`] of the provided `column`, if this [`Record`]
    /// has one.
    pub fn set(&mut self, column: &str, value: Value) {
        if let Some(slot) = self
            .schema()
            .position(column)
            .and_then(|i| self.values.get_mut(i))
        {
            *slot = value;
        }
    }

    /// Returns the [`Key`] of this [`Record`], unless some of its parts is
    /// not assigned yet.
    #[must_use]
    pub fn key(&self) -> Option<Key> {
        let parts = self
            .fields()
            .filter(|(f, _)| f.role != Role::Attribute)
            .map(|(_, v)| v.as_int())
            .collect::<Option<Vec<_>>>()?;
        Some(Key {
            entity: self.entity,
            parts,
        })
    }

    /// Assigns the provided [`Key`] to this [`Record`].
    #[must_use]
    pub fn with_key(mut self, key: &Key) -> Self {
        for (field, id) in key.columns() {
            self.set(field.column, Value::Int(id));
        }
        self
    }

    /// Renders this [`Record`] into labeled display-ready columns.
    #[must_use]
    pub fn display(&self) -> Vec<(&'static str, String)> {
        self.fields().map(|(f, v)| (f.label, f.render(v))).collect()
    }
}

/// New [`Value`]s of some [`Field`]s of the [`Record`] identified by a
/// [`Key`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Changes {
    /// [`Key`] of the changed [`Record`].
    pub key: Key,

    /// Changed [`Field`]s with their new [`Value`]s.
    pub values: Vec<(&'static Field, Value)>,
}

#[cfg(test)]
mod tests {
    use common::Date;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use crate::domain::Entity;

    use super::{Key, Record, Value};

    fn maintenance_request() -> Record {
        Record::new(
            Entity::MaintenanceRequest,
            vec![
                Value::Int(5),
                Value::Int(1),
                Value::Int(2),
                Value::Null,
                Value::Text("Leaking faucet".into()),
                Value::Date(Date::from_ymd(2025, 3, 1).unwrap()),
                Value::Null,
                Value::Text("Open".into()),
            ],
        )
    }

    #[test]
    fn displays_labeled_columns() {
        assert_eq!(
            maintenance_request().display(),
            vec![
                ("Request ID", "5".to_owned()),
                ("Property ID", "1".to_owned()),
                ("Tenant ID", "2".to_owned()),
                ("Employee ID", "Unassigned".to_owned()),
                ("Description", "Leaking faucet".to_owned()),
                ("Request Date", "2025-03-01".to_owned()),
                ("Completion Date", "Pending".to_owned()),
                ("Status", "Open".to_owned()),
            ],
        );
    }

    #[test]
    fn key_of_record() {
        let record = maintenance_request();

        assert_eq!(
            record.key(),
            Some(Key::new(Entity::MaintenanceRequest, [5])),
        );
        assert_eq!(Record::empty(Entity::Property).key(), None);
    }

    #[test]
    fn composite_key() {
        let key = Key::parse(Entity::PropertyOwner, &["3", " 7"]).unwrap();

        assert_eq!(key.parts(), &[3, 7]);
        assert_eq!(
            key.to_string(),
            "Property Owner(property_id: 3, owner_id: 7)",
        );
        assert!(Key::parse(Entity::PropertyOwner, &["3"]).is_err());
        assert!(Key::parse(Entity::Owner, &["0"]).is_err());
    }

    #[test]
    fn assigns_key() {
        let record = Record::empty(Entity::PropertyOwner)
            .with_key(&Key::new(Entity::PropertyOwner, [1, 2]));

        assert_eq!(record.get("property_id"), Some(&Value::Int(1)));
        assert_eq!(record.get("owner_id"), Some(&Value::Int(2)));
        assert_eq!(record.get("ownership_percentage"), Some(&Value::Null));
        assert_eq!(record.get("unknown"), None);
    }

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert_eq!(Value::Null.as_int(), None);
        assert_eq!(
            Value::Decimal(Decimal::ONE).as_decimal(),
            Some(Decimal::ONE),
        );
        assert!(Value::Null.is_null());
    }
}
