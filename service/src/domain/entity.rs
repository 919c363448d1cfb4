//! [`Entity`] definitions and their [`Schema`]s.

use derive_more::Display;

use super::{
    employee, lease, maintenance_request, owner, payment, property,
    property_owner, tenant, Field, Role,
};

/// Kind of a record stored in the database.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
pub enum Entity {
    /// Real-estate property.
    Property,

    /// Owner of [`Entity::Property`] shares.
    Owner,

    /// Share of an [`Entity::Owner`] in an [`Entity::Property`].
    #[display("Property Owner")]
    PropertyOwner,

    /// Tenant renting an [`Entity::Property`].
    Tenant,

    /// Lease of an [`Entity::Property`] to an [`Entity::Tenant`].
    Lease,

    /// Maintenance request of an [`Entity::Property`].
    #[display("Maintenance Request")]
    MaintenanceRequest,

    /// Payment under an [`Entity::Lease`].
    Payment,

    /// Employee of the agency.
    Employee,
}

impl Entity {
    /// All the [`Entity`] kinds in their menu order.
    pub const ALL: [Self; 8] = [
        Self::Property,
        Self::Owner,
        Self::Tenant,
        Self::Lease,
        Self::MaintenanceRequest,
        Self::Payment,
        Self::Employee,
        Self::PropertyOwner,
    ];

    /// Returns the [`Schema`] of this [`Entity`].
    #[must_use]
    pub fn schema(self) -> &'static Schema {
        match self {
            Self::Property => &property::SCHEMA,
            Self::Owner => &owner::SCHEMA,
            Self::PropertyOwner => &property_owner::SCHEMA,
            Self::Tenant => &tenant::SCHEMA,
            Self::Lease => &lease::SCHEMA,
            Self::MaintenanceRequest => &maintenance_request::SCHEMA,
            Self::Payment => &payment::SCHEMA,
            Self::Employee => &employee::SCHEMA,
        }
    }

    /// Returns the plural human-readable name of this [`Entity`].
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Property => "Properties",
            Self::Owner => "Owners",
            Self::PropertyOwner => "Property Owners",
            Self::Tenant => "Tenants",
            Self::Lease => "Leases",
            Self::MaintenanceRequest => "Maintenance Requests",
            Self::Payment => "Payments",
            Self::Employee => "Employees",
        }
    }
}

/// Static description of how an [`Entity`] is stored and validated.
#[derive(Debug)]
pub struct Schema {
    /// [`Entity`] described by this [`Schema`].
    pub entity: Entity,

    /// Name of the database table.
    pub table: &'static str,

    /// [`Field`]s in the table column order, key [`Field`]s first.
    pub fields: &'static [Field],

    /// Columns whose values are unique across the table.
    pub unique: &'static [&'static str],

    /// Cross-field [`Rule`]s of a record.
    pub rules: &'static [Rule],

    /// Columns of other [`Entity`] tables referencing this one.
    pub dependents: &'static [Dependent],
}

impl Schema {
    /// Returns the [`Field`] of the provided `column`, if any.
    #[must_use]
    pub fn field(&self, column: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.column == column)
    }

    /// Returns the position of the provided `column` in the [`Field`]s.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.column == column)
    }

    /// Returns the [`Field`]s forming the primary key.
    pub fn key_fields(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter().filter(|f| f.role != Role::Attribute)
    }

    /// Returns the [`Field`]s entered by a user when creating a record.
    pub fn input_fields(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter().filter(|f| f.role != Role::GeneratedKey)
    }

    /// Returns the ordered [`Field`]s allowed to be updated.
    pub fn updatable_fields(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter().filter(|f| f.role == Role::Attribute)
    }

    /// Indicates whether the key of this [`Schema`] is generated by the
    /// database.
    #[must_use]
    pub fn has_generated_key(&self) -> bool {
        self.fields.iter().any(|f| f.role == Role::GeneratedKey)
    }
}

/// Column of another [`Entity`] referencing the key of an [`Entity`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dependent {
    /// Referencing [`Entity`].
    pub entity: Entity,

    /// Referencing column of the [`Entity`].
    pub column: &'static str,
}

impl Dependent {
    /// Creates a new [`Dependent`] out of the provided parts.
    #[must_use]
    pub const fn new(entity: Entity, column: &'static str) -> Self {
        Self { entity, column }
    }

    /// Returns the [`Effect`] deleting the referenced row has on this
    /// [`Dependent`].
    #[must_use]
    pub fn effect(&self) -> Effect {
        let required = self
            .entity
            .schema()
            .field(self.column)
            .is_some_and(|f| f.required);
        if required {
            Effect::Cascade
        } else {
            Effect::Detach
        }
    }
}

/// Effect of deleting a referenced row on its [`Dependent`] rows.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Effect {
    /// Dependent rows are deleted too.
    #[display("deleted")]
    Cascade,

    /// Dependent rows lose the reference.
    #[display("unassigned")]
    Detach,
}

/// Cross-field rule of a record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rule {
    /// Value of the `first` column must precede the value of the `then` one,
    /// when both are present.
    Ordered {
        /// Column expected to hold the earlier value.
        first: &'static str,

        /// Column expected to hold the later value.
        then: &'static str,

        /// Indicator whether equal values are rejected.
        strict: bool,

        /// Reason to report when the [`Rule`] is violated.
        reason: &'static str,
    },
}
