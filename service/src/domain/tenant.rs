//! Tenant [`Entity`] definitions.

use super::{Dependent, Entity, Field, Format, Schema};

/// [`Schema`] of [`Entity::Tenant`].
pub static SCHEMA: Schema = Schema {
    entity: Entity::Tenant,
    table: "tenants",
    fields: &[
        Field::key("tenant_id", "Tenant ID"),
        Field::required("first_name", "First Name", Format::Text),
        Field::required("last_name", "Last Name", Format::Text),
        Field::required("email", "Email", Format::Email),
        Field::optional("phone", "Phone", Format::Phone),
        Field::optional("employer", "Employer", Format::Text),
        Field::optional(
            "emergency_contact",
            "Emergency Contact",
            Format::Text,
        ),
    ],
    unique: &[],
    rules: &[],
    dependents: &[
        Dependent::new(Entity::Lease, "tenant_id"),
        Dependent::new(Entity::MaintenanceRequest, "tenant_id"),
        Dependent::new(Entity::Payment, "tenant_id"),
    ],
};
