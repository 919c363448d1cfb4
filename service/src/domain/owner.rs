//! Owner [`Entity`] definitions.

use super::{Dependent, Entity, Field, Format, Schema};

/// [`Schema`] of [`Entity::Owner`].
pub static SCHEMA: Schema = Schema {
    entity: Entity::Owner,
    table: "owners",
    fields: &[
        Field::key("owner_id", "Owner ID"),
        Field::required("first_name", "First Name", Format::Text),
        Field::required("last_name", "Last Name", Format::Text),
        Field::required("email", "Email", Format::Email),
        Field::optional("phone", "Phone", Format::Phone),
        Field::optional("mailing_address", "Mailing Address", Format::Text),
    ],
    unique: &[],
    rules: &[],
    dependents: &[Dependent::new(Entity::PropertyOwner, "owner_id")],
};
