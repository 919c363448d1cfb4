//! Property ownership share [`Entity`] definitions.

use super::{Entity, Field, Format, Schema};

/// [`Schema`] of [`Entity::PropertyOwner`].
///
/// Shares of the same property never sum above 100%.
pub static SCHEMA: Schema = Schema {
    entity: Entity::PropertyOwner,
    table: "property_owners",
    fields: &[
        Field::key("property_id", "Property ID").references(Entity::Property),
        Field::key("owner_id", "Owner ID").references(Entity::Owner),
        Field::required(
            "ownership_percentage",
            "Ownership Percentage",
            Format::Percentage,
        ),
    ],
    unique: &[],
    rules: &[],
    dependents: &[],
};

/// Column holding the share of an owner.
pub const SHARE: &str = "ownership_percentage";

/// Column holding the ID of the shared property.
pub const PROPERTY: &str = "property_id";

/// Column holding the ID of the owner.
pub const OWNER: &str = "owner_id";
