//! Property [`Entity`] definitions.

use common::define_kind;

use super::{Dependent, Entity, Field, Format, Schema};

/// [`Schema`] of [`Entity::Property`].
pub static SCHEMA: Schema = Schema {
    entity: Entity::Property,
    table: "properties",
    fields: &[
        Field::generated_key("property_id", "Property ID"),
        Field::required("address", "Address", Format::Text),
        Field::required("city", "City", Format::Text),
        Field::required("state", "State", Format::Text),
        Field::required("zip_code", "Zip Code", Format::ZipCode),
        Field::required(
            "property_type",
            "Property Type",
            Format::PropertyKind,
        ),
        Field::optional("square_feet", "Square Feet", Format::Area),
        Field::optional("year_built", "Year Built", Format::Year),
        Field::optional("purchase_date", "Purchase Date", Format::Date),
        Field::optional("purchase_price", "Purchase Price", Format::Money),
    ],
    unique: &[],
    rules: &[],
    dependents: &[
        Dependent::new(Entity::PropertyOwner, "property_id"),
        Dependent::new(Entity::Lease, "property_id"),
        Dependent::new(Entity::MaintenanceRequest, "property_id"),
    ],
};

define_kind! {
    #[doc = "Kind of a property."]
    enum Kind {
        #[doc = "Detached house for a single family."]
        SingleFamily = "Single Family",

        #[doc = "Apartment in a residential building."]
        Apartment = "Apartment",

        #[doc = "Commercial premises."]
        Commercial = "Commercial",

        #[doc = "Condominium unit."]
        Condo = "Condo",
    }
}
