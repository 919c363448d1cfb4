//! Lease [`Entity`] definitions.

use common::define_kind;

use super::{Dependent, Entity, Field, Format, Rule, Schema};

/// [`Schema`] of [`Entity::Lease`].
pub static SCHEMA: Schema = Schema {
    entity: Entity::Lease,
    table: "leases",
    fields: &[
        Field::key("lease_id", "Lease ID"),
        Field::required("property_id", "Property ID", Format::Id)
            .references(Entity::Property),
        Field::required("tenant_id", "Tenant ID", Format::Id)
            .references(Entity::Tenant),
        Field::required("start_date", "Start Date", Format::Date),
        Field::required("end_date", "End Date", Format::Date),
        Field::required("monthly_rent", "Monthly Rent", Format::Money),
        Field::optional(
            "security_deposit",
            "Security Deposit",
            Format::Deposit,
        ),
        Field::required("lease_status", "Lease Status", Format::LeaseStatus),
    ],
    unique: &[],
    rules: &[Rule::Ordered {
        first: "start_date",
        then: "end_date",
        strict: true,
        reason: "start date must be before end date",
    }],
    dependents: &[Dependent::new(Entity::Payment, "lease_id")],
};

define_kind! {
    #[doc = "Status of a lease."]
    enum Status {
        #[doc = "Lease is in effect."]
        Active = "Active",

        #[doc = "Lease has ended at its end date."]
        Expired = "Expired",

        #[doc = "Lease was ended before its end date."]
        Terminated = "Terminated",
    }
}
