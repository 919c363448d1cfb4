//! Payment [`Entity`] definitions.

use common::define_kind;

use super::{Entity, Field, Format, Schema};

/// [`Schema`] of [`Entity::Payment`].
pub static SCHEMA: Schema = Schema {
    entity: Entity::Payment,
    table: "payments",
    fields: &[
        Field::key("payment_id", "Payment ID"),
        Field::required("lease_id", "Lease ID", Format::Id)
            .references(Entity::Lease),
        Field::required("tenant_id", "Tenant ID", Format::Id)
            .references(Entity::Tenant),
        Field::required("amount", "Amount", Format::Money),
        Field::required("payment_date", "Payment Date", Format::Date),
        Field::required(
            "payment_method",
            "Payment Method",
            Format::PaymentMethod,
        ),
        Field::optional("received_by", "Received By", Format::Id)
            .references(Entity::Employee)
            .absent_as("Unknown"),
    ],
    unique: &[],
    rules: &[],
    dependents: &[],
};

define_kind! {
    #[doc = "Method a payment was made with."]
    enum Method {
        #[doc = "Credit card charge."]
        CreditCard = "Credit Card",

        #[doc = "Paper check."]
        Check = "Check",

        #[doc = "Bank wire transfer."]
        BankTransfer = "Bank Transfer",

        #[doc = "Cash in hand."]
        Cash = "Cash",
    }
}
