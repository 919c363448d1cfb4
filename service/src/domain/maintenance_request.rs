//! Maintenance request [`Entity`] definitions.

use common::define_kind;

use super::{Entity, Field, Format, Rule, Schema};

/// [`Schema`] of [`Entity::MaintenanceRequest`].
pub static SCHEMA: Schema = Schema {
    entity: Entity::MaintenanceRequest,
    table: "maintenance_requests",
    fields: &[
        Field::key("request_id", "Request ID"),
        Field::required("property_id", "Property ID", Format::Id)
            .references(Entity::Property),
        Field::required("tenant_id", "Tenant ID", Format::Id)
            .references(Entity::Tenant),
        Field::optional("employee_id", "Employee ID", Format::Id)
            .references(Entity::Employee)
            .absent_as("Unassigned"),
        Field::required("description", "Description", Format::Text),
        Field::optional("request_date", "Request Date", Format::Date)
            .today_by_default(),
        Field::optional("completion_date", "Completion Date", Format::Date)
            .absent_as("Pending"),
        Field::required("status", "Status", Format::MaintenanceStatus),
    ],
    unique: &[],
    rules: &[Rule::Ordered {
        first: "request_date",
        then: "completion_date",
        strict: false,
        reason: "completion date must not be before request date",
    }],
    dependents: &[],
};

define_kind! {
    #[doc = "Status of a maintenance request."]
    enum Status {
        #[doc = "Request is waiting for work to start."]
        Open = "Open",

        #[doc = "Work on the request has started."]
        InProgress = "In Progress",

        #[doc = "Work on the request is done."]
        Completed = "Completed",
    }
}
