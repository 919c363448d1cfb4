//! Employee [`Entity`] definitions.

use common::define_kind;

use super::{Dependent, Entity, Field, Format, Schema};

/// [`Schema`] of [`Entity::Employee`].
pub static SCHEMA: Schema = Schema {
    entity: Entity::Employee,
    table: "employees",
    fields: &[
        Field::key("employee_id", "Employee ID"),
        Field::required("first_name", "First Name", Format::Text),
        Field::required("last_name", "Last Name", Format::Text),
        Field::required("email", "Email", Format::Email),
        Field::required("phone", "Phone", Format::Phone),
        Field::required("role", "Role", Format::EmployeeRole),
        Field::required("hire_date", "Hire Date", Format::Date),
    ],
    unique: &["email"],
    rules: &[],
    dependents: &[
        Dependent::new(Entity::MaintenanceRequest, "employee_id"),
        Dependent::new(Entity::Payment, "received_by"),
    ],
};

define_kind! {
    #[doc = "Role of an employee in the agency."]
    enum Role {
        #[doc = "Manages properties on behalf of their owners."]
        PropertyManager = "Property Manager",

        #[doc = "Handles maintenance requests."]
        MaintenanceStaff = "Maintenance Staff",

        #[doc = "Accepts and books payments."]
        Accountant = "Accountant",

        #[doc = "Finds tenants and signs leases."]
        LeasingAgent = "Leasing Agent",
    }
}
