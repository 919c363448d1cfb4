//! Domain definitions.

pub mod employee;
pub mod entity;
pub mod field;
pub mod format;
pub mod lease;
pub mod maintenance_request;
pub mod owner;
pub mod payment;
pub mod property;
pub mod property_owner;
pub mod record;
pub mod rules;
pub mod tenant;

pub use self::{
    entity::{Dependent, Effect, Entity, Rule, Schema},
    field::{Field, Format, Role, ValidationError},
    record::{Changes, Key, Record, Value},
};
