//! Read entities definitions.

pub mod ownership;
pub mod record;

pub use self::record::{Count, Referencing, Unique};
