//! [`Field`] descriptors and their [`Format`]s.

use std::{fmt, str::FromStr};

use common::{Date, Money, Percent};
use derive_more::Error;

use super::{
    employee, format, lease, maintenance_request, payment, property, Entity,
    Value,
};

/// Placeholder shown for an absent value by default.
pub const ABSENT: &str = "N/A";

/// Descriptor of a single column of an [`Entity`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Field {
    /// Name of the database column.
    pub column: &'static str,

    /// Human-readable label.
    pub label: &'static str,

    /// [`Format`] of the values.
    pub format: Format,

    /// Indicator whether a value must be present.
    pub required: bool,

    /// [`Role`] in the [`Entity`].
    pub role: Role,

    /// [`Entity`] whose key this [`Field`] references, if any.
    pub references: Option<Entity>,

    /// Text shown instead of an absent value.
    pub absent: &'static str,

    /// Indicator whether a blank value is replaced with today's [`Date`] on
    /// creation.
    pub defaults_to_today: bool,
}

impl Field {
    /// Creates a new required [`Field`] of the provided [`Format`].
    #[must_use]
    pub const fn required(
        column: &'static str,
        label: &'static str,
        format: Format,
    ) -> Self {
        Self {
            column,
            label,
            format,
            required: true,
            role: Role::Attribute,
            references: None,
            absent: ABSENT,
            defaults_to_today: false,
        }
    }

    /// Creates a new optional [`Field`] of the provided [`Format`].
    #[must_use]
    pub const fn optional(
        column: &'static str,
        label: &'static str,
        format: Format,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(column, label, format)
        }
    }

    /// Creates a new key [`Field`] entered by a user.
    #[must_use]
    pub const fn key(column: &'static str, label: &'static str) -> Self {
        Self {
            role: Role::Key,
            ..Self::required(column, label, Format::Id)
        }
    }

    /// Creates a new key [`Field`] generated by the database.
    #[must_use]
    pub const fn generated_key(
        column: &'static str,
        label: &'static str,
    ) -> Self {
        Self {
            role: Role::GeneratedKey,
            ..Self::required(column, label, Format::Id)
        }
    }

    /// Makes this [`Field`] reference the key of the provided [`Entity`].
    #[must_use]
    pub const fn references(self, entity: Entity) -> Self {
        Self {
            references: Some(entity),
            ..self
        }
    }

    /// Makes this [`Field`] show the provided `text` for an absent value.
    #[must_use]
    pub const fn absent_as(self, text: &'static str) -> Self {
        Self {
            absent: text,
            ..self
        }
    }

    /// Makes this [`Field`] default to today's [`Date`] on creation.
    #[must_use]
    pub const fn today_by_default(self) -> Self {
        Self {
            defaults_to_today: true,
            ..self
        }
    }

    /// Validates the provided `raw` input and normalizes it into a [`Value`].
    ///
    /// Surrounding whitespace is trimmed. Blank input of an optional
    /// [`Field`] is [`Value::Null`].
    ///
    /// # Errors
    ///
    /// If the `raw` input is blank for a required [`Field`], or doesn't
    /// satisfy the [`Format`] of this [`Field`].
    pub fn parse(&self, raw: &str) -> Result<Value, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return if self.required {
                Err(ValidationError::of(self.label, "is required"))
            } else {
                Ok(Value::Null)
            };
        }
        self.format
            .parse(raw)
            .map_err(|reason| ValidationError::of(self.label, reason))
    }

    /// Renders the provided `value` of this [`Field`] for display.
    #[must_use]
    pub fn render(&self, value: &Value) -> String {
        if value.is_null() {
            self.absent.to_owned()
        } else {
            self.format.render(value)
        }
    }

    /// Returns the input hint of this [`Field`], if any.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        let hint = self.format.hint()?;
        Some(if self.defaults_to_today {
            format!("{hint}, blank for today")
        } else {
            hint
        })
    }
}

/// Role of a [`Field`] in its [`Entity`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Role {
    /// Primary key generated by the database.
    GeneratedKey,

    /// Primary key (or its part) entered by a user.
    Key,

    /// Updatable attribute.
    Attribute,
}

/// Format of [`Field`] values, selecting the validator applied to them.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// [`format::Id`].
    Id,

    /// [`format::Text`].
    Text,

    /// [`format::ZipCode`].
    ZipCode,

    /// [`format::Email`].
    Email,

    /// [`format::Phone`].
    Phone,

    /// [`Date`].
    Date,

    /// [`format::Year`].
    Year,

    /// [`format::Area`].
    Area,

    /// Positive [`Money`] amount.
    Money,

    /// Non-negative [`Money`] amount.
    Deposit,

    /// [`Percent`] value.
    Percentage,

    /// [`property::Kind`].
    PropertyKind,

    /// [`lease::Status`].
    LeaseStatus,

    /// [`maintenance_request::Status`].
    MaintenanceStatus,

    /// [`payment::Method`].
    PaymentMethod,

    /// [`employee::Role`].
    EmployeeRole,
}

impl Format {
    /// Validates the provided trimmed non-empty `raw` input.
    ///
    /// # Errors
    ///
    /// With a human-readable reason, if the `raw` input doesn't satisfy this
    /// [`Format`].
    pub fn parse(self, raw: &str) -> Result<Value, String> {
        Ok(match self {
            Self::Id => Value::Int(format::Id::from_str(raw)?.into()),
            Self::Text => Value::Text(format::Text::from_str(raw)?.into()),
            Self::ZipCode => {
                Value::Text(format::ZipCode::from_str(raw)?.into())
            }
            Self::Email => Value::Text(format::Email::from_str(raw)?.into()),
            Self::Phone => Value::Text(format::Phone::from_str(raw)?.into()),
            Self::Date => Value::Date(
                Date::from_str(raw).map_err(|e| e.to_string())?,
            ),
            Self::Year => Value::Int(format::Year::from_str(raw)?.into()),
            Self::Area => Value::Int(format::Area::from_str(raw)?.into()),
            Self::Money => {
                let money =
                    Money::from_str(raw).map_err(|e| e.to_string())?;
                if !money.is_positive() {
                    return Err("must be greater than 0".into());
                }
                Value::Decimal(money.into())
            }
            Self::Deposit => Value::Decimal(
                Money::from_str(raw).map_err(|e| e.to_string())?.into(),
            ),
            Self::Percentage => Value::Decimal(
                Percent::from_str(raw).map_err(|e| e.to_string())?.into(),
            ),
            Self::PropertyKind => one_of(
                raw,
                property::Kind::as_str,
                property::Kind::labels,
            )?,
            Self::LeaseStatus => {
                one_of(raw, lease::Status::as_str, lease::Status::labels)?
            }
            Self::MaintenanceStatus => one_of(
                raw,
                maintenance_request::Status::as_str,
                maintenance_request::Status::labels,
            )?,
            Self::PaymentMethod => one_of(
                raw,
                payment::Method::as_str,
                payment::Method::labels,
            )?,
            Self::EmployeeRole => {
                one_of(raw, employee::Role::as_str, employee::Role::labels)?
            }
        })
    }

    /// Renders the provided present `value` of this [`Format`].
    #[must_use]
    pub fn render(self, value: &Value) -> String {
        match (self, value) {
            (Self::Money | Self::Deposit, Value::Decimal(amount)) => {
                Money::new(*amount)
                    .map_or_else(|| amount.to_string(), |m| m.to_string())
            }
            (Self::Percentage, Value::Decimal(percent)) => {
                format!("{}%", percent.normalize())
            }
            _ => value.to_string(),
        }
    }

    /// Returns the input hint of this [`Format`], if any.
    #[must_use]
    pub fn hint(self) -> Option<String> {
        Some(match self {
            Self::Date => "YYYY-MM-DD".into(),
            Self::ZipCode => "12345 or 12345-6789".into(),
            Self::Year => "YYYY".into(),
            Self::Money | Self::Deposit => "e.g. 1250.00".into(),
            Self::Percentage => "0-100".into(),
            Self::PropertyKind => property::Kind::labels(),
            Self::LeaseStatus => lease::Status::labels(),
            Self::MaintenanceStatus => maintenance_request::Status::labels(),
            Self::PaymentMethod => payment::Method::labels(),
            Self::EmployeeRole => employee::Role::labels(),
            Self::Id
            | Self::Text
            | Self::Email
            | Self::Phone
            | Self::Area => return None,
        })
    }

    /// Returns the SQL type the values of this [`Format`] are stored as.
    #[must_use]
    pub const fn sql_type(self) -> SqlType {
        match self {
            Self::Id | Self::Year | Self::Area => SqlType::Int4,
            Self::Text
            | Self::ZipCode
            | Self::Email
            | Self::Phone
            | Self::PropertyKind
            | Self::LeaseStatus
            | Self::MaintenanceStatus
            | Self::PaymentMethod
            | Self::EmployeeRole => SqlType::Varchar,
            Self::Date => SqlType::Date,
            Self::Money | Self::Deposit | Self::Percentage => SqlType::Numeric,
        }
    }
}

/// Parses the provided `raw` input as one of the labels of a kind enum.
fn one_of<K: FromStr>(
    raw: &str,
    as_str: fn(K) -> &'static str,
    labels: fn() -> String,
) -> Result<Value, String> {
    K::from_str(raw)
        .map(|kind| Value::Text(as_str(kind).to_owned()))
        .map_err(|_| format!("must be one of: {}", labels()))
}

/// SQL type of a column.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SqlType {
    /// `INT4`.
    Int4,

    /// `VARCHAR`.
    Varchar,

    /// `NUMERIC`.
    Numeric,

    /// `DATE`.
    Date,
}

impl SqlType {
    /// Returns the SQL name of this [`SqlType`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int4 => "INT4",
            Self::Varchar => "VARCHAR",
            Self::Numeric => "NUMERIC",
            Self::Date => "DATE",
        }
    }
}

/// Error of validating user input.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct ValidationError {
    /// Label of the invalid [`Field`], if the error concerns a single one.
    pub field: Option<&'static str>,

    /// Human-readable reason of the error.
    pub reason: String,
}

impl ValidationError {
    /// Creates a new [`ValidationError`] of the [`Field`] with the provided
    /// `label`.
    #[must_use]
    pub fn of(label: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field: Some(label),
            reason: reason.into(),
        }
    }

    /// Creates a new [`ValidationError`] of a whole record.
    #[must_use]
    pub fn record(reason: impl Into<String>) -> Self {
        Self {
            field: None,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = self.field {
            write!(f, "{label} ")?;
        }
        write!(f, "{}", self.reason)
    }
}

#[cfg(test)]
mod tests {
    use common::Date;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use crate::domain::{Entity, Value};

    use super::{Field, Format, ValidationError};

    #[test]
    fn trims_before_validating() {
        let field = Field::required("zip_code", "Zip Code", Format::ZipCode);

        assert_eq!(field.parse("  62704 "), Ok(Value::Text("62704".into())));
    }

    #[test]
    fn blank_input() {
        let required = Field::required("city", "City", Format::Text);
        let optional = Field::optional("phone", "Phone", Format::Phone);

        assert_eq!(
            required.parse("   "),
            Err(ValidationError::of("City", "is required")),
        );
        assert_eq!(
            required.parse("").unwrap_err().to_string(),
            "City is required",
        );
        assert_eq!(optional.parse(" "), Ok(Value::Null));
    }

    #[test]
    fn enumerations_match_exactly() {
        assert_eq!(
            Format::PropertyKind.parse("Single Family"),
            Ok(Value::Text("Single Family".into())),
        );
        assert_eq!(
            Format::MaintenanceStatus.parse("in progress"),
            Err("must be one of: Open, In Progress, Completed".into()),
        );
        assert!(Format::PaymentMethod.parse("Bank Transfer").is_ok());
        assert!(Format::EmployeeRole.parse("Accountant").is_ok());
        assert!(Format::LeaseStatus.parse("Active ").is_err());
    }

    #[test]
    fn dates_must_exist_in_calendar() {
        assert_eq!(
            Format::Date.parse("2024-02-29"),
            Ok(Value::Date(Date::from_ymd(2024, 2, 29).unwrap())),
        );
        assert!(Format::Date.parse("2025-13-40").is_err());
        assert!(Format::Date.parse("2023-02-29").is_err());
        assert!(Format::Date.parse("2025-1-01").is_err());
    }

    #[test]
    fn money_amounts() {
        assert_eq!(
            Format::Money.parse("$1250.5"),
            Ok(Value::Decimal(Decimal::new(12505, 1))),
        );
        assert!(Format::Money.parse("0").is_err());
        assert!(Format::Money.parse("12.345").is_err());
        assert!(Format::Money.parse("-5").is_err());
        assert_eq!(
            Format::Deposit.parse("0"),
            Ok(Value::Decimal(Decimal::ZERO)),
        );
    }

    #[test]
    fn percentages() {
        assert_eq!(
            Format::Percentage.parse("60"),
            Ok(Value::Decimal(Decimal::from(60))),
        );
        assert!(Format::Percentage.parse("101").is_err());
        assert_eq!(
            Format::Percentage.parse("33.33"),
            Ok(Value::Decimal(Decimal::new(3333, 2))),
        );
        assert_eq!(
            Format::Percentage.parse("33.3333"),
            Err("must have at most 2 decimal places".into()),
        );
        assert_eq!(
            Field::required(
                "ownership_percentage",
                "Ownership Percentage",
                Format::Percentage,
            )
            .parse("12.505"),
            Err(ValidationError::of(
                "Ownership Percentage",
                "must have at most 2 decimal places",
            )),
        );
    }

    #[test]
    fn renders_values() {
        let rent =
            Field::required("monthly_rent", "Monthly Rent", Format::Money);
        let share = Field::required(
            "ownership_percentage",
            "Ownership Percentage",
            Format::Percentage,
        );
        let employee =
            Field::optional("employee_id", "Employee ID", Format::Id)
                .references(Entity::Employee)
                .absent_as("Unassigned");

        assert_eq!(
            rent.render(&Value::Decimal(Decimal::new(12345, 1))),
            "$1234.50",
        );
        assert_eq!(
            share.render(&Value::Decimal(Decimal::new(12500, 3))),
            "12.5%",
        );
        assert_eq!(employee.render(&Value::Null), "Unassigned");
        assert_eq!(employee.render(&Value::Int(7)), "7");
    }
}
