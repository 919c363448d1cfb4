//! Cross-field [`Rule`]s applied to a whole [`Record`].

use common::Date;

use super::{Record, Rule, ValidationError, Value};

/// Fills the absent [`Value`]s of the provided [`Record`] having a default.
pub fn fill_defaults(record: &mut Record, today: Date) {
    for field in record.schema().fields {
        if field.defaults_to_today
            && record.get(field.column).is_some_and(Value::is_null)
        {
            record.set(field.column, Value::Date(today));
        }
    }
}

/// Checks the provided [`Record`] against the [`Rule`]s of its [`Schema`].
///
/// # Errors
///
/// With the reason of the first violated [`Rule`].
///
/// [`Schema`]: super::Schema
pub fn check(record: &Record) -> Result<(), ValidationError> {
    for rule in record.schema().rules {
        match *rule {
            Rule::Ordered {
                first,
                then,
                strict,
                reason,
            } => {
                let first = record.get(first).and_then(Value::as_date);
                let then = record.get(then).and_then(Value::as_date);
                if let (Some(first), Some(then)) = (first, then) {
                    let ordered =
                        if strict { first < then } else { first <= then };
                    if !ordered {
                        return Err(ValidationError::record(reason));
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use common::Date;
    use rust_decimal::Decimal;

    use crate::domain::{Entity, Record, Value};

    use super::{check, fill_defaults};

    fn date(y: i32, m: u8, d: u8) -> Value {
        Value::Date(Date::from_ymd(y, m, d).unwrap())
    }

    fn lease(start: Value, end: Value) -> Record {
        Record::new(
            Entity::Lease,
            vec![
                Value::Int(1),
                Value::Int(1),
                Value::Int(1),
                start,
                end,
                Value::Decimal(Decimal::from(1200)),
                Value::Null,
                Value::Text("Active".into()),
            ],
        )
    }

    fn request(requested: Value, completed: Value) -> Record {
        Record::new(
            Entity::MaintenanceRequest,
            vec![
                Value::Int(1),
                Value::Int(1),
                Value::Int(1),
                Value::Null,
                Value::Text("Broken window".into()),
                requested,
                completed,
                Value::Text("Open".into()),
            ],
        )
    }

    #[test]
    fn lease_must_start_before_end() {
        assert!(check(&lease(date(2025, 1, 1), date(2025, 6, 1))).is_ok());

        let err =
            check(&lease(date(2025, 6, 1), date(2025, 1, 1))).unwrap_err();
        assert_eq!(err.to_string(), "start date must be before end date");

        assert!(check(&lease(date(2025, 1, 1), date(2025, 1, 1))).is_err());
    }

    #[test]
    fn completion_is_not_before_request() {
        assert!(check(&request(date(2025, 3, 1), date(2025, 3, 1))).is_ok());
        assert!(check(&request(date(2025, 3, 1), Value::Null)).is_ok());
        assert!(check(&request(date(2025, 3, 2), date(2025, 3, 1))).is_err());
    }

    #[test]
    fn request_date_defaults_to_today() {
        let today = Date::from_ymd(2025, 7, 4).unwrap();

        let mut blank = request(Value::Null, Value::Null);
        fill_defaults(&mut blank, today);
        assert_eq!(blank.get("request_date"), Some(&Value::Date(today)));
        assert_eq!(blank.get("completion_date"), Some(&Value::Null));

        let mut given = request(date(2025, 1, 2), Value::Null);
        fill_defaults(&mut given, today);
        assert_eq!(given.get("request_date"), Some(&date(2025, 1, 2)));
    }
}
