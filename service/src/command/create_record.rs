//! [`Command`] for creating a new [`Record`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date,
};
use tracerr::Traced;

use crate::{
    domain::{rules, Entity, Key, Record, ValidationError},
    infra::{database, Database},
    read::{self, ownership},
    Service,
};

use super::{integrity, Command, Duplicate};

/// Error of [`CreateRecord`] [`Command`] execution.
pub type ExecutionError = super::ExecutionError;

/// [`Command`] for creating a new [`Record`] out of raw user input.
#[derive(Clone, Debug)]
pub struct CreateRecord {
    /// [`Entity`] of the [`Record`] to create.
    pub entity: Entity,

    /// Raw input by columns of the input [`Field`]s.
    ///
    /// Missing inputs are treated as blank ones.
    ///
    /// [`Field`]: crate::domain::Field
    pub input: HashMap<&'static str, String>,
}

impl CreateRecord {
    /// Creates a new [`CreateRecord`] [`Command`] without any input.
    #[must_use]
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            input: HashMap::new(),
        }
    }

    /// Adds the raw input of the provided `column`.
    #[must_use]
    pub fn with(
        mut self,
        column: &'static str,
        raw: impl Into<String>,
    ) -> Self {
        drop(self.input.insert(column, raw.into()));
        self
    }

    /// Validates the input in the [`Schema`] order.
    ///
    /// # Errors
    ///
    /// With the [`ValidationError`] of the first invalid input.
    ///
    /// [`Schema`]: crate::domain::Schema
    pub fn validate(&self) -> Result<Record, ValidationError> {
        let mut record = Record::empty(self.entity);
        for field in self.entity.schema().input_fields() {
            let raw = self.input.get(field.column).map_or("", String::as_str);
            record.set(field.column, field.parse(raw)?);
        }
        Ok(record)
    }
}

impl<Db> Command<CreateRecord> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Record>, Key>>,
            Ok = Option<Record>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Key>, read::Unique>>,
            Ok = Option<Key>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<ownership::Total, ownership::Of>>,
            Ok = ownership::Total,
            Err = Traced<database::Error>,
        > + Database<Insert<Record>, Ok = Key, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Record;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRecord) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let mut record =
            cmd.validate().map_err(tracerr::from_and_wrap!(=> E))?;
        rules::fill_defaults(&mut record, Date::today());
        rules::check(&record).map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Generated keys are assigned on insertion only.
        let key = record.key();
        if let Some(key) = &key {
            if tx
                .execute(Select(By::<Option<Record>, _>::new(key.clone())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .is_some()
            {
                return Err(tracerr::new!(E::DuplicateKey(Duplicate::Key(
                    key.clone()
                ))));
            }
        }
        let unique = record.schema().unique.iter().copied();
        integrity::unique(&tx, &record, unique, None)
            .await
            .map_err(tracerr::wrap!())?;
        integrity::references(&tx, record.fields())
            .await
            .map_err(tracerr::wrap!())?;
        integrity::ownership(&tx, &record)
            .await
            .map_err(tracerr::wrap!())?;

        let key = tx.execute(Insert(record.clone())).await.or_else(|e| {
            match key {
                Some(key) if e.as_ref().is_unique_violation() => Err(
                    tracerr::new!(E::DuplicateKey(Duplicate::Key(key))),
                ),
                _ => Err(e).map_err(tracerr::map_from_and_wrap!(=> E)),
            }
        })?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(record.with_key(&key))
    }
}

#[cfg(test)]
mod tests {
    use common::Date;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use crate::{
        command::{Duplicate, ExecutionError as E, IntegrityError},
        domain::{Entity, Key, ValidationError, Value},
        infra::database::{memory, Memory},
        Command as _, Service,
    };

    use super::CreateRecord;

    fn property() -> CreateRecord {
        CreateRecord::new(Entity::Property)
            .with("address", "1 Main St")
            .with("city", "Springfield")
            .with("state", "IL")
            .with("zip_code", "62704")
            .with("property_type", "Condo")
    }

    fn owner(id: i32) -> CreateRecord {
        CreateRecord::new(Entity::Owner)
            .with("owner_id", id.to_string())
            .with("first_name", "Jane")
            .with("last_name", "Doe")
            .with("email", format!("jane{id}@example.com"))
    }

    fn share(property_id: i32, owner_id: i32, percent: &str) -> CreateRecord {
        CreateRecord::new(Entity::PropertyOwner)
            .with("property_id", property_id.to_string())
            .with("owner_id", owner_id.to_string())
            .with("ownership_percentage", percent)
    }

    fn employee(id: i32, email: &str) -> CreateRecord {
        CreateRecord::new(Entity::Employee)
            .with("employee_id", id.to_string())
            .with("first_name", "John")
            .with("last_name", "Smith")
            .with("email", email)
            .with("phone", "(555) 123-4567")
            .with("role", "Accountant")
            .with("hire_date", "2024-02-01")
    }

    #[tokio::test]
    async fn assigns_sequential_property_ids() {
        let service = Service::new(Memory::default());

        let first = service.execute(property()).await.unwrap();
        let second = service.execute(property()).await.unwrap();

        assert_eq!(first.key(), Some(Key::new(Entity::Property, [1])));
        assert_eq!(second.key(), Some(Key::new(Entity::Property, [2])));
        assert_eq!(first.get("zip_code"), Some(&Value::Text("62704".into())));
        assert_eq!(first.get("square_feet"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn limits_total_ownership_of_property() {
        let db = Memory::default();
        let service = Service::new(db.clone());
        _ = service.execute(property()).await.unwrap();
        for id in 1..=3 {
            _ = service.execute(owner(id)).await.unwrap();
        }

        _ = service.execute(share(1, 1, "60")).await.unwrap();
        let writes = db.writes();
        let err = service.execute(share(1, 2, "50")).await.unwrap_err();
        match err.as_ref() {
            E::Integrity(e) => assert_eq!(
                *e,
                IntegrityError::OwnershipExceeded {
                    property_id: 1,
                    total: Decimal::from(110),
                },
            ),
            e => panic!("unexpected error: {e}"),
        }
        assert_eq!(db.writes(), writes, "nothing written");
        _ = service.execute(share(1, 3, "40")).await.unwrap();

        assert_eq!(db.snapshot()[&Entity::PropertyOwner].len(), 2);
    }

    #[tokio::test]
    async fn rejects_lease_ending_before_start() {
        let db = Memory::default();
        let service = Service::new(db.clone());

        let err = service
            .execute(
                CreateRecord::new(Entity::Lease)
                    .with("lease_id", "1")
                    .with("property_id", "1")
                    .with("tenant_id", "1")
                    .with("start_date", "2025-06-01")
                    .with("end_date", "2025-01-01")
                    .with("monthly_rent", "1200")
                    .with("lease_status", "Active"),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().to_string(),
            "start date must be before end date",
        );
        assert_eq!(db.writes(), 0);
    }

    #[tokio::test]
    async fn reports_first_invalid_field() {
        let service = Service::new(Memory::default());

        let err = service
            .execute(property().with("zip_code", "6270").with("state", ""))
            .await
            .unwrap_err();

        match err.as_ref() {
            E::Validation(e) => {
                assert_eq!(*e, ValidationError::of("State", "is required"));
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[tokio::test]
    async fn reports_duplicate_key_rejected_on_insert() {
        let db = Memory::default()
            .refusing(Entity::Owner, memory::Error::UniqueViolation);
        let service = Service::new(db.clone());

        let err = service.execute(owner(7)).await.unwrap_err();

        match err.as_ref() {
            E::DuplicateKey(e) => assert_eq!(
                *e,
                Duplicate::Key(Key::new(Entity::Owner, [7])),
            ),
            e => panic!("unexpected error: {e}"),
        }
        assert_eq!(db.writes(), 1);
        assert!(db.snapshot().is_empty(), "nothing committed");
    }

    #[tokio::test]
    async fn passes_through_insert_failure_of_generated_key() {
        let db = Memory::default()
            .refusing(Entity::Property, memory::Error::UniqueViolation);
        let service = Service::new(db.clone());

        let err = service.execute(property()).await.unwrap_err();

        assert!(matches!(err.as_ref(), E::Db(_)), "{err}");
        assert!(db.snapshot().is_empty(), "nothing committed");
    }

    #[tokio::test]
    async fn rejects_duplicate_key() {
        let service = Service::new(Memory::default());
        _ = service.execute(owner(7)).await.unwrap();

        let err = service.execute(owner(7)).await.unwrap_err();

        match err.as_ref() {
            E::DuplicateKey(e) => assert_eq!(
                *e,
                Duplicate::Key(Key::new(Entity::Owner, [7])),
            ),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_employee_email() {
        let service = Service::new(Memory::default());
        _ = service
            .execute(employee(1, "john@example.com"))
            .await
            .unwrap();

        let err = service
            .execute(employee(2, "john@example.com"))
            .await
            .unwrap_err();

        match err.as_ref() {
            E::DuplicateKey(e) => assert_eq!(
                *e,
                Duplicate::Value {
                    entity: Entity::Employee,
                    column: "email",
                    value: Value::Text("john@example.com".into()),
                },
            ),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[tokio::test]
    async fn rejects_missing_reference() {
        let service = Service::new(Memory::default());
        _ = service.execute(property()).await.unwrap();

        let err = service.execute(share(1, 9, "10")).await.unwrap_err();

        match err.as_ref() {
            E::Integrity(e) => assert_eq!(
                *e,
                IntegrityError::MissingReference(Key::new(Entity::Owner, [9])),
            ),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[tokio::test]
    async fn defaults_request_date_to_today() {
        let service = Service::new(Memory::default());
        _ = service.execute(property()).await.unwrap();
        _ = service
            .execute(
                CreateRecord::new(Entity::Tenant)
                    .with("tenant_id", "1")
                    .with("first_name", "Ann")
                    .with("last_name", "Lee")
                    .with("email", "ann@example.com"),
            )
            .await
            .unwrap();

        let request = service
            .execute(
                CreateRecord::new(Entity::MaintenanceRequest)
                    .with("request_id", "1")
                    .with("property_id", "1")
                    .with("tenant_id", "1")
                    .with("description", "Leaking faucet")
                    .with("status", "Open"),
            )
            .await
            .unwrap();

        assert_eq!(
            request.get("request_date"),
            Some(&Value::Date(Date::today())),
        );
        assert_eq!(request.get("employee_id"), Some(&Value::Null));
    }
}
