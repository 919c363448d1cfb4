//! Interactive [`Menu`] of the application.

use std::{fmt, io, num::NonZeroUsize, slice};

use common::Selection;
use service::{
    command::{
        delete_record::{self, Impact},
        update_record::{self, Preview},
        Confirm, CreateRecord, DeleteRecord, UpdateRecord,
    },
    domain::{Entity, Field, Key, Record},
    query::records,
    Command as _,
};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, Stdin, Stdout};
use tracerr::Traced;
use tracing as log;

use crate::{
    console::{self, Console},
    AsError, Service,
};

/// Actions available for every [`Entity`].
const ACTIONS: [&str; 5] =
    ["Create", "Display All", "Update", "Delete", "Back"];

/// Hint of the field selection input.
const SELECTION_HINT: &str =
    "Enter multiple numbers separated by commas (e.g., 1,3) or 'all'";

/// Interactive menu driving the [`Service`] through a [`Console`].
#[derive(Debug)]
pub struct Menu<R = BufReader<Stdin>, W = Stdout> {
    /// [`Service`] to execute the chosen actions with.
    service: Service,

    /// [`Console`] to interact with a user through.
    console: Console<R, W>,

    /// Maximum number of records shown at once.
    page_size: NonZeroUsize,
}

impl<R, W> Menu<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new [`Menu`] out of the provided parts.
    #[must_use]
    pub fn new(
        service: Service,
        console: Console<R, W>,
        page_size: NonZeroUsize,
    ) -> Self {
        Self {
            service,
            console,
            page_size,
        }
    }

    /// Runs this [`Menu`] until a user exits it or the input is exhausted.
    ///
    /// # Errors
    ///
    /// If failed to interact with the [`Console`].
    pub async fn run(&mut self) -> io::Result<()> {
        match self.main().await {
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(()),
            res => res,
        }
    }

    /// Loops over the main menu choosing an [`Entity`] to manage.
    async fn main(&mut self) -> io::Result<()> {
        let exit = Entity::ALL.len() + 1;
        loop {
            self.console
                .println("\n=== Real Estate Management System ===")
                .await?;
            for (n, entity) in (1..).zip(Entity::ALL) {
                self.console
                    .println(&format!("{n}. Manage {}", entity.plural()))
                    .await?;
            }
            self.console.println(&format!("{exit}. Exit")).await?;

            let choice = self.ask("Enter your choice: ").await?;
            match choice.parse::<usize>() {
                Ok(n) if n == exit => {
                    self.console.println("Goodbye!").await?;
                    return Ok(());
                }
                Ok(n) => {
                    if let Some(entity) =
                        n.checked_sub(1).and_then(|i| Entity::ALL.get(i))
                    {
                        self.manage(*entity).await?;
                    } else {
                        self.invalid_choice().await?;
                    }
                }
                Err(_) => self.invalid_choice().await?,
            }
        }
    }

    /// Loops over the actions menu of the provided [`Entity`].
    async fn manage(&mut self, entity: Entity) -> io::Result<()> {
        loop {
            self.console
                .println(&format!("\n--- {} ---", entity.plural()))
                .await?;
            for (n, action) in (1..).zip(ACTIONS) {
                self.console.println(&format!("{n}. {action}")).await?;
            }

            match self.ask("Enter your choice: ").await?.as_str() {
                "1" => self.create(entity).await?,
                "2" => self.list(entity).await?,
                "3" => self.update(entity).await?,
                "4" => self.delete(entity).await?,
                "5" => return Ok(()),
                _ => self.invalid_choice().await?,
            }
        }
    }

    /// Creates a new [`Record`] of the provided [`Entity`].
    async fn create(&mut self, entity: Entity) -> io::Result<()> {
        let mut cmd = CreateRecord::new(entity);
        for field in entity.schema().input_fields() {
            let raw = self.ask(&format!("{}: ", describe(field))).await?;
            cmd = cmd.with(field.column, raw);
        }

        match self.service.execute(cmd).await {
            Ok(record) => {
                if let Some(key) = record.key() {
                    log::info!("created `{key}`");
                }
                self.console
                    .println(&format!("{entity} created successfully."))
                    .await?;
                self.show(entity, &[record]).await
            }
            Err(e) => self.report("create", entity, &e).await,
        }
    }

    /// Lists all the [`Record`]s of the provided [`Entity`] page by page.
    async fn list(&mut self, entity: Entity) -> io::Result<()> {
        let query = records::Paged {
            entity,
            page_size: self.page_size.get(),
        };
        let pages = match self.service.execute(query).await {
            Ok(pages) => pages,
            Err(e) => return self.report("list", entity, &e).await,
        };

        let mut shown = false;
        for page in pages {
            shown = true;
            self.show(entity, &page.items).await?;
            if !page.has_more {
                break;
            }
            self.console
                .println(&format!("-- Page {} --", page.number))
                .await?;
            if !self.console.confirm("Show next page?").await? {
                break;
            }
        }
        if !shown {
            self.console.println("No records found.").await?;
        }
        Ok(())
    }

    /// Updates the selected [`Field`]s of a [`Record`] of the provided
    /// [`Entity`].
    async fn update(&mut self, entity: Entity) -> io::Result<()> {
        let Some(key) = self.key(entity).await? else {
            return Ok(());
        };
        let found = self.service.execute(records::ById::by(key.clone())).await;
        let current = match found {
            Ok(Some(record)) => record,
            Ok(None) => {
                return self
                    .console
                    .println(&format!("No record found: `{key}`."))
                    .await;
            }
            Err(e) => return self.report("update", entity, &e).await,
        };
        self.show(entity, slice::from_ref(&current)).await?;

        let fields = entity.schema().updatable_fields().collect::<Vec<_>>();
        self.console.println("Select fields to update:").await?;
        for (n, field) in (1..).zip(&fields) {
            self.console
                .println(&format!("{n}. {}", field.label))
                .await?;
        }
        let input = self.ask(&format!("{SELECTION_HINT}: ")).await?;
        let selection = Selection::parse(&input, fields.len());
        for token in &selection.rejected {
            self.console
                .println(&format!("Invalid choice: {token}. Skipping..."))
                .await?;
        }

        let mut changes = vec![];
        for field in selection.picked.iter().filter_map(|i| fields.get(*i)) {
            let old = current
                .get(field.column)
                .map(|v| field.render(v))
                .unwrap_or_default();
            let raw = self
                .ask(&format!("New {} (current: {old}): ", describe(field)))
                .await?;
            changes.push((*field, raw));
        }

        let outcome = self
            .service
            .execute(UpdateRecord {
                key: key.clone(),
                changes,
                confirm: Prompt(&mut self.console),
            })
            .await;
        match outcome {
            Ok(update_record::Outcome::Updated(_)) => {
                log::info!("updated `{key}`");
                self.console
                    .println(&format!("{entity} updated successfully."))
                    .await
            }
            Ok(update_record::Outcome::NothingSelected) => {
                self.console.println("No valid fields selected").await
            }
            Ok(update_record::Outcome::Declined) => {
                self.console.println("Update cancelled.").await
            }
            Err(e) => self.report("update", entity, &e).await,
        }
    }

    /// Deletes a [`Record`] of the provided [`Entity`].
    async fn delete(&mut self, entity: Entity) -> io::Result<()> {
        let Some(key) = self.key(entity).await? else {
            return Ok(());
        };

        let outcome = self
            .service
            .execute(DeleteRecord {
                key: key.clone(),
                confirm: Prompt(&mut self.console),
            })
            .await;
        match outcome {
            Ok(delete_record::Outcome::Deleted(_)) => {
                log::info!("deleted `{key}`");
                self.console
                    .println(&format!("{entity} deleted successfully."))
                    .await
            }
            Ok(delete_record::Outcome::Declined) => {
                self.console.println("Deletion cancelled.").await
            }
            Err(e) => self.report("delete", entity, &e).await,
        }
    }

    /// Asks for the [`Key`] of a [`Record`] of the provided [`Entity`].
    ///
    /// Returns [`None`] if the entered [`Key`] is invalid.
    async fn key(&mut self, entity: Entity) -> io::Result<Option<Key>> {
        let mut parts = vec![];
        for field in entity.schema().key_fields() {
            parts.push(self.ask(&format!("Enter {}: ", field.label)).await?);
        }
        let parts = parts.iter().map(String::as_str).collect::<Vec<_>>();
        match Key::parse(entity, &parts) {
            Ok(key) => Ok(Some(key)),
            Err(e) => {
                self.console.println(&format!("Invalid input: {e}")).await?;
                Ok(None)
            }
        }
    }

    /// Shows the provided [`Record`]s of the [`Entity`] as a table.
    async fn show(
        &mut self,
        entity: Entity,
        records: &[Record],
    ) -> io::Result<()> {
        let headers = entity
            .schema()
            .fields
            .iter()
            .map(|f| f.label)
            .collect::<Vec<_>>();
        let rows = records
            .iter()
            .map(|r| r.display().into_iter().map(|(_, v)| v).collect())
            .collect::<Vec<Vec<_>>>();
        self.console.print(&console::table(&headers, &rows)).await
    }

    /// Reports the provided failure of an `action` to a user.
    async fn report<E>(
        &mut self,
        action: &str,
        entity: Entity,
        err: &Traced<E>,
    ) -> io::Result<()>
    where
        E: AsError + fmt::Display,
    {
        let error = err.as_error();
        log::warn!("failed to {action} `{entity}`: {error}");
        self.console
            .println(&format!("Error: {}", error.short()))
            .await
    }

    /// Reports an invalid menu choice.
    async fn invalid_choice(&mut self) -> io::Result<()> {
        self.console
            .println("Invalid choice. Please try again.")
            .await
    }

    /// Asks the provided `question`, failing once the input is exhausted.
    async fn ask(&mut self, question: &str) -> io::Result<String> {
        self.console
            .prompt(question)
            .await?
            .ok_or_else(|| io::ErrorKind::UnexpectedEof.into())
    }
}

/// Describes the provided [`Field`] for an input prompt.
fn describe(field: &Field) -> String {
    let mut text = field.label.to_owned();
    if let Some(hint) = field.hint() {
        text = format!("{text} ({hint})");
    }
    if !field.required && !field.defaults_to_today {
        text.push_str(" [optional]");
    }
    text
}

/// [`Confirm`]ation asked through a [`Console`].
#[derive(Debug)]
struct Prompt<'c, R, W>(&'c mut Console<R, W>);

impl<R, W> Prompt<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Shows the provided [`Preview`] and asks to apply it.
    async fn preview(&mut self, preview: &Preview) -> io::Result<bool> {
        self.0.println("\nChanges to be applied:").await?;
        for (label, old, new) in preview.diff() {
            self.0.println(&format!("  {label}: {old} -> {new}")).await?;
        }
        self.0.confirm("Apply these changes?").await
    }

    /// Shows the provided [`Impact`] and asks to proceed with it.
    async fn impact(&mut self, impact: &Impact) -> io::Result<bool> {
        let entity = impact.record.entity();
        self.0
            .println(&format!("\n{entity} to be deleted:"))
            .await?;
        for (label, value) in impact.record.display() {
            self.0.println(&format!("  {label}: {value}")).await?;
        }
        let mut affected = impact.affected().peekable();
        if affected.peek().is_some() {
            self.0.println("This will also affect:").await?;
        }
        for (dep, count, effect) in affected {
            self.0
                .println(&format!(
                    "  - {count} {} will be {effect}",
                    dep.entity.plural(),
                ))
                .await?;
        }
        self.0
            .confirm(&format!(
                "Are you sure you want to delete this {entity}?",
            ))
            .await
    }
}

impl<R, W> Confirm<Preview> for Prompt<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn confirm(&mut self, subject: &Preview) -> bool {
        self.preview(subject).await.unwrap_or_else(|e| {
            log::warn!("failed to confirm update: {e}");
            false
        })
    }
}

impl<R, W> Confirm<Impact> for Prompt<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn confirm(&mut self, subject: &Impact) -> bool {
        self.impact(subject).await.unwrap_or_else(|e| {
            log::warn!("failed to confirm deletion: {e}");
            false
        })
    }
}
