//! Clergy registry import
//!
//! Rows are processed one at a time against a snapshot of the registry
//! taken at batch start. A bad row becomes an ImportError and the batch
//! goes on; only an unreadable grid or an unusable layout stops it.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{debug, error, info, warn};

use crate::types::{ColumnLayout, ImportError, ImportResult, LayoutKind, RawRow};

use super::assembler::{assemble, RowError};
use super::duplicates::{Decision, DuplicateResolver};
use super::grid::{load_grid, split_header};
use super::store::PersonStore;

/// How an accepted row ended up in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowOutcome {
    Inserted,
    Updated,
}

pub struct PersonImportProcessor<'a> {
    store: &'a dyn PersonStore,
    update_existing: bool,
}

impl<'a> PersonImportProcessor<'a> {
    pub fn new(store: &'a dyn PersonStore, update_existing: bool) -> Self {
        Self {
            store,
            update_existing,
        }
    }

    /// Load a spreadsheet and import it
    pub async fn import_file(&self, path: &Path, kind: LayoutKind) -> Result<ImportResult> {
        let rows = load_grid(path)?;
        info!("Importing {} ({} rows, layout {:?})", path.display(), rows.len(), kind);
        self.import_grid(rows, kind).await
    }

    /// Split off the header, resolve the column layout and import the rest
    pub async fn import_grid(&self, rows: Vec<RawRow>, kind: LayoutKind) -> Result<ImportResult> {
        let (header, data) = split_header(rows);
        let layout = resolve_layout(kind, header.as_ref())?;
        self.import_rows(&data, &layout).await
    }

    /// Import data rows (header already removed)
    pub async fn import_rows(&self, rows: &[RawRow], layout: &ColumnLayout) -> Result<ImportResult> {
        let snapshot = self
            .store
            .list_all()
            .await
            .context("Failed to load existing records")?;
        info!(
            "Import started: {} rows, {} existing records in {} store, update_existing={}",
            rows.len(),
            snapshot.len(),
            self.store.name(),
            self.update_existing
        );

        let mut resolver = DuplicateResolver::new(snapshot, self.update_existing);
        let mut result = ImportResult::default();

        for row in rows {
            result.total_rows += 1;

            if row.is_blank() {
                debug!("Row {}: blank, skipped", row.number);
                continue;
            }

            match self.process_row(row, layout, &mut resolver).await {
                Ok(RowOutcome::Inserted) => {
                    result.success_count += 1;
                    result.inserted_count += 1;
                }
                Ok(RowOutcome::Updated) => {
                    result.success_count += 1;
                    result.updated_count += 1;
                }
                Err(e) => {
                    match &e {
                        RowError::Unexpected(msg) => error!("Row {}: {}", row.number, msg),
                        other => warn!("Row {} rejected: {}", row.number, other),
                    }
                    result.errors.push(ImportError {
                        row: row.number,
                        messages: e.messages(),
                        raw_data: row.clone(),
                    });
                }
            }
        }

        result.error_count = result.errors.len();
        info!(
            "Import finished: {} rows, {} inserted, {} updated, {} errors",
            result.total_rows, result.inserted_count, result.updated_count, result.error_count
        );

        Ok(result)
    }

    async fn process_row(
        &self,
        row: &RawRow,
        layout: &ColumnLayout,
        resolver: &mut DuplicateResolver,
    ) -> Result<RowOutcome, RowError> {
        let mut person = assemble(row, layout)?;

        match resolver.decide(&person) {
            Decision::Insert => {
                let id = self.store.insert(&person).await?;
                debug!("Row {}: inserted {} ({})", row.number, person.full_name(), id);
                person.id = Some(id);
                resolver.remember(person);
                Ok(RowOutcome::Inserted)
            }
            Decision::Update(id) => {
                person.id = Some(id);
                if !self.store.update(&person).await? {
                    return Err(RowError::UpdateNotApplied(person.full_name()));
                }
                debug!("Row {}: updated {} ({})", row.number, person.full_name(), id);
                resolver.remember(person);
                Ok(RowOutcome::Updated)
            }
            Decision::Reject => Err(RowError::Duplicate(person.full_name())),
        }
    }
}

/// Column layout for a batch. The flat layout needs a header row and the
/// result must be able to produce a name.
pub fn resolve_layout(kind: LayoutKind, header: Option<&RawRow>) -> Result<ColumnLayout> {
    let layout = match (kind, header) {
        (LayoutKind::Odessa, _) => ColumnLayout::odessa(),
        (LayoutKind::Flat, Some(header)) => ColumnLayout::from_headers(&header.cells),
        (LayoutKind::Flat, None) => bail!("Для формата flat нужна строка заголовков"),
    };

    if !layout.has_identity() {
        bail!("В заголовках не найдены столбцы с именем и фамилией");
    }

    debug!("Resolved layout: {:?}", layout);
    Ok(layout)
}
