// Dataset ingestion: reads the performance and salary CSV files into
// canonical-key rows.
//
// Headers are matched case-insensitively and a leading BOM is tolerated.
// Cells are kept as text; typing happens in `hoopval_core::normalize`.

use hoopval_core::config::DataPaths;
use hoopval_core::normalize::{canonical_key, columns, normalize_keys, CanonicalRow};
use hoopval_core::SALARY_WINDOW;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A parsed CSV table: canonical column names plus canonical-key rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<CanonicalRow>,
}

/// Both datasets, loaded and key-normalized.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub performance: Vec<CanonicalRow>,
    pub salaries: Vec<CanonicalRow>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error in {path}: {message}")]
    Validation { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

/// Parse CSV text into a `Table`. Blank lines are skipped; rows that fail to
/// parse are logged and skipped.
///
/// Rows shorter than the header are kept: the missing trailing cells are
/// simply absent from the row. Cells beyond the header are ignored.
pub fn read_table<R: Read>(rdr: R) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);

    let columns: Vec<String> = reader.headers()?.iter().map(canonical_key).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(normalize_keys(columns.iter().zip(record.iter()))),
            Err(e) => {
                warn!("skipping malformed CSV row: {}", e);
            }
        }
    }

    Ok(Table { columns, rows })
}

fn require_columns(table: &Table, required: &[&str], path: &Path) -> Result<(), IngestError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !table.columns.iter().any(|c| c == col))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(IngestError::Validation {
        path: path.display().to_string(),
        message: format!("missing column(s): {}", missing.join(", ")),
    })
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Read and parse one CSV file.
pub async fn load_table(path: &Path) -> Result<Table, IngestError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    read_table(bytes.as_slice()).map_err(|e| IngestError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the performance dataset. Requires `player_id` and `player` columns.
pub async fn load_performance(path: &Path) -> Result<Vec<CanonicalRow>, IngestError> {
    let table = load_table(path).await?;
    require_columns(&table, &[columns::PLAYER_ID, columns::PLAYER], path)?;
    if !table.columns.iter().any(|c| c == columns::PIE) {
        warn!("{} has no '{}' column; every impact score will be missing", path.display(), columns::PIE);
    }
    Ok(table.rows)
}

/// Load the salary dataset. Requires a `player_id` column; season columns
/// that are absent just leave those seasons unsigned.
pub async fn load_salaries(path: &Path) -> Result<Vec<CanonicalRow>, IngestError> {
    let table = load_table(path).await?;
    require_columns(&table, &[columns::PLAYER_ID], path)?;
    for season in SALARY_WINDOW {
        let label = season.label();
        if !table.columns.contains(&label) {
            warn!("{} has no '{}' column", path.display(), label);
        }
    }
    Ok(table.rows)
}

/// Load both datasets concurrently.
pub async fn load_datasets(paths: &DataPaths) -> Result<Datasets, IngestError> {
    let (performance, salaries) = tokio::try_join!(
        load_performance(Path::new(&paths.performance)),
        load_salaries(Path::new(&paths.salaries)),
    )?;

    info!("PIE rows loaded: {}", performance.len());
    info!("Salary rows loaded: {}", salaries.len());

    Ok(Datasets {
        performance,
        salaries,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
