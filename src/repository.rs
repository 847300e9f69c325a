use std::str::FromStr;

use futures::TryStreamExt;
use rand::Rng;
use sqlx::{
    Pool, QueryBuilder, Row, Sqlite, SqliteConnection,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
    },
};

use crate::{
    error::{AppError, Result},
    generator::BatchPlan,
    models::{Employee, EmployeeSummary, Gender, NewEmployee},
    progress::Progress,
    schema::EMPLOYEE_TABLE,
};

/// Owns the storage handle. Every operation takes its connection or
/// transaction from the pool and gives it back before returning.
pub struct Repository {
    pool: Pool<Sqlite>,
}

impl Repository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Memory)
            // Lower the synchronous mode to reduce disk flushing during bulk loads
            .synchronous(SqliteSynchronous::Off)
            // 40MB cache (negative value is KB)
            .pragma("cache_size", "-40000");

        // A single connection that never expires, so `sqlite::memory:` survives
        // for the lifetime of the handle.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    pub async fn table_exists(&self) -> Result<bool> {
        let found: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(EMPLOYEE_TABLE.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(found > 0)
    }

    async fn require_table(&self) -> Result<()> {
        if self.table_exists().await? {
            Ok(())
        } else {
            Err(AppError::MissingTable(EMPLOYEE_TABLE.name))
        }
    }

    pub async fn create_schema(&self) -> Result<()> {
        tracing::info!("Creating {} table", EMPLOYEE_TABLE.name);

        let mut tx = self.pool.begin().await?;
        sqlx::query(&EMPLOYEE_TABLE.create_table_sql())
            .execute(&mut *tx)
            .await?;
        for index in EMPLOYEE_TABLE.create_index_sql() {
            sqlx::query(&index).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    /// Stores one record given as operator input. The birth date must be
    /// `YYYY-MM-DD` and the gender `Male` or `Female`.
    pub async fn insert_one(&self, fullname: &str, birth_date: &str, gender: &str) -> Result<()> {
        let employee = NewEmployee::parse(fullname, birth_date, gender)?;
        self.insert_employee(&employee).await
    }

    pub async fn insert_employee(&self, employee: &NewEmployee) -> Result<()> {
        self.require_table().await?;

        let mut tx = self.pool.begin().await?;
        insert_chunk(&mut tx, std::slice::from_ref(employee)).await?;
        tx.commit().await?;

        tracing::debug!("Stored employee {}", employee.fullname);
        Ok(())
    }

    /// Generates the synthetic batch described by `plan` and stores it.
    ///
    /// The table is checked before anything is generated. See
    /// [`Repository::insert_many`] for the transaction guarantees.
    pub async fn populate<R, P>(
        &self,
        plan: &BatchPlan,
        rng: R,
        chunk_size: usize,
        progress: &P,
    ) -> Result<u64>
    where
        R: Rng,
        P: Progress + ?Sized,
    {
        self.require_table().await?;
        tracing::info!(
            "Populating {} with {} records ({} starting with '{}')",
            EMPLOYEE_TABLE.name,
            plan.total(),
            plan.forced_count,
            plan.forced_letter
        );
        self.insert_records(plan.records(rng), chunk_size, progress)
            .await
    }

    /// Streams `records` into storage as multi-row inserts of `chunk_size`
    /// rows. Only one chunk is held in memory at a time, and all chunks share
    /// one transaction: either every record is committed or none is.
    pub async fn insert_many<I, P>(&self, records: I, chunk_size: usize, progress: &P) -> Result<u64>
    where
        I: IntoIterator<Item = NewEmployee>,
        P: Progress + ?Sized,
    {
        self.require_table().await?;
        self.insert_records(records, chunk_size, progress).await
    }

    async fn insert_records<I, P>(&self, records: I, chunk_size: usize, progress: &P) -> Result<u64>
    where
        I: IntoIterator<Item = NewEmployee>,
        P: Progress + ?Sized,
    {
        let start = std::time::Instant::now();
        let chunk_size = chunk_size.max(1);
        let mut chunk = Vec::with_capacity(chunk_size);
        let mut stored = 0u64;

        let mut tx = self.pool.begin().await?;
        for record in records {
            chunk.push(record);
            if chunk.len() == chunk_size {
                stored += flush_chunk(&mut tx, &mut chunk, progress).await?;
            }
        }
        if !chunk.is_empty() {
            stored += flush_chunk(&mut tx, &mut chunk, progress).await?;
        }
        tx.commit().await?;
        progress.finish();

        tracing::info!("{} records stored in {:?}", stored, start.elapsed());
        Ok(stored)
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", EMPLOYEE_TABLE.name))
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Visits every record ordered by fullname using the column's collation
    /// (binary, so case-sensitive). Returns the number of rows visited.
    pub async fn list_all_ordered<F>(&self, mut visit: F) -> Result<u64>
    where
        F: FnMut(Employee) -> Result<()>,
    {
        self.require_table().await?;

        let sql = format!(
            "SELECT id, fullname, birth_date, gender FROM {} ORDER BY fullname",
            EMPLOYEE_TABLE.name
        );
        let mut rows = sqlx::query(&sql).fetch(&self.pool);
        let mut visited = 0u64;
        while let Some(row) = rows.try_next().await? {
            visit(Employee {
                id: row.try_get("id")?,
                fullname: row.try_get("fullname")?,
                birth_date: row.try_get("birth_date")?,
                gender: gender_from_row(&row)?,
            })?;
            visited += 1;
        }
        Ok(visited)
    }

    /// Visits records whose fullname starts with `prefix`, ignoring ASCII
    /// case, and whose gender is exactly `gender`.
    pub async fn select_filtered<F>(&self, prefix: &str, gender: Gender, mut visit: F) -> Result<u64>
    where
        F: FnMut(EmployeeSummary) -> Result<()>,
    {
        self.require_table().await?;

        let sql = format!(
            r"SELECT fullname, birth_date, gender FROM {}
            WHERE lower(fullname) LIKE lower(?) ESCAPE '\' AND gender = ?",
            EMPLOYEE_TABLE.name
        );
        let mut rows = sqlx::query(&sql)
            .bind(format!("{}%", escape_like(prefix)))
            .bind(gender.as_str())
            .fetch(&self.pool);
        let mut visited = 0u64;
        while let Some(row) = rows.try_next().await? {
            visit(EmployeeSummary {
                fullname: row.try_get("fullname")?,
                birth_date: row.try_get("birth_date")?,
                gender: gender_from_row(&row)?,
            })?;
            visited += 1;
        }
        Ok(visited)
    }
}

async fn flush_chunk<P>(
    conn: &mut SqliteConnection,
    chunk: &mut Vec<NewEmployee>,
    progress: &P,
) -> Result<u64>
where
    P: Progress + ?Sized,
{
    insert_chunk(conn, chunk).await?;
    let len = chunk.len() as u64;
    chunk.clear();
    progress.advance(len);
    tracing::debug!("Batch of {} records written", len);
    Ok(len)
}

async fn insert_chunk(conn: &mut SqliteConnection, chunk: &[NewEmployee]) -> Result<()> {
    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
        "INSERT INTO {} (fullname, birth_date, gender) ",
        EMPLOYEE_TABLE.name
    ));
    builder.push_values(chunk, |mut row, employee| {
        row.push_bind(employee.fullname.as_str())
            .push_bind(employee.birth_date)
            .push_bind(employee.gender.as_str());
    });
    builder.build().execute(conn).await?;
    Ok(())
}

fn gender_from_row(row: &SqliteRow) -> Result<Gender> {
    let gender: String = row.try_get("gender")?;
    gender
        .parse()
        .map_err(|e: AppError| AppError::Storage(sqlx::Error::Decode(Box::new(e))))
}

fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
