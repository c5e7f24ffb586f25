//! 結果DB（SQLite）
//!
//! 整形済みテーブルを1つの追記専用テーブルに保存する。
//! テーブルがなければ最初の保存時に列から作成し、既存テーブルにない列は追加する。
//! SQLiteの列名は大文字小文字を区別しないため、列名の比較もそれに合わせる。

use crate::error::{PioneerError, Result};
use plate_pioneer_common::{CellValue, TidyTable};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::time::Duration;

pub struct ResultStore {
    conn: Connection,
}

impl ResultStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        tracing::debug!(path = %path.display(), "opened result store");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// テーブルに全行を追記し、追記した行数を返す
    pub fn append(&mut self, table_name: &str, table: &TidyTable) -> Result<usize> {
        check_table_name(table_name)?;
        check_column_names(table.columns())?;

        let tx = self.conn.transaction()?;
        let existing = table_columns(&tx, table_name)?;

        if existing.is_empty() {
            let defs: Vec<String> = table
                .columns()
                .iter()
                .enumerate()
                .map(|(i, name)| column_definition(name, column_affinity(table, i)))
                .collect();
            tx.execute(
                &format!("CREATE TABLE {} ({})", quote_ident(table_name), defs.join(", ")),
                [],
            )?;
        } else {
            for (i, name) in table.columns().iter().enumerate() {
                if !existing.iter().any(|c| c.eq_ignore_ascii_case(name)) {
                    tracing::warn!(table = table_name, column = %name, "adding new column to result store");
                    tx.execute(
                        &format!(
                            "ALTER TABLE {} ADD COLUMN {}",
                            quote_ident(table_name),
                            column_definition(name, column_affinity(table, i))
                        ),
                        [],
                    )?;
                }
            }
        }

        let column_list: Vec<String> = table.columns().iter().map(|c| quote_ident(c)).collect();
        let placeholders: Vec<String> = (1..=table.columns().len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table_name),
            column_list.join(", "),
            placeholders.join(", ")
        );

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in table.rows() {
                inserted += stmt.execute(params_from_iter(row.cells().iter().map(sql_value)))?;
            }
        }
        tx.commit()?;

        tracing::info!(table = table_name, rows = inserted, "appended rows to result store");
        Ok(inserted)
    }

    pub fn row_count(&self, table_name: &str) -> Result<i64> {
        check_table_name(table_name)?;
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(table_name)),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn columns(&self, table_name: &str) -> Result<Vec<String>> {
        check_table_name(table_name)?;
        table_columns(&self.conn, table_name)
    }

    /// テーブル全体を読み出す（保存順）
    pub fn load(&self, table_name: &str) -> Result<TidyTable> {
        let columns = self.columns(table_name)?;
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} ORDER BY rowid", quote_ident(table_name)))?;
        let width = columns.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(cell_value))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(TidyTable::new(columns, rows)?)
    }
}

fn check_table_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PioneerError::Config("database.table が空です".into()));
    }
    Ok(())
}

/// 大文字小文字だけが異なる列名の組を拒否
fn check_column_names(columns: &[String]) -> Result<()> {
    for (i, name) in columns.iter().enumerate() {
        if let Some(first) = columns[..i].iter().find(|c| c.eq_ignore_ascii_case(name)) {
            return Err(PioneerError::ColumnConflict {
                column: name.clone(),
                existing: first.clone(),
            });
        }
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_definition(name: &str, affinity: Option<&str>) -> String {
    match affinity {
        Some(t) => format!("{} {}", quote_ident(name), t),
        None => quote_ident(name),
    }
}

/// 列の最初の非空値から型を決める
fn column_affinity(table: &TidyTable, index: usize) -> Option<&'static str> {
    table
        .rows()
        .map(|r| &r.cells()[index])
        .find(|c| !c.is_empty())
        .map(|c| match c {
            CellValue::Int(_) | CellValue::Bool(_) => "INTEGER",
            CellValue::Float(_) => "REAL",
            _ => "TEXT",
        })
}

fn table_columns(conn: &Connection, table_name: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table_name)))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

fn sql_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::Null,
        CellValue::Bool(b) => Value::Integer(i64::from(*b)),
        CellValue::Int(i) => Value::Integer(*i),
        CellValue::Float(f) => Value::Real(*f),
        CellValue::Text(s) => Value::Text(s.clone()),
    }
}

fn cell_value(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Empty,
        ValueRef::Integer(i) => CellValue::Int(i),
        ValueRef::Real(f) => CellValue::Float(f),
        ValueRef::Text(t) => CellValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => CellValue::Text(format!("<{} bytes>", b.len())),
    }
}
