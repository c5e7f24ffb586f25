//! プレート組み立て
//!
//! 結果・抗体・濃度の3グリッドをmeltし、(Row, Col) で内部結合したうえで
//! メタデータを全行に展開する。

use crate::error::{Error, Result};
use crate::grid::{Grid, PlateShape};
use crate::melt::{GridMelter, LongTable, COL_COLUMN, ROW_COLUMN};
use crate::metadata::MetadataMap;
use crate::table::TidyTable;
use crate::types::{CellValue, WellCoordinate};
use std::collections::HashMap;

pub const RESULT_COLUMN: &str = "Result_Value";
pub const ANTIBODY_COLUMN: &str = "Antibody";
pub const CONCENTRATION_COLUMN: &str = "Concentration";

/// 固定列（メタデータ列より前に並ぶ）
pub const FIXED_COLUMNS: [&str; 5] = [
    ROW_COLUMN,
    COL_COLUMN,
    RESULT_COLUMN,
    ANTIBODY_COLUMN,
    CONCENTRATION_COLUMN,
];

/// メタデータキーが既存列名と衝突したときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// 既存列を全行メタデータ値で上書き
    #[default]
    Overwrite,
    /// ReservedColumn エラー
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlateAssembler {
    shape: PlateShape,
    collision: CollisionPolicy,
}

impl PlateAssembler {
    pub fn new(shape: PlateShape) -> Self {
        Self {
            shape,
            collision: CollisionPolicy::default(),
        }
    }

    pub fn with_collision_policy(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn shape(&self) -> PlateShape {
        self.shape
    }

    pub fn assemble(
        &self,
        results: &Grid,
        antibodies: &Grid,
        concentrations: &Grid,
        metadata: &MetadataMap,
    ) -> Result<TidyTable> {
        // 結合前に形状を検証（行数違いによる結合の重複展開を防ぐ）
        results.validate("results", self.shape)?;
        antibodies.validate("antibodies", self.shape)?;
        concentrations.validate("concentrations", self.shape)?;

        let melter = GridMelter::new(self.shape);
        let results_long = melter.melt(results, RESULT_COLUMN)?;
        let antibodies_long = melter.melt(antibodies, ANTIBODY_COLUMN)?;
        let concentrations_long = melter.melt(concentrations, CONCENTRATION_COLUMN)?;

        let mut table = join_on_well(&results_long, &[&antibodies_long, &concentrations_long])?;
        self.broadcast(&mut table, metadata)?;

        tracing::debug!(
            rows = table.len(),
            columns = table.columns().len(),
            metadata_fields = metadata.len(),
            "assembled tidy table"
        );
        Ok(table)
    }

    fn broadcast(&self, table: &mut TidyTable, metadata: &MetadataMap) -> Result<()> {
        for (key, value) in metadata.iter() {
            match table.column_index(key) {
                Some(index) => {
                    if self.collision == CollisionPolicy::Reject {
                        return Err(Error::ReservedColumn(key.to_string()));
                    }
                    tracing::warn!(key, "metadata key overwrites an existing column");
                    for row in table.rows_mut().iter_mut() {
                        row[index] = value.clone();
                    }
                }
                None => {
                    table.columns_mut().push(key.to_string());
                    for row in table.rows_mut().iter_mut() {
                        row.push(value.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

/// 96ウェル・上書きポリシーで組み立てる
pub fn assemble(
    results: &Grid,
    antibodies: &Grid,
    concentrations: &Grid,
    metadata: &MetadataMap,
) -> Result<TidyTable> {
    PlateAssembler::default().assemble(results, antibodies, concentrations, metadata)
}

/// 座標→値の索引（座標の重複は JoinAmbiguity）
fn index_by_well(table: &LongTable) -> Result<HashMap<WellCoordinate, &CellValue>> {
    let mut index = HashMap::with_capacity(table.len());
    for record in &table.records {
        if index.insert(record.well, &record.value).is_some() {
            return Err(Error::JoinAmbiguity {
                table: table.value_name.clone(),
                well: record.well.label(),
            });
        }
    }
    Ok(index)
}

/// 左テーブルの順序で (Row, Col) 内部結合
///
/// 座標集合が一致しない場合は MergeError。
fn join_on_well(left: &LongTable, rights: &[&LongTable]) -> Result<TidyTable> {
    let left_index = index_by_well(left)?;

    let mut right_indexes = Vec::with_capacity(rights.len());
    for right in rights {
        let index = index_by_well(right)?;
        if let Some(well) = left_index.keys().find(|w| !index.contains_key(*w)) {
            return Err(Error::Merge(format!(
                "well {} present in '{}' but missing from '{}'",
                well, left.value_name, right.value_name
            )));
        }
        if let Some(well) = index.keys().find(|w| !left_index.contains_key(*w)) {
            return Err(Error::Merge(format!(
                "well {} present in '{}' but missing from '{}'",
                well, right.value_name, left.value_name
            )));
        }
        right_indexes.push(index);
    }

    let mut columns = vec![
        ROW_COLUMN.to_string(),
        COL_COLUMN.to_string(),
        left.value_name.clone(),
    ];
    columns.extend(rights.iter().map(|r| r.value_name.clone()));

    let rows = left
        .records
        .iter()
        .filter_map(|record| {
            let mut row = Vec::with_capacity(columns.len());
            row.push(CellValue::Text(record.well.row.to_string()));
            row.push(CellValue::Int(record.well.col as i64));
            row.push(record.value.clone());
            for index in &right_indexes {
                row.push((*index.get(&record.well)?).clone());
            }
            Some(row)
        })
        .collect();

    TidyTable::new(columns, rows)
}
