//! 対話セッションの状態
//!
//! 選択中のファイルと直近の処理結果を保持する。新しいファイルを選ぶと結果は破棄する。

use crate::config::SheetNames;
use crate::error::{PioneerError, Result};
use crate::pipeline::{self, ProcessedPlate};
use crate::store::ResultStore;
use plate_pioneer_common::PlateAssembler;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Session {
    source: Option<PathBuf>,
    processed: Option<ProcessedPlate>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入力ファイルを選択（前回の処理結果はクリア）
    pub fn select_file(&mut self, path: PathBuf) {
        if self.processed.take().is_some() {
            tracing::debug!("cleared previous results");
        }
        self.source = Some(path);
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn processed(&self) -> Option<&ProcessedPlate> {
        self.processed.as_ref()
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.processed = None;
    }

    /// 選択中のファイルを処理して結果を保持
    ///
    /// 失敗した場合、前回の結果は残らない。
    pub fn process(&mut self, sheet_names: &SheetNames, assembler: &PlateAssembler) -> Result<&ProcessedPlate> {
        let source = self.source.as_deref().ok_or(PioneerError::NoInputSelected)?;
        self.processed = None;
        let plate = pipeline::process_workbook(source, sheet_names, assembler)?;
        Ok(self.processed.insert(plate))
    }

    /// 保持している結果をDBに追記
    pub fn save(&self, store: &mut ResultStore, table_name: &str) -> Result<usize> {
        let plate = self.processed.as_ref().ok_or(PioneerError::NothingProcessed)?;
        store.append(table_name, &plate.tidy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_without_file() {
        let mut session = Session::new();
        let err = session
            .process(&SheetNames::default(), &PlateAssembler::default())
            .unwrap_err();
        assert!(matches!(err, PioneerError::NoInputSelected));
    }

    #[test]
    fn test_save_without_results() {
        let session = Session::new();
        let mut store = ResultStore::open_in_memory().unwrap();
        assert!(matches!(
            session.save(&mut store, "experiments"),
            Err(PioneerError::NothingProcessed)
        ));
    }

    #[test]
    fn test_failed_process_keeps_session_usable() {
        let mut session = Session::new();
        session.select_file(PathBuf::from("/nonexistent/plate.xlsx"));
        assert!(session
            .process(&SheetNames::default(), &PlateAssembler::default())
            .is_err());
        assert!(session.processed().is_none());
        assert_eq!(session.source(), Some(Path::new("/nonexistent/plate.xlsx")));
    }
}
