//! Workbook Parser
//!
//! calamineを使用してXLS/XLSXの先頭シートを読み込む。
//! 2番目以降のシートは読み込みません。

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xls, Xlsx};
use tracing::{debug, warn};

use crate::error::{EmptyDataKind, Result, SheetShiftError};
use crate::formatter::CellFormatter;
use crate::types::{RecordSet, Row};

/// 内容のない行の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlankRows {
    /// 空行として残す（XLSX）
    Keep,
    /// 存在しない行としてスキップする（XLS）
    Skip,
}

/// ワークブックリーダー
///
/// calamineのラッパーとして、先頭シートを行単位のセル文字列に変換します。
#[derive(Debug, Clone)]
pub(crate) struct WorkbookReader {
    formatter: CellFormatter,
}

impl WorkbookReader {
    pub fn new(formatter: CellFormatter) -> Self {
        Self { formatter }
    }

    /// XLSX（ZIPコンテナ）の先頭シートを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(RecordSet)` - 先頭シートの全行
    /// * `Err(SheetShiftError::Parse)` - コンテナを開けない場合
    /// * `Err(SheetShiftError::EmptyData(NoSheet))` - シートがない場合
    /// * `Err(SheetShiftError::EmptyData(EmptySheet))` - 先頭シートに行がない場合
    pub fn read_xlsx(&self, path: &Path) -> Result<RecordSet> {
        let mut workbook = open_workbook::<Xlsx<BufReader<File>>, _>(path)
            .map_err(|e| SheetShiftError::Parse(e.into()))?;
        self.read_first_sheet(&mut workbook, BlankRows::Keep)
    }

    /// XLS（OLE2コンテナ）の先頭シートを読み込む
    ///
    /// コンテナを開けなかった場合に限り、拡張子違いのXLSXとみなして開き直します。
    /// XLSXとしても開けない場合はXLSとしてのエラーを返します。XLSXとして
    /// 開けた後のエラー（`NoSheet` / `EmptySheet`など）はそのまま返します。
    /// 最大行インデックスまで読み込み、内容のない行はスキップします。
    pub fn read_xls(&self, path: &Path) -> Result<RecordSet> {
        let legacy_err = match open_workbook::<Xls<BufReader<File>>, _>(path) {
            Ok(mut workbook) => return self.read_first_sheet(&mut workbook, BlankRows::Skip),
            Err(legacy_err) => legacy_err,
        };

        warn!(
            path = %path.display(),
            error = %legacy_err,
            "failed to open legacy workbook, retrying as XLSX"
        );
        let mut workbook = match open_workbook::<Xlsx<BufReader<File>>, _>(path) {
            Ok(workbook) => workbook,
            Err(modern_err) => {
                debug!(error = %modern_err, "XLSX fallback failed");
                return Err(SheetShiftError::Parse(legacy_err.into()));
            }
        };
        self.read_first_sheet(&mut workbook, BlankRows::Keep)
    }

    fn read_first_sheet<RS, W>(&self, workbook: &mut W, blank_rows: BlankRows) -> Result<RecordSet>
    where
        RS: Read + Seek,
        W: Reader<RS>,
        calamine::Error: From<W::Error>,
    {
        let sheet_names = workbook.sheet_names();
        let first = sheet_names.first().ok_or(EmptyDataKind::NoSheet)?;

        let range = workbook
            .worksheet_range(first)
            .map_err(|e| SheetShiftError::Parse(e.into()))?;

        let rows = self.collect_rows(&range, blank_rows);
        if rows.is_empty() {
            return Err(EmptyDataKind::EmptySheet.into());
        }

        debug!(sheet = %first, rows = rows.len(), "read first sheet");
        Ok(RecordSet::normalized(rows))
    }

    /// シートの行を0行目・0列目から絶対位置で取り出す
    ///
    /// 各行の末尾の空セルは取り除きます（列幅はあとで0行目に揃えられる）。
    fn collect_rows(&self, range: &Range<Data>, blank_rows: BlankRows) -> Vec<Row> {
        let Some((end_row, end_col)) = range.end() else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for row_idx in 0..=end_row {
            let mut cells: Row = (0..=end_col)
                .map(|col_idx| {
                    range
                        .get_value((row_idx, col_idx))
                        .map(|cell| self.formatter.format_cell(cell))
                        .unwrap_or_default()
                })
                .collect();

            while cells.last().is_some_and(String::is_empty) {
                cells.pop();
            }

            if cells.is_empty() && blank_rows == BlankRows::Skip {
                continue;
            }
            rows.push(cells);
        }
        rows
    }
}
