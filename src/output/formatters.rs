//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use crate::error::{EmptyDataKind, Result};
use crate::types::RecordSet;
use rust_xlsxwriter::{Workbook, XlsxError};
use serde_json::{Map, Value};
use std::io::Write;
use tracing::warn;

/// Excelの1セルに保存できる最大文字数
const MAX_CELL_CHARS: usize = 32_767;

/// CSV形式のフォーマッター
///
/// 0行目も他の行と同じく書き込み、ヘッダーとして特別扱いしません。
/// 行ごとの列数の違いはそのまま出力されます。
pub(crate) struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(&self, records: &RecordSet, writer: &mut W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut *writer);

        for row in records.rows() {
            csv_writer.write_record(row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// JSON形式のフォーマッター
///
/// 2行目以降を、0行目をキーとするオブジェクトに変換してインデント付きの配列で
/// 出力します。行が0行目より短い場合、足りない列は空文字列になります。
pub(crate) struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(&self, records: &RecordSet, writer: &mut W) -> Result<()> {
        let header = records.header().ok_or(EmptyDataKind::NoData)?;

        let objects: Vec<Value> = records
            .rows()
            .iter()
            .skip(1)
            .map(|row| {
                let mut object = Map::new();
                for (col_idx, key) in header.iter().enumerate() {
                    let value = row.get(col_idx).cloned().unwrap_or_default();
                    object.insert(key.clone(), Value::String(value));
                }
                Value::Object(object)
            })
            .collect();

        // serde_jsonは `/` `<` `>` をエスケープしない
        serde_json::to_writer_pretty(&mut *writer, &objects)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// XLSX形式のフォーマッター
///
/// すべてのセルを単一シートの (行, 列) 位置に文字列として書き込みます。
/// `MAX_CELL_CHARS`文字を超えるセルは切り詰めて書き込みます。
pub(crate) struct XlsxFormatter<'a> {
    pub sheet_name: &'a str,
}

impl XlsxFormatter<'_> {
    pub fn render<W: Write>(&self, records: &RecordSet, writer: &mut W) -> Result<()> {
        if records.is_empty() {
            return Err(EmptyDataKind::NoData.into());
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name)?;

        for (row_idx, row) in records.rows().iter().enumerate() {
            let row_num = u32::try_from(row_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num =
                    u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
                let text = truncate_cell(cell);
                if text.len() < cell.len() {
                    warn!(
                        row = row_num,
                        col = col_num,
                        chars = cell.chars().count(),
                        "cell exceeds the XLSX length limit, truncating"
                    );
                }
                worksheet.write_string(row_num, col_num, text)?;
            }
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        writer.flush()?;

        Ok(())
    }
}

/// 先頭`MAX_CELL_CHARS`文字までを返す（文字境界で切る）
fn truncate_cell(cell: &str) -> &str {
    match cell.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &cell[..end],
        None => cell,
    }
}
