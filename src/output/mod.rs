//! Output Format Module
//!
//! 出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use crate::api::OutputFormat;
use crate::error::{EmptyDataKind, Result};
use crate::types::RecordSet;
use std::io::Write;

pub(crate) use formatters::*;

/// 出力フォーマッター
///
/// 出力フォーマット（CSV, JSON, XLSX）をenumとして表現します。
/// 対応形式は固定のため、レジストリではなく網羅的なmatchで振り分けます。
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputFormatter<'a> {
    Csv,
    Json,
    Xlsx { sheet_name: &'a str },
}

impl<'a> OutputFormatter<'a> {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: OutputFormat, sheet_name: &'a str) -> Self {
        match format {
            OutputFormat::Csv => OutputFormatter::Csv,
            OutputFormat::Json => OutputFormatter::Json,
            OutputFormat::Xlsx => OutputFormatter::Xlsx { sheet_name },
        }
    }

    /// 書き込み前の検証
    ///
    /// JSONとXLSXはヘッダー行を含む1行以上を必要とします。
    /// CSVは0行でも空ファイルとして書き込めます。
    pub fn ensure_writable(&self, records: &RecordSet) -> Result<()> {
        match self {
            OutputFormatter::Csv => Ok(()),
            OutputFormatter::Json | OutputFormatter::Xlsx { .. } => {
                if records.is_empty() {
                    Err(EmptyDataKind::NoData.into())
                } else {
                    Ok(())
                }
            }
        }
    }

    /// レコードセットを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `records` - 出力するレコードセット
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(SheetShiftError)` - エラーが発生した場合
    pub fn render<W: Write>(&self, records: &RecordSet, writer: &mut W) -> Result<()> {
        self.ensure_writable(records)?;
        match *self {
            OutputFormatter::Csv => CsvFormatter.render(records, writer),
            OutputFormatter::Json => JsonFormatter.render(records, writer),
            OutputFormatter::Xlsx { sheet_name } => {
                XlsxFormatter { sheet_name }.render(records, writer)
            }
        }
    }
}
