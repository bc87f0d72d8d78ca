//! Formatter Module
//!
//! スプレッドシートのセル値を文字列に変換する処理を提供するモジュール。

use calamine::{Data, ExcelDateTime};
use chrono::{NaiveDateTime, Timelike};

use crate::api::DateFormat;

/// セルフォーマッター
///
/// calamineのセル値をレコードモデルのセル文字列に変換します。
#[derive(Debug, Clone)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,
}

impl CellFormatter {
    pub fn new(date_format: DateFormat) -> Self {
        Self {
            date_formatter: DateFormatter { date_format },
        }
    }

    /// セル値をフォーマット
    ///
    /// - 文字列: そのまま
    /// - 整数・浮動小数点数: 最短の10進表記（`1.0` → `1`）
    /// - 論理値: `TRUE` / `FALSE`
    /// - エラー値: `#DIV/0!` などのリテラル
    /// - 日時: `DateFormatter`の設定に従う
    /// - 空セル: 空文字列
    pub fn format_cell(&self, cell: &Data) -> String {
        match cell {
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Data::Error(e) => e.to_string(),
            Data::DateTime(dt) => self.date_formatter.format(dt),
            Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
            Data::Empty => String::new(),
        }
    }
}

/// 日付フォーマッター
///
/// 1900年・1904年エポックの判定はcalamineに任せ、chronoで文字列化します。
#[derive(Debug, Clone)]
pub(crate) struct DateFormatter {
    date_format: DateFormat,
}

impl DateFormatter {
    /// 日時セルをフォーマット
    ///
    /// 期間（duration）や日付に変換できないシリアル値は、数値として出力します。
    pub fn format(&self, value: &ExcelDateTime) -> String {
        if value.is_duration() {
            return value.as_f64().to_string();
        }

        match value.as_datetime() {
            Some(datetime) => self.format_datetime(&datetime),
            None => value.as_f64().to_string(),
        }
    }

    fn format_datetime(&self, datetime: &NaiveDateTime) -> String {
        match &self.date_format {
            DateFormat::Iso8601 => {
                let time = datetime.time();
                if time.hour() == 0 && time.minute() == 0 && time.second() == 0 {
                    datetime.format("%Y-%m-%d").to_string()
                } else {
                    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            DateFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}
