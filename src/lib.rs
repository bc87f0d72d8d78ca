//! sheetshift - CSV / XLSX / XLS / JSON 相互変換ライブラリ
//!
//! 入力ファイルの形式を拡張子ではなく内容（先頭バイト）から判定し、
//! 表形式のレコードセットとして読み込んだうえで、出力パスの拡張子に
//! 対応する形式（CSV / JSON / XLSX）で書き出します。
//!
//! - 形式判定: ZIP / OLE2 シグネチャ、続いてテキストの先頭文字
//! - 文字コード: UTF-8（BOM有無）、UTF-16LE/BE、EUC-KR をUTF-8に変換して読み込み
//! - 正規化: セル内の改行を空白に置換、連続空白の圧縮、前後空白の除去、
//!   列数をヘッダー行に揃える
//!
//! # Quick Start
//!
//! ```rust,no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 形式は内容から判定される
//!     let rows = sheetshift::convert("report.xls", "report.json")?;
//!     println!("converted {} rows", rows);
//!
//!     let format = sheetshift::detect("unknown.bin")?;
//!     println!("{}", format);
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use sheetshift::{ConverterBuilder, DateFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
//!         .with_sheet_name("Export")
//!         .build()?;
//!
//!     let records = converter.read("input.csv")?;
//!     println!("{} data rows", records.data_row_count());
//!     converter.write(&records, "output.xlsx")?;
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod detect;
mod encoding;
mod error;
mod formatter;
mod normalize;
mod output;
mod parser;
mod types;

// 公開API
pub use api::{DateFormat, EncodingTag, FormatTag, OutputFormat};
pub use builder::{convert, Converter, ConverterBuilder, DEFAULT_SHEET_NAME};
pub use detect::{detect, detect_bytes, DEFAULT_SAMPLE_SIZE};
pub use encoding::{sniff, sniff_with_sample_size, wrap, TextStream, TranscodingReader};
pub use error::{EmptyDataKind, Result, SheetShiftError};
pub use normalize::{align_width, sanitize};
pub use types::{RecordSet, Row};
