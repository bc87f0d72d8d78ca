//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// sheetshiftクレート全体で使用する`Result`型
pub type Result<T> = std::result::Result<T, SheetShiftError>;

/// 有効なコンテナだが使用できる行がない場合の種別
///
/// 空のJSON配列、空のシート、シートのないブックはそれぞれ別のエラーとして
/// 区別されます。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyDataKind {
    /// ワークブックにシートが1つもない
    #[error("workbook has no sheets")]
    NoSheet,

    /// 先頭シートに行が1つもない
    #[error("first sheet is empty")]
    EmptySheet,

    /// JSON配列の要素が0個
    #[error("JSON array is empty")]
    EmptyArray,

    /// 書き込む行（ヘッダー行）がない
    #[error("no rows to write")]
    NoData,
}

/// sheetshiftクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `Io`: ファイルのオープン・作成・読み書きに失敗したエラー
/// - `Parse` / `Json` / `Csv` / `Xlsx`: 各フォーマットライブラリ由来のエラー
/// - `Detection`: 内容がどのシグネチャにも一致しなかったエラー
/// - `EmptyData`: 構造は有効だが行がないエラー
/// - `UnsupportedFormat` / `UnsupportedOutput`: 扱えない入力形式・出力拡張子
/// - `Config`: 設定の検証に失敗したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetshift::SheetShiftError;
///
/// match sheetshift::detect("unknown.dat") {
///     Ok(tag) => println!("{}", tag),
///     Err(SheetShiftError::Detection(msg)) => eprintln!("not supported: {}", msg),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum SheetShiftError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシート（XLS/XLSX）の解析中に発生したエラー
    ///
    /// calamineがコンテナを開けなかった、またはシートを読めなかった場合です。
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// JSONの解析・シリアライズエラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSVの書き込みエラー
    ///
    /// 読み込み時のレコード単位のエラーは回復され、ここには現れません。
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// XLSXの書き込みエラー
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// ファイル形式を判定できなかったエラー
    #[error("Detection failed: not supported ({0})")]
    Detection(String),

    /// 使用できる行がないエラー
    #[error("Empty data: {0}")]
    EmptyData(EmptyDataKind),

    /// 区切り文字テキストの1レコードを解析できなかったエラー
    ///
    /// リーダー内部でログに記録され、そのレコードはスキップされます。
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord {
        /// レコードの開始行（1始まり、不明な場合は0）
        line: u64,
        /// 詳細メッセージ
        message: String,
    },

    /// 判定はできたが読み込みに対応していない入力形式
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// 対応していない出力拡張子
    #[error("Unsupported output format: {0} (supported: csv, json, xlsx)")]
    UnsupportedOutput(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に無効な設定が検出された場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<EmptyDataKind> for SheetShiftError {
    fn from(kind: EmptyDataKind) -> Self {
        SheetShiftError::EmptyData(kind)
    }
}
