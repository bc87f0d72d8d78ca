//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::fmt;
use std::path::Path;

/// 入力ファイルのコンテナ形式
///
/// ファイル内容のシグネチャから判定された実際の形式を表します。
/// 拡張子から宣言されることはなく、`detect`のみが生成します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// 区切り文字テキスト（カンマまたはタブ区切り）
    Csv,

    /// ZIPコンテナベースのスプレッドシート（XLSX）
    Xlsx,

    /// OLE2複合ファイルベースのスプレッドシート（XLS）
    Xls,

    /// キー・値オブジェクトの配列（JSON）
    Json,
}

impl FormatTag {
    /// CLIの`detect`コマンドが出力する短縮名
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use sheetshift::FormatTag;
    ///
    /// assert_eq!(FormatTag::Xls.as_str(), "xls");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Csv => "csv",
            FormatTag::Xlsx => "xlsx",
            FormatTag::Xls => "xls",
            FormatTag::Json => "json",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 区切り文字テキストの文字エンコーディング
///
/// 先頭バイト列から推定され、トランスコード層で即座に消費されます。
/// 永続化されることはありません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingTag {
    /// BOMなしUTF-8
    Utf8,

    /// BOM（EF BB BF）付きUTF-8
    Utf8Bom,

    /// UTF-16 リトルエンディアン（BOM FF FE）
    Utf16Le,

    /// UTF-16 ビッグエンディアン（BOM FE FF）
    Utf16Be,

    /// 韓国語のレガシー8ビットエンコーディング（EUC-KR）
    ///
    /// UTF-8として不正な、マーカーのないバイト列に対するフォールバックです。
    EucKr,
}

impl EncodingTag {
    /// 先頭に置かれるバイトオーダーマークの長さ（バイト）
    pub fn bom_len(&self) -> usize {
        match self {
            EncodingTag::Utf8Bom => 3,
            EncodingTag::Utf16Le | EncodingTag::Utf16Be => 2,
            EncodingTag::Utf8 | EncodingTag::EucKr => 0,
        }
    }
}

/// 出力フォーマット
///
/// 出力パスの拡張子から決定されます。入力側の判定には使用しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// CSV形式
    ///
    /// ```csv
    /// Header1,Header2
    /// Data1,Data2
    /// ```
    Csv,

    /// JSON形式
    ///
    /// 1行目をキーとし、2行目以降をオブジェクトの配列として出力します。
    ///
    /// ```json
    /// [
    ///   {
    ///     "Header1": "Data1",
    ///     "Header2": "Data2"
    ///   }
    /// ]
    /// ```
    Json,

    /// XLSX形式（単一シート）
    Xlsx,
}

impl OutputFormat {
    /// 拡張子（大文字小文字を区別しない）から出力フォーマットを決定する
    ///
    /// # 戻り値
    ///
    /// * `Some(OutputFormat)` - `.csv` / `.json` / `.xlsx` のいずれかの場合
    /// * `None` - それ以外の拡張子、または拡張子がない場合
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use sheetshift::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out.JSON"), Some(OutputFormat::Json));
    /// assert_eq!(OutputFormat::from_path("out.txt"), None);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            "xlsx" => Some(OutputFormat::Xlsx),
            _ => None,
        }
    }
}

/// 日付の出力形式
///
/// スプレッドシートの日付セルを文字列に変換する際の形式を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式
    ///
    /// 時刻部分がない場合は `2025-11-20`、ある場合は `2025-11-20 13:45:00`
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetshift::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), sheetshift::SheetShiftError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y/%m/%d".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}
