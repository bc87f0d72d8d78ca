//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。
//! `Converter`は判定 → 読み込み → 書き込みをまとめる変換処理のファサードです。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use tracing::{debug, info};

use crate::api::{DateFormat, FormatTag, OutputFormat};
use crate::detect::{detect_with_sample_size, DEFAULT_SAMPLE_SIZE, HEADER_SIZE};
use crate::error::{Result, SheetShiftError};
use crate::formatter::CellFormatter;
use crate::output::OutputFormatter;
use crate::parser::{DelimitedReader, JsonReader, WorkbookReader};
use crate::types::RecordSet;

/// XLSX出力のシート名の既定値
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// シート名に使用できない文字
const INVALID_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// シート名の最大長（文字数）
const MAX_SHEET_NAME_LEN: usize = 31;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 形式判定・エンコーディング推定に使う先頭バイト数
    pub sample_size: usize,

    /// 日付形式
    pub date_format: DateFormat,

    /// XLSX出力のシート名
    pub sheet_name: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            date_format: DateFormat::Iso8601,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみを
/// オーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetshift::{ConverterBuilder, DateFormat};
///
/// # fn main() -> Result<(), sheetshift::SheetShiftError> {
/// let converter = ConverterBuilder::new()
///     .with_date_format(DateFormat::Custom("%d.%m.%Y".to_string()))
///     .with_sheet_name("Export")
///     .build()?;
/// let rows = converter.convert("input.xls", "output.xlsx")?;
/// println!("{} rows", rows);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - サンプルサイズ: 4096バイト
    /// - 日付形式: ISO 8601
    /// - XLSX出力のシート名: `Sheet1`
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 形式判定とエンコーディング推定に使う先頭バイト数を指定する
    ///
    /// 8バイト未満の場合、`build()`時に`SheetShiftError::Config`を返します。
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.config.sample_size = sample_size;
        self
    }

    /// スプレッドシートの日付セルの出力形式を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetshift::{ConverterBuilder, DateFormat};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()));
    /// ```
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// XLSX出力のシート名を指定する
    pub fn with_sheet_name<S: Into<String>>(mut self, name: S) -> Self {
        self.config.sheet_name = name.into();
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `SheetShiftError::Config(String)`: 設定の検証に失敗した場合
    ///   * サンプルサイズが8バイト未満
    ///   * カスタム日付形式が空、または不正な書式指定子を含む
    ///   * シート名が空・31文字超・使用できない文字を含む
    pub fn build(self) -> Result<Converter> {
        // 1. サンプルサイズの検証
        if self.config.sample_size < HEADER_SIZE {
            return Err(SheetShiftError::Config(format!(
                "Sample size must be at least {} bytes (got {})",
                HEADER_SIZE, self.config.sample_size
            )));
        }

        // 2. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            if format_str.is_empty()
                || StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
            {
                return Err(SheetShiftError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        // 3. シート名の検証
        validate_sheet_name(&self.config.sheet_name)?;

        Ok(Converter::new(self.config))
    }
}

fn validate_sheet_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_SHEET_NAME_LEN {
        return Err(SheetShiftError::Config(format!(
            "Sheet name must be 1 to {} characters: '{}'",
            MAX_SHEET_NAME_LEN, name
        )));
    }

    if let Some(ch) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(SheetShiftError::Config(format!(
            "Sheet name contains invalid character '{}': '{}'",
            ch, name
        )));
    }

    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(SheetShiftError::Config(format!(
            "Sheet name must not start or end with an apostrophe: '{}'",
            name
        )));
    }

    Ok(())
}

/// 変換処理のファサード
///
/// 入力ファイルの形式を内容から判定して読み込み、出力パスの拡張子に応じた
/// 形式で書き込みます。変換ごとにレコードセットとファイルハンドルを
/// 個別に確保するため、異なるパスに対する変換は並行して実行できます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetshift::ConverterBuilder;
///
/// # fn main() -> Result<(), sheetshift::SheetShiftError> {
/// let converter = ConverterBuilder::new().build()?;
/// let records = converter.read("unknown.dat")?;
/// converter.write(&records, "copy.json")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(config.date_format.clone()),
            config,
        }
    }

    /// ファイルの内容から形式を判定する
    pub fn detect<P: AsRef<Path>>(&self, path: P) -> Result<FormatTag> {
        detect_with_sample_size(path, self.config.sample_size)
    }

    /// 形式を判定してファイルを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(RecordSet)` - 読み込みに成功した場合
    /// * `Err(SheetShiftError::UnsupportedFormat)` - 形式を判定できなかった場合
    /// * `Err(SheetShiftError)` - リーダーが失敗した場合
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<RecordSet> {
        let path = path.as_ref();
        let format = self.detect(path).map_err(|e| match e {
            SheetShiftError::Detection(msg) => {
                SheetShiftError::UnsupportedFormat(format!("detection failed: {}", msg))
            }
            other => other,
        })?;
        self.read_as(path, format)
    }

    /// 形式を指定してファイルを読み込む
    ///
    /// 判定に使ったファイルハンドルとは別に、各リーダーが先頭から開き直します。
    pub fn read_as<P: AsRef<Path>>(&self, path: P, format: FormatTag) -> Result<RecordSet> {
        let path = path.as_ref();
        debug!(path = %path.display(), %format, "dispatching reader");

        match format {
            FormatTag::Csv => DelimitedReader::new(self.config.sample_size).read_path(path),
            FormatTag::Xlsx => WorkbookReader::new(self.formatter.clone()).read_xlsx(path),
            FormatTag::Xls => WorkbookReader::new(self.formatter.clone()).read_xls(path),
            FormatTag::Json => JsonReader.read_path(path),
        }
    }

    /// 出力パスの拡張子に応じた形式でレコードセットを書き込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 書き込みに成功した場合
    /// * `Err(SheetShiftError::UnsupportedOutput)` - `.csv` / `.json` / `.xlsx` 以外の拡張子
    /// * `Err(SheetShiftError::EmptyData(NoData))` - JSON/XLSXで行がない場合
    ///
    /// 書き込み途中で失敗した場合、出力ファイルは不完全なまま残ります。
    pub fn write<P: AsRef<Path>>(&self, records: &RecordSet, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = OutputFormat::from_path(path).ok_or_else(|| {
            SheetShiftError::UnsupportedOutput(
                path.extension()
                    .map(|ext| format!(".{}", ext.to_string_lossy()))
                    .unwrap_or_else(|| path.display().to_string()),
            )
        })?;
        self.write_as(records, path, format)
    }

    /// 形式を指定してレコードセットを書き込む
    pub fn write_as<P: AsRef<Path>>(
        &self,
        records: &RecordSet,
        path: P,
        format: OutputFormat,
    ) -> Result<()> {
        let path = path.as_ref();
        let formatter = OutputFormatter::from_format(format, &self.config.sheet_name);

        // 出力ファイルを作成する前に検証する
        formatter.ensure_writable(records)?;

        let mut writer = BufWriter::new(File::create(path)?);
        formatter.render(records, &mut writer)?;
        writer.flush()?;

        debug!(path = %path.display(), ?format, rows = records.len(), "wrote records");
        Ok(())
    }

    /// 入力ファイルを変換して出力ファイルに書き込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(usize)` - 書き込んだデータ行数（ヘッダー行を除く、0で飽和）
    /// * `Err(SheetShiftError)` - 判定・読み込み・書き込みのいずれかが失敗した場合
    ///
    /// # 処理フロー
    ///
    /// 1. 入力ファイルの形式を判定
    /// 2. 形式に対応するリーダーで読み込み
    /// 3. 出力パスの拡張子に対応するライターで書き込み
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<usize> {
        let input = input.as_ref();
        let output = output.as_ref();

        let records = self.read(input)?;
        self.write(&records, output)?;

        let rows = records.data_row_count();
        info!(
            input = %input.display(),
            output = %output.display(),
            rows,
            "conversion complete"
        );
        Ok(rows)
    }
}

/// デフォルト設定で入力ファイルを変換する
///
/// # 使用例
///
/// ```rust,no_run
/// # fn main() -> Result<(), sheetshift::SheetShiftError> {
/// let rows = sheetshift::convert("data.xlsx", "data.csv")?;
/// println!("converted {} rows", rows);
/// # Ok(())
/// # }
/// ```
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize> {
    ConverterBuilder::new().build()?.convert(input, output)
}
