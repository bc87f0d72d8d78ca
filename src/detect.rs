//! Format Detection Module
//!
//! ファイル拡張子ではなく内容のシグネチャから実際のファイル形式を判定する。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::api::FormatTag;
use crate::error::{Result, SheetShiftError};

/// シグネチャ判定に使う先頭バイト数
pub(crate) const HEADER_SIZE: usize = 8;

/// テキスト判定・エンコーディング推定に使うサンプルサイズの既定値
pub const DEFAULT_SAMPLE_SIZE: usize = 4096;

/// ZIPローカルファイルヘッダー（"PK"）
const ZIP_SIGNATURE: [u8; 2] = [0x50, 0x4B];

/// OLE2複合ファイル
const OLE2_SIGNATURE: [u8; 4] = [0xD0, 0xCF, 0x11, 0xE0];

/// ファイルの内容から形式を判定する
///
/// サンプルサイズは`DEFAULT_SAMPLE_SIZE`（4096バイト）です。
///
/// # 戻り値
///
/// * `Ok(FormatTag)` - 判定に成功した場合
/// * `Err(SheetShiftError::Io)` - ファイルを開けない・読めない場合
/// * `Err(SheetShiftError::Detection)` - どの形式にも一致しない場合
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetshift::{detect, FormatTag};
///
/// # fn main() -> Result<(), sheetshift::SheetShiftError> {
/// if detect("report.dat")? == FormatTag::Xls {
///     println!("legacy workbook");
/// }
/// # Ok(())
/// # }
/// ```
pub fn detect<P: AsRef<Path>>(path: P) -> Result<FormatTag> {
    detect_with_sample_size(path, DEFAULT_SAMPLE_SIZE)
}

/// サンプルサイズを指定して形式を判定する
///
/// 先頭8バイトでバイナリシグネチャを確認し、一致しない場合のみ
/// `sample_size`バイトまで読み進めてテキストとして判定します。
/// 判定後にファイルハンドルは閉じられるため、後続のリーダーは
/// 先頭から読み直します。
pub(crate) fn detect_with_sample_size<P: AsRef<Path>>(
    path: P,
    sample_size: usize,
) -> Result<FormatTag> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let mut sample = Vec::with_capacity(sample_size.max(HEADER_SIZE));
    (&mut file).take(HEADER_SIZE as u64).read_to_end(&mut sample)?;

    if let Some(tag) = match_signature(&sample) {
        debug!(path = %path.display(), format = %tag, "detected binary container");
        return Ok(tag);
    }

    let remaining = sample_size.saturating_sub(sample.len()) as u64;
    file.take(remaining).read_to_end(&mut sample)?;

    let tag = classify_text(&sample)?;
    debug!(path = %path.display(), format = %tag, sampled = sample.len(), "detected text format");
    Ok(tag)
}

/// バイト列のサンプルから形式を判定する
///
/// `sample`はファイル先頭から取得したバイト列（4096バイトで十分）です。
/// 判定の優先順位は`detect`と同一です。
///
/// # 使用例
///
/// ```rust
/// use sheetshift::{detect_bytes, FormatTag};
///
/// assert_eq!(detect_bytes(b"[{\"a\":1}]").unwrap(), FormatTag::Json);
/// assert_eq!(detect_bytes(b"a,b,c\n1,2,3").unwrap(), FormatTag::Csv);
/// assert!(detect_bytes(b"hello world").is_err());
/// ```
pub fn detect_bytes(sample: &[u8]) -> Result<FormatTag> {
    let header = &sample[..sample.len().min(HEADER_SIZE)];
    match match_signature(header) {
        Some(tag) => Ok(tag),
        None => classify_text(sample),
    }
}

/// バイナリコンテナのシグネチャ判定（ZIP → OLE2の順）
fn match_signature(header: &[u8]) -> Option<FormatTag> {
    if header.starts_with(&ZIP_SIGNATURE) {
        Some(FormatTag::Xlsx)
    } else if header.starts_with(&OLE2_SIGNATURE) {
        Some(FormatTag::Xls)
    } else {
        None
    }
}

/// テキストサンプルの判定
///
/// 1. NULバイトを含む → 未対応のバイナリ
/// 2. 前後の空白（先頭のUTF-8 BOMを含む）を除いて空 → 未対応
/// 3. `[` または `{` で始まる → JSON
/// 4. カンマまたはタブを含む → CSV
/// 5. それ以外 → 未対応
///
/// U+FEFF（UTF-8 BOM）は空白文字ではありませんが、ここでは先頭の空白と同様に
/// 読み飛ばします。そのため`EF BB BF [`で始まるファイルもJSONと判定され、
/// `JsonReader`がBOMを取り除いて読み込みます。
fn classify_text(sample: &[u8]) -> Result<FormatTag> {
    if sample.contains(&0) {
        return Err(SheetShiftError::Detection(
            "binary content with unknown signature".to_string(),
        ));
    }

    let text = String::from_utf8_lossy(sample);
    let content = text.trim_start_matches('\u{FEFF}').trim();

    if content.is_empty() {
        return Err(SheetShiftError::Detection("empty content".to_string()));
    }

    if content.starts_with('[') || content.starts_with('{') {
        return Ok(FormatTag::Json);
    }

    if content.contains(',') || content.contains('\t') {
        return Ok(FormatTag::Csv);
    }

    Err(SheetShiftError::Detection(
        "plain text without a recognizable delimiter".to_string(),
    ))
}

/// ファイル先頭から最大`limit`バイトを読み込む
pub(crate) fn read_prefix<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(limit);
    reader.take(limit as u64).read_to_end(&mut prefix)?;
    Ok(prefix)
}
