//! Delimited Text Parser
//!
//! エンコーディングを推定してUTF-8に変換し、`csv`クレートで寛容に解析する。

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::detect::read_prefix;
use crate::encoding::{sniff_with_sample_size, wrap};
use crate::error::{Result, SheetShiftError};
use crate::types::{RecordSet, Row};

/// 区切り文字テキスト（CSV/TSV）リーダー
#[derive(Debug, Clone)]
pub(crate) struct DelimitedReader {
    /// エンコーディング推定に使う先頭バイト数
    sample_size: usize,
}

impl DelimitedReader {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    /// ファイルを読み込む
    ///
    /// 1. 先頭`sample_size`バイトからエンコーディングを推定
    /// 2. BOMを読み飛ばし、残りをUTF-8ストリームで包む
    /// 3. レコードを解析（構造が壊れたレコードはスキップ、不正なバイトはU+FFFDに置換）
    pub fn read_path(&self, path: &Path) -> Result<RecordSet> {
        let mut file = File::open(path)?;

        let prefix = read_prefix(&mut file, self.sample_size)?;
        let encoding = sniff_with_sample_size(&prefix, self.sample_size);
        debug!(path = %path.display(), ?encoding, "sniffed text encoding");

        file.seek(SeekFrom::Start(encoding.bom_len() as u64))?;
        self.read_text(wrap(file, encoding))
    }

    /// UTF-8テキストストリームを解析する
    ///
    /// 区切り文字は最初の行から決定します（タブのみを含む場合はタブ、
    /// それ以外はカンマ）。列数の異なる行と、閉じられていない引用符を許容します。
    pub fn read_text<R: Read>(&self, text: R) -> Result<RecordSet> {
        let mut reader = BufReader::new(text);
        let delimiter = choose_delimiter(reader.fill_buf()?);

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let mut rows: Vec<Row> = Vec::new();
        let mut skipped = 0usize;

        // 推定を外れた不正バイトはレコードごと捨てずにU+FFFDへ置き換える
        for result in csv_reader.byte_records() {
            match result {
                Ok(record) => rows.push(
                    record
                        .iter()
                        .map(|field| String::from_utf8_lossy(field).into_owned())
                        .collect(),
                ),
                Err(e) if e.is_io_error() => {
                    let csv::ErrorKind::Io(io_err) = e.into_kind() else {
                        continue;
                    };
                    return Err(SheetShiftError::Io(io_err));
                }
                Err(e) => {
                    let err = SheetShiftError::MalformedRecord {
                        line: e.position().map(|p| p.line()).unwrap_or(0),
                        message: e.to_string(),
                    };
                    warn!(error = %err, "skipping malformed record");
                    skipped += 1;
                }
            }
        }

        debug!(
            rows = rows.len(),
            skipped,
            delimiter = %(delimiter as char).escape_default(),
            "parsed delimited text"
        );
        Ok(RecordSet::normalized(rows))
    }
}

/// 最初の行がタブを含みカンマを含まない場合はタブ、それ以外はカンマ
fn choose_delimiter(head: &[u8]) -> u8 {
    let first_line = match head.iter().position(|&b| b == b'\n') {
        Some(end) => &head[..end],
        None => head,
    };

    if first_line.contains(&b'\t') && !first_line.contains(&b',') {
        b'\t'
    } else {
        b','
    }
}
