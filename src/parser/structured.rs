//! Structured Array Parser
//!
//! キー・値オブジェクトのJSON配列を表形式レコードに変換する。

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{EmptyDataKind, Result};
use crate::types::{RecordSet, Row};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// JSON配列リーダー
///
/// ヘッダー行は**最初の要素のキーのみ**から、出現順に生成します。
/// 2番目以降の要素にしか存在しないキーは出力に現れず、最初の要素に
/// あって後続の要素にないキーは空セルになります。この方針は固定で、
/// 設定では変更できません。
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct JsonReader;

impl JsonReader {
    pub fn read_path(&self, path: &Path) -> Result<RecordSet> {
        let data = fs::read(path)?;
        self.read_slice(&data)
    }

    /// バイト列を解析する
    ///
    /// # 戻り値
    ///
    /// * `Ok(RecordSet)` - ヘッダー行 + 要素ごとの1行
    /// * `Err(SheetShiftError::Json)` - オブジェクトの配列として解析できない場合
    /// * `Err(SheetShiftError::EmptyData(EmptyArray))` - 配列が空の場合
    pub fn read_slice(&self, data: &[u8]) -> Result<RecordSet> {
        let data = data.strip_prefix(&UTF8_BOM).unwrap_or(data);
        let items: Vec<Map<String, Value>> = serde_json::from_slice(data)?;

        let first = items.first().ok_or(EmptyDataKind::EmptyArray)?;
        let header: Row = first.keys().cloned().collect();

        let mut rows: Vec<Row> = Vec::with_capacity(items.len() + 1);
        rows.push(header.clone());
        for item in &items {
            let row = header
                .iter()
                .map(|key| item.get(key).map(value_to_cell).unwrap_or_default())
                .collect();
            rows.push(row);
        }

        debug!(columns = header.len(), items = items.len(), "parsed JSON array");
        Ok(RecordSet::normalized(rows))
    }
}

/// JSON値の文字列表現
///
/// 文字列はそのまま、`null`は空文字列、それ以外はJSONテキスト。
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
