//! Types Module
//!
//! すべてのリーダー・ライターが共有する表形式レコードモデルを定義するモジュール。

use crate::normalize::{align_width, sanitize};

/// 1行分のセル文字列
pub type Row = Vec<String>;

/// 表形式レコードセット
///
/// 行の順序付きシーケンスで、各行はセル文字列の順序付きシーケンスです。
/// JSONとの変換では0行目をヘッダー行として扱います。
///
/// リーダーが生成したレコードセットは次の不変条件を満たします。
///
/// - どの行も0行目の列数より短くない（短い行は空文字列で右詰めされる）
/// - どのセルにもCR・LFが含まれない
///
/// 0行目より長い行はそのまま残るため、ライターはこれを許容する必要があります。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    rows: Vec<Row>,
}

impl RecordSet {
    /// 空のレコードセットを生成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 行データをそのまま保持するレコードセットを生成する
    ///
    /// サニタイズや列幅の調整は行いません。ライターに渡すデータを
    /// 呼び出し側で組み立てる場合に使用します。
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// 全セルをサニタイズし、0行目の列数に合わせて列幅を調整する
    ///
    /// すべてのリーダーはこの関数を通してレコードセットを返します。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use sheetshift::RecordSet;
    ///
    /// let records = RecordSet::normalized(vec![
    ///     vec!["a".to_string(), "b\r\nc".to_string()],
    ///     vec!["1".to_string()],
    /// ]);
    /// assert_eq!(records.rows()[0], vec!["a", "b c"]);
    /// assert_eq!(records.rows()[1], vec!["1", ""]);
    /// ```
    pub fn normalized(mut rows: Vec<Row>) -> Self {
        for row in rows.iter_mut() {
            for cell in row.iter_mut() {
                *cell = sanitize(cell);
            }
        }
        align_width(&mut rows);
        Self { rows }
    }

    /// すべての行
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// 内部の行データを取り出す
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// 0行目（ヘッダー行）
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// ヘッダー行を含む行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// ヘッダー行を除いたデータ行数（0で飽和）
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }
}

impl From<Vec<Row>> for RecordSet {
    fn from(rows: Vec<Row>) -> Self {
        Self::from_rows(rows)
    }
}
