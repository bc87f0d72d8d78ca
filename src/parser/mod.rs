//! Parser Module
//!
//! 各入力形式を表形式レコードモデルに変換するリーダー群。
//! どのリーダーも、返す前に全セルのサニタイズと列幅の調整を行います。

mod delimited;
mod structured;
mod workbook;

pub(crate) use delimited::DelimitedReader;
pub(crate) use structured::JsonReader;
pub(crate) use workbook::WorkbookReader;
