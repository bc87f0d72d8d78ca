//! コンテナ形式のテストフィクスチャ生成
//!
//! `rust_xlsxwriter`では作れないワークブックをバイト列として組み立てます。
//!
//! 生成するファイル:
//! - BIFF8ワークブックを格納したOLE2（CFB v3）コンテナ（.xls）
//! - シートを1枚も持たないXLSX

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const SECTOR_SIZE: usize = 512;
const OLE2_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const FREESECT: u32 = 0xFFFF_FFFF;
const ENDOFCHAIN: u32 = 0xFFFF_FFFE;
const FATSECT: u32 = 0xFFFF_FFFD;
const NOSTREAM: u32 = 0xFFFF_FFFF;

/// 通常セクターに格納されるストリームの最小サイズ（これ未満はミニストリーム）
const MINI_STREAM_CUTOFF: usize = 4096;

const RECORD_BOF: u16 = 0x0809;
const RECORD_EOF: u16 = 0x000A;
const RECORD_CODEPAGE: u16 = 0x0042;
const RECORD_BOUNDSHEET: u16 = 0x0085;
const RECORD_NUMBER: u16 = 0x0203;
const RECORD_LABEL: u16 = 0x0204;

const BOF_WORKBOOK_GLOBALS: u16 = 0x0005;
const BOF_WORKSHEET: u16 = 0x0010;

/// 1シートのXLSワークブックを生成する
///
/// 空文字列のセルは書き込みません（空の行はレコードを持たない行になります）。
/// 数値として解釈できるセルはNUMBER、それ以外はLABELレコードになります。
pub fn legacy_workbook(sheet_name: &str, rows: &[&[&str]]) -> Vec<u8> {
    compound_file(&workbook_stream(Some((sheet_name, rows))))
}

/// シートを1枚も持たないXLSワークブックを生成する
pub fn legacy_workbook_without_sheets() -> Vec<u8> {
    compound_file(&workbook_stream(None))
}

/// `<sheets/>`が空のXLSXを生成する
pub fn sheetless_xlsx() -> Vec<u8> {
    let parts: [(&str, &str); 3] = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#,
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#,
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets/></workbook>"#,
        ),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// BIFFレコード（種別 + 長さ + データ）を追加する
fn push_record(out: &mut Vec<u8>, typ: u16, data: &[u8]) {
    push_u16(out, typ);
    push_u16(out, u16::try_from(data.len()).unwrap());
    out.extend_from_slice(data);
}

fn bof(dt: u16) -> Vec<u8> {
    let mut data = Vec::new();
    push_u16(&mut data, 0x0600); // BIFF8
    push_u16(&mut data, dt);
    push_u16(&mut data, 0x0DBB); // build
    push_u16(&mut data, 0x07CC); // year
    push_u32(&mut data, 0);
    push_u32(&mut data, 0x0006);
    data
}

/// BOUNDSHEET8のデータ（シート位置は後で書き換える）
fn boundsheet(name: &str) -> Vec<u8> {
    let units: Vec<u16> = name.encode_utf16().collect();
    let mut data = Vec::new();
    push_u32(&mut data, 0);
    data.push(0); // visible
    data.push(0); // worksheet
    data.push(u8::try_from(units.len()).unwrap());
    data.push(0x01); // UTF-16LE
    for unit in units {
        push_u16(&mut data, unit);
    }
    data
}

fn cell_record(out: &mut Vec<u8>, row: u16, col: u16, text: &str) {
    let mut data = Vec::new();
    push_u16(&mut data, row);
    push_u16(&mut data, col);
    push_u16(&mut data, 0x000F); // ixfe

    if let Ok(number) = text.parse::<f64>() {
        data.extend_from_slice(&number.to_le_bytes());
        push_record(out, RECORD_NUMBER, &data);
        return;
    }

    let units: Vec<u16> = text.encode_utf16().collect();
    push_u16(&mut data, u16::try_from(units.len()).unwrap());
    data.push(0x01); // UTF-16LE
    for unit in units {
        push_u16(&mut data, unit);
    }
    push_record(out, RECORD_LABEL, &data);
}

/// Workbookストリーム（グローバル + シート）を組み立てる
fn workbook_stream(sheet: Option<(&str, &[&[&str]])>) -> Vec<u8> {
    let mut stream = Vec::new();
    push_record(&mut stream, RECORD_BOF, &bof(BOF_WORKBOOK_GLOBALS));
    push_record(&mut stream, RECORD_CODEPAGE, &1200u16.to_le_bytes());

    let Some((name, rows)) = sheet else {
        push_record(&mut stream, RECORD_EOF, &[]);
        return stream;
    };

    // BOUNDSHEET8のデータはレコードヘッダー（4バイト）の直後
    let position_offset = stream.len() + 4;
    push_record(&mut stream, RECORD_BOUNDSHEET, &boundsheet(name));
    push_record(&mut stream, RECORD_EOF, &[]);

    let sheet_start = u32::try_from(stream.len()).unwrap();
    stream[position_offset..position_offset + 4].copy_from_slice(&sheet_start.to_le_bytes());

    push_record(&mut stream, RECORD_BOF, &bof(BOF_WORKSHEET));
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, text) in row.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let row_num = u16::try_from(row_idx).unwrap();
            let col_num = u16::try_from(col_idx).unwrap();
            cell_record(&mut stream, row_num, col_num, text);
        }
    }
    push_record(&mut stream, RECORD_EOF, &[]);
    stream
}

/// ディレクトリエントリ（128バイト）
fn directory_entry(name: &str, object_type: u8, child: u32, start: u32, size: u32) -> Vec<u8> {
    let mut entry = vec![0u8; 128];
    let units: Vec<u16> = name.encode_utf16().collect();
    for (i, unit) in units.iter().enumerate() {
        entry[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    if !name.is_empty() {
        let name_len = u16::try_from((units.len() + 1) * 2).unwrap();
        entry[64..66].copy_from_slice(&name_len.to_le_bytes());
        entry[67] = 1; // black
    }
    entry[66] = object_type;
    entry[68..72].copy_from_slice(&NOSTREAM.to_le_bytes());
    entry[72..76].copy_from_slice(&NOSTREAM.to_le_bytes());
    entry[76..80].copy_from_slice(&child.to_le_bytes());
    entry[116..120].copy_from_slice(&start.to_le_bytes());
    entry[120..124].copy_from_slice(&size.to_le_bytes());
    entry
}

/// Workbookストリームを1本だけ持つCFB v3コンテナに包む
///
/// セクター配置: 0 = FAT、1 = ディレクトリ、2 = ルートのミニストリーム、
/// 3以降 = Workbookストリーム
fn compound_file(workbook: &[u8]) -> Vec<u8> {
    let padded_len = workbook
        .len()
        .max(MINI_STREAM_CUTOFF)
        .div_ceil(SECTOR_SIZE)
        * SECTOR_SIZE;
    let stream_sectors = padded_len / SECTOR_SIZE;
    let first_stream_sector = 3u32;

    let mut header = Vec::with_capacity(SECTOR_SIZE);
    header.extend_from_slice(&OLE2_SIGNATURE);
    header.extend_from_slice(&[0u8; 16]); // CLSID
    push_u16(&mut header, 0x003E); // minor version
    push_u16(&mut header, 0x0003); // major version
    push_u16(&mut header, 0xFFFE); // byte order
    push_u16(&mut header, 0x0009); // 512-byte sectors
    push_u16(&mut header, 0x0006); // 64-byte mini sectors
    header.extend_from_slice(&[0u8; 6]);
    push_u32(&mut header, 0); // directory sectors (v3)
    push_u32(&mut header, 1); // FAT sectors
    push_u32(&mut header, 1); // first directory sector
    push_u32(&mut header, 0); // transaction
    push_u32(&mut header, MINI_STREAM_CUTOFF as u32);
    push_u32(&mut header, ENDOFCHAIN); // first mini FAT sector
    push_u32(&mut header, 0); // mini FAT sectors
    push_u32(&mut header, ENDOFCHAIN); // first DIFAT sector
    push_u32(&mut header, 0); // DIFAT sectors
    push_u32(&mut header, 0); // DIFAT[0] = FAT sector
    while header.len() < SECTOR_SIZE {
        push_u32(&mut header, FREESECT);
    }

    let mut fat = Vec::with_capacity(SECTOR_SIZE);
    push_u32(&mut fat, FATSECT);
    push_u32(&mut fat, ENDOFCHAIN); // directory
    push_u32(&mut fat, ENDOFCHAIN); // mini stream
    for i in 0..stream_sectors {
        let next = if i + 1 < stream_sectors {
            first_stream_sector + u32::try_from(i).unwrap() + 1
        } else {
            ENDOFCHAIN
        };
        push_u32(&mut fat, next);
    }
    assert!(fat.len() <= SECTOR_SIZE, "workbook stream too large for one FAT sector");
    while fat.len() < SECTOR_SIZE {
        push_u32(&mut fat, FREESECT);
    }

    let mut directory = Vec::with_capacity(SECTOR_SIZE);
    directory.extend(directory_entry("Root Entry", 5, 1, 2, 0));
    directory.extend(directory_entry(
        "Workbook",
        2,
        NOSTREAM,
        first_stream_sector,
        u32::try_from(padded_len).unwrap(),
    ));
    directory.extend(directory_entry("", 0, NOSTREAM, 0, 0));
    directory.extend(directory_entry("", 0, NOSTREAM, 0, 0));

    let mut file = header;
    file.extend(fat);
    file.extend(directory);
    file.extend(vec![0u8; SECTOR_SIZE]);
    file.extend_from_slice(workbook);
    file.resize(SECTOR_SIZE * 3 + SECTOR_SIZE + padded_len, 0);
    file
}
