//! Record Normalizer Module
//!
//! すべてのリーダーが共有するセル文字列のサニタイズと列幅の調整。

/// セル文字列をサニタイズする
///
/// 1. CRLF、単独のCR、単独のLFをそれぞれ1つの空白に置換
/// 2. 2つ以上連続する空白を1つに畳み込む
/// 3. 前後の空白文字を取り除く
///
/// 結果にCR・LFは含まれず、`sanitize(sanitize(x)) == sanitize(x)`が成り立ちます。
///
/// # 使用例
///
/// ```rust
/// use sheetshift::sanitize;
///
/// assert_eq!(sanitize("  a\r\nb   c \n"), "a b c");
/// ```
pub fn sanitize(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    let mut chars = cell.chars().peekable();

    while let Some(ch) = chars.next() {
        let ch = match ch {
            '\r' => {
                // CRLFは1つの空白として扱う
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                ' '
            }
            '\n' => ' ',
            other => other,
        };

        if ch == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(ch);
    }

    let trimmed = out.trim();
    if trimmed.len() == out.len() {
        out
    } else {
        trimmed.to_string()
    }
}

/// 0行目の列数に合わせて、短い行の右側を空文字列で埋める
///
/// 0行目より長い行は切り詰めません。
///
/// # 使用例
///
/// ```rust
/// use sheetshift::align_width;
///
/// let mut rows = vec![
///     vec!["a".to_string(), "b".to_string()],
///     vec!["1".to_string()],
/// ];
/// align_width(&mut rows);
/// assert_eq!(rows[1], vec!["1".to_string(), String::new()]);
/// ```
pub fn align_width(rows: &mut [Vec<String>]) {
    let Some(width) = rows.first().map(Vec::len) else {
        return;
    };

    for row in rows.iter_mut().skip(1) {
        if row.len() < width {
            row.resize(width, String::new());
        }
    }
}
