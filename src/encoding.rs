//! Encoding Module
//!
//! 区切り文字テキストの文字エンコーディング推定と、UTF-8へのトランスコード。
//! デコードには`encoding_rs`のストリーミングデコーダーを使用します。

use encoding_rs::{Decoder, Encoding, EUC_KR, UTF_16BE, UTF_16LE};
use std::io::{self, Read};

use crate::api::EncodingTag;
use crate::detect::DEFAULT_SAMPLE_SIZE;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// 1回の読み込みで内部リーダーから取得するバイト数
const RAW_CHUNK_SIZE: usize = 8 * 1024;

/// 先頭バイト列から文字エンコーディングを推定する
///
/// 判定順（最初に一致したものを採用）:
///
/// 1. `EF BB BF` で始まる → `Utf8Bom`
/// 2. `FF FE` で始まる → `Utf16Le`
/// 3. `FE FF` で始まる → `Utf16Be`
/// 4. UTF-8として正しい → `Utf8`
/// 5. それ以外 → `EucKr`
///
/// `prefix`は`DEFAULT_SAMPLE_SIZE`バイトまでのサンプルとして扱います。
/// サンプルがちょうどその長さの場合に限り、末尾で途中まで切れたマルチバイト文字を
/// 不正とみなしません（`sniff_with_sample_size`を参照）。
/// BOMのないUTF-16は検出しません。
///
/// # 使用例
///
/// ```rust
/// use sheetshift::{sniff, EncodingTag};
///
/// assert_eq!(sniff(b"\xEF\xBB\xBFa,b"), EncodingTag::Utf8Bom);
/// assert_eq!(sniff("이름,나이".as_bytes()), EncodingTag::Utf8);
/// assert_eq!(sniff(b"\xC0\xCC\xB8\xA7,\xB3\xAA\xC0\xCC"), EncodingTag::EucKr);
/// ```
pub fn sniff(prefix: &[u8]) -> EncodingTag {
    sniff_with_sample_size(prefix, DEFAULT_SAMPLE_SIZE)
}

/// 指定サンプルサイズで読み込んだ先頭バイト列から文字エンコーディングを推定する
///
/// `prefix.len()`が`sample_size`に達していない場合はファイル全体とみなし、
/// 末尾で切れたマルチバイト文字も不正なバイト列として扱います。
///
/// # 引数
///
/// * `prefix` - ファイル先頭から最大`sample_size`バイト
/// * `sample_size` - 読み込みに使った上限バイト数
pub fn sniff_with_sample_size(prefix: &[u8], sample_size: usize) -> EncodingTag {
    if prefix.starts_with(&UTF8_BOM) {
        return EncodingTag::Utf8Bom;
    }
    if prefix.starts_with(&UTF16LE_BOM) {
        return EncodingTag::Utf16Le;
    }
    if prefix.starts_with(&UTF16BE_BOM) {
        return EncodingTag::Utf16Be;
    }

    match std::str::from_utf8(prefix) {
        Ok(_) => EncodingTag::Utf8,
        // error_len() == None はサンプル末尾での切断
        Err(e) if e.error_len().is_none() && prefix.len() >= sample_size => EncodingTag::Utf8,
        Err(_) => EncodingTag::EucKr,
    }
}

/// エンコーディングに対応する`encoding_rs`のエンコーディング
///
/// UTF-8系はデコード不要のため`None`を返します。
fn decoder_encoding(tag: EncodingTag) -> Option<&'static Encoding> {
    match tag {
        EncodingTag::Utf8 | EncodingTag::Utf8Bom => None,
        EncodingTag::Utf16Le => Some(UTF_16LE),
        EncodingTag::Utf16Be => Some(UTF_16BE),
        EncodingTag::EucKr => Some(EUC_KR),
    }
}

/// UTF-8テキストを返す読み込みストリーム
///
/// `wrap`が返すストリームで、UTF-8系はそのまま通過させ、それ以外は
/// `TranscodingReader`を経由してUTF-8に変換します。
#[derive(Debug)]
pub enum TextStream<R: Read> {
    /// 元のバイト列がすでにUTF-8
    Passthrough(R),

    /// デコードしながら読み込む
    Decoded(TranscodingReader<R>),
}

impl<R: Read> Read for TextStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            TextStream::Passthrough(inner) => inner.read(buf),
            TextStream::Decoded(inner) => inner.read(buf),
        }
    }
}

/// バイトストリームを、読み込むとUTF-8テキストが得られるストリームで包む
///
/// # 引数
///
/// * `stream` - 元のバイトストリーム
/// * `tag` - `sniff`で推定したエンコーディング
///
/// # 注意
///
/// `Utf8Bom`の場合、BOM（3バイト）は内容ではないため、呼び出し側で
/// 読み飛ばしてから渡す必要があります。UTF-16のBOMはデコード時に消費されます。
pub fn wrap<R: Read>(stream: R, tag: EncodingTag) -> TextStream<R> {
    match decoder_encoding(tag) {
        None => TextStream::Passthrough(stream),
        Some(encoding) => TextStream::Decoded(TranscodingReader::new(stream, encoding)),
    }
}

/// 任意のエンコーディングのバイトストリームをUTF-8に変換するリーダー
///
/// 同期・プル型で、`read`の呼び出しごとに必要な分だけ内部リーダーから
/// 読み込んでデコードします。不正なバイト列はU+FFFDに置換されます。
pub struct TranscodingReader<R: Read> {
    inner: R,
    decoder: Decoder,
    raw: Box<[u8]>,
    decoded: Vec<u8>,
    pos: usize,
    finished: bool,
}

impl<R: Read> TranscodingReader<R> {
    /// デコーダーを生成する（先頭のBOMは取り除かれる）
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            decoder: encoding.new_decoder_with_bom_removal(),
            raw: vec![0u8; RAW_CHUNK_SIZE].into_boxed_slice(),
            decoded: Vec::new(),
            pos: 0,
            finished: false,
        }
    }

    /// 内部リーダーから次のチャンクを読み込み、`decoded`を補充する
    fn fill(&mut self) -> io::Result<()> {
        let n = self.inner.read(&mut self.raw)?;
        let last = n == 0;

        let capacity = self
            .decoder
            .max_utf8_buffer_length(n)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "decode buffer overflow"))?;

        self.decoded.clear();
        self.decoded.resize(capacity, 0);
        self.pos = 0;

        let (_, read, written, _) =
            self.decoder
                .decode_to_utf8(&self.raw[..n], &mut self.decoded, last);
        debug_assert_eq!(read, n);
        self.decoded.truncate(written);

        if last {
            self.finished = true;
        }
        Ok(())
    }
}

impl<R: Read> Read for TranscodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pos >= self.decoded.len() {
            if self.finished {
                return Ok(0);
            }
            self.fill()?;
        }

        let available = &self.decoded[self.pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl<R: Read> std::fmt::Debug for TranscodingReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscodingReader")
            .field("encoding", &self.decoder.encoding().name())
            .field("buffered", &(self.decoded.len() - self.pos))
            .field("finished", &self.finished)
            .finish()
    }
}
