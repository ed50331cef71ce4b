//! The two word2vec on-disk layouts.
//!
//! Binary: an ASCII header `"<count> <dimensions>\n"`, then for each word the
//! UTF-8 word terminated by a space, `dimensions` little-endian `f32`s, and
//! (in most writers) a newline.
//!
//! Text: an optional `"<count> <dimensions>"` header line, then one
//! `word v1 v2 ...` line per word. GloVe files are the same without the
//! header.

use crate::error::{ErrorKind, Result};
use crate::vectors::StaticWordVectors;
use std::io::{BufRead, ErrorKind as IoErrorKind};

/// Vectors between progress events while loading.
const PROGRESS_INTERVAL: usize = 500_000;
/// Widest vector a binary model may declare.
const MAX_DIMENSIONS: usize = 1 << 16;

pub(crate) fn read_binary<R: BufRead>(reader: &mut R) -> Result<StaticWordVectors> {
    let mut header = String::new();
    reader.read_line(&mut header).map_err(ErrorKind::Io)?;
    let Some((declared, dimensions)) = parse_header(&header) else {
        exn::bail!(ErrorKind::InvalidHeader(header.trim_end().to_string()));
    };
    let Some(record_size) = dimensions.checked_mul(size_of::<f32>()).filter(|_| dimensions <= MAX_DIMENSIONS) else {
        exn::bail!(ErrorKind::InvalidHeader(header.trim_end().to_string()));
    };
    tracing::debug!(declared, dimensions, "Reading binary word2vec model");

    let mut vectors = StaticWordVectors::with_capacity(dimensions, declared);
    let mut word = Vec::new();
    let mut raw = vec![0u8; record_size];
    let mut vector = Vec::with_capacity(dimensions);
    for read in 0..declared {
        let truncated = || ErrorKind::Truncated { read, declared };
        word.clear();
        if reader.read_until(b' ', &mut word).map_err(ErrorKind::Io)? == 0 || word.last() != Some(&b' ') {
            exn::bail!(truncated());
        }
        reader.read_exact(&mut raw).map_err(|e| match e.kind() {
            IoErrorKind::UnexpectedEof => truncated(),
            _ => ErrorKind::Io(e),
        })?;
        vector.clear();
        vector.extend(raw.chunks_exact(4).map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])));
        // The separator newline is optional and belongs to the previous record.
        let text = String::from_utf8_lossy(&word);
        vectors.insert(text.trim_matches(|c: char| c.is_ascii_whitespace()).to_string(), &vector)?;
        log_progress(read + 1);
    }
    Ok(vectors)
}

pub(crate) fn read_text<R: BufRead>(reader: &mut R) -> Result<StaticWordVectors> {
    let mut vectors: Option<StaticWordVectors> = None;
    let mut read = 0;
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(ErrorKind::Io)?;
        let line_number = number + 1;
        if line.trim().is_empty() {
            continue;
        }
        if number == 0
            && let Some((declared, dimensions)) = parse_header(&line)
        {
            tracing::debug!(declared, dimensions, "Reading text word2vec model");
            vectors = Some(StaticWordVectors::with_capacity(dimensions, declared));
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };
        let parsed: std::result::Result<Vec<f32>, _> = fields.map(str::parse::<f32>).collect();
        let Ok(vector) = parsed else {
            exn::bail!(ErrorKind::Malformed { line: line_number });
        };
        if vector.is_empty() {
            exn::bail!(ErrorKind::Malformed { line: line_number });
        }
        // Without a header the first vector fixes the dimensionality.
        let table = vectors.get_or_insert_with(|| StaticWordVectors::with_capacity(vector.len(), 0));
        table.insert(word.to_string(), &vector)?;
        read += 1;
        log_progress(read);
    }
    Ok(vectors.unwrap_or_default())
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let count = fields.next()?.parse().ok()?;
    let dimensions = fields.next()?.parse().ok()?;
    match fields.next() {
        None if dimensions > 0 => Some((count, dimensions)),
        _ => None,
    }
}

fn log_progress(read: usize) {
    if read % PROGRESS_INTERVAL == 0 {
        tracing::info!(read, "Loading word vectors...");
    }
}
