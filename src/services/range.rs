//! HTTP byte-range support: `Range` header parsing and bounded
//! random-access file reads.

use std::{io, io::SeekFrom, path::Path};
use thiserror::Error;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, Take},
};
use tokio_util::io::ReaderStream;

/// The `Range` header value could not be parsed as `bytes=<start>-[<end>]`.
#[derive(Debug, Error)]
#[error("malformed Range header `{0}`")]
pub struct MalformedRange(pub String);

/// Parse a `Range` header into a raw `(start, end)` byte interval.
///
/// `start` is required; `end` defaults to `file_len - 1` when the second
/// token is absent or empty (`bytes=500-`). The result is deliberately
/// unvalidated against `file_len` — satisfiability is the responder's call,
/// because an out-of-bounds range is a 416, not a parse failure.
pub fn parse_range_header(raw: &str, file_len: u64) -> Result<(u64, u64), MalformedRange> {
    let spec = raw.strip_prefix("bytes=").unwrap_or(raw);
    let mut parts = spec.split('-');

    let start = parts
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| MalformedRange(raw.to_string()))?;

    let end = match parts.next() {
        Some("") | None => file_len.saturating_sub(1),
        Some(text) => text
            .parse::<u64>()
            .map_err(|_| MalformedRange(raw.to_string()))?,
    };

    Ok((start, end))
}

/// True when the parsed interval can be served from a file of `file_len`
/// bytes: `start <= end < file_len`. Rejects inverted intervals and the
/// `start == file_len` boundary, both of which would describe an empty or
/// negative slice.
pub fn is_satisfiable(start: u64, end: u64, file_len: u64) -> bool {
    start <= end && end < file_len
}

/// Open `path` for random access and return a stream of exactly `len` bytes
/// starting at `start`.
///
/// The file handle is owned by the returned stream and closed when the
/// stream is dropped, whether the body finished, errored, or the client
/// disconnected mid-transfer. Memory use is bounded by the stream's chunk
/// size, independent of `len`.
pub async fn range_reader(
    path: &Path,
    start: u64,
    len: u64,
) -> io::Result<ReaderStream<Take<File>>> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(start)).await?;
    Ok(ReaderStream::new(file.take(len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn explicit_range() {
        assert_eq!(parse_range_header("bytes=0-499", 1000).unwrap(), (0, 499));
        assert_eq!(parse_range_header("bytes=2-5", 10).unwrap(), (2, 5));
    }

    #[test]
    fn open_ended_range_defaults_to_last_byte() {
        assert_eq!(parse_range_header("bytes=500-", 1000).unwrap(), (500, 999));
        assert_eq!(parse_range_header("bytes=0-", 10).unwrap(), (0, 9));
    }

    #[test]
    fn parser_does_not_validate_bounds() {
        // Out-of-bounds parses fine; satisfiability is checked separately.
        assert_eq!(parse_range_header("bytes=8-20", 10).unwrap(), (8, 20));
        assert_eq!(
            parse_range_header("bytes=0-999999", 100).unwrap(),
            (0, 999999)
        );
    }

    #[test]
    fn malformed_ranges() {
        assert!(parse_range_header("bytes=abc-def", 1000).is_err());
        assert!(parse_range_header("bytes=-", 1000).is_err());
        assert!(parse_range_header("bytes=-500", 1000).is_err());
        assert!(parse_range_header("bytes=", 1000).is_err());
    }

    #[test]
    fn satisfiability_bounds() {
        assert!(is_satisfiable(0, 99, 100));
        assert!(is_satisfiable(99, 99, 100));
        assert!(!is_satisfiable(0, 100, 100));
        assert!(!is_satisfiable(8, 20, 10));
        // start == file_len describes an empty slice.
        assert!(!is_satisfiable(100, 100, 100));
        // Inverted interval.
        assert!(!is_satisfiable(5, 2, 100));
        // Zero-length file satisfies nothing.
        assert!(!is_satisfiable(0, 0, 0));
    }

    #[tokio::test]
    async fn reader_yields_exactly_the_requested_slice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut stream = range_reader(&path, 2, 4).await.unwrap();
        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"2345");
    }

    #[tokio::test]
    async fn reader_stops_at_end_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        // Bounded past EOF: delivers what the file has, then end-of-stream.
        let mut stream = range_reader(&path, 8, 100).await.unwrap();
        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"89");
    }
}
