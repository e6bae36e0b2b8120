//! Newline-delimited JSON framing over a chunked byte stream.
//!
//! The body is read through a [`StreamReader`] and split by a bounded
//! [`LinesCodec`]. Blank lines are skipped, `\r\n` endings are accepted, and
//! a trailing record without a final newline is still yielded when the
//! stream ends. A line longer than the limit fails the stream.

use std::{fmt, io};

use bytes::Buf;
use futures_util::future;
use futures_util::stream::{BoxStream, Stream, StreamExt};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;

use crate::ClientError;

/// Upper bound on a single record.
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

fn framing_error(e: LinesCodecError) -> ClientError {
    match e {
        LinesCodecError::MaxLineLengthExceeded => {
            ClientError::InvalidResponse("line exceeds the maximum record length".into())
        }
        LinesCodecError::Io(e) if e.kind() == io::ErrorKind::InvalidData => {
            ClientError::InvalidResponse(format!("line is not UTF-8: {e}"))
        }
        LinesCodecError::Io(e) => ClientError::Stream(e.to_string()),
    }
}

/// Adapt a byte-chunk stream into a stream of lines, each at most
/// [`MAX_LINE_LENGTH`] bytes.
///
/// The returned stream ends after the first error.
pub fn lines<S, B, E>(chunks: S) -> BoxStream<'static, Result<String, ClientError>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: Buf + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    lines_with_max_length(chunks, MAX_LINE_LENGTH)
}

pub(crate) fn lines_with_max_length<S, B, E>(
    chunks: S,
    max_length: usize,
) -> BoxStream<'static, Result<String, ClientError>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: Buf + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let reader = StreamReader::new(
        chunks.map(|chunk| chunk.map_err(|e| io::Error::other(e.to_string()))),
    );

    FramedRead::new(reader, LinesCodec::new_with_max_length(max_length))
        .filter(|line| {
            let blank = matches!(line, Ok(text) if text.trim().is_empty());
            future::ready(!blank)
        })
        .scan(false, |failed, line| {
            if *failed {
                return future::ready(None);
            }
            *failed = line.is_err();
            future::ready(Some(line.map_err(framing_error)))
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    type Chunk = Result<&'static [u8], String>;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Chunk> + Send + 'static {
        let owned: Vec<Chunk> = parts.iter().copied().map(|p| Ok(p.as_bytes())).collect();
        stream::iter(owned)
    }

    async fn collect(parts: &[&'static str]) -> Vec<String> {
        lines(chunks(parts))
            .map(|line| line.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn splits_lines_across_chunks() {
        let lines = collect(&["{\"a\":", "1}\n{\"b\"", ":2}\n"]).await;
        assert_eq!(lines, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[tokio::test]
    async fn several_lines_in_one_chunk() {
        let lines = collect(&["one\ntwo\nthree\n"]).await;
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn skips_blank_lines_and_crlf() {
        let lines = collect(&["one\r\n\r\n\ntwo\r\n"]).await;
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn yields_trailing_line_without_newline() {
        let lines = collect(&["one\ntw", "o"]).await;
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn stops_after_error() {
        let parts: Vec<Chunk> = vec![
            Ok(&b"one\n"[..]),
            Err("connection reset".to_string()),
            Ok(&b"two\n"[..]),
        ];
        let results: Vec<_> = lines(stream::iter(parts)).collect().await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_deref().unwrap(), "one");
        assert!(matches!(results[1], Err(ClientError::Stream(_))));
    }

    #[tokio::test]
    async fn unterminated_oversized_record_fails_without_buffering_it() {
        let parts: Vec<Chunk> = vec![
            Ok(&b"ok\n"[..]),
            Ok(&b"0123456789"[..]),
            Ok(&b"abcdef"[..]),
        ];
        let results: Vec<_> = lines_with_max_length(stream::iter(parts), 8)
            .collect()
            .await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_deref().unwrap(), "ok");
        assert!(matches!(results[1], Err(ClientError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_invalid_response() {
        let parts: Vec<Chunk> = vec![Ok(&b"\xFF\xFE\n"[..])];
        let results: Vec<_> = lines(stream::iter(parts)).collect().await;
        assert!(matches!(results[0], Err(ClientError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn empty_body_has_no_lines() {
        assert!(collect(&[]).await.is_empty());
    }
}
