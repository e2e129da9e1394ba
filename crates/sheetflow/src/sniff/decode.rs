//! Streaming decoder adapter.
//!
//! Wraps any byte reader in an incremental `encoding_rs` decoder so the
//! chunked conversion path can feed non-UTF-8 input to the CSV reader
//! without materializing the whole file. Malformed sequences become
//! replacement characters; decode failures are never fatal here because
//! the sniffer already committed to an encoding.

use std::io::Read;

use encoding_rs::{CoderResult, Decoder, Encoding};

const INPUT_CHUNK: usize = 8192;

/// A `Read` adapter yielding UTF-8 bytes decoded from `inner`.
pub struct DecodingReader<R: Read> {
    inner: R,
    decoder: Decoder,
    pending: Vec<u8>,
    pending_offset: usize,
    eof: bool,
    finished: bool,
}

impl<R: Read> DecodingReader<R> {
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            decoder: encoding.new_decoder(),
            pending: Vec::new(),
            pending_offset: 0,
            eof: false,
            finished: false,
        }
    }

    fn refill(&mut self) -> std::io::Result<()> {
        let mut raw = [0u8; INPUT_CHUNK];
        let n = if self.eof { 0 } else { self.inner.read(&mut raw)? };
        if n == 0 {
            self.eof = true;
        }

        let mut decoded = String::new();
        let mut src = &raw[..n];
        loop {
            decoded.reserve(
                self.decoder
                    .max_utf8_buffer_length(src.len())
                    .unwrap_or(INPUT_CHUNK),
            );
            let (result, read, _had_errors) =
                self.decoder.decode_to_string(src, &mut decoded, self.eof);
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }

        if self.eof {
            self.finished = true;
        }
        self.pending = decoded.into_bytes();
        self.pending_offset = 0;
        Ok(())
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.pending_offset >= self.pending.len() {
            if self.finished {
                return Ok(0);
            }
            self.refill()?;
        }

        let available = &self.pending[self.pending_offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pending_offset += n;
        Ok(n)
    }
}
