// Flowgate - Telemetry-to-actuation gateway
// Copyright (c) 2025 Flowgate Project
//
// Licensed under AGPL-3.0. See LICENSE file for details.

//! Line framing over byte streams
//!
//! The wire protocol is newline-delimited ASCII. [`FrameReader`] yields one
//! complete frame per call with the delimiter stripped; [`FrameWriter`]
//! appends the delimiter and flushes so each response leaves as a whole
//! frame. Reads are buffered but never cross a newline boundary: bytes after
//! the delimiter stay in the buffer for the next frame.

use std::io::{BufRead, BufReader, Read, Write};

use crate::error::StreamError;

/// Buffered reader yielding newline-delimited frames
pub struct FrameReader<R: Read> {
    inner: BufReader<R>,
}

impl<R: Read> FrameReader<R> {
    /// Wrap a byte stream in a frame reader
    pub fn new(source: R) -> Self {
        Self {
            inner: BufReader::new(source),
        }
    }

    /// Read the next complete frame, delimiter stripped
    ///
    /// Blocks until a newline arrives. Frames are decoded lossily: the
    /// protocol is ASCII, and any non-UTF-8 byte ends up as a replacement
    /// character that fails token parsing downstream instead of killing the
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Closed`] if the stream ends before a newline
    /// is seen (including end-of-stream with a partial frame buffered), or
    /// [`StreamError::Io`] on a read failure.
    pub fn next_frame(&mut self) -> Result<String, StreamError> {
        let mut buf = Vec::new();
        let n = self.inner.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Err(StreamError::Closed);
        }
        match buf.last() {
            Some(b'\n') => {
                buf.pop();
            }
            // Data without a trailing newline means the peer went away
            // mid-frame; the partial frame is never surfaced.
            _ => return Err(StreamError::Closed),
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Writer emitting one newline-terminated frame at a time
pub struct FrameWriter<W: Write> {
    inner: W,
}

impl<W: Write> FrameWriter<W> {
    /// Wrap a byte sink in a frame writer
    pub fn new(sink: W) -> Self {
        Self { inner: sink }
    }

    /// Write a frame followed by the newline delimiter and flush
    ///
    /// # Errors
    ///
    /// Returns a [`StreamError`] if the write or flush fails.
    pub fn send(&mut self, frame: &str) -> Result<(), StreamError> {
        self.inner.write_all(frame.as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        Ok(())
    }
}
