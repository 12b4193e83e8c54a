// In: src/bridge/writer.rs

//! Streams documents into a single JSON array on disk.
//!
//! The array is built incrementally: `[` on open, then every document followed
//! by `,`. Closing seeks back over the trailing separator and writes `]`, so a
//! run never holds more than the document being serialized.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::chunk_pipeline::traits::DocumentSink;
use crate::error::CollectError;
use crate::types::Document;

#[derive(Debug)]
pub struct JsonArrayWriter<W: Write + Seek> {
    inner: W,
    docs_written: usize,
}

impl JsonArrayWriter<BufWriter<File>> {
    /// Creates `path` and opens the array. Fails if `path` already exists.
    pub fn create(path: &Path) -> Result<Self, CollectError> {
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write + Seek> JsonArrayWriter<W> {
    pub fn new(mut inner: W) -> Result<Self, CollectError> {
        inner.write_all(b"[")?;
        Ok(Self {
            inner,
            docs_written: 0,
        })
    }

    pub fn write(&mut self, doc: &Document) -> Result<(), CollectError> {
        serde_json::to_writer(&mut self.inner, doc)?;
        self.inner.write_all(b",")?;
        self.docs_written += 1;
        Ok(())
    }

    pub fn docs_written(&self) -> usize {
        self.docs_written
    }

    /// Closes the array and returns the underlying writer.
    ///
    /// With no documents written the output is `[]`.
    pub fn close(mut self) -> Result<W, CollectError> {
        if self.docs_written > 0 {
            self.inner.seek(SeekFrom::Current(-1))?;
        }
        self.inner.write_all(b"]")?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write + Seek> DocumentSink for JsonArrayWriter<W> {
    fn write_document(&mut self, doc: &Document) -> Result<(), CollectError> {
        self.write(doc)
    }
}
