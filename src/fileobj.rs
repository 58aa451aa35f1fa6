//! File objects for [`LakeFs`](crate::LakeFs).
//!
//! [`ObjectReader`] reads an object through a block-sized buffer and
//! implements [`std::io::Read`] and [`std::io::Seek`], so parquet readers
//! and other seek-heavy consumers work without downloading the whole
//! object. [`ObjectWriter`] accumulates writes and uploads on
//! [`close()`](ObjectWriter::close).

use std::io;
use std::sync::Arc;

use crate::client::{ByteRange, LakeClient};
use crate::error::Result;
use crate::paths::LakePath;
use crate::types::ObjectStats;

/// Bytes fetched per read-through block.
pub const DEFAULT_BLOCKSIZE: u64 = 5 * 1024 * 1024;

/// Read-only handle on one object.
///
/// Reads are served from an internal buffer that is refilled with ranged
/// requests of `blocksize` bytes, so seeking does not refetch the object.
///
/// # Example
///
/// ```rust,no_run
/// use std::io::{Read, Seek, SeekFrom};
/// use lakefs_fs::LakeFs;
///
/// let fs = LakeFs::connect().unwrap();
/// let mut f = fs.open("quickstart/main/lakes.parquet").unwrap();
/// f.seek(SeekFrom::End(-4)).unwrap();
/// let mut footer = Vec::new();
/// f.read_to_end(&mut footer).unwrap();
/// ```
pub struct ObjectReader {
    client: Arc<LakeClient>,
    location: LakePath,
    size: u64,
    pos: u64,
    blocksize: u64,
    buf: Vec<u8>,
    buf_start: u64,
}

impl ObjectReader {
    pub(crate) fn new(client: Arc<LakeClient>, location: LakePath, size: u64) -> Self {
        Self {
            client,
            location,
            size,
            pos: 0,
            blocksize: DEFAULT_BLOCKSIZE,
            buf: Vec::new(),
            buf_start: 0,
        }
    }

    /// Object size in bytes, as reported when the reader was opened.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn location(&self) -> &LakePath {
        &self.location
    }

    /// Use a different block size for subsequent fetches.
    pub fn with_blocksize(mut self, blocksize: u64) -> Self {
        self.blocksize = blocksize.max(1);
        self.buf.clear();
        self.buf_start = 0;
        self
    }

    fn buffered(&self) -> bool {
        self.pos >= self.buf_start && self.pos < self.buf_start + self.buf.len() as u64
    }

    fn fill(&mut self) -> io::Result<()> {
        let start = self.pos;
        let end = (start + self.blocksize).min(self.size);
        let range = ByteRange::Span(start, end - 1);
        let data = self
            .client
            .get_object(
                &self.location.repository,
                &self.location.reference,
                &self.location.path,
                Some(&range),
            )
            .map_err(io::Error::from)?;
        self.buf = data;
        self.buf_start = start;
        Ok(())
    }
}

impl io::Read for ObjectReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() || self.pos >= self.size {
            return Ok(0);
        }
        if !self.buffered() {
            self.fill()?;
        }
        let offset = (self.pos - self.buf_start) as usize;
        let n = out.len().min(self.buf.len() - offset);
        out[..n].copy_from_slice(&self.buf[offset..offset + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl io::Seek for ObjectReader {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let next = match pos {
            io::SeekFrom::Start(n) => n as i64,
            io::SeekFrom::Current(delta) => self.pos as i64 + delta,
            io::SeekFrom::End(delta) => self.size as i64 + delta,
        };
        if next < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of object",
            ));
        }
        self.pos = next as u64;
        Ok(self.pos)
    }
}

/// Buffered writer that uploads one object on close.
///
/// Implements [`std::io::Write`] for streaming data. Call
/// [`close()`](ObjectWriter::close) to upload the buffer; after closing,
/// further writes fail. Dropping an unclosed writer uploads best-effort.
///
/// # Example
///
/// ```rust,no_run
/// use std::io::Write;
/// use lakefs_fs::LakeFs;
///
/// let fs = LakeFs::connect().unwrap();
/// let mut w = fs.open_write("quickstart/main/output.bin").unwrap();
/// w.write_all(b"chunk 1").unwrap();
/// w.write_all(b"chunk 2").unwrap();
/// let stats = w.close().unwrap();
/// assert_eq!(stats.path, "output.bin");
/// ```
pub struct ObjectWriter {
    client: Arc<LakeClient>,
    location: LakePath,
    content_type: Option<String>,
    buf: Vec<u8>,
    stats: Option<ObjectStats>,
}

impl ObjectWriter {
    pub(crate) fn new(
        client: Arc<LakeClient>,
        location: LakePath,
        content_type: Option<String>,
    ) -> Self {
        Self {
            client,
            location,
            content_type,
            buf: Vec::new(),
            stats: None,
        }
    }

    pub fn location(&self) -> &LakePath {
        &self.location
    }

    /// Whether this writer has been closed.
    pub fn closed(&self) -> bool {
        self.stats.is_some()
    }

    /// Upload the buffered data and return the new object's stats.
    ///
    /// Closing again returns the same stats without another upload.
    pub fn close(&mut self) -> Result<ObjectStats> {
        if let Some(stats) = &self.stats {
            return Ok(stats.clone());
        }
        let data = std::mem::take(&mut self.buf);
        let stats = self.client.upload_object(
            &self.location.repository,
            &self.location.reference,
            &self.location.path,
            data,
            self.content_type.as_deref(),
        )?;
        self.stats = Some(stats.clone());
        Ok(stats)
    }
}

impl io::Write for ObjectWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "I/O operation on closed writer",
            ));
        }
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ObjectWriter {
    fn drop(&mut self) {
        if !self.closed() {
            let _ = self.close();
        }
    }
}
