//! Random-access byte buffer fed by a push-based producer.
//!
//! [`MemoryBuffer`] is what a pull-based decoder reads from while the bytes
//! are still arriving. Writes always append at the end; reads and seeks move
//! an independent read cursor. Once the cursor has moved past the retention
//! limit, the next write drops everything before it.
//!
//! Offsets given to and returned from [`Seek`] are positions in the whole
//! logical stream, so they stay valid across compaction.

use std::io::{self, Read, Seek, SeekFrom, Write};

use tracing::debug;

/// Default retention limit before consumed bytes are dropped.
pub const DEFAULT_MAX_RETAINED_BYTES: usize = 10 * 1024 * 1024;

/// What [`MemoryBuffer::tell`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Position within the retained backing store.
    #[default]
    Physical,
    /// Position within the declared stream. Entered permanently by the first
    /// end-relative seek.
    DeclaredEnd,
}

/// How many bytes [`MemoryBuffer::read_count`] should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadCount {
    /// At most this many bytes.
    Bytes(usize),
    /// Everything after the read cursor.
    All,
}

/// A growable byte store with a seekable read cursor.
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    content_length: u64,
    data: Vec<u8>,
    position: usize,
    discarded: u64,
    max_retained: usize,
    mode: CursorMode,
}

impl MemoryBuffer {
    /// Creates a buffer for a stream the producer declared to be
    /// `content_length` bytes long.
    pub fn new(content_length: u64) -> Self {
        Self::with_max_retained(content_length, DEFAULT_MAX_RETAINED_BYTES)
    }

    /// Creates a buffer that compacts once the read cursor passes
    /// `max_retained` bytes.
    pub fn with_max_retained(content_length: u64, max_retained: usize) -> Self {
        Self {
            content_length,
            data: Vec::new(),
            position: 0,
            discarded: 0,
            max_retained,
            mode: CursorMode::Physical,
        }
    }

    /// The total length declared by the producer.
    pub const fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Total bytes appended so far.
    pub fn bytes_written(&self) -> u64 {
        self.discarded + self.data.len() as u64
    }

    /// Bytes dropped by compaction so far.
    pub const fn bytes_discarded(&self) -> u64 {
        self.discarded
    }

    /// Bytes currently held in memory.
    pub fn retained(&self) -> usize {
        self.data.len()
    }

    /// Bytes between the read cursor and the end of the written data.
    pub fn available(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// True once every declared byte has been written.
    pub fn is_complete(&self) -> bool {
        self.bytes_written() >= self.content_length
    }

    /// The current cursor mode.
    pub const fn mode(&self) -> CursorMode {
        self.mode
    }

    /// The read cursor as an offset into the whole stream.
    pub fn logical_position(&self) -> u64 {
        self.discarded + self.position as u64
    }

    /// The read cursor, reported according to [`CursorMode`].
    ///
    /// In [`CursorMode::Physical`] this is the offset into the retained bytes;
    /// after an end-relative seek it is the offset into the declared stream,
    /// so a decoder probing the length sees the declared total.
    pub fn tell(&self) -> u64 {
        match self.mode {
            CursorMode::Physical => self.position as u64,
            CursorMode::DeclaredEnd => self.logical_position(),
        }
    }

    /// Reads up to `count` bytes from the read cursor.
    ///
    /// A short or empty result means no more data has been written yet.
    pub fn read_count(&mut self, count: ReadCount) -> Vec<u8> {
        let remaining = self.data.get(self.position..).unwrap_or(&[]);
        let n = match count {
            ReadCount::Bytes(n) => n.min(remaining.len()),
            ReadCount::All => remaining.len(),
        };
        let out = remaining[..n].to_vec();
        self.position += n;
        out
    }

    fn compact(&mut self) {
        let drop = self.position.min(self.data.len());
        if drop == 0 {
            return;
        }
        self.data = self.data.split_off(drop);
        self.position -= drop;
        self.discarded += drop as u64;
        debug!(
            dropped = drop,
            retained = self.data.len(),
            discarded = self.discarded,
            "compacted memory buffer"
        );
    }

    fn declared_end(&self) -> u64 {
        self.content_length.max(self.bytes_written())
    }
}

impl Read for MemoryBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.data.get(self.position..).unwrap_or(&[]);
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.position > self.max_retained {
            self.compact();
        }
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryBuffer {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (base, offset) = match pos {
            SeekFrom::Start(n) => (0, i128::from(n)),
            SeekFrom::Current(n) => (self.logical_position(), i128::from(n)),
            SeekFrom::End(n) => {
                if self.mode == CursorMode::Physical {
                    debug!(content_length = self.content_length, "tell now reports the declared stream");
                }
                self.mode = CursorMode::DeclaredEnd;
                (self.declared_end(), i128::from(n))
            }
        };
        let target = i128::from(base) + offset;
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative position",
            ));
        }
        let target = u64::try_from(target)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "seek position overflows"))?;
        if target < self.discarded {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "cannot seek to {target}: the first {} bytes were discarded",
                    self.discarded
                ),
            ));
        }
        self.position = usize::try_from(target - self.discarded)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "seek position overflows"))?;
        Ok(target)
    }
}
