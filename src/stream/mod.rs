//! Stream layer: moves relation records between byte streams and the
//! engine. Decode → build → drain → emit, one pass, two buffers.

use std::io::{self, Read, Write};

use arrayvec::ArrayVec;
use zerocopy::{FromZeros, IntoBytes};

use crate::core::drain::{Completion, Drain};
use crate::core::graph::{DependencyGraph, GraphError};
use crate::core::relation::{ObjectId, RawRelation, NULL_OBJECT, RELATION_SIZE};

/// Records buffered per reader refill.
pub const RELATION_BATCH: usize = 256;

/// Bytes per emitted id record.
pub const ORDER_RECORD_SIZE: usize = 4;

/// Bytes the writer batches before flushing to the sink.
pub const OUTPUT_BATCH: usize = 1024;

const _: () = {
    assert!(OUTPUT_BATCH % ORDER_RECORD_SIZE == 0);
};

/// Why a run failed. A cyclic input is not in here: it is a normal
/// outcome, reported through [`Completion`].
#[derive(Debug)]
pub enum StreamError {
    /// Header record's predecessor field was not zero.
    MalformedHeader,
    /// Stream ended before the terminator record, or mid-record.
    TruncatedInput,
    /// The graph refused a relation or could not grow.
    Graph(GraphError),
    /// The underlying reader or writer failed.
    Io(io::Error),
}

impl From<GraphError> for StreamError {
    #[inline(always)]
    fn from(err: GraphError) -> Self {
        StreamError::Graph(err)
    }
}

impl From<io::Error> for StreamError {
    #[inline(always)]
    fn from(err: io::Error) -> Self {
        StreamError::Io(err)
    }
}

/// Batching decoder over any byte source.
///
/// Holds at most [`RELATION_BATCH`] records and refills when they run
/// out, so arbitrarily long streams decode in constant space. The
/// sequence is lazy and forward-only; restarting means rebuilding the
/// reader.
pub struct RelationReader<R> {
    inner: R,
    batch: [RawRelation; RELATION_BATCH],
    /// Records decoded into `batch` by the last refill.
    filled: usize,
    /// Records already handed out.
    pos: usize,
    /// Stray bytes after the last whole record at end-of-stream.
    tail: usize,
}

impl<R: Read> RelationReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            batch: [RawRelation::new_zeroed(); RELATION_BATCH],
            filled: 0,
            pos: 0,
            tail: 0,
        }
    }

    /// Next record, or `None` at clean end-of-stream.
    ///
    /// A stream ending inside a record is [`StreamError::TruncatedInput`],
    /// not a clean end. Bytes the reader buffered but the caller never
    /// asked for are simply dropped.
    pub fn next_record(&mut self) -> Result<Option<RawRelation>, StreamError> {
        if self.pos == self.filled {
            if self.tail != 0 {
                return Err(StreamError::TruncatedInput);
            }
            self.refill()?;
            if self.filled == 0 {
                if self.tail != 0 {
                    return Err(StreamError::TruncatedInput);
                }
                return Ok(None);
            }
        }
        let record = self.batch[self.pos];
        self.pos += 1;
        Ok(Some(record))
    }

    /// Fill the batch from the source. Short reads keep going; only a
    /// read of zero bytes ends the stream.
    fn refill(&mut self) -> Result<(), StreamError> {
        let bytes = self.batch.as_mut_bytes();
        let mut len = 0;
        while len < bytes.len() {
            match self.inner.read(&mut bytes[len..]) {
                Ok(0) => break,
                Ok(n) => len += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(StreamError::Io(err)),
            }
        }
        self.filled = len / RELATION_SIZE;
        self.tail = len % RELATION_SIZE;
        self.pos = 0;
        Ok(())
    }
}

/// Batching encoder for the ordered output.
///
/// Buffers up to [`OUTPUT_BATCH`] bytes; [`OrderWriter::finish`] writes
/// the trailing zero record and flushes everything through.
pub struct OrderWriter<W> {
    inner: W,
    batch: ArrayVec<u8, OUTPUT_BATCH>,
}

impl<W: Write> OrderWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            batch: ArrayVec::new(),
        }
    }

    /// Append one id record.
    pub fn push(&mut self, id: ObjectId) -> Result<(), StreamError> {
        if self.batch.remaining_capacity() < ORDER_RECORD_SIZE {
            self.flush_batch()?;
        }
        // The batch length is a multiple of the record size, so a whole
        // record always fits after the flush above.
        for byte in id.to_le_bytes() {
            self.batch.push(byte);
        }
        Ok(())
    }

    /// Write the trailing zero record and flush the sink.
    pub fn finish(&mut self) -> Result<(), StreamError> {
        self.push(NULL_OBJECT)?;
        self.flush_batch()?;
        self.inner.flush()?;
        Ok(())
    }

    fn flush_batch(&mut self) -> Result<(), StreamError> {
        if !self.batch.is_empty() {
            self.inner.write_all(&self.batch)?;
            self.batch.clear();
        }
        Ok(())
    }
}

/// Decode a relation stream, order it, and emit the result.
///
/// Input: a `(0, N)` header record, then edge records, then the `(0, 0)`
/// terminator. Output: the emitted ids followed by a zero record. The
/// emitted prefix and the trailing zero are written even when the verdict
/// is [`Completion::Cyclic`]; the caller decides what the verdict means.
pub fn run<R: Read, W: Write>(input: R, output: W) -> Result<Completion, StreamError> {
    let mut reader = RelationReader::new(input);

    let header = reader
        .next_record()?
        .ok_or(StreamError::TruncatedInput)?;
    let object_count = header.as_header().ok_or(StreamError::MalformedHeader)?;

    let mut graph = DependencyGraph::new(object_count)?;
    loop {
        let record = reader
            .next_record()?
            .ok_or(StreamError::TruncatedInput)?;
        if record.is_terminator() {
            break;
        }
        graph.record(record.pred.get(), record.succ.get())?;
    }

    let mut writer = OrderWriter::new(output);
    let mut drain = Drain::new(graph)?;
    for id in &mut drain {
        writer.push(id)?;
    }
    writer.finish()?;
    Ok(drain.completion())
}
