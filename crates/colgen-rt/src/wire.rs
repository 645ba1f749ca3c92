//! Row-oriented binary writer: fixed-width little-endian integers, ULEB128
//! length prefixes and raw bytes.

use std::fmt;
use std::io::{self, Write};

/// Writes go to a row buffer; `finish_row` hands the whole row to the sink, so a
/// row abandoned after an `EncodeError` never reaches it.
pub struct RowWriter<W: Write> {
    sink: W,
    row: Vec<u8>,
}

impl<W: Write> RowWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            row: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Returns the sink; bytes of an unfinished row are dropped.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Discards whatever a previous, failed row left in the buffer.
    pub fn begin_row(&mut self) {
        self.row.clear();
    }

    pub fn finish_row(&mut self) -> io::Result<()> {
        let result = self.sink.write_all(&self.row);
        self.row.clear();
        result
    }

    pub fn write_u8(&mut self, x: u8) -> io::Result<()> {
        self.row.write_all(&[x])
    }

    pub fn write_i8(&mut self, x: i8) -> io::Result<()> {
        self.row.write_all(&x.to_le_bytes())
    }

    pub fn write_u16(&mut self, x: u16) -> io::Result<()> {
        self.row.write_all(&x.to_le_bytes())
    }

    pub fn write_i16(&mut self, x: i16) -> io::Result<()> {
        self.row.write_all(&x.to_le_bytes())
    }

    pub fn write_u32(&mut self, x: u32) -> io::Result<()> {
        self.row.write_all(&x.to_le_bytes())
    }

    pub fn write_i32(&mut self, x: i32) -> io::Result<()> {
        self.row.write_all(&x.to_le_bytes())
    }

    pub fn write_u64(&mut self, x: u64) -> io::Result<()> {
        self.row.write_all(&x.to_le_bytes())
    }

    pub fn write_i64(&mut self, x: i64) -> io::Result<()> {
        self.row.write_all(&x.to_le_bytes())
    }

    pub fn write_uleb128(&mut self, x: u64) -> io::Result<()> {
        let mut buf = [0u8; 10];
        let n = put_uleb128(&mut buf, x);
        self.row.write_all(&buf[..n])
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.row.write_all(bytes)
    }
}

/// ULEB128 encoding of `x`.
pub fn uleb128(x: u64) -> Vec<u8> {
    let mut buf = [0u8; 10];
    let n = put_uleb128(&mut buf, x);
    buf[..n].to_vec()
}

fn put_uleb128(buf: &mut [u8; 10], mut x: u64) -> usize {
    let mut n = 0;
    loop {
        let byte = (x & 0x7f) as u8;
        x >>= 7;
        if x == 0 {
            buf[n] = byte;
            return n + 1;
        }
        buf[n] = byte | 0x80;
        n += 1;
    }
}

#[derive(Debug)]
pub enum EncodeError {
    Io(io::Error),
    FixedStringLength {
        field: String,
        expected: usize,
        actual: usize,
        value: Vec<u8>,
    },
}

impl EncodeError {
    pub fn fixed_string_length(field: &str, expected: usize, value: &[u8]) -> Self {
        EncodeError::FixedStringLength {
            field: field.to_string(),
            expected,
            actual: value.len(),
            value: value.to_vec(),
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Io(err) => write!(f, "write row: {err}"),
            EncodeError::FixedStringLength {
                field,
                expected,
                actual,
                value,
            } => write!(
                f,
                "string {field} must be {expected} bytes long, got {actual} bytes instead ({:?}, {value:?})",
                String::from_utf8_lossy(value)
            ),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Io(err) => Some(err),
            EncodeError::FixedStringLength { .. } => None,
        }
    }
}

impl From<io::Error> for EncodeError {
    fn from(err: io::Error) -> Self {
        EncodeError::Io(err)
    }
}
