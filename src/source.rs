use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use tracing::info;

use crate::error::{ImportError, Result};

/// Column names taken from the first row of the input.
#[derive(Debug, Clone)]
pub struct Header(ByteRecord);

impl Header {
    /// Index of the column named exactly `label`. When the name repeats the
    /// last occurrence wins.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, name)| *name == label.as_bytes())
            .map(|(index, _)| index)
            .last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One data record and the line it started on. Fields stay raw bytes so a
/// stray non-UTF-8 byte only matters if it lands in the field being read.
#[derive(Debug, Clone)]
pub struct Row {
    line: u64,
    record: ByteRecord,
}

impl Row {
    pub fn new<I, T>(line: u64, fields: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self {
            line,
            record: fields.into_iter().collect(),
        }
    }

    /// Field at `index`, or `None` when the row is too short or the field
    /// is not valid UTF-8.
    pub fn field(&self, index: usize) -> Option<&str> {
        std::str::from_utf8(self.record.get(index)?).ok()
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    pub fn line(&self) -> u64 {
        self.line
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.record.iter().map(String::from_utf8_lossy))
            .finish()
    }
}

/// Streams CSV rows from a file or any reader, one forward pass.
pub struct RowSource<R> {
    name: String,
    reader: csv::Reader<R>,
}

impl RowSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ImportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!(action = "open", component = "row_source", file_path = ?path, "Opened CSV input");
        Ok(Self::from_reader(
            BufReader::new(file),
            path.display().to_string(),
        ))
    }
}

impl<R: Read> RowSource<R> {
    /// `name` identifies the input in errors and logs.
    pub fn from_reader(reader: R, name: impl Into<String>) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self {
            name: name.into(),
            reader,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&mut self) -> Result<Header> {
        let header = self.reader.byte_headers().map_err(|inner| ImportError::Read {
            source_name: self.name.clone(),
            inner,
        })?;
        if header.is_empty() {
            return Err(ImportError::EmptyInput {
                source_name: self.name.clone(),
            });
        }
        Ok(Header(header.clone()))
    }

    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows {
            source: self,
            done: false,
        }
    }
}

/// Iterator over the data rows of a [`RowSource`]. Yields `None` at end of
/// input and `Some(Err(_))` for a read fault, after which it is exhausted.
pub struct Rows<'a, R> {
    source: &'a mut RowSource<R>,
    done: bool,
}

impl<R: Read> Iterator for Rows<'_, R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut record = ByteRecord::new();
        match self.source.reader.read_byte_record(&mut record) {
            Ok(true) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                Some(Ok(Row { line, record }))
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(inner) => {
                self.done = true;
                Some(Err(ImportError::Read {
                    source_name: self.source.name.clone(),
                    inner,
                }))
            }
        }
    }
}
