//! Trace input for the simulator
//!
//! Traces are CSV-like text files with one request per line:
//!
//! ```text
//! timestamp,key,priority
//! 1700000000,hot_17,42
//! 1700000001,cold_9031,7
//! ```
//!
//! The timestamp is in Unix seconds. The priority column may be omitted and
//! defaults to 0. Empty lines, `#` comments and a leading header are skipped.
//! Every `.csv`, `.log` and `.txt` file in the input directory is read in
//! name order, one line at a time.

use crate::error::SimulatorError;
use crate::models::Request;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

/// Reader for request traces
#[derive(Debug, Clone)]
pub struct TraceReader {
    input_dir: PathBuf,
}

impl TraceReader {
    /// Create a new reader for the given input directory
    pub fn new<P: AsRef<Path>>(input_dir: P) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
        }
    }

    /// The directory traces are read from
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Get all trace files in the input directory, sorted by name
    pub fn trace_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.input_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_trace = path
                .extension()
                .is_some_and(|ext| ext == "csv" || ext == "log" || ext == "txt");
            if is_trace {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Parse a single line into a Request.
    ///
    /// `line_num` is 0-based; errors report it 1-based.
    pub(crate) fn parse_line(
        line: &str,
        line_num: usize,
        file: &Path,
    ) -> Result<Option<Request>, SimulatorError> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || (line_num == 0 && line.contains("timestamp"))
        {
            return Ok(None);
        }

        let parse_error = |reason: String| SimulatorError::Parse {
            file: file.to_path_buf(),
            line: line_num + 1,
            reason,
        };

        let mut parts = line.splitn(3, ',');

        // splitn always yields at least one field
        let ts_str = parts.next().unwrap_or_default().trim();
        let secs = ts_str
            .parse::<u64>()
            .map_err(|_| parse_error(format!("invalid timestamp '{ts_str}'")))?;

        let key = match parts.next().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(parse_error("missing key".to_string())),
        };

        let priority = match parts.next().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| parse_error(format!("invalid priority '{raw}'")))?,
        };

        Ok(Some(Request::new(
            UNIX_EPOCH + Duration::from_secs(secs),
            key,
            priority,
        )))
    }

    /// Stream every request of every trace file without loading them into memory
    pub fn stream_requests(&self) -> Result<RequestIterator, SimulatorError> {
        let files = self.trace_files()?;
        Ok(RequestIterator::new(files))
    }
}

/// Iterator that streams requests from multiple trace files
#[derive(Debug)]
pub struct RequestIterator {
    files: Vec<PathBuf>,
    current_file_index: usize,
    current_reader: Option<BufReader<File>>,
    current_line_num: usize,
    line_buffer: String,
}

impl RequestIterator {
    fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            current_file_index: 0,
            current_reader: None,
            current_line_num: 0,
            line_buffer: String::with_capacity(256),
        }
    }

    /// Number of trace files this iterator walks
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn open_next_file(&mut self) -> io::Result<bool> {
        if self.current_file_index >= self.files.len() {
            return Ok(false);
        }

        // Move past the file before opening it so a failed open is not retried
        let path = &self.files[self.current_file_index];
        self.current_file_index += 1;
        self.current_line_num = 0;
        let file = File::open(path)?;
        // 1 MB read buffer
        self.current_reader = Some(BufReader::with_capacity(1024 * 1024, file));
        Ok(true)
    }

    fn current_file(&self) -> &Path {
        self.current_file_index
            .checked_sub(1)
            .and_then(|i| self.files.get(i))
            .map_or_else(|| Path::new(""), PathBuf::as_path)
    }
}

impl Iterator for RequestIterator {
    type Item = Result<Request, SimulatorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_reader.is_none() {
                match self.open_next_file() {
                    Ok(true) => {}
                    Ok(false) => return None,
                    Err(e) => return Some(Err(e.into())),
                }
            }

            let reader = self.current_reader.as_mut()?;
            self.line_buffer.clear();
            match reader.read_line(&mut self.line_buffer) {
                Ok(0) => {
                    // EOF, move to the next file
                    self.current_reader = None;
                }
                Ok(_) => {
                    let line_num = self.current_line_num;
                    self.current_line_num += 1;

                    match TraceReader::parse_line(&self.line_buffer, line_num, self.current_file())
                    {
                        Ok(Some(request)) => return Some(Ok(request)),
                        Ok(None) => {}
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
