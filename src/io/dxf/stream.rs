//! ASCII DXF tag stream: group code / value pairs

use crate::error::{CadError, Result};
use crate::types::Handle;
use std::io::{BufRead, Write};

/// One group code / value pair from the tag stream
#[derive(Debug, Clone, PartialEq)]
pub struct CodePair {
    /// Group code
    pub code: i32,
    /// Raw value text, trimmed
    pub value: String,
}

impl CodePair {
    /// Create a pair
    pub fn new(code: i32, value: impl Into<String>) -> Self {
        CodePair {
            code,
            value: value.into(),
        }
    }

    /// Value as integer, when parseable
    pub fn as_i32(&self) -> Option<i32> {
        self.value.trim().parse().ok()
    }

    /// Value as double, when parseable
    pub fn as_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }

    /// Value as a hexadecimal handle (group codes 5/330/etc.)
    pub fn as_handle(&self) -> Handle {
        u64::from_str_radix(self.value.trim(), 16)
            .map(Handle::new)
            .unwrap_or(Handle::NULL)
    }

    /// Whether this pair starts a new record (code 0)
    pub fn is_record_start(&self) -> bool {
        self.code == 0
    }
}

/// Reads code/value pairs from an ASCII DXF stream, with one pair of
/// push-back for record-boundary detection.
pub struct TagReader<R: BufRead> {
    reader: R,
    line_number: usize,
    pushed_back: Option<CodePair>,
}

impl<R: BufRead> TagReader<R> {
    /// Create a tag reader
    pub fn new(reader: R) -> Self {
        TagReader {
            reader,
            line_number: 0,
            pushed_back: None,
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(line.trim().to_string()))
    }

    /// Read the next code/value pair, or `None` at end of stream.
    pub fn read_pair(&mut self) -> Result<Option<CodePair>> {
        if let Some(pair) = self.pushed_back.take() {
            return Ok(Some(pair));
        }

        let code_line = match self.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };

        let code = code_line.parse::<i32>().map_err(|_| {
            CadError::MalformedInput(format!(
                "invalid group code at line {}: '{}'",
                self.line_number, code_line
            ))
        })?;

        let value = self.read_line()?.ok_or_else(|| {
            CadError::MalformedInput(format!(
                "unexpected end of stream after group code {} at line {}",
                code, self.line_number
            ))
        })?;

        Ok(Some(CodePair::new(code, value)))
    }

    /// Return a pair to the stream; the next `read_pair` yields it again.
    pub fn push_back(&mut self, pair: CodePair) {
        self.pushed_back = Some(pair);
    }

    /// Peek at the next group code without consuming the pair.
    pub fn peek_code(&mut self) -> Result<Option<i32>> {
        if let Some(ref pair) = self.pushed_back {
            return Ok(Some(pair.code));
        }
        match self.read_pair()? {
            Some(pair) => {
                let code = pair.code;
                self.pushed_back = Some(pair);
                Ok(Some(code))
            }
            None => Ok(None),
        }
    }
}

/// Writes code/value pairs as ASCII DXF, group codes right-aligned in a
/// three-character field.
pub struct TagWriter<W: Write> {
    writer: W,
}

impl<W: Write> TagWriter<W> {
    /// Create a tag writer
    pub fn new(writer: W) -> Self {
        TagWriter { writer }
    }

    fn write_code(&mut self, code: i32) -> Result<()> {
        if code < 10 {
            writeln!(self.writer, "  {}", code)?;
        } else if code < 100 {
            writeln!(self.writer, " {}", code)?;
        } else {
            writeln!(self.writer, "{}", code)?;
        }
        Ok(())
    }

    /// Write a string value
    pub fn string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    /// Write an integer value
    pub fn int(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    /// Write a double value, trimming spurious trailing zeros but always
    /// keeping one decimal place
    pub fn double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_code(code)?;
        if value == value.trunc() && value.abs() < 1e16 {
            writeln!(self.writer, "{:.1}", value)?;
        } else {
            let formatted = format!("{:.15}", value);
            let trimmed = formatted.trim_end_matches('0');
            if trimmed.ends_with('.') {
                writeln!(self.writer, "{}0", trimmed)?;
            } else {
                writeln!(self.writer, "{}", trimmed)?;
            }
        }
        Ok(())
    }

    /// Write a handle as uppercase hex
    pub fn handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{:X}", handle.value())?;
        Ok(())
    }

    /// Write a 3D point as consecutive x/y/z codes (base, base+10, base+20)
    pub fn point(&mut self, base_code: i32, point: crate::types::Point3D) -> Result<()> {
        self.double(base_code, point.x)?;
        self.double(base_code + 10, point.y)?;
        self.double(base_code + 20, point.z)?;
        Ok(())
    }

    /// Start a section
    pub fn section_start(&mut self, name: &str) -> Result<()> {
        self.string(0, "SECTION")?;
        self.string(2, name)
    }

    /// End the current section
    pub fn section_end(&mut self) -> Result<()> {
        self.string(0, "ENDSEC")
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
