//! Delimited-text parsing into typed tables.

use std::io::{BufRead, BufReader};

use crate::error::{Result, TrestleError};
use crate::table::Table;

use super::infer;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the input has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses delimited text into typed tables.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a string of delimited text.
    pub fn parse_str(&self, text: &str) -> Result<Table> {
        self.parse_bytes(text.as_bytes())
    }

    /// Parse bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }
            let record = record?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if rows.is_empty() {
            return Err(TrestleError::EmptyData("no data rows found".to_string()));
        }

        // Generate column names when the input has no header row.
        let headers = if headers.is_empty() {
            (0..rows[0].len())
                .map(|i| format!("column_{}", i + 1))
                .collect()
        } else {
            headers
        };
        if headers.is_empty() {
            return Err(TrestleError::EmptyData("no columns found".to_string()));
        }

        // Pad or truncate ragged rows to the header width.
        let expected = headers.len();
        for row in &mut rows {
            while row.len() < expected {
                row.push(String::new());
            }
            row.truncate(expected);
        }

        // Columnize and infer a typed column per header.
        let mut table = Table::new();
        for (index, name) in headers.iter().enumerate() {
            let values: Vec<String> = rows.iter().map(|row| row[index].clone()).collect();
            table.insert_column(name.clone(), infer::build_column(&values))?;
        }
        Ok(table)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(TrestleError::EmptyData("no lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts across lines beat raw frequency; tabs get a
        // slight bonus as they rarely appear in actual data.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
