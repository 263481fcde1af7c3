use super::error::CorpusError;

/// Column-labelled rows, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parses delimited text with a header row.
    ///
    /// Short records are padded with empty cells; records wider than the header
    /// are rejected.
    pub fn parse(text: &str, delimiter: u8) -> Result<Self, CorpusError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| CorpusError::Malformed {
                record: 0,
                reason: e.to_string(),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| CorpusError::Malformed {
                record: idx,
                reason: e.to_string(),
            })?;

            if record.len() > headers.len() {
                return Err(CorpusError::Malformed {
                    record: idx,
                    reason: format!(
                        "expected at most {} fields, found {}",
                        headers.len(),
                        record.len()
                    ),
                });
            }

            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Renders one row as `"col: value - col: value"`.
    pub fn render_row(&self, row: &[String]) -> String {
        self.headers
            .iter()
            .zip(row)
            .map(|(header, value)| format!("{}: {}", header, value))
            .collect::<Vec<_>>()
            .join(" - ")
    }
}
