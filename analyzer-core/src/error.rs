//! Error handling
//!
//! Every error is terminal for the current run: the caller fixes the input and
//! starts over. Row numbers are 1-based data rows (the header is not counted).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    // Input errors
    #[error("No file uploaded")]
    UploadMissing,

    #[error("CSV parse error: {0}")]
    Parse(String),

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    // Transformation errors
    #[error("Invalid timestamp at row {row}: '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Invalid IPv4 address at row {row}: '{value}'")]
    InvalidAddress { row: usize, value: String },

    #[error("Non-numeric value in column '{column}' at row {row}: '{value}'")]
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Value out of range in column '{column}' at row {row}: '{value}'")]
    ValueOutOfRange {
        column: String,
        row: usize,
        value: String,
    },

    // Model errors
    #[error("Not enough rows to fit model: need at least {required}, got {actual}")]
    InsufficientRows { required: usize, actual: usize },

    #[error("Degenerate data: {distinct} distinct row(s) cannot form {clusters} clusters")]
    DegenerateData { distinct: usize, clusters: usize },

    #[error("Model fit failed: {0}")]
    ModelFit(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalyzerError {
    /// True for problems with the uploaded data (as opposed to configuration)
    pub fn is_input_error(&self) -> bool {
        !matches!(self, AnalyzerError::InvalidConfig(_))
    }
}

impl From<csv::Error> for AnalyzerError {
    fn from(err: csv::Error) -> Self {
        let location = err
            .position()
            .map(|pos| format!(" (line {})", pos.line()))
            .unwrap_or_default();

        let message = match err.kind() {
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
                format!("expected {} fields, found {}{}", expected_len, len, location)
            }
            csv::ErrorKind::Utf8 { .. } => format!("invalid UTF-8{}", location),
            _ => format!("{}{}", err, location),
        };

        AnalyzerError::Parse(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = AnalyzerError::MissingColumns(vec!["protocol".into(), "country".into()]);
        assert_eq!(err.to_string(), "Missing required column(s): protocol, country");
    }

    #[test]
    fn test_unequal_lengths_maps_to_parse() {
        let data = "a,b\n1,2\n3\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let err = rdr
            .records()
            .find_map(|r| r.err())
            .expect("ragged row should fail");

        match AnalyzerError::from(err) {
            AnalyzerError::Parse(msg) => {
                assert!(msg.contains("expected 2 fields, found 1"), "{}", msg);
                assert!(msg.contains("line 3"), "{}", msg);
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_error_is_not_input_error() {
        assert!(!AnalyzerError::InvalidConfig("x".into()).is_input_error());
        assert!(AnalyzerError::UploadMissing.is_input_error());
    }
}
