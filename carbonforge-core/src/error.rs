use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarbonforgeError {
    #[error("Malformed factor table at '{path}': {reason}")]
    MalformedFactorTable { path: String, reason: String },

    #[error("Question {question} is out of range for the {section} section")]
    QuestionOutOfRange { section: String, question: usize },

    #[error("Storage operation failed: {0}")]
    Storage(String),

    #[error("Row '{0}' has not been saved and has no stored record")]
    NotPersisted(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}
