/// Primary keys are SQLite `INTEGER PRIMARY KEY` rowids.
pub type DbId = i64;

/// Default target language code: answer in the language of the source.
pub const DEFAULT_LANGUAGE: &str = "auto";
