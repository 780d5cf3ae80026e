pub mod extraction;
pub mod generation;
pub mod ocr;
pub mod summaries;
pub mod xml;
