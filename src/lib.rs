pub mod ai;
pub mod analysis;
pub mod api;
pub mod calendar;
pub mod cli;
pub mod core;
pub mod ocr;
pub mod openai;
