pub mod models;
pub mod provider;

pub use self::models::{Candle, CandleData, Series};
pub use self::provider::{CandleProvider, CsvFileProvider, TimeRange};
