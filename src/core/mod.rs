//! Core business logic abstractions

pub mod config;
pub mod dashboard;
pub mod history;
pub mod log;
pub mod market;
pub mod refresh;
pub mod treasury;
pub mod valuation;

// Re-export main types for cleaner imports
pub use dashboard::DashboardContext;
pub use history::HistoricalSeries;
pub use market::{
    EquityQuote, EquityQuoteProvider, FetchError, HistoryProvider, MarketSnapshot, Quote,
    QuoteProvider,
};
pub use treasury::{MetricsSource, TreasuryConfig};
pub use valuation::DerivedMetrics;
