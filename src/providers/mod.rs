pub mod coinpaprika;
pub mod cryptocompare;
pub mod metrics;
pub mod twelve_data;
pub mod util;
