// MythoSciFi: blend Greek mythology and sci-fi robot names, and analyze the
// character descriptions behind them with n-gram count and TF-IDF matrices.
//
// This is the library root. Each module corresponds to a major subsystem.

pub mod config;
pub mod db;
pub mod ingest;
pub mod names;
pub mod output;
pub mod status;
pub mod vectorize;
