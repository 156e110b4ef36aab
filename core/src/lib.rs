//! Alert tuning tracker: threshold application and effectiveness metrics
//! for transaction-monitoring rules, over ATL and BTL alert populations.

pub mod alert;
pub mod columns;
pub mod config;
pub mod current_metrics;
pub mod date_range;
pub mod engine;
pub mod error;
pub mod event;
pub mod grouping;
pub mod loader;
pub mod net_metrics;
pub mod predicate;
pub mod ratio;
pub mod store;
pub mod tracker;
pub mod types;
