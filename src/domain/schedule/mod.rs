pub mod data_transmission;
pub mod time_ledger;
pub mod timeline;
