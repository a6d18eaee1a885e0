/// CSV export of adjusted forecast rows.
pub mod export;
