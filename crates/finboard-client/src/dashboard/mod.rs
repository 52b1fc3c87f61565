pub mod aggregate;
pub mod date;
pub mod filter;
pub mod record;
pub mod statements;
