pub mod aggregate;
pub mod weather;
