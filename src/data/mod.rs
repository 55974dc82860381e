pub mod assistant;
pub mod openweather;
pub mod transport;
