pub mod assistant;
pub mod city_prompt;
pub mod current;
pub mod forecast;
mod shared;
