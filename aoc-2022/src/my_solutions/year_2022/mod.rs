pub mod day_16;
pub mod day_19;
