pub mod formatter;
pub mod time;
