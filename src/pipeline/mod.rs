pub mod convert;
pub mod sweep;
