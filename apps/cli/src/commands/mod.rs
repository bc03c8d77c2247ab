pub mod add;
pub mod convert;
pub mod list;
pub mod remove;
