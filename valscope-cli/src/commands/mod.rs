pub mod common;
pub mod settings;
pub mod string;
pub mod value;
