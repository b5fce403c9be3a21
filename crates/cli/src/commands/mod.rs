pub mod demo;
pub mod tools;
