pub mod ai;
pub mod cache;
pub mod console;
pub mod filesystem;
pub mod formatters;
pub mod network;
pub mod scanner;
pub mod vault;
