pub mod directory;
pub mod practice;
