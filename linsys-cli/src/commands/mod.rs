pub mod demo;
pub mod regress;
pub mod solve;
