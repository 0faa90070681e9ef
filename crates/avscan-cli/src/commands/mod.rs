pub mod scan;
pub mod update;
