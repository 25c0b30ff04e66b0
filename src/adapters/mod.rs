pub mod resolver;
pub mod scan;
