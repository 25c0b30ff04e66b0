pub mod annotation;
pub mod builder;
pub mod descriptor;
pub mod edge;
pub mod entity;
pub mod error;
pub mod hierarchy;
pub mod index;
pub mod modifiers;
pub mod ports;
pub mod scan;
pub mod view;
