//! Core traits for the inversion-of-control container.

mod resolver;

pub use resolver::BeanResolver;
