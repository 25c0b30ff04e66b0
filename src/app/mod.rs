pub mod dto;
pub mod engine;

#[cfg(test)]
pub(crate) mod test_support;
