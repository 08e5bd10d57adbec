pub mod constants;
pub mod mask;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
