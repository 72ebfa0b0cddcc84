pub mod create_charge;
pub mod token_provider;

#[cfg(test)]
pub(crate) mod test_support;
