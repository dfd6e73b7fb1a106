pub mod err;
pub mod trace;

#[cfg(test)]
pub(crate) mod fixtures;
