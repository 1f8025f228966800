/// Reference listing command.
pub mod refs;
/// Shared loading and output helpers.
pub(crate) mod util;
/// Object checksum command.
pub mod walk;

#[cfg(test)]
pub(crate) mod test_support;
