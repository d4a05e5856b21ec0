//! Configuration access port trait.

pub trait ConfigPort {
    /// Raw value under `[section] key`, or `None` when either is absent.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
