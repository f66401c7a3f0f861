/// A provider of validator membership and weight updates.
///
/// The manager stores its current source but never drives it: pushing
/// membership and weight changes into the owned set is the source's
/// responsibility, as is whatever polling or subscription that requires.
pub trait Source: Send + Sync {
    /// A short name identifying the source, for diagnostics.
    fn name(&self) -> &'static str;
}
