//! Per-computation configuration.

/// Options accepted by [`Memo`](super::Memo), [`Computed`](super::Computed)
/// and [`Effect`](super::Effect).
///
/// ```rust
/// use lattice_gate::reactive::{ComputationOptions, Memo};
///
/// let total = Memo::with_options(
///     |prev: Option<i32>| prev.unwrap_or_default() + 1,
///     ComputationOptions::new().name("total").initial(10),
/// );
/// assert_eq!(total.get(), 11);
/// ```
#[derive(Debug, Clone)]
pub struct ComputationOptions<T> {
    pub(crate) name: Option<String>,
    pub(crate) initial: Option<T>,
}

impl<T> ComputationOptions<T> {
    pub fn new() -> Self {
        Self {
            name: None,
            initial: None,
        }
    }

    /// Name used in log events and error messages.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Value handed to the first run as its previous result.
    ///
    /// Without it the first run sees `None`.
    pub fn initial(mut self, value: T) -> Self {
        self.initial = Some(value);
        self
    }

    pub(crate) fn display_name(&self, kind: &str, id: u64) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{kind}#{id}"),
        }
    }
}

impl<T> Default for ComputationOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}
