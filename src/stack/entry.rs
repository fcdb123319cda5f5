use crate::StackError;

/// Identity contract for the URL that tags a stack entry
///
/// Equality decides whether an entry was added by a given URL. The stack
/// never parses or normalizes keys; it only compares them.
pub trait AdderKey: PartialEq {
    /// Returns true if the key carries no usable URL
    fn is_unset(&self) -> bool;
}

impl AdderKey for String {
    fn is_unset(&self) -> bool {
        self.trim().is_empty()
    }
}

impl AdderKey for &str {
    fn is_unset(&self) -> bool {
        self.trim().is_empty()
    }
}

impl AdderKey for ::url::Url {
    fn is_unset(&self) -> bool {
        self.host_str().map_or(true, str::is_empty)
    }
}

/// A single element of an ancestor stack
///
/// Holds the state a crawler set while visiting an ancestor of the page it
/// is currently visiting, together with the URL that caused the push.
/// Entries are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry<U, S> {
    /// The URL for which the crawler added this state
    adder_url: U,

    /// Caller-defined ancestor state
    state: Option<S>,
}

impl<U: AdderKey, S> StackEntry<U, S> {
    /// Creates an entry tagged with `adder_url`
    ///
    /// # Returns
    ///
    /// * `Ok(StackEntry)` - The new entry
    /// * `Err(StackError::InvalidArgument)` - The adder URL is unset
    pub fn new(adder_url: U, state: Option<S>) -> Result<Self, StackError> {
        if adder_url.is_unset() {
            return Err(StackError::InvalidArgument(
                "adder URL must not be empty".to_string(),
            ));
        }

        Ok(Self { adder_url, state })
    }

    /// Creates an entry carrying `state`
    pub fn with_state(adder_url: U, state: S) -> Result<Self, StackError> {
        Self::new(adder_url, Some(state))
    }

    /// Returns true iff this entry was pushed by `candidate`
    pub fn matches_adder(&self, candidate: &U) -> bool {
        self.adder_url == *candidate
    }
}

impl<U, S> StackEntry<U, S> {
    /// The URL that pushed this entry
    pub fn adder_url(&self) -> &U {
        &self.adder_url
    }

    /// The ancestor state, if any was attached
    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }
}
