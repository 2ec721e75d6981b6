//! Session search state.
//!
//! A finder remembers whether it already looked for something and what it
//! found, so repeated queries are answered from the first search. Transient
//! per-scan marks live in local maps keyed by `NodeId`, never on the nodes.

/// Memoized outcome of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState<T> {
    /// Not searched yet.
    Unsearched,
    /// Searched; `None` means nothing was found.
    Searched(Option<T>),
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        Self::Unsearched
    }
}

impl<T> SearchState<T> {
    #[must_use]
    pub fn is_searched(&self) -> bool {
        matches!(self, Self::Searched(_))
    }

    /// The found value, if the search ran and found one.
    #[must_use]
    pub fn found(&self) -> Option<&T> {
        match self {
            Self::Searched(Some(value)) => Some(value),
            _ => None,
        }
    }

    pub fn found_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Searched(Some(value)) => Some(value),
            _ => None,
        }
    }

    /// Forget the outcome so the next query searches again.
    pub fn reset(&mut self) {
        *self = Self::Unsearched;
    }
}

/// A lazily computed value that a forced search invalidates.
///
/// Unlike [`SearchState`] it carries no "searched" notion of its own: the
/// value is simply present or not.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T>(Option<T>);

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Cached<T> {
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn set(&mut self, value: T) -> &T {
        self.0.insert(value)
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_state_transitions() {
        let mut state: SearchState<u32> = SearchState::default();
        assert!(!state.is_searched());
        assert_eq!(state.found(), None);

        state = SearchState::Searched(None);
        assert!(state.is_searched());
        assert_eq!(state.found(), None);

        state = SearchState::Searched(Some(7));
        assert_eq!(state.found(), Some(&7));
        if let Some(value) = state.found_mut() {
            *value += 1;
        }
        assert_eq!(state.found(), Some(&8));

        state.reset();
        assert!(!state.is_searched());
    }

    #[test]
    fn test_cached_value() {
        let mut cached = Cached::default();
        assert!(cached.get().is_none());
        assert_eq!(*cached.set("title".to_string()), "title");
        assert_eq!(cached.get().map(String::as_str), Some("title"));
        cached.clear();
        assert!(cached.get().is_none());
    }
}
