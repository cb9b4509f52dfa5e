/// Result of one strategy in a fallback chain.
///
/// `Unavailable` is not an error: it tells the chain to move on to the next
/// strategy. The reason is only ever logged.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> Outcome<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Outcome::Unavailable(reason.into())
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(value) => Some(value),
            Outcome::Unavailable(_) => None,
        }
    }
}
