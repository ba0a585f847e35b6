/// Quotes accepted during this process, oldest first.
///
/// Only grows. The acquisition loop pushes a quote after the store has
/// confirmed the write; backends read it through `QuoteRequest`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionHistory {
    items: Vec<String>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: String) {
        self.items.push(text);
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
