pub const FIELD_DELIMITER: &str = ", ";

/// Positional view over one record line. Values keep their quotes.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    pub fn split(line: &'a str) -> Self {
        Self {
            fields: line.split(FIELD_DELIMITER).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
