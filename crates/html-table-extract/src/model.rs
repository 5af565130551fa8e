use serde::ser::{Serialize, SerializeMap, Serializer};

/// One body row keyed by column label, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Pairs labels with cells positionally, stopping at the shorter side.
    #[must_use]
    pub fn from_row(labels: &[String], cells: Vec<String>) -> Self {
        let mut record = Self::default();
        for (label, cell) in labels.iter().zip(cells) {
            record.insert(label.clone(), cell);
        }
        record
    }

    /// A repeated label keeps its first position and takes the newer value.
    pub fn insert(&mut self, label: String, value: String) {
        if let Some(slot) = self.fields.iter_mut().find(|(key, _)| *key == label) {
            slot.1 = value;
        } else {
            self.fields.push((label, value));
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Records of every marker table, in document order.
///
/// Serializes as `{"table_1": [...], "table_2": [...]}` with keys kept in
/// position order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSet {
    tables: Vec<Vec<Record>>,
}

impl TableSet {
    pub fn push(&mut self, records: Vec<Record>) {
        self.tables.push(records);
    }

    /// Looks up a table by its 1-based position.
    #[must_use]
    pub fn table(&self, position: usize) -> Option<&[Record]> {
        position
            .checked_sub(1)
            .and_then(|index| self.tables.get(index))
            .map(Vec::as_slice)
    }

    /// Looks up a table by its synthesized key, e.g. `table_2`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Record]> {
        key.strip_prefix("table_")
            .and_then(|position| position.parse::<usize>().ok())
            .and_then(|position| self.table(position))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(Vec::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.tables.len()).map(table_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, &[Record])> {
        self.tables
            .iter()
            .enumerate()
            .map(|(index, records)| (table_key(index + 1), records.as_slice()))
    }
}

impl Serialize for TableSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for (key, records) in self.iter() {
            map.serialize_entry(&key, records)?;
        }
        map.end()
    }
}

#[must_use]
pub fn table_key(position: usize) -> String {
    format!("table_{position}")
}
