/// PocketMine API versions known to the catalog, oldest first
const POCKETMINE_APIS: &[&str] = &[
    "1.0.0",
    "1.1.0",
    "1.2.0",
    "1.2.1",
    "1.3.0",
    "1.3.1",
    "1.4.0",
    "1.4.1",
    "1.5.0",
    "1.6.0",
    "1.6.1",
    "1.7.0",
    "1.8.0",
    "1.9.0",
    "1.10.0",
    "1.11.0",
    "1.12.0",
    "1.13.0",
    "2.0.0",
    "2.1.0",
    "3.0.0-ALPHA1",
    "3.0.0-ALPHA2",
    "3.0.0-ALPHA3",
    "3.0.0-ALPHA4",
];

/// Ordered table of API versions. A spoon stores indices into this table,
/// so the order must never change once releases reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionTable {
    versions: Vec<String>,
}

impl ApiVersionTable {
    pub fn new(versions: Vec<String>) -> Self {
        Self { versions }
    }

    /// Index of `api` in the table
    pub fn index_of(&self, api: &str) -> Option<usize> {
        self.versions.iter().position(|v| v == api)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.versions.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl Default for ApiVersionTable {
    fn default() -> Self {
        Self::new(POCKETMINE_APIS.iter().map(|v| v.to_string()).collect())
    }
}
