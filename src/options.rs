//! Collection-wide settings.

/// Default capacity of a byte-sequence column declared with capacity 0.
pub const DEFAULT_CAPACITY: usize = 255;

/// Default clamp for capacities inferred from a table schema.
pub const DEFAULT_MAX_CAPACITY: usize = 65_535;

/// How column names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatching {
    /// Byte-for-byte.
    #[default]
    Exact,
    /// Ignoring ASCII case, as the server compares column names.
    AsciiCaseInsensitive,
}

impl NameMatching {
    /// Compare two column names.
    pub fn matches(self, declared: &str, requested: &str) -> bool {
        match self {
            NameMatching::Exact => declared == requested,
            NameMatching::AsciiCaseInsensitive => declared.eq_ignore_ascii_case(requested),
        }
    }
}

/// What happens when a byte-sequence write exceeds the column capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Keep the first `capacity` bytes.
    #[default]
    Clip,
    /// Fail with `CapacityExceeded` and leave the buffer untouched.
    Reject,
}

/// Options for a bind collection and the columns built for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Name comparison for lookups and selections.
    pub name_matching: NameMatching,
    /// Oversize byte-sequence writes.
    pub overflow: OverflowPolicy,
    /// Capacity for byte-sequence columns declared with capacity 0.
    pub default_capacity: usize,
    /// Upper bound on capacities taken from a table schema.
    pub max_capacity: usize,
}

impl BindOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self {
            name_matching: NameMatching::Exact,
            overflow: OverflowPolicy::Clip,
            default_capacity: DEFAULT_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }

    /// Set name matching.
    ///
    /// # Example
    ///
    /// ```
    /// use mysql_binds_rs::{BindOptions, NameMatching};
    ///
    /// let options = BindOptions::new().with_name_matching(NameMatching::AsciiCaseInsensitive);
    /// assert!(options.name_matching.matches("ID", "id"));
    /// ```
    pub fn with_name_matching(mut self, name_matching: NameMatching) -> Self {
        self.name_matching = name_matching;
        self
    }

    /// Set the overflow policy.
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Set the capacity used for byte-sequence columns declared with 0.
    pub fn with_default_capacity(mut self, capacity: usize) -> Self {
        self.default_capacity = capacity;
        self
    }

    /// Set the clamp for schema-derived capacities.
    pub fn with_max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = capacity;
        self
    }
}

impl Default for BindOptions {
    fn default() -> Self {
        Self::new()
    }
}
