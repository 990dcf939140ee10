/// The routing values extracted for one sharding column.
///
/// The SQL layer produces one of three shapes depending on the predicate
/// form: an equality yields [`ShardingValues::Single`], an `IN` list
/// yields [`ShardingValues::List`] and a `BETWEEN` yields
/// [`ShardingValues::Range`]. Values are carried in their textual form;
/// algorithms that need numeric semantics parse them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardingValues {
    /// A single equality value.
    Single(String),
    /// The values of an `IN` list.
    List(Vec<String>),
    /// An inclusive `BETWEEN` range. Algorithms that cannot enumerate a
    /// range degrade to a broadcast.
    Range {
        /// Inclusive lower bound.
        lower: String,
        /// Inclusive upper bound.
        upper: String,
    },
}

/// A sharding column paired with the routing values extracted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardingValue {
    column: String,
    values: ShardingValues,
}

impl ShardingValue {
    /// Pair `column` with its extracted `values`.
    pub fn new(column: impl Into<String>, values: ShardingValues) -> Self {
        Self {
            column: column.into(),
            values,
        }
    }

    /// Convenience constructor for the single-equality-value case.
    pub fn single(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, ShardingValues::Single(value.into()))
    }

    /// The sharding column these values were extracted for.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The extracted values.
    pub fn values(&self) -> &ShardingValues {
        &self.values
    }

    /// Iterate the discrete values, if this value shape has any. A range
    /// yields nothing; callers treat that as "cannot narrow".
    pub fn discrete_values(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match &self.values {
            ShardingValues::Single(v) => std::slice::from_ref(v),
            ShardingValues::List(vs) => vs,
            ShardingValues::Range { .. } => &[],
        };
        values.iter().map(String::as_str)
    }
}
