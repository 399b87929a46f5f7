/// Catalog identifiers are opaque strings, e.g. `"base1-4"`.
pub type CardId = String;

/// Cart quantities. A present cart line always holds at least 1.
pub type Quantity = u32;
