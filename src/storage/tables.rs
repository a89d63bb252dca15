use redb::TableDefinition;

/// Carousel state: fixed key -> serialized sequence (JSON)
pub const CAROUSEL: TableDefinition<&str, &[u8]> = TableDefinition::new("carousel");

/// The single key under which the whole sequence lives
pub const SEQUENCE_KEY: &str = "sequence";
