use serde::{Deserialize, Serialize};

/// Declared type of one schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Date,
}

/// The fixed, ordered column table shared by every archive and every region.
///
/// The first [`RAW_FIELD_COUNT`] entries correspond positionally to the raw
/// CSV fields; the trailing `region` column is synthetic and filled with the
/// region abbreviation on every accepted row. Column 0 (`p1`) doubles as the
/// record identifier used for deduplication.
pub const COLUMNS: [(&str, ColumnType); 65] = [
    ("p1", ColumnType::Text),
    ("p36", ColumnType::Integer),
    ("p37", ColumnType::Integer),
    ("p2a", ColumnType::Date),
    ("weekday(p2a)", ColumnType::Integer),
    ("p2b", ColumnType::Integer),
    ("p6", ColumnType::Integer),
    ("p7", ColumnType::Integer),
    ("p8", ColumnType::Integer),
    ("p9", ColumnType::Integer),
    ("p10", ColumnType::Integer),
    ("p11", ColumnType::Integer),
    ("p12", ColumnType::Integer),
    ("p13a", ColumnType::Integer),
    ("p13b", ColumnType::Integer),
    ("p13c", ColumnType::Integer),
    ("p14", ColumnType::Integer),
    ("p15", ColumnType::Integer),
    ("p16", ColumnType::Integer),
    ("p17", ColumnType::Integer),
    ("p18", ColumnType::Integer),
    ("p19", ColumnType::Integer),
    ("p20", ColumnType::Integer),
    ("p21", ColumnType::Integer),
    ("p22", ColumnType::Integer),
    ("p23", ColumnType::Integer),
    ("p24", ColumnType::Integer),
    ("p27", ColumnType::Integer),
    ("p28", ColumnType::Integer),
    ("p34", ColumnType::Integer),
    ("p35", ColumnType::Integer),
    ("p39", ColumnType::Integer),
    ("p44", ColumnType::Integer),
    ("p45a", ColumnType::Integer),
    ("p47", ColumnType::Integer),
    ("p48a", ColumnType::Integer),
    ("p49", ColumnType::Integer),
    ("p50a", ColumnType::Integer),
    ("p50b", ColumnType::Integer),
    ("p51", ColumnType::Integer),
    ("p52", ColumnType::Integer),
    ("p53", ColumnType::Integer),
    ("p55a", ColumnType::Integer),
    ("p57", ColumnType::Integer),
    ("p58", ColumnType::Integer),
    ("a", ColumnType::Float),
    ("b", ColumnType::Float),
    ("d", ColumnType::Float),
    ("e", ColumnType::Float),
    ("f", ColumnType::Float),
    ("g", ColumnType::Float),
    ("h", ColumnType::Text),
    ("i", ColumnType::Text),
    ("j", ColumnType::Text),
    ("k", ColumnType::Text),
    ("l", ColumnType::Text),
    ("n", ColumnType::Text),
    ("o", ColumnType::Text),
    ("p", ColumnType::Text),
    ("q", ColumnType::Text),
    ("r", ColumnType::Integer),
    ("s", ColumnType::Integer),
    ("t", ColumnType::Text),
    ("p5a", ColumnType::Integer),
    ("region", ColumnType::Text),
];

/// Number of fields each raw CSV record must carry (the synthetic trailing
/// `region` column has no raw counterpart).
pub const RAW_FIELD_COUNT: usize = COLUMNS.len() - 1;

/// Position of the record identifier inside a raw record.
pub const RECORD_ID_FIELD: usize = 0;

pub fn column_index(name: &str) -> Option<usize> {
    COLUMNS.iter().position(|(column, _)| *column == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_shape() {
        assert_eq!(COLUMNS.len(), 65);
        assert_eq!(RAW_FIELD_COUNT, 64);
        assert_eq!(COLUMNS[RECORD_ID_FIELD].0, "p1");
        assert_eq!(COLUMNS[COLUMNS.len() - 1], ("region", ColumnType::Text));
    }

    #[test]
    fn known_column_types() {
        let (_, ty) = COLUMNS[column_index("p2a").unwrap()];
        assert_eq!(ty, ColumnType::Date);
        let (_, ty) = COLUMNS[column_index("a").unwrap()];
        assert_eq!(ty, ColumnType::Float);
        let (_, ty) = COLUMNS[column_index("p24").unwrap()];
        assert_eq!(ty, ColumnType::Integer);
        let (_, ty) = COLUMNS[column_index("t").unwrap()];
        assert_eq!(ty, ColumnType::Text);
    }

    #[test]
    fn names_unique() {
        let mut names: Vec<&str> = COLUMNS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COLUMNS.len());
    }

    #[test]
    fn unknown_column() {
        assert_eq!(column_index("p99"), None);
    }
}
