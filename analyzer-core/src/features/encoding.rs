//! One-hot encoding of categorical columns

use std::collections::BTreeSet;

use super::table::FeatureColumn;

/// Name of the indicator column for `value` of `column`
pub fn indicator_name(column: &str, value: &str) -> String {
    format!("{}_{}", column, value)
}

/// One indicator column per distinct observed value, ordered by value
///
/// Exactly one indicator is set per row. Unseen categories simply have no
/// column; there is no "unknown" bucket.
pub fn one_hot(column: &str, values: &[&str]) -> Vec<FeatureColumn> {
    let categories: BTreeSet<&str> = values.iter().copied().collect();

    categories
        .into_iter()
        .map(|category| {
            FeatureColumn::indicator(
                indicator_name(column, category),
                values.iter().map(|v| *v == category),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_column_per_distinct_value() {
        let values = ["SSH", "Telnet", "SSH", "HTTP", "SSH"];
        let columns = one_hot("protocol", &values);

        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["protocol_HTTP", "protocol_SSH", "protocol_Telnet"]);
    }

    #[test]
    fn test_exactly_one_indicator_per_row() {
        let values = ["US", "CN", "RU", "US", "BR", "CN"];
        let columns = one_hot("country", &values);

        assert_eq!(columns.len(), 4);
        for row in 0..values.len() {
            let sum: f64 = columns.iter().map(|c| c.values[row]).sum();
            assert_eq!(sum, 1.0, "row {} should have exactly one indicator", row);
        }
    }

    #[test]
    fn test_indicator_marks_matching_rows() {
        let columns = one_hot("protocol", &["SSH", "Telnet", "SSH"]);
        let ssh = columns.iter().find(|c| c.name == "protocol_SSH").unwrap();
        assert_eq!(ssh.values, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_value_is_its_own_category() {
        let columns = one_hot("country", &["", "US"]);
        assert_eq!(columns[0].name, "country_");
        assert_eq!(columns[0].values, vec![1.0, 0.0]);
    }

    #[test]
    fn test_no_rows_no_columns() {
        assert!(one_hot("protocol", &[]).is_empty());
    }
}
