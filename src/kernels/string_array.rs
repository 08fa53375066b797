//! Dictionary kernels behind the String-Array step.
//!
//! The table keeps unique strings in first-occurrence order, so the index array
//! of a column with few distinct values is small and repetitive, which is exactly
//! what the nested integer pipeline is good at.

use hashbrown::HashMap;

use crate::error::CodecError;

/// Splits `values` into a de-duplicated table and an `Int32` index per value.
///
/// # Errors
/// Returns `CodecError::InvalidInput` if the table would exceed `i32::MAX` entries.
pub fn build_dictionary(values: &[String]) -> Result<(Vec<String>, Vec<i32>), CodecError> {
    let mut positions: HashMap<&str, i32> = HashMap::new();
    let mut table: Vec<String> = Vec::new();
    let mut indices = Vec::with_capacity(values.len());

    for value in values {
        let index = match positions.get(value.as_str()) {
            Some(&index) => index,
            None => {
                let index = i32::try_from(table.len()).map_err(|_| {
                    CodecError::InvalidInput("string table exceeds i32::MAX entries".to_string())
                })?;
                positions.insert(value.as_str(), index);
                table.push(value.clone());
                index
            }
        };
        indices.push(index);
    }
    Ok((table, indices))
}

/// Maps every index back to its table entry.
///
/// # Errors
/// Returns `CodecError::CorruptStream` for a negative or out-of-range index.
pub fn expand(table: &[String], indices: &[i64]) -> Result<Vec<String>, CodecError> {
    indices
        .iter()
        .map(|&i| {
            usize::try_from(i)
                .ok()
                .and_then(|i| table.get(i))
                .cloned()
                .ok_or_else(|| {
                    CodecError::CorruptStream(format!(
                        "string index {} is outside a table of {} entries",
                        i,
                        table.len()
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_occurrence_order() {
        let values = strings(&["red", "green", "red", "blue", "red"]);
        let (table, indices) = build_dictionary(&values).unwrap();
        assert_eq!(table, strings(&["red", "green", "blue"]));
        assert_eq!(indices, vec![0, 1, 0, 2, 0]);

        let wide: Vec<i64> = indices.iter().map(|&i| i as i64).collect();
        assert_eq!(expand(&table, &wide).unwrap(), values);
    }

    #[test]
    fn test_empty_and_blank_strings() {
        let (table, indices) = build_dictionary(&[]).unwrap();
        assert!(table.is_empty() && indices.is_empty());

        let values = strings(&["", "", "x", ""]);
        let (table, indices) = build_dictionary(&values).unwrap();
        assert_eq!(table, strings(&["", "x"]));
        assert_eq!(indices, vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let table = strings(&["a", "b"]);
        assert!(matches!(expand(&table, &[0, 2]), Err(CodecError::CorruptStream(_))));
        assert!(matches!(expand(&table, &[-1]), Err(CodecError::CorruptStream(_))));
    }
}
