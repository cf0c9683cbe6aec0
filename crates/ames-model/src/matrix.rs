//! Feature matrices from frames.

use crate::error::InferenceError;
use ames_data::schema::is_numeric;
use ndarray::Array2;
use polars::prelude::*;

/// Build a dense `rows x features` matrix selecting `names` in order.
///
/// # Errors
/// * [`InferenceError::MissingFeature`] for an absent column
/// * [`InferenceError::NonNumericFeature`] for a text column
/// * [`InferenceError::MissingValue`] for a null or NaN entry
pub fn feature_matrix(frame: &DataFrame, names: &[String]) -> Result<Array2<f64>, InferenceError> {
    let mut matrix = Array2::<f64>::zeros((frame.height(), names.len()));

    for (j, name) in names.iter().enumerate() {
        let column = frame
            .column(name)
            .map_err(|_| InferenceError::MissingFeature(name.clone()))?;
        if !is_numeric(column.dtype()) {
            return Err(InferenceError::NonNumericFeature {
                column: name.clone(),
                dtype: column.dtype().to_string(),
            });
        }

        let cast = column.cast(&DataType::Float64)?;
        for (i, value) in cast.as_materialized_series().f64()?.into_iter().enumerate() {
            match value {
                Some(v) if !v.is_nan() => matrix[[i, j]] = v,
                _ => {
                    return Err(InferenceError::MissingValue {
                        column: name.clone(),
                        row: i,
                    });
                }
            }
        }
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_selects_in_given_order() {
        let frame = df!("a" => [1i64, 2], "b" => [0.5, 1.5], "c" => ["x", "y"]).unwrap();
        let x = feature_matrix(&frame, &names(&["b", "a"])).unwrap();
        assert_eq!(x.shape(), &[2, 2]);
        assert_eq!(x[[0, 0]], 0.5);
        assert_eq!(x[[1, 1]], 2.0);
    }

    #[test]
    fn test_missing_feature() {
        let frame = df!("a" => [1i64]).unwrap();
        assert!(matches!(
            feature_matrix(&frame, &names(&["a", "b"])),
            Err(InferenceError::MissingFeature(name)) if name == "b"
        ));
    }

    #[test]
    fn test_text_feature_rejected() {
        let frame = df!("c" => ["x"]).unwrap();
        assert!(matches!(
            feature_matrix(&frame, &names(&["c"])),
            Err(InferenceError::NonNumericFeature { .. })
        ));
    }

    #[test]
    fn test_null_value_rejected() {
        let frame = df!("a" => [Some(1.0), None]).unwrap();
        assert!(matches!(
            feature_matrix(&frame, &names(&["a"])),
            Err(InferenceError::MissingValue { row: 1, .. })
        ));
    }
}
