//! Pearson correlation across projected counter columns.

use crate::dataset::Projection;

/// Square, symmetric matrix of pairwise Pearson coefficients.
///
/// The diagonal is always `1.0`. An off-diagonal cell is `NaN` when either
/// column has no variance (including datasets with fewer than two rows).
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }
}

/// Compute the correlation matrix of every pair of projected columns.
pub fn correlate(projection: &Projection) -> CorrelationMatrix {
    let n = projection.columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&projection.data[i], &projection.data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        labels: projection.columns.clone(),
        values,
    }
}

/// Pearson coefficient of two equal-length series, clamped to [-1, 1].
///
/// Returns `NaN` if the series are shorter than two points or either one is
/// constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let (x, y) = (&x[..n], &y[..n]);

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(columns: &[(&str, &[f64])]) -> Projection {
        Projection {
            columns: columns.iter().map(|(n, _)| n.to_string()).collect(),
            data: columns.iter().map(|(_, d)| d.to_vec()).collect(),
        }
    }

    #[test]
    fn perfect_positive_and_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&x, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn known_coefficient() {
        // r = 0.8 for this textbook pair.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        assert!((pearson(&x, &y) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn constant_series_is_nan() {
        assert!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_nan());
        assert!(pearson(&[1.0], &[2.0]).is_nan());
        assert!(pearson(&[], &[]).is_nan());
    }

    #[test]
    fn matrix_is_square_symmetric_with_unit_diagonal() {
        let p = projection(&[
            ("a", &[1.0, 2.0, 3.0, 4.0, 10.0]),
            ("b", &[3.0, 1.0, 4.0, 1.0, 5.0]),
            ("c", &[9.0, 2.0, 6.0, 5.0, 3.0]),
        ]);
        let m = correlate(&p);
        assert_eq!(m.len(), 3);
        assert_eq!(m.labels(), &["a", "b", "c"]);
        for i in 0..3 {
            assert_eq!(m.rows()[i].len(), 3);
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..3 {
                assert!((m.get(i, j) - m.get(j, i)).abs() < 1e-12);
                assert!((-1.0..=1.0).contains(&m.get(i, j)));
            }
        }
    }

    #[test]
    fn zero_variance_column_keeps_unit_diagonal() {
        let p = projection(&[("a", &[1.0, 2.0, 3.0]), ("flat", &[0.0, 0.0, 0.0])]);
        let m = correlate(&p);
        assert_eq!(m.get(1, 1), 1.0);
        assert!(m.get(0, 1).is_nan());
        assert!(m.get(1, 0).is_nan());
    }

    #[test]
    fn empty_projection() {
        let m = correlate(&projection(&[]));
        assert!(m.is_empty());
        assert!(m.rows().is_empty());
    }
}
