use crate::LayoutError;

/// Row and column counts chosen for one slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: u16,
    pub columns: u16,
}

impl GridSpec {
    pub fn capacity(&self) -> usize {
        usize::from(self.rows) * usize::from(self.columns)
    }
}

/// Heuristic used to turn an item count into a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridPolicy {
    /// `columns = ceil(sqrt(n))`, `rows = ceil(n / columns)`.
    ///
    /// Columns are fixed first, so a non-square grid is always wider than tall.
    #[default]
    Square,
    /// Bucketed row counts: 2 rows up to 4 items, 3 up to 9, 4 beyond.
    ///
    /// The first bucket is always a 2x2 grid.
    Threshold,
}

impl GridPolicy {
    pub fn plan(&self, count: usize) -> Result<GridSpec, LayoutError> {
        if count == 0 {
            return Err(LayoutError::InvalidInput("cannot plan a grid for zero items".into()));
        }

        let (rows, columns) = match *self {
            GridPolicy::Square => {
                let columns = ceil_sqrt(count);
                (count.div_ceil(columns), columns)
            },
            GridPolicy::Threshold => match count {
                1..=4 => (2, 2),
                5..=9 => (3, count.div_ceil(3)),
                _ => (4, count.div_ceil(4)),
            },
        };

        let rows = u16::try_from(rows)
            .map_err(|_| LayoutError::InvalidInput(format!("too many items: {count}")))?;
        let columns = u16::try_from(columns)
            .map_err(|_| LayoutError::InvalidInput(format!("too many items: {count}")))?;

        Ok(GridSpec { rows, columns })
    }
}

/// Plans a grid with the default policy.
pub fn plan(count: usize) -> Result<GridSpec, LayoutError> {
    GridPolicy::default().plan(count)
}

fn ceil_sqrt(value: usize) -> usize {
    let mut root = (value as f64).sqrt() as usize;
    // Float rounding can land one off either way for large inputs.
    while root.checked_mul(root).map_or(true, |square| square > value) {
        root -= 1;
    }
    while root.checked_mul(root).is_some_and(|square| square < value) {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(1, 1, 1; "single")]
    #[test_case(2, 1, 2; "pair")]
    #[test_case(3, 2, 2; "three")]
    #[test_case(5, 2, 3; "five")]
    #[test_case(9, 3, 3; "nine")]
    #[test_case(10, 3, 4; "ten")]
    fn square_policy(count: usize, rows: u16, columns: u16) {
        assert_eq!(GridPolicy::Square.plan(count).unwrap(), GridSpec { rows, columns });
    }

    #[test_case(1, 2, 2; "single")]
    #[test_case(4, 2, 2; "four")]
    #[test_case(5, 3, 2; "five")]
    #[test_case(7, 3, 3; "seven")]
    #[test_case(10, 4, 3; "ten")]
    #[test_case(17, 4, 5; "seventeen")]
    fn threshold_policy(count: usize, rows: u16, columns: u16) {
        assert_eq!(GridPolicy::Threshold.plan(count).unwrap(), GridSpec { rows, columns });
    }

    #[test]
    fn capacity_always_covers_count() {
        for policy in [GridPolicy::Square, GridPolicy::Threshold] {
            for count in 1..500 {
                let spec = policy.plan(count).unwrap();
                assert!(spec.rows >= 1 && spec.columns >= 1);
                assert!(spec.capacity() >= count, "{policy:?} {count} -> {spec:?}");
            }
        }
    }

    #[test]
    fn square_grid_is_never_taller_than_wide() {
        for count in 1..200 {
            let spec = plan(count).unwrap();
            assert!(spec.columns >= spec.rows);
        }
    }

    #[test_case(GridPolicy::Square, usize::MAX; "square max")]
    #[test_case(GridPolicy::Threshold, usize::MAX; "threshold max")]
    #[test_case(GridPolicy::Threshold, 4 * 65_536; "threshold wider than u16")]
    fn oversized_counts_are_rejected(policy: GridPolicy, count: usize) {
        assert!(matches!(policy.plan(count), Err(LayoutError::InvalidInput(_))));
    }

    #[test_case(usize::MAX, 1 << (usize::BITS / 2); "max")]
    #[test_case(99, 10; "just under square")]
    #[test_case(100, 10; "exact square")]
    #[test_case(101, 11; "just over square")]
    fn ceil_sqrt_is_exact(value: usize, expected: usize) {
        assert_eq!(ceil_sqrt(value), expected);
    }

    #[test]
    fn zero_items_is_rejected() {
        assert!(matches!(plan(0), Err(LayoutError::InvalidInput(_))));
        assert!(matches!(GridPolicy::Threshold.plan(0), Err(LayoutError::InvalidInput(_))));
    }
}
