use std::time::Instant;

/// Returns the indices of all entries equal to the needle
pub fn index_mask<T: PartialEq>(needle: &T, haystack: &[T]) -> Vec<usize> {
    haystack
        .iter()
        .enumerate()
        .filter(|(_, target)| *target == needle)
        .map(|(i, _)| i)
        .collect()
}

/// Selects the entries at the given indices, keeping the order of the indices
pub fn select_indices<T: Clone>(indices: &[usize], data: &[T]) -> Vec<T> {
    indices.iter().map(|i| data[*i].clone()).collect()
}

/// Logs the wall time of a named stage when dropped
pub struct Timer {
    name: String,
    start: Instant,
}
impl Timer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }
}
impl Drop for Timer {
    fn drop(&mut self) {
        log::info!("{}: {:.3} sec", self.name, self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mask() {
        let haystack = b"AQAQQ";
        assert_eq!(index_mask(&b'Q', haystack), vec![1, 3, 4]);
        assert!(index_mask(&b'W', haystack).is_empty());
    }

    #[test]
    fn test_select_indices_keeps_order() {
        let data = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(select_indices(&[2, 0], &data), vec!["c", "a"]);
    }
}
