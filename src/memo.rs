/// Single-slot cache: holds the last computed value and the inputs it was
/// computed from. A lookup with equal inputs returns the stored value.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if !self.is_fresh(&key) {
            self.slot = None;
        }
        let (_, value) = self.slot.get_or_insert_with(|| (key, compute()));
        value
    }

    pub fn is_fresh(&self, key: &K) -> bool {
        matches!(&self.slot, Some((k, _)) if k == key)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_once_per_key() {
        let mut memo: Memo<u32, Vec<u32>> = Memo::default();
        let mut calls = 0;

        memo.get_or_compute(1, || {
            calls += 1;
            vec![1]
        });
        let v = memo.get_or_compute(1, || {
            calls += 1;
            vec![2]
        });
        assert_eq!(v, &vec![1]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn recomputes_on_key_change() {
        let mut memo: Memo<u32, u32> = Memo::default();
        assert_eq!(*memo.get_or_compute(1, || 10), 10);
        assert_eq!(*memo.get_or_compute(2, || 20), 20);
        assert!(memo.is_fresh(&2));
        assert!(!memo.is_fresh(&1));
    }

    #[test]
    fn clear_forgets_value() {
        let mut memo: Memo<u32, u32> = Memo::default();
        memo.get_or_compute(1, || 10);
        memo.clear();
        assert!(!memo.is_fresh(&1));
        assert_eq!(*memo.get_or_compute(1, || 11), 11);
    }
}
