/// A ranked list of candidate producers for one derived metric.
///
/// Every dashboard metric prefers its precomputed backend view and falls back
/// to reducing raw transactions when the view has no rows yet. Instead of
/// duplicating that branch per metric, each metric declares its sources in
/// priority order; the first one yielding a value wins.
pub(crate) struct Ranked<'a, T> {
    sources: Vec<Box<dyn FnOnce() -> Option<T> + 'a>>,
}

impl<'a, T> Ranked<'a, T> {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn then(mut self, source: impl FnOnce() -> Option<T> + 'a) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn resolve(self) -> Option<T> {
        self.sources.into_iter().find_map(|source| source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_populated_source_wins() {
        let value = Ranked::new()
            .then(|| Some(1))
            .then(|| Some(2))
            .resolve();
        assert_eq!(value, Some(1));
    }

    #[test]
    fn test_falls_through_empty_sources() {
        let value = Ranked::new()
            .then(|| None)
            .then(|| Some(2))
            .resolve();
        assert_eq!(value, Some(2));
    }

    #[test]
    fn test_all_empty_resolves_to_none() {
        let value: Option<i32> = Ranked::new().then(|| None).then(|| None).resolve();
        assert_eq!(value, None);
    }

    #[test]
    fn test_later_sources_not_evaluated_once_resolved() {
        let mut fallback_ran = false;
        let value = Ranked::new()
            .then(|| Some(1))
            .then(|| {
                fallback_ran = true;
                Some(2)
            })
            .resolve();
        assert_eq!(value, Some(1));
        assert!(!fallback_ran);
    }
}
