use crate::action::Action;

/// Ordered, append-only table of steps. Step numbers are assigned by
/// position starting at 1, so the table has no gaps; a step that no longer
/// does anything is registered as [`crate::action::Retired`].
#[derive(Default)]
pub struct StepRegistry {
    steps: Vec<Box<dyn Action>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `action` and return the step number it was given.
    pub fn push(&mut self, action: impl Action + 'static) -> u32 {
        self.steps.push(Box::new(action));
        self.steps.len() as u32
    }

    pub fn get(&self, step: u32) -> Option<&dyn Action> {
        let index = usize::try_from(step).ok()?.checked_sub(1)?;
        let action: &dyn Action = &**self.steps.get(index)?;
        Some(action)
    }

    /// Highest registered step number (0 when empty).
    pub fn last_step(&self) -> u32 {
        self.steps.len() as u32
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `(step, action)` pairs in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &dyn Action)> {
        self.steps.iter().enumerate().map(|(i, a)| {
            let action: &dyn Action = &**a;
            (i as u32 + 1, action)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Retired;

    #[test]
    fn push_numbers_from_one() {
        let mut reg = StepRegistry::new();
        assert_eq!(reg.push(Retired::new("first")), 1);
        assert_eq!(reg.push(Retired::new("second")), 2);
        assert_eq!(reg.last_step(), 2);
        assert_eq!(reg.get(1).unwrap().description(), "first");
        assert_eq!(reg.get(2).unwrap().description(), "second");
    }

    #[test]
    fn out_of_range_lookups() {
        let mut reg = StepRegistry::new();
        reg.push(Retired::new("only"));
        assert!(reg.get(0).is_none());
        assert!(reg.get(2).is_none());
        assert!(reg.get(u32::MAX).is_none());
    }

    #[test]
    fn empty_registry() {
        let reg = StepRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.last_step(), 0);
        assert!(reg.get(1).is_none());
    }

    #[test]
    fn iter_is_ordered() {
        let mut reg = StepRegistry::new();
        for name in ["a", "b", "c"] {
            reg.push(Retired::new(name));
        }
        let listed: Vec<(u32, String)> = reg
            .iter()
            .map(|(n, a)| (n, a.description().to_string()))
            .collect();
        assert_eq!(
            listed,
            vec![(1, "a".into()), (2, "b".into()), (3, "c".into())]
        );
    }
}
