use std::collections::BTreeSet;

/// Runtime modules a generated module has to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Need {
    Decimal,
    Oracle,
    Time,
    Uuid,
    Wire,
}

impl Need {
    pub fn module(self) -> &'static str {
        match self {
            Need::Decimal => "decimal",
            Need::Oracle => "oracle",
            Need::Time => "time",
            Need::Uuid => "uuid",
            Need::Wire => "wire",
        }
    }
}

/// Per-run accumulator, filled while variants are visited and read once when
/// the import list is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Needs {
    set: BTreeSet<Need>,
}

impl Needs {
    pub fn mark(&mut self, need: Need) {
        self.set.insert(need);
    }

    pub fn contains(&self, need: Need) -> bool {
        self.set.contains(&need)
    }

    /// Sorted by module name.
    pub fn modules(&self) -> Vec<&'static str> {
        let mut xs: Vec<&'static str> = self.set.iter().map(|n| n.module()).collect();
        xs.sort_unstable();
        xs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modules_are_sorted_and_deduplicated() {
        let mut needs = Needs::default();
        needs.mark(Need::Wire);
        needs.mark(Need::Uuid);
        needs.mark(Need::Wire);
        needs.mark(Need::Decimal);
        assert_eq!(needs.modules(), vec!["decimal", "uuid", "wire"]);
        assert!(!needs.contains(Need::Time));
    }
}
