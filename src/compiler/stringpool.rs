use std::collections::HashMap;

use crate::compiler::semantics::symbol_table::STRING_LABEL_PREFIX;

/// The string literals used by a program.  Each distinct string is stored
/// once and is given a unique ID from which its data label is derived.
#[derive(Debug, PartialEq)]
pub struct StringPool {
    pool: HashMap<String, usize>,
}

impl StringPool {
    pub fn new() -> StringPool {
        StringPool {
            pool: HashMap::new(),
        }
    }

    /// If the given string is not in the string pool, this will insert the
    /// string and generate a unique ID for it.  Returns the ID of the string.
    pub fn insert(&mut self, s: &str) -> usize {
        match self.pool.get(s) {
            Some(id) => *id,
            None => {
                let id = self.pool.len();
                self.pool.insert(s.into(), id);
                id
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn label(id: usize) -> String {
        format!("{}{}", STRING_LABEL_PREFIX, id)
    }

    /// The pooled strings ordered by ID, paired with their data labels.  The
    /// strings are escaped for a NASM backquoted string.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self.pool.iter().map(|(s, id)| (*id, s)).collect();
        entries.sort();
        entries
            .into_iter()
            .map(|(id, s)| (Self::label(id), s.replace('`', "\\`")))
            .collect()
    }
}
