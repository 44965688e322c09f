// names.rs - Named group table.
//
// Built once per compiled pattern from the engine's name enumeration. A name
// can map to several groups; lookups return them in ascending order.

use std::collections::HashMap;

use smallvec::SmallVec;
use tracing::warn;

/// Maps group names to group indices.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    map: HashMap<String, SmallVec<[usize; 2]>>,
    subexp_names: Box<[String]>,
}

impl NameTable {
    /// Builds the table for a pattern with `num_subexp` groups.
    ///
    /// Indices outside `1..=num_subexp` are dropped.
    pub fn build<I>(num_subexp: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let mut map: HashMap<String, SmallVec<[usize; 2]>> = HashMap::new();
        let mut subexp_names = vec![String::new(); num_subexp + 1];
        for (name, index) in entries {
            if index == 0 || index > num_subexp {
                warn!(name = %name, index, num_subexp, "dropping out-of-range group name");
                continue;
            }
            subexp_names[index].clone_from(&name);
            let indices = map.entry(name).or_default();
            if let Err(pos) = indices.binary_search(&index) {
                indices.insert(pos, index);
            }
        }
        NameTable {
            map,
            subexp_names: subexp_names.into_boxed_slice(),
        }
    }

    /// Group indices bound to `name`, ascending. Empty for unknown names.
    pub fn indices(&self, name: &str) -> &[usize] {
        self.map.get(name).map_or(&[], |v| v.as_slice())
    }

    /// One entry per group, group 0 included; `""` for unnamed groups.
    pub fn subexp_names(&self) -> &[String] {
        &self.subexp_names
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
