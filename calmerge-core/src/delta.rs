//! Set difference between the source and destination mappings.

use crate::identity::EventMapping;

#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaOptions {
    /// Remove every destination event, whether or not it is still in a source.
    pub delete_all: bool,
}

/// What has to change in the destination to mirror the sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    /// In a source, missing from the destination.
    pub to_add: EventMapping,
    /// In the destination, no longer in any source.
    pub to_remove: EventMapping,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute the delta between `source` and `dest`.
///
/// Events present on both sides are left alone. Iteration order of the
/// resulting mappings is unspecified.
pub fn diff(source: &EventMapping, dest: &EventMapping, options: DeltaOptions) -> Delta {
    let to_add = source
        .iter()
        .filter(|(key, _)| !dest.contains_key(key))
        .map(|(key, event)| (key.clone(), event.clone()))
        .collect();

    let to_remove = dest
        .iter()
        .filter(|(key, _)| options.delete_all || !source.contains_key(key))
        .map(|(key, event)| (key.clone(), event.clone()))
        .collect();

    Delta { to_add, to_remove }
}
