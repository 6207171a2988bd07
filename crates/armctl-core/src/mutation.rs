//! Add/remove of named children within a parent resource
//!
//! Names are unique within a collection, compared on a lower-cased key.
//! Uniqueness is checked when a child is added, before anything is sent.

use crate::error::{CoreError, Result};

/// A sub-resource identified by name within its parent
pub trait NamedChild {
    /// Kind used in error messages, e.g. `RedirectConfiguration`
    const KIND: &'static str;

    fn name(&self) -> &str;
}

/// Comparison key for child names
pub fn normalized_key(name: &str) -> String {
    name.to_lowercase()
}

/// Index of the child with `name`, ignoring case
pub fn find_named_child<C: NamedChild>(collection: &[C], name: &str) -> Option<usize> {
    let key = normalized_key(name);
    collection
        .iter()
        .position(|child| normalized_key(child.name()) == key)
}

/// Append `child`, rejecting a name that is already taken
///
/// On error the collection is left untouched.
pub fn add_named_child<C: NamedChild>(collection: &mut Vec<C>, child: C) -> Result<()> {
    if find_named_child(collection, child.name()).is_some() {
        return Err(CoreError::DuplicateName {
            kind: C::KIND,
            name: child.name().to_string(),
        });
    }
    collection.push(child);
    Ok(())
}

/// How removal treats a name that is not present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemovePolicy {
    pub fail_on_missing: bool,
}

impl RemovePolicy {
    pub const STRICT: RemovePolicy = RemovePolicy {
        fail_on_missing: true,
    };
    pub const LENIENT: RemovePolicy = RemovePolicy {
        fail_on_missing: false,
    };
}

/// Remove the child with `name`, returning it if it was present
pub fn remove_named_child<C: NamedChild>(
    collection: &mut Vec<C>,
    name: &str,
    policy: RemovePolicy,
) -> Result<Option<C>> {
    match find_named_child(collection, name) {
        Some(index) => Ok(Some(collection.remove(index))),
        None if policy.fail_on_missing => Err(CoreError::NotFound {
            kind: C::KIND,
            name: name.to_string(),
        }),
        None => Ok(None),
    }
}
