use linkage_types::{Attribute, LinkError, LinkResult};

/// The target's value type must be assignable to the original's.
pub fn check_attribute_type(original: &Attribute, target: &Attribute) -> LinkResult<()> {
    let expected = original.value_type();
    let found = target.value_type();
    if expected.is_assignable_from(found) {
        return Ok(());
    }
    Err(LinkError::TypeMismatch {
        original: original.id(),
        target: target.id(),
        expected: expected.clone(),
        found: found.clone(),
    })
}
