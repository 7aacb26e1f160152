//! Path extraction over decoded documents.
//!
//! [extract] walks a [JsonValue] tree one [JsonPointerComponent] at a time and hands back a
//! reference to the value found at the end of the pointer. Nothing is copied.
use crate::errors::{NavigationError, NavigationErrorReason};
use crate::pointer::{JsonPointer, JsonPointerComponent};
use crate::JsonValue;

/// Locate the value at `pointer` within `doc`. The empty pointer refers to `doc` itself.
///
/// Index components also address object members by their decimal key, so a pointer parsed
/// from text such as `/codes/404` works against both arrays and objects.
pub fn extract<'v>(
    doc: &'v JsonValue,
    pointer: &JsonPointer,
) -> Result<&'v JsonValue, NavigationError> {
    let mut current = doc;
    let mut walked = JsonPointer::default();
    for component in pointer.components() {
        walked.push(component.clone());
        current = step(current, component).map_err(|reason| NavigationError {
            path_so_far: walked.clone(),
            reason,
        })?;
    }
    Ok(current)
}

fn step<'v>(
    value: &'v JsonValue,
    component: &JsonPointerComponent,
) -> Result<&'v JsonValue, NavigationErrorReason> {
    match (component, value) {
        (JsonPointerComponent::Name(name), JsonValue::Object(_)) => value
            .get(name)
            .ok_or_else(|| NavigationErrorReason::MissingKey(name.clone())),
        (JsonPointerComponent::Index(index), JsonValue::Array(values)) => {
            values
                .get(*index)
                .ok_or(NavigationErrorReason::IndexOutOfRange {
                    index: *index,
                    len: values.len(),
                })
        }
        (JsonPointerComponent::Index(index), JsonValue::Object(_)) => {
            let key = index.to_string();
            value
                .get(&key)
                .ok_or(NavigationErrorReason::MissingKey(key))
        }
        (JsonPointerComponent::Name(_), other) => Err(NavigationErrorReason::WrongType {
            expected: "object",
            found: other.type_name(),
        }),
        (JsonPointerComponent::Index(_), other) => Err(NavigationErrorReason::WrongType {
            expected: "array",
            found: other.type_name(),
        }),
    }
}
