use crate::error::{Error, Result};

/// One pool per letter of the alphabet.
pub const MAX_TYPES: usize = 26;
pub const MAX_LENGTH: usize = 20;
pub const MAX_TOTAL_ITEMS: u64 = 50;

/// Validate the shape of a generation request.
///
/// Rules are checked in order and the first violation is returned:
/// - at least one pool, every count positive
/// - positive length, at most `MAX_LENGTH`
/// - at most `MAX_TYPES` pools and no more than one pool per requested slot
/// - at most `MAX_TOTAL_ITEMS` items across all pools
pub fn validate_request(items: &[u32], length: usize) -> Result<()> {
    if items.is_empty() {
        return Err(invalid("items must be a non-empty array"));
    }

    if items.iter().any(|count| *count == 0) {
        return Err(invalid("all items must be positive integers"));
    }

    if length == 0 {
        return Err(invalid("length must be a positive integer"));
    }

    if items.len() > MAX_TYPES {
        return Err(invalid(format!("maximum {MAX_TYPES} item types allowed")));
    }

    if length > MAX_LENGTH {
        return Err(invalid(format!(
            "maximum combination length is {MAX_LENGTH}"
        )));
    }

    if length > items.len() {
        return Err(invalid(format!(
            "cannot create combinations of length {length} with only {} item types",
            items.len()
        )));
    }

    let total: u64 = items.iter().map(|count| u64::from(*count)).sum();
    if total > MAX_TOTAL_ITEMS {
        return Err(invalid(format!(
            "too many total items, maximum {MAX_TOTAL_ITEMS} items allowed"
        )));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidRequest(message.into())
}
