//! Form Input Checks
//!
//! Mirrors the backend's boundary rules so bad input is caught before any
//! network round trip. The backend checks again.

const MAX_NAME_BYTES: usize = 1500;

/// Item name as typed, or the reason it cannot be used
pub fn parse_item_name(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        return Err("Enter an item name.".to_string());
    }
    if raw.contains('/') {
        return Err("Item names cannot contain '/'.".to_string());
    }
    if raw == "." || raw == ".." {
        return Err(format!("'{}' is not a valid item name.", raw));
    }
    if raw.len() > MAX_NAME_BYTES {
        return Err("Item name is too long.".to_string());
    }
    Ok(raw.to_string())
}

/// Absolute quantity: a whole number, zero or more
pub fn parse_quantity(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Enter a quantity.".to_string());
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        Ok(_) => Err("Quantity cannot be negative.".to_string()),
        Err(_) => Err(format!("'{}' is not a whole number.", trimmed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_name() {
        assert_eq!(parse_item_name("eggs"), Ok("eggs".to_string()));
        assert_eq!(parse_item_name(" Eggs "), Ok(" Eggs ".to_string()));
        assert!(parse_item_name("").is_err());
        assert!(parse_item_name("   ").is_err());
        assert!(parse_item_name("a/b").is_err());
        assert!(parse_item_name("..").is_err());
    }

    #[test]
    fn test_quantity() {
        assert_eq!(parse_quantity("5"), Ok(5));
        assert_eq!(parse_quantity(" 0 "), Ok(0));
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("-2").is_err());
        assert!(parse_quantity("1.5").is_err());
        assert!(parse_quantity("abc").is_err());
    }
}
