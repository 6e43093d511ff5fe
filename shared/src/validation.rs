//! Validation utilities for the Coffee Inventory Platform

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate that a display name is present and reasonably short
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.chars().count() > 120 {
        return Err("Name must be at most 120 characters");
    }
    Ok(())
}

/// Validate a unit label (kg, liter, piece...)
pub fn validate_unit(unit: &str) -> Result<(), &'static str> {
    if unit.trim().is_empty() {
        return Err("Unit is required");
    }
    Ok(())
}

/// Validate item stock thresholds.
///
/// Both must be finite and non-negative. `max_stock < min_stock` is accepted:
/// the classifier copes with it and shops do enter it for seasonal items.
pub fn validate_stock_thresholds(min_stock: f64, max_stock: f64) -> Result<(), &'static str> {
    if !min_stock.is_finite() || !max_stock.is_finite() {
        return Err("Stock thresholds must be numbers");
    }
    if min_stock < 0.0 {
        return Err("Minimum stock cannot be negative");
    }
    if max_stock < 0.0 {
        return Err("Maximum stock cannot be negative");
    }
    Ok(())
}

/// Validate a stock quantity entered for a location
pub fn validate_quantity(quantity: f64) -> Result<(), &'static str> {
    if !quantity.is_finite() {
        return Err("Quantity must be a number");
    }
    if quantity < 0.0 {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Contact Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate a phone number: 7 to 15 digits, common separators allowed
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
    {
        return Err("Phone number contains invalid characters");
    }
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !(7..=15).contains(&digits) {
        return Err("Phone number must have 7 to 15 digits");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Espresso Beans").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_unit() {
        assert!(validate_unit("kg").is_ok());
        assert!(validate_unit("").is_err());
    }

    #[test]
    fn test_validate_stock_thresholds() {
        assert!(validate_stock_thresholds(5.0, 20.0).is_ok());
        assert!(validate_stock_thresholds(0.0, 0.0).is_ok());
        assert!(validate_stock_thresholds(10.0, 5.0).is_ok());
        assert!(validate_stock_thresholds(-1.0, 5.0).is_err());
        assert!(validate_stock_thresholds(1.0, -5.0).is_err());
        assert!(validate_stock_thresholds(f64::NAN, 5.0).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0.0).is_ok());
        assert!(validate_quantity(12.75).is_ok());
        assert!(validate_quantity(-0.5).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("orders@roastery.com").is_ok());
        assert!(validate_email("roastery").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+1 (555) 123-4567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("555-CALL-NOW").is_err());
    }
}
