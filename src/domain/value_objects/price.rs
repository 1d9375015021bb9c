#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, String> {
        if !value.is_finite() {
            return Err("Price must be finite".to_string());
        }
        if value < 0.0 {
            return Err("Price must be non-negative".to_string());
        }
        Ok(Price(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Round to 2 decimal places, the brokerage's limit-price precision.
    pub fn rounded_to_cents(&self) -> Price {
        Price((self.0 * 100.0).round() / 100.0)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
