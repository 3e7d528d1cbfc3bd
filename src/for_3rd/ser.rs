//! Serialization of Decimal.
//! Serialization to a string uses scientific notation.

use crate::dec::Decimal;
use serde::{Serialize, Serializer};

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_sci_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::to_string;

    use crate::dec::Decimal;
    use core::str::FromStr;

    #[test]
    fn to_json() {
        assert_eq!(to_string(&Decimal::zero()).unwrap(), "\"0\"");
        assert_eq!(
            to_string(&Decimal::from_str("-12.345E+100").unwrap()).unwrap(),
            "\"-1.2345E+101\""
        );
        assert_eq!(to_string(&Decimal::NEG_INFINITY).unwrap(), "\"-Infinity\"");
        assert_eq!(
            to_string(&Decimal::from_str("sNaN42").unwrap()).unwrap(),
            "\"sNaN42\""
        );
    }
}
