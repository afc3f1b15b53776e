//! Identity document checks.

const COEFFICIENTS: [u32; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];

/// Validates an Ecuadorian cédula with the modulo 10 check digit.
///
/// Ten digits, province code 01-24 or 30 (citizens abroad), third digit below
/// 6 for natural persons.
pub fn is_valid_cedula(cedula: &str) -> bool {
    let digits: Vec<u32> = cedula.chars().filter_map(|c| c.to_digit(10)).collect();
    if cedula.len() != 10 || digits.len() != 10 {
        return false;
    }

    let province = digits[0] * 10 + digits[1];
    if !(1..=24).contains(&province) && province != 30 {
        return false;
    }
    if digits[2] >= 6 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .zip(COEFFICIENTS.iter())
        .map(|(d, c)| {
            let v = d * c;
            if v >= 10 { v - 9 } else { v }
        })
        .sum();
    let check = match sum % 10 {
        0 => 0,
        m => 10 - m,
    };
    check == digits[9]
}

/// Fields holding a cédula get an inline validity hint.
pub fn is_cedula_field(name: &str) -> bool {
    name.contains("cedula")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_cedulas() {
        assert!(is_valid_cedula("1710034065"));
        assert!(is_valid_cedula("0926687856"));
    }

    #[test]
    fn rejects_bad_shape_province_and_check_digit() {
        assert!(!is_valid_cedula(""));
        assert!(!is_valid_cedula("171003406"));
        assert!(!is_valid_cedula("17100340a5"));
        assert!(!is_valid_cedula("2510034065"));
        assert!(!is_valid_cedula("1770034065"));
        assert!(!is_valid_cedula("1710034064"));
    }
}
