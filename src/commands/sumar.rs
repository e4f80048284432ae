//! `sumar`: adds up two or more numbers.

/// Prefix command handler.
pub fn execute(prefix: &str, args: &[&str]) -> Option<String> {
    let numbers = match parse_numbers(args) {
        Some(numbers) if numbers.len() >= 2 => numbers,
        _ => return Some(usage(prefix)),
    };
    Some(format!("Resultado: {}", format_number(sum(&numbers))))
}

pub fn usage(prefix: &str) -> String {
    format!("Uso: {prefix}sumar <num1> <num2> [...nums]")
}

pub fn sum(numbers: &[f64]) -> f64 {
    numbers.iter().sum()
}

fn parse_numbers(args: &[&str]) -> Option<Vec<f64>> {
    args.iter().map(|arg| parse_number(arg)).collect()
}

/// Reads a number the way Discord users type them: decimals, exponents,
/// `Infinity` and `0x`/`0o`/`0b` integers. `NaN` is never produced.
fn parse_number(token: &str) -> Option<f64> {
    match token {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match token.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &token[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0.0, |acc, c| {
            c.to_digit(radix)
                .map(|digit| acc * f64::from(radix) + f64::from(digit))
        });
    }

    // rules out `inf`, `nan` and friends, which `f64::from_str` accepts
    if !token.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse::<f64>().ok()
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    // `-0` prints as `0`
    (value + 0.0).to_string()
}
