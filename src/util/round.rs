/// 小数点以下の桁数で丸める。
#[must_use]
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_requested_precision() {
        assert!((round_to(0.456, 2) - 0.46).abs() < 1e-12);
        assert!((round_to(-0.333_333, 3) - -0.333).abs() < 1e-12);
        assert!((round_to(2.0, 2) - 2.0).abs() < 1e-12);
    }
}
