


use web3::types::U256;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleError{
    NotADecimal,
    NotPositive,
    BelowOneBaseUnit,
    Overflow,
}

/*
    amount * 10^decimals without a float in between: split the typed decimal
    into integer and fraction digits, keep exactly `decimals` fraction digits
    (padding with zeros) and parse the concatenation as a U256.
    fraction digits past `decimals` are dropped, i.e. we truncate toward zero.
*/
pub fn scale_amount(amount: &str, decimals: u8) -> Result<U256, ScaleError>{

    let amount = amount.trim();
    let (integer, fraction) = match amount.split_once('.'){
        Some((integer, fraction)) => (integer, fraction),
        None => (amount, "")
    };

    if integer.is_empty() && fraction.is_empty(){
        return Err(ScaleError::NotADecimal);
    }
    if !integer.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()){
        return Err(ScaleError::NotADecimal);
    }

    let has_value = integer.bytes().chain(fraction.bytes()).any(|b| b != b'0');
    if !has_value{
        return Err(ScaleError::NotPositive);
    }

    let decimals = decimals as usize;
    let kept_fraction = if fraction.len() >= decimals{
        fraction[..decimals].to_string()
    } else{
        format!("{:0<width$}", fraction, width = decimals)
    };

    let scaled = format!("{}{}", integer, kept_fraction);
    let scaled = scaled.trim_start_matches('0');
    if scaled.is_empty(){
        return Err(ScaleError::BelowOneBaseUnit);
    }

    U256::from_dec_str(scaled).map_err(|_| ScaleError::Overflow)
}



#[cfg(test)]
mod tests{

    use super::*;

    #[test]
    fn scales_exactly(){
        assert_eq!(scale_amount("1.5", 6), Ok(U256::from(1_500_000u64)));
        assert_eq!(scale_amount("2", 6), Ok(U256::from(2_000_000u64)));
        assert_eq!(scale_amount("0.1", 18), Ok(U256::exp10(17)));
        assert_eq!(scale_amount("0.000000000000000001", 18), Ok(U256::one()));
        assert_eq!(scale_amount("7", 0), Ok(U256::from(7u64)));
        assert_eq!(
            scale_amount("123456789012.123456789012345678", 18),
            Ok(U256::from_dec_str("123456789012123456789012345678").unwrap())
        );
    }

    #[test]
    fn accepts_bare_leading_or_trailing_point(){
        assert_eq!(scale_amount(".5", 2), Ok(U256::from(50u64)));
        assert_eq!(scale_amount("5.", 2), Ok(U256::from(500u64)));
        assert_eq!(scale_amount(" 3 ", 1), Ok(U256::from(30u64)));
    }

    #[test]
    fn truncates_sub_unit_remainder(){
        assert_eq!(scale_amount("1.2345679", 6), Ok(U256::from(1_234_567u64)));
        assert_eq!(scale_amount("0.99", 0), Err(ScaleError::BelowOneBaseUnit));
        assert_eq!(scale_amount("0.0000001", 6), Err(ScaleError::BelowOneBaseUnit));
    }

    #[test]
    fn rejects_non_decimals(){
        for input in ["", ".", "abc", "-1", "+1", "1e3", "1.2.3", "1,5", "0x10"]{
            assert_eq!(scale_amount(input, 6), Err(ScaleError::NotADecimal), "input {:?}", input);
        }
        assert_eq!(scale_amount("0", 6), Err(ScaleError::NotPositive));
        assert_eq!(scale_amount("0.000", 6), Err(ScaleError::NotPositive));
    }

    #[test]
    fn overflowing_amounts_are_rejected(){
        let too_big = "1".repeat(80);
        assert_eq!(scale_amount(&too_big, 18), Err(ScaleError::Overflow));
    }

}
