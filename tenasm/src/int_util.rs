use crate::diag::DiagnosticKind;
use crate::MAX_NUMBER_LENGTH;
use num::Num;
use std::num::ParseIntError;

fn parse_radix<T>(text: &str, radix: u32) -> Result<T, ParseIntError>
where
    T: Num<FromStrRadixErr = ParseIntError>,
{
    T::from_str_radix(text, radix)
}

/// Parses a signed decimal literal as written in `.data` lists, immediates
/// and matrix dimensions. Literals are capped at four characters including
/// the sign, which also keeps every accepted value well inside `i16`.
pub fn parse_int(text: &str) -> Result<i16, DiagnosticKind> {
    if text.chars().count() > MAX_NUMBER_LENGTH {
        return Err(DiagnosticKind::NumberTooLong(text.to_owned()));
    }
    parse_radix::<i16>(text, 10).map_err(|_| DiagnosticKind::InvalidNumber(text.to_owned()))
}

/// Parses a matrix dimension, which must be a positive integer.
pub fn parse_dimension(text: &str) -> Result<usize, DiagnosticKind> {
    let value = parse_int(text)?;
    if value <= 0 {
        Err(DiagnosticKind::BadMatrixDimensions)
    } else {
        Ok(value as usize)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_signed_literals() {
        assert_eq!(parse_int("7"), Ok(7));
        assert_eq!(parse_int("-512"), Ok(-512));
        assert_eq!(parse_int("+99"), Ok(99));
    }

    #[test]
    fn rejects_long_literals() {
        assert_eq!(
            parse_int("1000"),
            Ok(1000),
        );
        assert_eq!(
            parse_int("10000"),
            Err(DiagnosticKind::NumberTooLong("10000".to_owned()))
        );
        assert_eq!(
            parse_int("-1000"),
            Err(DiagnosticKind::NumberTooLong("-1000".to_owned()))
        );
    }

    #[test]
    fn dimensions_must_be_positive() {
        assert_eq!(parse_dimension("3"), Ok(3));
        assert_eq!(parse_dimension("0"), Err(DiagnosticKind::BadMatrixDimensions));
        assert_eq!(parse_dimension("-2"), Err(DiagnosticKind::BadMatrixDimensions));
    }
}
