use rust_decimal::{Decimal, RoundingStrategy};

/// Currency display conventions for the bill total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyLocale {
    /// BCP 47 tag (e.g. "en-GB")
    pub tag: &'static str,
    /// Symbol placed before the amount
    pub symbol: &'static str,
    /// Separator between groups of three integer digits
    pub group_separator: char,
    /// Separator before the fractional digits
    pub decimal_separator: char,
}

impl CurrencyLocale {
    pub const EN_GB: CurrencyLocale = CurrencyLocale {
        tag: "en-GB",
        symbol: "£",
        group_separator: ',',
        decimal_separator: '.',
    };

    pub const EN_US: CurrencyLocale = CurrencyLocale {
        tag: "en-US",
        symbol: "$",
        group_separator: ',',
        decimal_separator: '.',
    };

    pub const EN_IE: CurrencyLocale = CurrencyLocale {
        tag: "en-IE",
        symbol: "€",
        group_separator: ',',
        decimal_separator: '.',
    };

    const ALL: [CurrencyLocale; 3] = [Self::EN_GB, Self::EN_US, Self::EN_IE];

    /// Looks up a supported locale by tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<CurrencyLocale> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.tag.eq_ignore_ascii_case(tag))
    }

    /// Formats an amount with symbol, digit grouping and two fractional digits
    ///
    /// # Example
    ///
    /// ```
    /// use bike_parts::bom::CurrencyLocale;
    /// use rust_decimal::Decimal;
    ///
    /// let total = Decimal::new(123456, 2);
    /// assert_eq!(CurrencyLocale::EN_GB.format(total), "£1,234.56");
    /// ```
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let mut fixed = rounded.abs();
        fixed.rescale(2);
        let text = fixed.to_string();
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        format!(
            "{}{}{}{}{}",
            sign,
            self.symbol,
            group_digits(whole, self.group_separator),
            self.decimal_separator,
            fraction
        )
    }
}

impl Default for CurrencyLocale {
    fn default() -> Self {
        Self::EN_GB
    }
}

/// Rounds a price up to the next whole cent
///
/// # Example
///
/// ```
/// use bike_parts::bom::ceil_to_cent;
/// use rust_decimal::Decimal;
///
/// assert_eq!(ceil_to_cent(Decimal::new(123456, 3)), Decimal::new(12346, 2));
/// ```
pub fn ceil_to_cent(price: Decimal) -> Decimal {
    let mut ceiled = price.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
    ceiled.rescale(2);
    ceiled
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}
