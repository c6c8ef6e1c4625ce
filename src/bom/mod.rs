//! Bill of materials
//!
//! Collects the parts and per-component errors of one resolution run and
//! computes the total. Errors never block the total: it is the sum of the
//! parts that did resolve.

mod currency;

pub use currency::{ceil_to_cent, CurrencyLocale};

use rust_decimal::Decimal;
use std::fmt;

/// Where in the pipeline a component failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// No catalog rule or product for the specification
    Resolve,
    /// The vendor page could not be retrieved
    Fetch,
    /// The page was retrieved but the product could not be read
    Extract,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolve => "RESOLVE",
            Stage::Fetch => "FETCH",
            Stage::Extract => "EXTRACT",
        };
        write!(f, "{}", name)
    }
}

/// A priced line item on the bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Component label (e.g. "Frame", "Left Hydraulic-Shifter")
    pub label: String,
    /// Product name read from the vendor page
    pub name: String,
    /// Normalized price, two fractional digits
    pub price: Decimal,
    /// Product page the part was read from
    pub url: String,
}

/// A component that did not make it onto the bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub component: String,
    pub stage: Stage,
    pub detail: String,
    pub url: Option<String>,
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.component, self.detail)
    }
}

/// A component intentionally left off the bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Omission {
    pub component: String,
    pub reason: String,
}

/// Result of handling one component (or one page of it)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Part(Part),
    Error(ResolutionError),
    Omitted(Omission),
}

/// The priced bill for one specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillOfMaterials {
    pub parts: Vec<Part>,
    pub errors: Vec<ResolutionError>,
    pub omissions: Vec<Omission>,
    /// Sum of part prices, each ceiled at the cent
    pub total_price: Decimal,
    /// `total_price` formatted for the configured locale (e.g. "£1,234.56")
    pub total_display: String,
}

impl BillOfMaterials {
    /// True when every component resolved or was intentionally omitted
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Looks up a part by its component label
    pub fn part(&self, label: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.label == label)
    }
}

/// Assembles outcomes into a bill and computes the total
///
/// Each part price is ceiled at the cent before summing. A part whose price
/// would overflow the total is moved to the errors instead.
///
/// # Arguments
///
/// * `outcomes` - Every component outcome of the run, in display order
/// * `locale` - Currency conventions for the formatted total
///
/// # Returns
///
/// The bill; parts and errors keep the order they were given in
///
/// # Example
///
/// ```
/// use bike_parts::bom::{aggregate, CurrencyLocale, Outcome};
/// use bike_parts::Part;
/// use rust_decimal::Decimal;
///
/// let frame = Part {
///     label: "Frame".to_string(),
///     name: "Croix de Fer".to_string(),
///     price: Decimal::new(123456, 2),
///     url: "https://www.genesisbikes.co.uk/".to_string(),
/// };
///
/// let bill = aggregate(vec![Outcome::Part(frame)], &CurrencyLocale::EN_GB);
/// assert_eq!(bill.total_display, "£1,234.56");
/// ```
pub fn aggregate(
    outcomes: impl IntoIterator<Item = Outcome>,
    locale: &CurrencyLocale,
) -> BillOfMaterials {
    let mut parts = Vec::new();
    let mut errors = Vec::new();
    let mut omissions = Vec::new();

    let mut total_price = ceil_to_cent(Decimal::ZERO);

    for outcome in outcomes {
        match outcome {
            Outcome::Part(part) => match total_price.checked_add(ceil_to_cent(part.price)) {
                Some(total) => {
                    total_price = total;
                    parts.push(part);
                }
                None => {
                    tracing::warn!("{} price {} overflows the bill total", part.label, part.price);
                    errors.push(ResolutionError {
                        component: part.label,
                        stage: Stage::Extract,
                        detail: format!("price {} overflows the bill total", part.price),
                        url: Some(part.url),
                    });
                }
            },
            Outcome::Error(error) => errors.push(error),
            Outcome::Omitted(omission) => omissions.push(omission),
        }
    }

    let total_display = locale.format(total_price);

    tracing::info!(
        "Bill total {} from {} parts ({} errors)",
        total_display,
        parts.len(),
        errors.len()
    );

    BillOfMaterials {
        parts,
        errors,
        omissions,
        total_price,
        total_display,
    }
}
