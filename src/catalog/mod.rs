//! Product catalog rule tables
//!
//! The catalog maps bike attributes to vendor products. Every table is plain
//! configuration data so product choices (including gear clamps) can change
//! without touching resolution logic.
//!
//! Products are referenced as `"<vendor-id>:<path>"`; the path is joined onto
//! the vendor's base URL when a rule is selected.
//!
//! Gear tables are ordered rule lists. The first rule whose present `front`
//! and `rear` fields both match wins, and absent fields match anything:
//!
//! ```toml
//! [[catalog.chainrings]]
//! front = 3
//! rear = 9
//! product = "wiggle:shimano-sora-r3030-9-speed-triple-chainset"
//!
//! [[catalog.chainrings]]
//! front = 3
//! product = "chainreaction:shimano-tiagra-4703-10sp-road-triple-chainset"
//! clamp-rear = 10
//! ```

use crate::bike::{BrakeType, FrameStyle, HandlebarType, WheelPreference};
use crate::ResolveError;
use serde::Deserialize;

/// All rule tables used by the resolver
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub frames: Vec<FrameRule>,
    pub handlebars: Vec<HandlebarRule>,
    pub wheels: Vec<WheelRule>,
    #[serde(rename = "trigger-shifters")]
    pub trigger_shifters: Vec<GearRule>,
    #[serde(rename = "brake-levers")]
    pub brake_levers: BrakeLevers,
    #[serde(rename = "mechanical-sti")]
    pub mechanical_sti: Vec<GearRule>,
    #[serde(rename = "hydraulic-sti")]
    pub hydraulic_sti: Vec<GearRule>,
    /// Left-lever overrides for hydraulic STI; when none match the left lever
    /// uses the right lever's product
    #[serde(rename = "hydraulic-sti-left", default)]
    pub hydraulic_sti_left: Vec<GearRule>,
    #[serde(rename = "brake-calipers")]
    pub brake_calipers: BrakeCalipers,
    pub chainrings: Vec<GearRule>,
    pub cassettes: Vec<GearRule>,
    pub chains: Vec<GearRule>,
    #[serde(rename = "rear-derailleurs")]
    pub rear_derailleurs: Vec<GearRule>,
    #[serde(rename = "front-derailleurs")]
    pub front_derailleurs: Vec<GearRule>,
}

/// Frame choice; `disc` absent means the frame suits either brake mount
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRule {
    pub style: FrameStyle,
    #[serde(default)]
    pub disc: Option<bool>,
    pub product: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HandlebarRule {
    pub handlebar: HandlebarType,
    pub product: String,
}

/// Wheelset choice; `rim-brake` absent means either brake surface
#[derive(Debug, Clone, Deserialize)]
pub struct WheelRule {
    #[serde(rename = "single-speed", default)]
    pub single_speed: bool,
    #[serde(rename = "rim-brake", default)]
    pub rim_brake: Option<bool>,
    pub preference: WheelPreference,
    pub product: String,
}

/// Brake levers paired with trigger shifters
#[derive(Debug, Clone, Deserialize)]
pub struct BrakeLevers {
    /// Sold singly; fitted left and right
    #[serde(rename = "hydraulic-disc")]
    pub hydraulic_disc: String,

    /// Cable-pull lever set for rim and mechanical disc brakes
    pub cable: String,
}

/// Caliper tables per cable-actuated brake type
///
/// Hydraulic disc calipers ship with their levers and have no table.
#[derive(Debug, Clone, Deserialize)]
pub struct BrakeCalipers {
    pub rim: Vec<GearRule>,
    #[serde(rename = "mechanical-disc")]
    pub mechanical_disc: Vec<GearRule>,
}

impl BrakeCalipers {
    /// Returns the caliper table for a brake type, if it has one
    pub fn table(&self, brake: BrakeType) -> Option<&[GearRule]> {
        match brake {
            BrakeType::Rim => Some(self.rim.as_slice()),
            BrakeType::MechanicalDisc => Some(self.mechanical_disc.as_slice()),
            BrakeType::HydraulicDisc => None,
        }
    }
}

/// One row of a gear-keyed table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GearRule {
    #[serde(default)]
    pub front: Option<u8>,
    #[serde(default)]
    pub rear: Option<u8>,
    pub product: String,

    /// Rear gear count forced onto the specification when this rule is used
    #[serde(rename = "clamp-rear", default)]
    pub clamp_rear: Option<u8>,

    /// Marks a substitute product; logged when selected
    #[serde(default)]
    pub note: Option<String>,
}

impl GearRule {
    /// Returns true if the rule applies to this gear combination
    pub fn matches(&self, front: u8, rear: u8) -> bool {
        self.front.map_or(true, |f| f == front) && self.rear.map_or(true, |r| r == rear)
    }
}

/// Finds the first rule in a gear table matching the combination
///
/// # Examples
///
/// ```
/// use bike_parts::catalog::{lookup_gear, GearRule};
///
/// let rules = vec![
///     GearRule { front: None, rear: Some(10), product: "v:ten".into(), clamp_rear: None, note: None },
///     GearRule { front: None, rear: None, product: "v:other".into(), clamp_rear: None, note: None },
/// ];
/// assert_eq!(lookup_gear(&rules, 2, 10).unwrap().product, "v:ten");
/// assert_eq!(lookup_gear(&rules, 2, 11).unwrap().product, "v:other");
/// ```
pub fn lookup_gear(rules: &[GearRule], front: u8, rear: u8) -> Option<&GearRule> {
    rules.iter().find(|rule| rule.matches(front, rear))
}

/// A catalog product reference split into vendor and path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductRef<'a> {
    pub vendor: &'a str,
    pub path: &'a str,
}

/// Splits a `"vendor:path"` product reference
///
/// # Returns
///
/// * `Ok(ProductRef)` - Both halves are non-empty
/// * `Err(ResolveError::MalformedProduct)` - Missing separator or empty half
pub fn parse_product(product: &str) -> Result<ProductRef<'_>, ResolveError> {
    match product.split_once(':') {
        Some((vendor, path)) if !vendor.is_empty() && !path.is_empty() => {
            Ok(ProductRef { vendor, path })
        }
        _ => Err(ResolveError::MalformedProduct(product.to_string())),
    }
}

impl Catalog {
    /// Every product reference in the catalog, with the table it came from
    pub fn products(&self) -> Vec<(&'static str, &str)> {
        let mut products = Vec::new();

        products.extend(self.frames.iter().map(|r| ("frames", r.product.as_str())));
        products.extend(
            self.handlebars
                .iter()
                .map(|r| ("handlebars", r.product.as_str())),
        );
        products.extend(self.wheels.iter().map(|r| ("wheels", r.product.as_str())));
        products.push(("brake-levers", self.brake_levers.hydraulic_disc.as_str()));
        products.push(("brake-levers", self.brake_levers.cable.as_str()));

        for (table, rules) in self.gear_tables() {
            products.extend(rules.iter().map(|r| (table, r.product.as_str())));
        }

        products
    }

    /// Every gear-keyed table with its configuration name
    pub fn gear_tables(&self) -> [(&'static str, &[GearRule]); 11] {
        [
            ("trigger-shifters", self.trigger_shifters.as_slice()),
            ("mechanical-sti", self.mechanical_sti.as_slice()),
            ("hydraulic-sti", self.hydraulic_sti.as_slice()),
            ("hydraulic-sti-left", self.hydraulic_sti_left.as_slice()),
            ("brake-calipers.rim", self.brake_calipers.rim.as_slice()),
            (
                "brake-calipers.mechanical-disc",
                self.brake_calipers.mechanical_disc.as_slice(),
            ),
            ("chainrings", self.chainrings.as_slice()),
            ("cassettes", self.cassettes.as_slice()),
            ("chains", self.chains.as_slice()),
            ("rear-derailleurs", self.rear_derailleurs.as_slice()),
            ("front-derailleurs", self.front_derailleurs.as_slice()),
        ]
    }
}
