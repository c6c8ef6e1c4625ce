//! Component resolver
//!
//! Pure decision logic mapping one component of a bike specification to the
//! vendor product page(s) that supply it. Rules come from the catalog in the
//! configuration; nothing here touches the network.
//!
//! Shifters and chainrings may demand a different rear gear count than the
//! specification carries. They return the correction as a [`SpecPatch`]
//! instead of changing the specification, and the orchestrator applies it
//! before any other component is resolved.

mod drivetrain;
mod frameset;
mod groupset;

use crate::bike::{BikeSpecification, SpecPatch};
use crate::catalog::{lookup_gear, parse_product, GearRule};
use crate::config::Config;
use crate::url::join_product_url;
use crate::ResolveError;
use std::fmt;

/// A component of the bill, each resolved independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Frame,
    Handlebars,
    Wheels,
    Shifters,
    BrakeCalipers,
    Chainring,
    Cassette,
    Chain,
    RearDerailleur,
    FrontDerailleur,
}

impl Component {
    /// Every component in bill order
    pub const ALL: [Component; 10] = [
        Component::Frame,
        Component::Handlebars,
        Component::Wheels,
        Component::Shifters,
        Component::BrakeCalipers,
        Component::Chainring,
        Component::Cassette,
        Component::Chain,
        Component::RearDerailleur,
        Component::FrontDerailleur,
    ];

    /// Components that may patch the specification, in the order they run
    pub const PRE_PASS: [Component; 2] = [Component::Shifters, Component::Chainring];

    /// Human-readable label used on the bill
    pub fn label(&self) -> &'static str {
        match self {
            Component::Frame => "Frame",
            Component::Handlebars => "Handlebars",
            Component::Wheels => "Wheel Set",
            Component::Shifters => "Shifters",
            Component::BrakeCalipers => "Brake Calipers",
            Component::Chainring => "Chainring",
            Component::Cassette => "Cassette",
            Component::Chain => "Chain",
            Component::RearDerailleur => "Rear Derailleur",
            Component::FrontDerailleur => "Front Derailleur",
        }
    }

    /// Returns true if the component runs in the sequential pre-pass
    pub fn is_pre_pass(&self) -> bool {
        Self::PRE_PASS.contains(self)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A product page chosen for one line of the bill
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartRef {
    /// Line label (e.g. "Right Hydraulic Shifter")
    pub label: String,
    /// Vendor product page
    pub url: String,
}

/// Outcome of resolving one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The component maps to these product pages
    Resolved(Vec<PartRef>),
    /// The component maps to these pages once the patch is applied
    Patched(Vec<PartRef>, SpecPatch),
    /// No rule covers the specification
    Unresolved(ResolveError),
    /// The component is not needed for this build
    BenignOmission(String),
}

impl Resolution {
    /// The chosen pages, empty unless resolved
    pub fn parts(&self) -> &[PartRef] {
        match self {
            Resolution::Resolved(parts) | Resolution::Patched(parts, _) => parts,
            Resolution::Unresolved(_) | Resolution::BenignOmission(_) => &[],
        }
    }

    /// The patch to apply before fan-out, if any
    pub fn patch(&self) -> Option<&SpecPatch> {
        match self {
            Resolution::Patched(_, patch) => Some(patch),
            _ => None,
        }
    }
}

/// Resolves one component of a specification to product pages
///
/// # Arguments
///
/// * `component` - The component to resolve
/// * `spec` - The bike specification (read only)
/// * `config` - Configuration holding the catalog and vendor base URLs
///
/// # Returns
///
/// A [`Resolution`]; unresolved components are values, never panics or errors
///
/// # Example
///
/// ```
/// use bike_parts::bike::parse_bike_spec;
/// use bike_parts::config::default_config;
/// use bike_parts::{resolve, Component, Resolution};
///
/// let config = default_config().unwrap();
/// let spec = parse_bike_spec(r#"
///     frame-style = "gravel"
///     brake-type = "mechanical-disc"
///     shifter-style = "sti"
///     handlebar-type = "flare"
///     wheel-preference = "premium"
///     front-gears = 2
///     rear-gears = 10
/// "#).unwrap();
///
/// match resolve(Component::Chain, &spec, &config) {
///     Resolution::Resolved(parts) => {
///         assert_eq!(parts[0].url, "https://www.wiggle.com/p/shimano-hg95-10-speed-chain");
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn resolve(component: Component, spec: &BikeSpecification, config: &Config) -> Resolution {
    let resolution = match component {
        Component::Frame => frameset::resolve_frame(spec, config),
        Component::Handlebars => frameset::resolve_handlebars(spec, config),
        Component::Wheels => frameset::resolve_wheels(spec, config),
        Component::Shifters => groupset::resolve_shifters(spec, config),
        Component::BrakeCalipers => drivetrain::resolve_brake_calipers(spec, config),
        Component::Chainring => drivetrain::resolve_chainring(spec, config),
        Component::Cassette => drivetrain::resolve_cassette(spec, config),
        Component::Chain => drivetrain::resolve_chain(spec, config),
        Component::RearDerailleur => drivetrain::resolve_rear_derailleur(spec, config),
        Component::FrontDerailleur => drivetrain::resolve_front_derailleur(spec, config),
    };

    match &resolution {
        Resolution::Unresolved(reason) => {
            tracing::warn!("{} unresolved: {}", component, reason);
        }
        Resolution::BenignOmission(reason) => {
            tracing::info!("{} omitted: {}", component, reason);
        }
        _ => {}
    }

    resolution
}

/// Turns a `vendor:path` catalog product into a page URL
pub(crate) fn product_url(config: &Config, product: &str) -> Result<String, ResolveError> {
    let product_ref = parse_product(product)?;
    let vendor = config
        .vendor(product_ref.vendor)
        .ok_or_else(|| ResolveError::UnknownVendor {
            vendor: product_ref.vendor.to_string(),
            product: product.to_string(),
        })?;

    Ok(join_product_url(&vendor.base_url, product_ref.path))
}

/// Builds a single-line [`PartRef`] for a catalog product
pub(crate) fn part_ref(config: &Config, label: &str, product: &str) -> Result<PartRef, ResolveError> {
    Ok(PartRef {
        label: label.to_string(),
        url: product_url(config, product)?,
    })
}

/// Finds the gear rule for the specification's current gear counts
pub(crate) fn gear_rule<'a>(
    table: &'static str,
    rules: &'a [GearRule],
    spec: &BikeSpecification,
) -> Result<&'a GearRule, ResolveError> {
    lookup_gear(rules, spec.front_gears, spec.rear_gears).ok_or(ResolveError::NoRule {
        table,
        front: spec.front_gears,
        rear: spec.rear_gears,
    })
}

/// Wraps resolved parts, attaching a patch when the rule clamps rear gears
pub(crate) fn with_clamp(
    parts: Vec<PartRef>,
    rule: &GearRule,
    spec: &BikeSpecification,
    component: Component,
) -> Resolution {
    match rule.clamp_rear {
        Some(rear_gears) if rear_gears != spec.rear_gears => Resolution::Patched(
            parts,
            SpecPatch {
                rear_gears,
                reason: format!(
                    "{} for {} front gears only supports {} rear gears",
                    component, spec.front_gears, rear_gears
                ),
            },
        ),
        _ => Resolution::Resolved(parts),
    }
}

/// Collapses a resolver result into a [`Resolution`]
pub(crate) fn settle(result: Result<Resolution, ResolveError>) -> Resolution {
    result.unwrap_or_else(Resolution::Unresolved)
}
