//! Brake caliper and drivetrain rules, keyed by gear counts

use super::{gear_rule, part_ref, settle, with_clamp, Component, Resolution};
use crate::bike::BikeSpecification;
use crate::catalog::GearRule;
use crate::config::Config;
use crate::ResolveError;

/// Front and rear calipers share one product. Hydraulic disc calipers ship
/// with the levers, so there is nothing to add.
pub(super) fn resolve_brake_calipers(spec: &BikeSpecification, config: &Config) -> Resolution {
    let Some(table) = config.catalog.brake_calipers.table(spec.brake_type) else {
        return Resolution::BenignOmission(format!(
            "{} calipers are supplied with the levers",
            spec.brake_type
        ));
    };

    settle(calipers(table, spec, config))
}

fn calipers(
    table: &[GearRule],
    spec: &BikeSpecification,
    config: &Config,
) -> Result<Resolution, ResolveError> {
    let rule = gear_rule("brake-calipers", table, spec)?;
    Ok(Resolution::Resolved(vec![
        part_ref(config, "Front Brake Caliper", &rule.product)?,
        part_ref(config, "Rear Brake Caliper", &rule.product)?,
    ]))
}

pub(super) fn resolve_chainring(spec: &BikeSpecification, config: &Config) -> Resolution {
    settle(chainring(spec, config))
}

fn chainring(spec: &BikeSpecification, config: &Config) -> Result<Resolution, ResolveError> {
    let rule = gear_rule("chainrings", &config.catalog.chainrings, spec)?;
    let parts = vec![part_ref(config, Component::Chainring.label(), &rule.product)?];
    Ok(with_clamp(parts, rule, spec, Component::Chainring))
}

pub(super) fn resolve_cassette(spec: &BikeSpecification, config: &Config) -> Resolution {
    single_gear_part(Component::Cassette, "cassettes", &config.catalog.cassettes, spec, config)
}

pub(super) fn resolve_chain(spec: &BikeSpecification, config: &Config) -> Resolution {
    single_gear_part(Component::Chain, "chains", &config.catalog.chains, spec, config)
}

pub(super) fn resolve_rear_derailleur(spec: &BikeSpecification, config: &Config) -> Resolution {
    if spec.is_single_speed_drivetrain() {
        return Resolution::BenignOmission(
            "single-speed drivetrain has no rear derailleur".to_string(),
        );
    }

    single_gear_part(
        Component::RearDerailleur,
        "rear-derailleurs",
        &config.catalog.rear_derailleurs,
        spec,
        config,
    )
}

/// A 1x front resolves to the chain catcher rule rather than an omission
pub(super) fn resolve_front_derailleur(spec: &BikeSpecification, config: &Config) -> Resolution {
    single_gear_part(
        Component::FrontDerailleur,
        "front-derailleurs",
        &config.catalog.front_derailleurs,
        spec,
        config,
    )
}

fn single_gear_part(
    component: Component,
    table: &'static str,
    rules: &[GearRule],
    spec: &BikeSpecification,
    config: &Config,
) -> Resolution {
    settle(
        gear_rule(table, rules, spec)
            .and_then(|rule| {
                if let Some(note) = &rule.note {
                    tracing::info!("{}: {}", component, note);
                }
                part_ref(config, component.label(), &rule.product)
            })
            .map(|part| Resolution::Resolved(vec![part])),
    )
}
