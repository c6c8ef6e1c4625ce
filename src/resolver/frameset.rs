//! Frame, handlebar and wheel rules

use super::{part_ref, settle, Component, Resolution};
use crate::bike::{BikeSpecification, BrakeType, FrameStyle};
use crate::config::Config;
use crate::ResolveError;

/// Frame by style and disc compatibility (gravel and single-speed frames
/// carry one rule that ignores the disc flag)
pub(super) fn resolve_frame(spec: &BikeSpecification, config: &Config) -> Resolution {
    let rule = config.catalog.frames.iter().find(|rule| {
        rule.style == spec.frame_style
            && rule.disc.map_or(true, |disc| disc == spec.disc_brake_compatible)
    });

    settle(match rule {
        Some(rule) => part_ref(config, Component::Frame.label(), &rule.product)
            .map(|part| Resolution::Resolved(vec![part])),
        None => Err(ResolveError::NoEntry {
            table: "frames",
            key: format!(
                "{} (disc: {})",
                spec.frame_style, spec.disc_brake_compatible
            ),
        }),
    })
}

pub(super) fn resolve_handlebars(spec: &BikeSpecification, config: &Config) -> Resolution {
    let rule = config
        .catalog
        .handlebars
        .iter()
        .find(|rule| rule.handlebar == spec.handlebar_type);

    settle(match rule {
        Some(rule) => part_ref(config, Component::Handlebars.label(), &rule.product)
            .map(|part| Resolution::Resolved(vec![part])),
        None => Err(ResolveError::NoEntry {
            table: "handlebars",
            key: spec.handlebar_type.to_string(),
        }),
    })
}

/// Single-speed frames take track wheels; everything else is chosen by
/// brake surface, then preference
pub(super) fn resolve_wheels(spec: &BikeSpecification, config: &Config) -> Resolution {
    let single_speed = spec.frame_style == FrameStyle::SingleSpeed;
    let rim_brake = spec.brake_type == BrakeType::Rim;

    let rule = config.catalog.wheels.iter().find(|rule| {
        rule.single_speed == single_speed
            && rule.preference == spec.wheel_preference
            && (single_speed || rule.rim_brake.map_or(true, |rim| rim == rim_brake))
    });

    settle(match rule {
        Some(rule) => part_ref(config, Component::Wheels.label(), &rule.product)
            .map(|part| Resolution::Resolved(vec![part])),
        None => Err(ResolveError::NoEntry {
            table: "wheels",
            key: format!(
                "{} (single-speed: {}, rim-brake: {})",
                spec.wheel_preference, single_speed, rim_brake
            ),
        }),
    })
}
