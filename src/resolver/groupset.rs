//! Shifter and brake lever rules
//!
//! Drop-bar builds with STI levers combine shifting and braking in one
//! product. Trigger builds pair a trigger shifter with separate levers.

use super::{gear_rule, part_ref, settle, with_clamp, Component, PartRef, Resolution};
use crate::bike::{BikeSpecification, BrakeType, ShifterStyle};
use crate::catalog::lookup_gear;
use crate::config::Config;
use crate::ResolveError;

pub(super) fn resolve_shifters(spec: &BikeSpecification, config: &Config) -> Resolution {
    settle(match (spec.shifter_style, spec.brake_type) {
        (ShifterStyle::Trigger, _) => trigger_and_levers(spec, config),
        (ShifterStyle::Sti, BrakeType::HydraulicDisc) => hydraulic_sti(spec, config),
        (ShifterStyle::Sti, BrakeType::Rim | BrakeType::MechanicalDisc) => {
            mechanical_sti(spec, config)
        }
    })
}

fn trigger_and_levers(spec: &BikeSpecification, config: &Config) -> Result<Resolution, ResolveError> {
    let catalog = &config.catalog;
    let shifter = gear_rule("trigger-shifters", &catalog.trigger_shifters, spec)?;

    let mut parts = vec![part_ref(config, "Trigger Shifter", &shifter.product)?];

    if spec.brake_type == BrakeType::HydraulicDisc {
        let levers = &catalog.brake_levers.hydraulic_disc;
        parts.push(part_ref(config, "Left Brake Lever", levers)?);
        parts.push(part_ref(config, "Right Brake Lever", levers)?);
    } else {
        parts.push(part_ref(config, "Brake Levers", &catalog.brake_levers.cable)?);
    }

    Ok(Resolution::Resolved(parts))
}

fn mechanical_sti(spec: &BikeSpecification, config: &Config) -> Result<Resolution, ResolveError> {
    let rule = gear_rule("mechanical-sti", &config.catalog.mechanical_sti, spec)?;
    let parts = vec![part_ref(config, "STI Shifters", &rule.product)?];

    Ok(with_clamp(parts, rule, spec, Component::Shifters))
}

/// Right lever by rear gears; the left lever is the same product unless a
/// left-lever rule overrides it (1x builds have nothing to shift on the left)
fn hydraulic_sti(spec: &BikeSpecification, config: &Config) -> Result<Resolution, ResolveError> {
    let catalog = &config.catalog;
    let right = gear_rule("hydraulic-sti", &catalog.hydraulic_sti, spec)?;

    let left_product = match lookup_gear(&catalog.hydraulic_sti_left, spec.front_gears, spec.rear_gears) {
        Some(left) => {
            if let Some(note) = &left.note {
                tracing::info!("Left Hydraulic Shifter: {}", note);
            }
            &left.product
        }
        None => &right.product,
    };

    let parts: Vec<PartRef> = vec![
        part_ref(config, "Right Hydraulic Shifter", &right.product)?,
        part_ref(config, "Left Hydraulic Shifter", left_product)?,
    ];

    Ok(with_clamp(parts, right, spec, Component::Shifters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use crate::resolver::test_support::{road_spec, single_speed_spec};

    fn labelled(resolution: &Resolution) -> Vec<(String, String)> {
        resolution
            .parts()
            .iter()
            .map(|p| (p.label.clone(), p.url.clone()))
            .collect()
    }

    #[test]
    fn test_trigger_shifter_by_rear_gears() {
        let config = default_config().unwrap();
        let cases = [
            (10, "https://www.wiggle.com/p/shimano-deore-m6000-10-speed-trigger-shifter"),
            (11, "https://www.wiggle.com/p/shimano-xt-m8000-11-speed-trigger-shifter"),
            (9, "https://www.chainreactioncycles.com/p/shimano-altus-m2010-9-speed-shifter"),
            (12, "https://www.chainreactioncycles.com/p/shimano-altus-m2010-9-speed-shifter"),
        ];

        for (rear, expected) in cases {
            let spec = BikeSpecification {
                shifter_style: ShifterStyle::Trigger,
                brake_type: BrakeType::Rim,
                rear_gears: rear,
                ..road_spec()
            };
            let resolution = resolve_shifters(&spec, &config);
            let parts = labelled(&resolution);

            assert_eq!(parts[0], ("Trigger Shifter".to_string(), expected.to_string()));
            assert_eq!(parts[1].0, "Brake Levers");
            assert_eq!(parts.len(), 2);
        }
    }

    #[test]
    fn test_trigger_with_hydraulic_brakes_gets_linked_levers() {
        let config = default_config().unwrap();
        let spec = BikeSpecification {
            shifter_style: ShifterStyle::Trigger,
            brake_type: BrakeType::HydraulicDisc,
            ..road_spec()
        };

        let parts = labelled(&resolve_shifters(&spec, &config));
        let lever = "https://www.wiggle.com/p/shimano-grx-812-sub-brake-lever";

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1], ("Left Brake Lever".to_string(), lever.to_string()));
        assert_eq!(parts[2], ("Right Brake Lever".to_string(), lever.to_string()));
    }

    #[test]
    fn test_single_speed_trigger_build() {
        let config = default_config().unwrap();
        let resolution = resolve_shifters(&single_speed_spec(), &config);

        let parts = labelled(&resolution);
        assert_eq!(
            parts[1].1,
            "https://www.wiggle.com/p/shimano-deore-t610-v-brake-levers"
        );
        assert!(resolution.patch().is_none());
    }

    #[test]
    fn test_mechanical_sti_triple_nine_is_direct() {
        let config = default_config().unwrap();
        let spec = BikeSpecification {
            front_gears: 3,
            rear_gears: 9,
            ..road_spec()
        };

        let resolution = resolve_shifters(&spec, &config);
        assert!(matches!(resolution, Resolution::Resolved(_)));
        assert_eq!(
            resolution.parts()[0].url,
            "https://www.chainreactioncycles.com/p/microshift-r9-3x9-speed-dual-control-levers"
        );
    }

    #[test]
    fn test_mechanical_sti_triple_clamps_to_ten() {
        let config = default_config().unwrap();

        for rear in [8, 11, 12] {
            let spec = BikeSpecification {
                front_gears: 3,
                rear_gears: rear,
                ..road_spec()
            };

            let resolution = resolve_shifters(&spec, &config);
            let patch = resolution.patch().expect("triple STI should clamp");

            assert_eq!(patch.rear_gears, 10);
            assert_eq!(
                resolution.parts()[0].url,
                "https://www.wiggle.com/p/shimano-tiagra-4700-3x10-speed-lever-set"
            );
        }
    }

    #[test]
    fn test_mechanical_sti_triple_ten_needs_no_patch() {
        let config = default_config().unwrap();
        let spec = BikeSpecification {
            front_gears: 3,
            rear_gears: 10,
            ..road_spec()
        };

        assert!(matches!(resolve_shifters(&spec, &config), Resolution::Resolved(_)));
    }

    #[test]
    fn test_rim_sti_uses_mechanical_table() {
        let config = default_config().unwrap();
        let spec = BikeSpecification {
            brake_type: BrakeType::Rim,
            rear_gears: 11,
            ..road_spec()
        };

        let parts = labelled(&resolve_shifters(&spec, &config));
        assert_eq!(
            parts,
            vec![(
                "STI Shifters".to_string(),
                "https://www.wiggle.com/p/shimano-105-r7000-11-speed-levers".to_string()
            )]
        );
    }

    #[test]
    fn test_hydraulic_sti_left_matches_right() {
        let config = default_config().unwrap();
        let spec = BikeSpecification {
            brake_type: BrakeType::HydraulicDisc,
            front_gears: 2,
            rear_gears: 11,
            ..road_spec()
        };

        let parts = labelled(&resolve_shifters(&spec, &config));
        let link = "https://www.chainreactioncycles.com/p/shimano-105-r7025-hydraulic-disc-brake";

        assert_eq!(parts[0], ("Right Hydraulic Shifter".to_string(), link.to_string()));
        assert_eq!(parts[1], ("Left Hydraulic Shifter".to_string(), link.to_string()));
    }

    #[test]
    fn test_hydraulic_sti_single_front_swaps_left_lever() {
        let config = default_config().unwrap();
        let spec = BikeSpecification {
            brake_type: BrakeType::HydraulicDisc,
            front_gears: 1,
            rear_gears: 12,
            ..road_spec()
        };

        let parts = labelled(&resolve_shifters(&spec, &config));

        assert_eq!(
            parts[0].1,
            "https://www.wiggle.com/p/shimano-105-r7170-di2-hydraulic-disc-brake"
        );
        assert_eq!(
            parts[1].1,
            "https://www.chainreactioncycles.com/p/shimano-grx-820-hydraulic-drop-bar-brake-lever"
        );
    }

    #[test]
    fn test_hydraulic_sti_fallback_rule() {
        let config = default_config().unwrap();
        let spec = BikeSpecification {
            brake_type: BrakeType::HydraulicDisc,
            rear_gears: 9,
            ..road_spec()
        };

        let resolution = resolve_shifters(&spec, &config);
        assert_eq!(
            resolution.parts()[0].url,
            "https://www.wiggle.com/p/clarks-m2-hydraulic-disc-brake-with-rotor"
        );
    }

    #[test]
    fn test_empty_sti_table_is_unresolved() {
        let mut config = default_config().unwrap();
        config.catalog.mechanical_sti.clear();

        assert!(matches!(
            resolve_shifters(&road_spec(), &config),
            Resolution::Unresolved(ResolveError::NoRule {
                table: "mechanical-sti",
                front: 2,
                rear: 10
            })
        ));
    }
}
