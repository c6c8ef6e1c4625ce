//! Orchestrator - pre-pass, fan-out and join for one run

use crate::bike::{BikeSpecification, GroupsetBrand, SpecPatch};
use crate::bom::{aggregate, BillOfMaterials, CurrencyLocale, Omission, Outcome, Part, ResolutionError, Stage};
use crate::config::Config;
use crate::extractor::{build_http_client, extract};
use crate::resolver::{resolve, Component, PartRef, Resolution};
use crate::url::profile_for_url;
use crate::{ExtractError, PageError};
use reqwest::Client;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Runs resolutions against one configuration with a shared HTTP client
pub struct Orchestrator {
    config: Arc<Config>,
    client: Client,
    locale: CurrencyLocale,
}

/// What a run would fetch, without touching the network
#[derive(Debug, Clone)]
pub struct ResolutionPlan {
    /// The specification after pre-pass patches
    pub spec: BikeSpecification,
    /// Patches applied by the pre-pass, in order
    pub patches: Vec<SpecPatch>,
    /// Every component with its resolution, in bill order
    pub resolutions: Vec<(Component, Resolution)>,
}

impl ResolutionPlan {
    /// Distinct product page URLs the run would fetch
    pub fn urls(&self) -> BTreeSet<&str> {
        self.resolutions
            .iter()
            .flat_map(|(_, resolution)| resolution.parts())
            .map(|part| part.url.as_str())
            .collect()
    }

    /// Number of components without a catalog rule
    pub fn unresolved_count(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|(_, r)| matches!(r, Resolution::Unresolved(_)))
            .count()
    }
}

/// A finished run with the specification it resolved against
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    /// The specification after pre-pass patches
    pub spec: BikeSpecification,
    /// Patches applied by the pre-pass, in order
    pub patches: Vec<SpecPatch>,
    pub bill: BillOfMaterials,
}

/// One position on the bill, filled when its task finishes
struct Slot {
    label: String,
    outcomes: Option<Vec<Outcome>>,
}

impl Orchestrator {
    /// Creates a new orchestrator instance
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to resolve specifications
    /// * `Err(BikeError)` - The HTTP client could not be built
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = build_http_client(&config.fetcher)?;
        Ok(Self::with_client(config, client))
    }

    /// Creates an orchestrator around an existing HTTP client
    pub fn with_client(config: Config, client: Client) -> Self {
        let locale = CurrencyLocale::from_tag(&config.fetcher.locale).unwrap_or_else(|| {
            tracing::warn!(
                "Unsupported locale '{}', formatting totals as {}",
                config.fetcher.locale,
                CurrencyLocale::EN_GB.tag
            );
            CurrencyLocale::EN_GB
        });

        Self {
            config: Arc::new(config),
            client,
            locale,
        }
    }

    /// The configuration this orchestrator resolves against
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves every component without fetching anything
    ///
    /// Runs the same pre-pass as [`Orchestrator::resolve`], so the plan shows
    /// the pages a real run would fetch.
    pub fn plan(&self, mut spec: BikeSpecification) -> ResolutionPlan {
        let (pre_resolved, patches) = self.pre_pass(&mut spec);

        let resolutions = Component::ALL
            .into_iter()
            .map(|component| {
                let resolution = pre_resolved
                    .iter()
                    .find(|(c, _)| *c == component)
                    .map(|(_, r)| r.clone())
                    .unwrap_or_else(|| resolve(component, &spec, &self.config));
                (component, resolution)
            })
            .collect();

        ResolutionPlan {
            spec,
            patches,
            resolutions,
        }
    }

    /// Resolves a specification into a priced bill of materials
    ///
    /// # Run Phases
    ///
    /// 1. Pre-pass: shifters then chainring, applying any gear clamp
    ///    to the specification before the next component is resolved
    /// 2. The specification is frozen behind an `Arc`
    /// 3. Fan-out: one task per remaining component, plus one fetch task per
    ///    page chosen in the pre-pass
    /// 4. Join: every task is awaited; a failed task becomes an error line
    /// 5. Aggregate into the bill
    ///
    /// Component failures never abort the run; they are reported on the bill.
    pub async fn resolve(&self, spec: BikeSpecification) -> BillOfMaterials {
        self.run(spec).await.bill
    }

    /// Same as [`Orchestrator::resolve`], also returning the patched
    /// specification and the patches applied
    pub async fn run(&self, mut spec: BikeSpecification) -> ResolvedRun {
        let start_time = Instant::now();
        tracing::info!("Resolving parts for {}", spec);

        if spec.groupset_brand != GroupsetBrand::Shimano {
            tracing::warn!(
                "Catalog lists Shimano groupsets only, resolving {} build with Shimano parts",
                spec.groupset_brand
            );
        }

        let (pre_resolved, patches) = self.pre_pass(&mut spec);
        let spec = Arc::new(spec);

        let mut slots: Vec<Slot> = Vec::new();
        let mut tasks: JoinSet<(usize, Vec<Outcome>)> = JoinSet::new();

        for component in Component::ALL {
            let pre = pre_resolved.iter().find(|(c, _)| *c == component);

            match pre.map(|(_, resolution)| resolution) {
                Some(Resolution::Resolved(parts)) | Some(Resolution::Patched(parts, _)) => {
                    for part in parts {
                        let slot = push_slot(&mut slots, &part.label, None);
                        let part = part.clone();
                        let config = Arc::clone(&self.config);
                        let client = self.client.clone();

                        tasks.spawn(async move {
                            (slot, vec![fetch_part(&client, &config, part).await])
                        });
                    }
                }
                Some(other) => {
                    let outcomes = immediate_outcomes(component, other);
                    push_slot(&mut slots, component.label(), Some(outcomes));
                }
                None => {
                    let slot = push_slot(&mut slots, component.label(), None);
                    let config = Arc::clone(&self.config);
                    let client = self.client.clone();
                    let spec = Arc::clone(&spec);

                    tasks.spawn(async move {
                        (slot, resolve_and_fetch(component, &spec, &config, &client).await)
                    });
                }
            }
        }

        tracing::debug!("Spawned {} resolution tasks", tasks.len());

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, outcomes)) => slots[slot].outcomes = Some(outcomes),
                Err(e) => tracing::error!("Resolution task failed: {}", e),
            }
        }

        let bill = aggregate(settle_slots(slots), &self.locale);

        tracing::info!(
            "Resolved {} parts with {} errors in {:.2}s",
            bill.parts.len(),
            bill.errors.len(),
            start_time.elapsed().as_secs_f64()
        );

        ResolvedRun {
            spec: BikeSpecification::clone(&spec),
            patches,
            bill,
        }
    }

    /// Resolves the clamp-capable components in order, patching `spec`
    fn pre_pass(
        &self,
        spec: &mut BikeSpecification,
    ) -> (Vec<(Component, Resolution)>, Vec<SpecPatch>) {
        let mut resolutions = Vec::new();
        let mut patches = Vec::new();

        for component in Component::PRE_PASS {
            let resolution = resolve(component, spec, &self.config);

            if let Some(patch) = resolution.patch() {
                if spec.apply(patch) {
                    patches.push(patch.clone());
                    refresh_earlier(&mut resolutions, spec, &self.config);
                }
            }

            resolutions.push((component, resolution));
        }

        (resolutions, patches)
    }
}

/// Re-resolves pre-pass components chosen before the latest patch so they
/// match the patched gear count
fn refresh_earlier(
    resolutions: &mut [(Component, Resolution)],
    spec: &BikeSpecification,
    config: &Config,
) {
    for (component, resolution) in resolutions.iter_mut() {
        let refreshed = match resolve(*component, spec, config) {
            Resolution::Patched(parts, patch) => {
                tracing::warn!(
                    "{} asked for {} rear gears after a later clamp, ignoring",
                    component,
                    patch.rear_gears
                );
                Resolution::Resolved(parts)
            }
            other => other,
        };

        if refreshed.parts() != resolution.parts() {
            tracing::info!(
                "{} re-resolved for {} rear gears",
                component,
                spec.rear_gears
            );
        }
        *resolution = refreshed;
    }
}

fn push_slot(slots: &mut Vec<Slot>, label: &str, outcomes: Option<Vec<Outcome>>) -> usize {
    slots.push(Slot {
        label: label.to_string(),
        outcomes,
    });
    slots.len() - 1
}

/// Outcomes for a resolution that needs no fetching
fn immediate_outcomes(component: Component, resolution: &Resolution) -> Vec<Outcome> {
    match resolution {
        Resolution::Unresolved(reason) => vec![Outcome::Error(ResolutionError {
            component: component.label().to_string(),
            stage: Stage::Resolve,
            detail: reason.to_string(),
            url: None,
        })],
        Resolution::BenignOmission(reason) => vec![Outcome::Omitted(Omission {
            component: component.label().to_string(),
            reason: reason.clone(),
        })],
        Resolution::Resolved(_) | Resolution::Patched(_, _) => Vec::new(),
    }
}

/// Body of a fan-out task: resolve against the frozen spec, then fetch
async fn resolve_and_fetch(
    component: Component,
    spec: &BikeSpecification,
    config: &Config,
    client: &Client,
) -> Vec<Outcome> {
    let resolution = resolve(component, spec, config);

    let parts = match resolution {
        Resolution::Resolved(parts) => parts,
        Resolution::Patched(parts, patch) => {
            tracing::warn!(
                "{} asked for {} rear gears after the specification was frozen, ignoring",
                component,
                patch.rear_gears
            );
            parts
        }
        other => return immediate_outcomes(component, &other),
    };

    let mut outcomes = Vec::with_capacity(parts.len());
    for part in parts {
        outcomes.push(fetch_part(client, config, part).await);
    }
    outcomes
}

/// Fetches and extracts one product page into a bill outcome
async fn fetch_part(client: &Client, config: &Config, part: PartRef) -> Outcome {
    let result = match profile_for_url(&part.url, config) {
        Some(profile) => extract(client, &part.url, profile).await,
        None => Err(PageError::Extract(ExtractError::NoProfile {
            url: part.url.clone(),
        })),
    };

    match result {
        Ok(page) => Outcome::Part(Part {
            label: part.label,
            name: page.name,
            price: page.price,
            url: part.url,
        }),
        Err(e) => {
            let stage = match e {
                PageError::Fetch(_) => Stage::Fetch,
                PageError::Extract(_) => Stage::Extract,
            };
            tracing::warn!("{} failed at {}: {}", part.label, stage, e);

            Outcome::Error(ResolutionError {
                component: part.label,
                stage,
                detail: e.to_string(),
                url: Some(part.url),
            })
        }
    }
}

/// Flattens slots in bill order; a slot whose task never reported becomes
/// an error line
fn settle_slots(slots: Vec<Slot>) -> Vec<Outcome> {
    slots
        .into_iter()
        .flat_map(|slot| {
            slot.outcomes.unwrap_or_else(|| {
                vec![Outcome::Error(ResolutionError {
                    component: slot.label,
                    stage: Stage::Resolve,
                    detail: "resolution task did not complete".to_string(),
                    url: None,
                })]
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bike::{BrakeType, FrameStyle, HandlebarType, ShifterStyle, WheelPreference};
    use crate::config::default_config;

    fn triple_spec() -> BikeSpecification {
        BikeSpecification {
            frame_style: FrameStyle::Tour,
            disc_brake_compatible: true,
            brake_type: BrakeType::MechanicalDisc,
            shifter_style: ShifterStyle::Sti,
            handlebar_type: HandlebarType::Drops,
            wheel_preference: WheelPreference::Premium,
            groupset_brand: GroupsetBrand::Shimano,
            front_gears: 3,
            rear_gears: 11,
        }
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(default_config().unwrap()).unwrap()
    }

    #[test]
    fn test_plan_clamps_before_dependent_components() {
        let plan = orchestrator().plan(triple_spec());

        assert_eq!(plan.spec.rear_gears, 10);
        assert_eq!(plan.patches.len(), 1);
        assert_eq!(plan.unresolved_count(), 0);

        let urls = plan.urls();
        assert!(urls.contains(
            "https://www.chainreactioncycles.com/p/shimano-tiagra-hg500-10-speed-road-cassette-5360107149"
        ));
        assert!(urls.contains("https://www.wiggle.com/p/shimano-hg95-10-speed-chain"));
        assert!(urls.contains("https://www.wiggle.com/p/shimano-tiagra-4700-10-speed-rear-derailleur-gs"));
    }

    #[test]
    fn test_plan_chainring_sees_shifter_clamp() {
        let plan = orchestrator().plan(triple_spec());

        let (_, chainring) = plan
            .resolutions
            .iter()
            .find(|(c, _)| *c == Component::Chainring)
            .unwrap();

        // the shifter clamp already moved the spec to 10, so no second patch
        assert!(matches!(chainring, Resolution::Resolved(_)));
    }

    #[test]
    fn test_trigger_shifter_follows_chainring_clamp() {
        let spec = BikeSpecification {
            shifter_style: ShifterStyle::Trigger,
            handlebar_type: HandlebarType::Flat,
            ..triple_spec()
        };
        let plan = orchestrator().plan(spec);

        assert_eq!(plan.spec.rear_gears, 10);
        assert_eq!(plan.patches.len(), 1);

        let (_, shifters) = plan
            .resolutions
            .iter()
            .find(|(c, _)| *c == Component::Shifters)
            .unwrap();
        assert!(shifters
            .parts()
            .iter()
            .all(|part| !part.url.contains("11-speed")));
        assert!(shifters
            .parts()
            .iter()
            .any(|part| part.url.contains("m6000-10-speed-trigger-shifter")));
    }

    #[test]
    fn test_plan_is_idempotent() {
        let orchestrator = orchestrator();
        let first = orchestrator.plan(triple_spec());
        let second = orchestrator.plan(triple_spec());

        assert_eq!(first.urls(), second.urls());
    }

    #[test]
    fn test_plan_lists_every_component_in_order() {
        let plan = orchestrator().plan(triple_spec());
        let components: Vec<Component> = plan.resolutions.iter().map(|(c, _)| *c).collect();
        assert_eq!(components, Component::ALL.to_vec());
    }

    #[test]
    fn test_settle_slots_reports_missing_tasks() {
        let slots = vec![
            Slot {
                label: "Frame".to_string(),
                outcomes: Some(vec![]),
            },
            Slot {
                label: "Chain".to_string(),
                outcomes: None,
            },
        ];

        let outcomes = settle_slots(slots);
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            &outcomes[0],
            Outcome::Error(ResolutionError { component, .. }) if component == "Chain"
        ));
    }

    #[test]
    fn test_immediate_outcomes() {
        let omitted = immediate_outcomes(
            Component::BrakeCalipers,
            &Resolution::BenignOmission("hydraulic".to_string()),
        );
        assert!(matches!(&omitted[0], Outcome::Omitted(_)));

        let unresolved = immediate_outcomes(
            Component::Chainring,
            &Resolution::Unresolved(crate::ResolveError::NoRule {
                table: "chainrings",
                front: 2,
                rear: 1,
            }),
        );
        assert!(matches!(
            &unresolved[0],
            Outcome::Error(ResolutionError { stage: Stage::Resolve, .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_vendor_host_is_extract_error() {
        let config = default_config().unwrap();
        let client = build_http_client(&config.fetcher).unwrap();
        let part = PartRef {
            label: "Frame".to_string(),
            url: "http://127.0.0.1:9/frame".to_string(),
        };

        let outcome = fetch_part(&client, &config, part).await;
        assert!(matches!(
            outcome,
            Outcome::Error(ResolutionError { stage: Stage::Extract, .. })
        ));
    }
}
