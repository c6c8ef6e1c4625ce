//! Integration tests for part resolution
//!
//! These tests use wiremock to stand up one mock server per vendor and run
//! the full pre-pass, fan-out and aggregation cycle end-to-end.

use bike_parts::bike::parse_bike_spec;
use bike_parts::bom::Stage;
use bike_parts::config::{default_config, Config};
use bike_parts::{resolve_parts_for_specification, BikeSpecification, Orchestrator};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Serves every product path of one vendor using that vendor's page markup
#[derive(Clone)]
struct VendorSite {
    vendor: String,
    prices: HashMap<String, String>,
    overrides: HashMap<String, ResponseTemplate>,
    delays: HashMap<String, Duration>,
}

impl VendorSite {
    fn new(vendor: &str) -> Self {
        Self {
            vendor: vendor.to_string(),
            prices: HashMap::new(),
            overrides: HashMap::new(),
            delays: HashMap::new(),
        }
    }

    /// Delays one product page
    fn slow(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Sets the price text shown on one product page
    fn price(mut self, path: &str, price: &str) -> Self {
        self.prices.insert(path.to_string(), price.to_string());
        self
    }

    /// Replaces the response for one product page
    fn respond(mut self, path: &str, template: ResponseTemplate) -> Self {
        self.overrides.insert(path.to_string(), template);
        self
    }

    fn page(&self, name: &str, price: &str) -> String {
        match self.vendor.as_str() {
            "halo" => format!(
                r#"<div class="productDetails"><h1>{}</h1><div class="priceSummary"><span>{}</span></div></div>"#,
                name, price
            ),
            "dolan" => format!(
                r#"<div class="productBuy"><div class="productPanel"><h1>{}</h1><div class="price"><span class="price">{}</span></div></div></div>"#,
                name, price
            ),
            "genesis" => format!(
                r#"<div class="product-info-main-header"><h1 class="page-title">{}</h1><div class="product-info-price"><div class="price-final_price"><span>{}</span></div></div></div>"#,
                name, price
            ),
            _ => format!(
                r#"<div class="ProductDetail_container__FX6xF"><h1>{}</h1><div class="ProductPrice_productPrice__Fg1nA"><p>{}</p></div></div>"#,
                name, price
            ),
        }
    }
}

impl Respond for VendorSite {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let path = request.url.path();
        if let Some(template) = self.overrides.get(path) {
            return template.clone();
        }

        let name = path.trim_matches('/').replace('-', " ");
        let price = self
            .prices
            .get(path)
            .map(String::as_str)
            .unwrap_or("£10.00");

        let template = ResponseTemplate::new(200)
            .set_body_string(format!("<html><body>{}</body></html>", self.page(&name, price)))
            .insert_header("content-type", "text/html");

        match self.delays.get(path) {
            Some(delay) => template.set_delay(*delay),
            None => template,
        }
    }
}

/// Starts a mock server for every vendor and points the default config at them
async fn start_shop(sites: Vec<VendorSite>) -> (Vec<MockServer>, Config) {
    let mut config = default_config().expect("built-in config is valid");
    config.fetcher.timeout_secs = 2;

    let mut servers = Vec::new();
    for vendor in config.vendors.iter_mut() {
        let site = sites
            .iter()
            .find(|s| s.vendor == vendor.id)
            .cloned()
            .unwrap_or_else(|| VendorSite::new(&vendor.id));

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(site)
            .mount(&server)
            .await;

        let address = server.address();
        vendor.base_url = format!("{}/", server.uri());
        vendor.hosts = vec![format!("{}:{}", address.ip(), address.port())];
        servers.push(server);
    }

    (servers, config)
}

fn spec(toml: &str) -> BikeSpecification {
    parse_bike_spec(toml).expect("Failed to parse test spec")
}

fn single_speed() -> BikeSpecification {
    spec(
        r#"
        frame-style = "single-speed"
        brake-type = "rim"
        shifter-style = "trigger"
        handlebar-type = "bullhorns"
        wheel-preference = "cheap"
        front-gears = 1
        rear-gears = 1
        "#,
    )
}

fn hydraulic_road() -> BikeSpecification {
    spec(
        r#"
        frame-style = "road"
        disc-brake-compatible = true
        brake-type = "hydraulic-disc"
        shifter-style = "sti"
        handlebar-type = "drops"
        wheel-preference = "premium"
        front-gears = 2
        rear-gears = 11
        "#,
    )
}

fn triple_tourer() -> BikeSpecification {
    spec(
        r#"
        frame-style = "tour"
        disc-brake-compatible = true
        brake-type = "mechanical-disc"
        shifter-style = "sti"
        handlebar-type = "drops"
        wheel-preference = "cheap"
        front-gears = 3
        rear-gears = 11
        "#,
    )
}

#[tokio::test]
async fn test_single_speed_build() {
    let (_servers, config) = start_shop(vec![]).await;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let bill = orchestrator.resolve(single_speed()).await;

    assert!(bill.errors.is_empty(), "unexpected errors: {:?}", bill.errors);
    assert_eq!(bill.parts.len(), 11);

    let wheels = bill.part("Wheel Set").expect("wheels on the bill");
    assert!(wheels.url.ends_with("/aerorage-track-700c-wheels/"));
    assert_eq!(wheels.name, "aerorage track 700c wheels");

    let catcher = bill.part("Front Derailleur").expect("chain catcher on the bill");
    assert!(catcher.url.ends_with("/deda-dog-fang-chain-catcher"));

    assert!(bill.part("Rear Derailleur").is_none());
    assert!(bill
        .omissions
        .iter()
        .any(|o| o.component == "Rear Derailleur"));

    assert_eq!(bill.total_display, "£110.00");
}

#[tokio::test]
async fn test_hydraulic_sti_build() {
    let (_servers, config) = start_shop(vec![]).await;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let bill = orchestrator.resolve(hydraulic_road()).await;

    assert!(bill.errors.is_empty(), "unexpected errors: {:?}", bill.errors);

    let right = bill.part("Right Hydraulic Shifter").unwrap();
    let left = bill.part("Left Hydraulic Shifter").unwrap();
    assert!(right.url.ends_with("/shimano-105-r7025-hydraulic-disc-brake"));
    assert_eq!(right.url, left.url);

    assert!(bill.part("Front Brake Caliper").is_none());
    assert!(bill.part("Rear Brake Caliper").is_none());
    assert!(bill.omissions.iter().any(|o| o.component == "Brake Calipers"));
}

#[tokio::test]
async fn test_triple_sti_clamps_rear_gears() {
    let (_servers, config) = start_shop(vec![]).await;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let run = orchestrator.run(triple_tourer()).await;

    assert_eq!(run.spec.rear_gears, 10);
    assert_eq!(run.patches.len(), 1);
    assert!(run.bill.errors.is_empty(), "unexpected errors: {:?}", run.bill.errors);

    let cassette = run.bill.part("Cassette").unwrap();
    assert!(cassette.url.contains("10-speed"));
    let chain = run.bill.part("Chain").unwrap();
    assert!(chain.url.ends_with("/shimano-hg95-10-speed-chain"));
    let derailleur = run.bill.part("Rear Derailleur").unwrap();
    assert!(derailleur.url.ends_with("/shimano-tiagra-4700-10-speed-rear-derailleur-gs"));
}

#[tokio::test]
async fn test_missing_page_is_fetch_error() {
    let wiggle = VendorSite::new("wiggle")
        .respond("/shimano-hg95-10-speed-chain", ResponseTemplate::new(404));
    let (_servers, config) = start_shop(vec![wiggle]).await;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let bill = orchestrator.resolve(triple_tourer()).await;

    assert_eq!(bill.errors.len(), 1);
    let error = &bill.errors[0];
    assert_eq!(error.component, "Chain");
    assert_eq!(error.stage, Stage::Fetch);
    assert!(error.url.as_deref().unwrap().ends_with("/shimano-hg95-10-speed-chain"));
    assert!(error.detail.contains("404"));

    // the rest of the bill still totals
    assert!(!bill.is_complete());
    let expected = format!("£{}.00", bill.parts.len() * 10);
    assert_eq!(bill.total_display, expected);
}

#[tokio::test]
async fn test_missing_node_is_extract_error() {
    let dolan = VendorSite::new("dolan").respond(
        "/dolan-pre-cursa-aluminium-frameset/",
        ResponseTemplate::new(200).set_body_string("<html><body><h1>Pre Cursa</h1></body></html>"),
    );
    let (_servers, config) = start_shop(vec![dolan]).await;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let bill = orchestrator.resolve(single_speed()).await;

    assert_eq!(bill.errors.len(), 1);
    assert_eq!(bill.errors[0].component, "Frame");
    assert_eq!(bill.errors[0].stage, Stage::Extract);
    assert_eq!(bill.parts.len(), 10);
}

#[tokio::test]
async fn test_malformed_price_is_extract_error() {
    let genesis = VendorSite::new("genesis").price("/genesis-fugio-frameset-vargn22330/", "POA");
    let (_servers, config) = start_shop(vec![genesis]).await;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let bill = orchestrator.resolve(triple_tourer()).await;

    assert_eq!(bill.errors.len(), 1);
    assert_eq!(bill.errors[0].component, "Frame");
    assert_eq!(bill.errors[0].stage, Stage::Extract);
    assert!(bill.errors[0].detail.contains("POA"));
}

#[tokio::test]
async fn test_discounted_price_and_normalization() {
    let halo = VendorSite::new("halo").respond(
        "/aerorage-track-700c-wheels/",
        ResponseTemplate::new(200).set_body_string(
            r#"<div class="productDetails"><h1>Aerorage Track</h1>
               <div class="priceSummary"><del><span>£249.99</span></del><ins><span>£179.99 Save 20%</span></ins></div></div>"#,
        ),
    );
    let dolan = VendorSite::new("dolan").price("/dolan-pre-cursa-aluminium-frameset/", "£1,234");
    let chainreaction = VendorSite::new("chainreaction")
        .price("/cinelli-bullhorn-road-handlebar", "£45.5");
    let (_servers, config) = start_shop(vec![halo, dolan, chainreaction]).await;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let bill = orchestrator.resolve(single_speed()).await;

    assert!(bill.errors.is_empty(), "unexpected errors: {:?}", bill.errors);
    assert_eq!(bill.part("Wheel Set").unwrap().price.to_string(), "179.99");
    assert_eq!(bill.part("Frame").unwrap().price.to_string(), "1234.00");
    assert_eq!(bill.part("Handlebars").unwrap().price.to_string(), "45.50");

    // 179.99 + 1234.00 + 45.50 + 8 parts at 10.00
    assert_eq!(bill.total_display, "£1,539.49");
}

#[tokio::test]
async fn test_slow_vendor_times_out() {
    let dolan = VendorSite::new("dolan").respond(
        "/dolan-pre-cursa-aluminium-frameset/",
        ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
    );
    let (_servers, mut config) = start_shop(vec![dolan]).await;
    config.fetcher.timeout_secs = 1;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let bill = orchestrator.resolve(single_speed()).await;

    assert_eq!(bill.errors.len(), 1);
    assert_eq!(bill.errors[0].component, "Frame");
    assert_eq!(bill.errors[0].stage, Stage::Fetch);
    assert!(bill.errors[0].detail.contains("timeout"));
}

#[tokio::test]
async fn test_pages_are_fetched_concurrently() {
    let second = Duration::from_secs(1);
    let sites = vec![
        VendorSite::new("dolan").slow("/dolan-pre-cursa-aluminium-frameset/", second),
        VendorSite::new("halo").slow("/aerorage-track-700c-wheels/", second),
        VendorSite::new("chainreaction").slow("/cinelli-bullhorn-road-handlebar", second),
    ];
    let (_servers, mut config) = start_shop(sites).await;
    config.fetcher.timeout_secs = 5;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let started = Instant::now();
    let bill = orchestrator.resolve(single_speed()).await;
    let elapsed = started.elapsed();

    assert!(bill.is_complete(), "unexpected errors: {:?}", bill.errors);
    assert_eq!(bill.parts.len(), 11);
    // frame, wheels and handlebars each take a second
    assert!(
        elapsed < Duration::from_secs(3),
        "run took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_unresolvable_component_is_reported() {
    let (_servers, config) = start_shop(vec![]).await;
    let spec = BikeSpecification {
        front_gears: 2,
        rear_gears: 1,
        ..single_speed()
    };

    let bill = resolve_parts_for_specification(spec, &config)
        .await
        .expect("Failed to resolve");

    let chainring = bill
        .errors
        .iter()
        .find(|e| e.component == "Chainring")
        .expect("chainring has no 2x1 rule");
    assert_eq!(chainring.stage, Stage::Resolve);
    assert!(chainring.url.is_none());
    assert!(bill.part("Frame").is_some());
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let (_servers, config) = start_shop(vec![]).await;
    let orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");

    let first = orchestrator.resolve(hydraulic_road()).await;
    let second = orchestrator.resolve(hydraulic_road()).await;

    let urls = |bill: &bike_parts::BillOfMaterials| {
        let mut urls: Vec<String> = bill.parts.iter().map(|p| p.url.clone()).collect();
        urls.sort();
        urls
    };

    assert_eq!(urls(&first), urls(&second));
    assert_eq!(first.total_display, second.total_display);
}
