//! News generation: the random shocks that keep markets moving.
//!
//! Each turn rolls 0--2 fresh items. An item is one of three
//! archetypes, picked by fixed weights:
//!
//! - a no-effect flavor headline,
//! - a fuel-price shock at one location,
//! - a price *and* production shock on one good at one location
//!   (a shortage raises price and cuts production; a glut does the
//!   opposite).
//!
//! Items last 2--4 turns and decay in the market step.

use rand::Rng;
use tradewinds_types::{Good, NewsItem};

use crate::goods;
use crate::map::StarMap;
use crate::market::MarketConfig;

/// Weight (percent) of the flavor archetype.
const FLAVOR_WEIGHT: u32 = 30;

/// Weight (percent) of the fuel-shock archetype.
const FUEL_WEIGHT: u32 = 20;

/// Flavor headlines with no market effect.
const FLAVOR_HEADLINES: [&str; 5] = [
    "Liner pageant dazzles crowds at {loc}",
    "Famous chef opens noodle bar on {loc}",
    "{loc} celebrates founding day with fireworks",
    "Zero-g regatta draws record entries near {loc}",
    "Archaeologists tour ruins beneath {loc}",
];

/// Headlines for upward price shocks.
const SHORTAGE_HEADLINES: [&str; 4] = [
    "Dock strike at {loc} chokes {good} supply",
    "Pirate blockade squeezes {good} shipments to {loc}",
    "Refinery fire at {loc} sends {good} prices soaring",
    "Quarantine at {loc} halts {good} freighters",
];

/// Headlines for downward price shocks.
const GLUT_HEADLINES: [&str; 4] = [
    "Bumper harvest floods {loc} with {good}",
    "Surplus convoy dumps {good} on {loc} exchange",
    "New automated plant at {loc} churns out cheap {good}",
    "Tariff repeal at {loc} lets {good} pour in",
];

/// Headlines for fuel shocks (rising).
const FUEL_UP_HEADLINES: [&str; 3] = [
    "Tanker delays push fuel prices up at {loc}",
    "Refuelling levy imposed at {loc}",
    "Solar flare disrupts fuel refining near {loc}",
];

/// Headlines for fuel shocks (falling).
const FUEL_DOWN_HEADLINES: [&str; 3] = [
    "Fuel depot undercuts rivals at {loc}",
    "New hydrogen skimmer slashes fuel costs at {loc}",
    "Subsidy war drops fuel prices at {loc}",
];

/// Roll this turn's fresh news items.
pub fn roll_news(map: &StarMap, rng: &mut impl Rng, cfg: &MarketConfig) -> Vec<NewsItem> {
    let mut fresh = Vec::new();
    if map.is_empty() {
        return fresh;
    }

    if rng.random_range(0_u32..100) < cfg.news_first_pct {
        fresh.push(roll_one(map, rng, cfg));
    }
    if rng.random_range(0_u32..100) < cfg.news_second_pct {
        fresh.push(roll_one(map, rng, cfg));
    }
    fresh
}

/// Roll a single news item of a weighted random archetype.
fn roll_one(map: &StarMap, rng: &mut impl Rng, cfg: &MarketConfig) -> NewsItem {
    let location = random_location(map, rng);
    let turns = rng.random_range(cfg.news_min_turns..=cfg.news_max_turns.max(cfg.news_min_turns));
    let archetype = rng.random_range(0_u32..100);

    if archetype < FLAVOR_WEIGHT {
        flavor_item(&location, rng, turns)
    } else if archetype < FLAVOR_WEIGHT.saturating_add(FUEL_WEIGHT) {
        fuel_item(&location, rng, turns)
    } else {
        shock_item(&location, rng, turns)
    }
}

/// Pick a uniformly random location name.
fn random_location(map: &StarMap, rng: &mut impl Rng) -> String {
    let names = map.names();
    let idx = rng.random_range(0..names.len().max(1));
    names.get(idx).cloned().unwrap_or_default()
}

/// A no-effect flavor headline.
fn flavor_item(location: &str, rng: &mut impl Rng, turns: u32) -> NewsItem {
    let template = pick(&FLAVOR_HEADLINES, rng);
    NewsItem {
        headline: template.replace("{loc}", location),
        location: String::from(location),
        good: None,
        price_delta: None,
        production_delta: None,
        fuel_delta: None,
        turns_remaining: turns,
    }
}

/// A fuel-price shock.
fn fuel_item(location: &str, rng: &mut impl Rng, turns: u32) -> NewsItem {
    let magnitude = rng.random_range(3_i64..=10);
    let rising = rng.random_range(0_u32..100) < 50;
    let (delta, template) = if rising {
        (magnitude, pick(&FUEL_UP_HEADLINES, rng))
    } else {
        (magnitude.saturating_neg(), pick(&FUEL_DOWN_HEADLINES, rng))
    };
    NewsItem {
        headline: template.replace("{loc}", location),
        location: String::from(location),
        good: None,
        price_delta: None,
        production_delta: None,
        fuel_delta: Some(delta),
        turns_remaining: turns,
    }
}

/// A price-and-production shock on one good.
fn shock_item(location: &str, rng: &mut impl Rng, turns: u32) -> NewsItem {
    let good = random_good(rng);
    let spec = goods::spec(good);

    // Magnitude scales with the good's price range: 15%-45% of the span.
    let span = spec.span().max(1);
    let lo = span.saturating_mul(15).checked_div(100).unwrap_or(1).max(1);
    let hi = span.saturating_mul(45).checked_div(100).unwrap_or(1).max(lo);
    let magnitude = rng.random_range(lo..=hi);

    let production_swing = i64::from(spec.base_production.max(1));
    let shortage = rng.random_range(0_u32..100) < 50;

    let (price_delta, production_delta, template) = if shortage {
        (magnitude, production_swing.saturating_neg(), pick(&SHORTAGE_HEADLINES, rng))
    } else {
        (magnitude.saturating_neg(), production_swing, pick(&GLUT_HEADLINES, rng))
    };

    NewsItem {
        headline: template
            .replace("{loc}", location)
            .replace("{good}", good.name()),
        location: String::from(location),
        good: Some(good),
        price_delta: Some(price_delta),
        production_delta: Some(production_delta),
        fuel_delta: None,
        turns_remaining: turns,
    }
}

/// Pick a uniformly random good.
fn random_good(rng: &mut impl Rng) -> Good {
    let idx = rng.random_range(0..Good::ALL.len());
    Good::ALL.get(idx).copied().unwrap_or(Good::Water)
}

/// Pick a random entry from a headline table.
fn pick<'a>(table: &'a [&'a str], rng: &mut impl Rng) -> &'a str {
    let idx = rng.random_range(0..table.len().max(1));
    table.get(idx).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::starting_world::create_starting_map;

    use super::*;

    #[test]
    fn rolled_items_target_known_locations() {
        let map = create_starting_map();
        let mut rng = SmallRng::seed_from_u64(3);
        let cfg = MarketConfig::default();
        for _ in 0..200 {
            for item in roll_news(&map, &mut rng, &cfg) {
                assert!(map.contains(&item.location));
                assert!(item.turns_remaining >= cfg.news_min_turns);
                assert!(item.turns_remaining <= cfg.news_max_turns);
                assert!(!item.headline.contains("{loc}"));
                assert!(!item.headline.contains("{good}"));
            }
        }
    }

    #[test]
    fn shock_items_carry_opposed_price_and_production_deltas() {
        let map = create_starting_map();
        let mut rng = SmallRng::seed_from_u64(5);
        let name = map.names().first().cloned().unwrap_or_default();
        for _ in 0..50 {
            let item = shock_item(&name, &mut rng, 3);
            let price = item.price_delta.unwrap_or(0);
            let production = item.production_delta.unwrap_or(0);
            assert_ne!(price, 0);
            assert_ne!(production, 0);
            assert!(price.signum() != production.signum());
        }
    }
}
