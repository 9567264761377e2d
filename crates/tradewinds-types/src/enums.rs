//! Enumeration types for the Tradewinds simulation.
//!
//! Goods, facility archetypes, and upgrade kinds are closed enums so the
//! trading, auction, and event subsystems can match exhaustively.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Goods
// ---------------------------------------------------------------------------

/// A tradeable commodity.
///
/// Every location stocks every good; prices and production differ per
/// location and drift over time. Fuel is not a good -- it is tracked
/// separately on the player and priced separately at each location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Good {
    /// Purified water, cheap and plentiful.
    Water,
    /// Preserved foodstuffs.
    Food,
    /// Raw mineral ore.
    Ore,
    /// Woven fabrics and clothing.
    Textiles,
    /// Pharmaceuticals and medical supplies.
    Medicine,
    /// Consumer and industrial electronics.
    Electronics,
    /// Heavy industrial machinery.
    Machinery,
    /// High-margin luxury items.
    Luxuries,
}

impl Good {
    /// All goods, in canonical order.
    pub const ALL: [Self; 8] = [
        Self::Water,
        Self::Food,
        Self::Ore,
        Self::Textiles,
        Self::Medicine,
        Self::Electronics,
        Self::Machinery,
        Self::Luxuries,
    ];

    /// Human-readable display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Food => "Food",
            Self::Ore => "Ore",
            Self::Textiles => "Textiles",
            Self::Medicine => "Medicine",
            Self::Electronics => "Electronics",
            Self::Machinery => "Machinery",
            Self::Luxuries => "Luxuries",
        }
    }
}

impl core::fmt::Display for Good {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Facilities
// ---------------------------------------------------------------------------

/// An archetype of ownable location facility.
///
/// Facilities are attached to a location when their auction resolves.
/// Non-owners docked at the location pay the usage charge each turn;
/// the accrued revenue is paid out when the owner docks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FacilityKind {
    /// A commercial exchange floor.
    TradingPost,
    /// Orbital fuel storage and pumping.
    FuelDepot,
    /// Hull and drive maintenance berths.
    RepairDock,
    /// Bonded cargo storage.
    Warehouse,
}

impl FacilityKind {
    /// All facility archetypes, in canonical order.
    pub const ALL: [Self; 4] = [
        Self::TradingPost,
        Self::FuelDepot,
        Self::RepairDock,
        Self::Warehouse,
    ];

    /// Human-readable display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TradingPost => "Trading Post",
            Self::FuelDepot => "Fuel Depot",
            Self::RepairDock => "Repair Dock",
            Self::Warehouse => "Warehouse",
        }
    }

    /// Inclusive range the per-turn usage charge is rolled from when an
    /// auction for this archetype starts.
    pub const fn usage_charge_range(self) -> (i64, i64) {
        match self {
            Self::TradingPost => (15, 40),
            Self::FuelDepot => (10, 30),
            Self::RepairDock => (20, 50),
            Self::Warehouse => (5, 25),
        }
    }

    /// Baseline purchase value used to derive the suggested opening bid.
    pub const fn base_value(self) -> i64 {
        match self {
            Self::TradingPost => 900,
            Self::FuelDepot => 600,
            Self::RepairDock => 1100,
            Self::Warehouse => 450,
        }
    }
}

impl core::fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Upgrades
// ---------------------------------------------------------------------------

/// A ship upgrade offered through shop events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Additional cargo capacity.
    Cargo,
    /// Additional travel speed (distance per turn).
    Speed,
    /// Additional fuel tank capacity.
    FuelTank,
}

impl UpgradeKind {
    /// All upgrade kinds, in canonical order.
    pub const ALL: [Self; 3] = [Self::Cargo, Self::Speed, Self::FuelTank];

    /// Human-readable display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cargo => "Cargo Bay Extension",
            Self::Speed => "Drive Tuning",
            Self::FuelTank => "Auxiliary Fuel Tank",
        }
    }
}

impl core::fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_names_are_unique() {
        let mut names: Vec<&str> = Good::ALL.iter().map(|g| g.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Good::ALL.len());
    }

    #[test]
    fn usage_charge_ranges_are_ordered() {
        for kind in FacilityKind::ALL {
            let (lo, hi) = kind.usage_charge_range();
            assert!(lo > 0);
            assert!(lo <= hi);
        }
    }

    #[test]
    fn good_serde_uses_variant_name() {
        let json = serde_json::to_string(&Good::Electronics);
        assert_eq!(json.ok().as_deref(), Some("\"Electronics\""));
    }
}
