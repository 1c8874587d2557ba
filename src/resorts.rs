//! Static resort reference data.

use crate::models::ResortLocation;

/// Hand-maintained master list of resorts on the dashboard. Every
/// reconciled table is keyed by this list, never by whatever the store
/// happened to return.
pub const RESORT_LOCATIONS: &[ResortLocation] = &[
    ResortLocation {
        name: "Snowbowl",
        lat: 47.032417,
        lon: -113.9915282,
    },
    ResortLocation {
        name: "Discovery",
        lat: 46.262206,
        lon: -113.246187,
    },
    ResortLocation {
        name: "Lookout Pass",
        lat: 47.4531005,
        lon: -115.706537,
    },
    ResortLocation {
        name: "Big Mountain",
        lat: 48.502127,
        lon: -114.341252,
    },
    ResortLocation {
        name: "Lost Trail",
        lat: 45.695247,
        lon: -113.965263,
    },
    ResortLocation {
        name: "Teton Pass",
        lat: 47.929804,
        lon: -112.816723,
    },
    ResortLocation {
        name: "Showdown",
        lat: 46.837747,
        lon: -110.715599,
    },
    ResortLocation {
        name: "Blacktail",
        lat: 48.011676,
        lon: -114.365251,
    },
    ResortLocation {
        name: "Bridger Bowl",
        lat: 45.813919,
        lon: -110.921873,
    },
    ResortLocation {
        name: "Big Sky",
        lat: 45.280943,
        lon: -111.440644,
    },
    ResortLocation {
        name: "Red Lodge Mountain",
        lat: 45.181125,
        lon: -109.354325,
    },
    ResortLocation {
        name: "Maverick",
        lat: 45.438286,
        lon: -113.142233,
    },
    ResortLocation {
        name: "Great Divide",
        lat: 46.7489,
        lon: -112.328513,
    },
    ResortLocation {
        name: "Bear Paw",
        lat: 48.162084,
        lon: -109.679937,
    },
    ResortLocation {
        name: "Silver Mountain",
        lat: 47.49907,
        lon: -116.119163,
    },
    ResortLocation {
        name: "Turner Mountain",
        lat: 48.609788,
        lon: -115.648756,
    },
    ResortLocation {
        name: "Schweitzer",
        lat: 48.377785,
        lon: -116.633436,
    },
];

/// Resolve a compact store identifier to the display name used as the
/// join key against [`RESORT_LOCATIONS`].
///
/// Total and deterministic: identifiers without a mapping pass through
/// unchanged, so a new resort surfaces under its raw key until this table
/// is updated.
pub fn display_name(resort: &str) -> &str {
    match resort {
        "LookoutPass" => "Lookout Pass",
        "BigMountain" => "Big Mountain",
        "LostTrail" => "Lost Trail",
        "TetonPass" => "Teton Pass",
        "BridgerBowl" => "Bridger Bowl",
        "BigSky" => "Big Sky",
        "RedLodge" | "RedLodgeMountain" => "Red Lodge Mountain",
        "GreatDivide" => "Great Divide",
        "BearPaw" => "Bear Paw",
        "SilverMountain" => "Silver Mountain",
        "TurnerMountain" => "Turner Mountain",
        other => other,
    }
}
