//! Route metadata: mainline changes required to reach the hub.
//!
//! Maintained by hand from UK railway geography. A station either has a
//! direct service to King's Cross / St Pancras (or a terminus with a
//! trivial onward connection) or needs one or more changes on the
//! mainline segment. Unknown stations default to direct, since most
//! commuter stations in range have good connections; operators can
//! correct individual areas afterwards.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Stations with a direct service to the hub (lowercased names).
const DIRECT_STATIONS: &[&str] = &[
    // Thameslink core
    "st albans city",
    "elstree & borehamwood",
    "radlett",
    "harpenden",
    "luton airport parkway",
    "luton",
    "leagrave",
    "harlington",
    "bedford",
    // Great Northern / LNER
    "potters bar",
    "brookmans park",
    "welham green",
    "hatfield",
    "welwyn north",
    "welwyn garden city",
    "knebworth",
    "stevenage",
    "hitchin",
    "letchworth garden city",
    "baldock",
    "ashwell & morden",
    "arlesey",
    "biggleswade",
    "sandy",
    "st neots",
    // Hertford loop
    "hadley wood",
    "crews hill",
    "cuffley",
    "bayford",
    "hertford north",
    "watton-at-stone",
    // Cambridge line
    "waltham cross",
    "cheshunt",
    "broxbourne",
    "rye house",
    "roydon",
    "harlow town",
    "harlow mill",
    "sawbridgeworth",
    "bishop's stortford",
    // Great Eastern (connects via Liverpool Street)
    "shenfield",
    "ingatestone",
    "chelmsford",
    // High Speed 1 to St Pancras
    "ebbsfleet international",
    "ashford international",
    "stratford international",
    // Southeastern to St Pancras
    "gravesend",
    "northfleet",
    "swanscombe",
    "greenhithe",
    "stone crossing",
    "rochester",
    "chatham",
    "strood",
    "snodland",
    // South Thameslink
    "east croydon",
    "south croydon",
    "purley",
    "coulsdon south",
    "merstham",
    "redhill",
    "gatwick airport",
    // Elizabeth line west
    "maidenhead",
    "twyford",
    "reading",
    "west drayton",
    "iver",
    "langley",
    // Chiltern to Marylebone
    "rickmansworth",
    "chorleywood",
    "gerrards cross",
    "denham",
    "denham golf club",
    // West Coast via Euston
    "watford junction",
    "bushey",
    "kings langley",
    "apsley",
    "leighton buzzard",
    // Southeastern / South Western commuter routes
    "orpington",
    "chelsfield",
    "sevenoaks",
    "sidcup",
    "esher",
    "surbiton",
    "twickenham",
];

fn direct_stations() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| DIRECT_STATIONS.iter().copied().collect())
}

/// Route metadata for a station's journey to the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Train changes required on the mainline segment. Zero is a direct
    /// service.
    pub mainline_changes: u32,

    /// Human-readable route summary.
    pub summary: &'static str,
}

/// Look up route metadata for a station by name (case-insensitive).
pub fn route_info(station_name: &str) -> RouteInfo {
    let key = station_name.trim().to_lowercase();

    if direct_stations().contains(key.as_str()) {
        return RouteInfo {
            mainline_changes: 0,
            summary: "Direct to King's Cross/St Pancras",
        };
    }

    // Default: assume a direct service exists. Most commuter stations in
    // range do, and over-penalising unknowns would bias discovery.
    RouteInfo {
        mainline_changes: 0,
        summary: "Direct service available",
    }
}
