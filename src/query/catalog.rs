//! Fixed statement text and keyspace names.
//!
//! Statements only ever reference their parameters by placeholder; user input
//! is bound separately through [`QueryParams`](super::QueryParams).

pub const INVENTORY_SCOPE: &str = "inventory";
pub const HOTEL_COLLECTION: &str = "hotel";
pub const AIRPORT_COLLECTION: &str = "airport";
pub const ROUTE_COLLECTION: &str = "route";
pub const AIRLINE_COLLECTION: &str = "airline";

pub const USERS_COLLECTION: &str = "users";
pub const BOOKINGS_COLLECTION: &str = "bookings";

/// Field of a user document holding booking ids
pub const BOOKINGS_FIELD: &str = "bookings";
pub const PASSWORD_FIELD: &str = "password";

pub const AIRPORT_BY_FAA: &str =
    "SELECT airportname FROM `travel-sample`.inventory.airport WHERE faa=$1";

pub const AIRPORT_BY_ICAO: &str =
    "SELECT airportname FROM `travel-sample`.inventory.airport WHERE icao=$1";

pub const AIRPORT_BY_NAME: &str =
    "SELECT airportname FROM `travel-sample`.inventory.airport WHERE CONTAINS(LOWER(airportname), $1)";

pub const FLIGHT_PATH_AIRPORTS: &str = "SELECT faa as fromAirport FROM `travel-sample`.inventory.airport WHERE airportname = $1 UNION SELECT faa as toAirport FROM `travel-sample`.inventory.airport WHERE airportname = $2";

pub const ROUTE_SCHEDULE: &str = "SELECT a.name, s.flight, s.utc, r.sourceairport, r.destinationairport, r.equipment FROM `travel-sample`.inventory.route AS r UNNEST r.schedule AS s JOIN `travel-sample`.inventory.airline AS a ON KEYS r.airlineid WHERE r.sourceairport = $fromfaa AND r.destinationairport = $tofaa AND s.day = $dayofweek ORDER BY a.name ASC";

pub const HOTELS_INDEX: &str = "hotels-index";
pub const HOTEL_SEARCH_LIMIT: u64 = 100;

/// Paths read for each hotel hit, in this order.
pub const HOTEL_DETAIL_PATHS: [&str; 6] = ["name", "address", "city", "state", "country", "description"];
