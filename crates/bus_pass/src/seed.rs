use model::location::LocationEdge;

/// The location table loaded at every start, as `(source, destination, distance)`.
///
/// Edges are directed and must not contain the same pair twice.
pub const SEED_LOCATIONS: [(&str, &str, f64); 31] = [
    ("Moulali", "Ghatkesar", 50.0),
    ("Tarnaka", "Uppal", 10.0),
    ("Uppal", "Narapally", 15.0),
    ("Miyapur", "Korremula", 35.0),
    ("Secunderabad", "Uppal", 20.0),
    ("Narapally", "Secunderabad", 40.0),
    ("Uppal", "Moulali", 10.0),
    ("Malkajgiri", "Medipally", 15.0),
    ("Lb Nagar", "Narapally", 35.0),
    ("RTC X Roads", "Secunderabad", 20.0),
    ("Tarnaka", "Malkajgiri", 12.0),
    ("Tarnaka", "Narapply", 25.0),
    ("Tarnaka", "Lb Nagar", 18.0),
    ("Tarnaka", "Korremula", 28.0),
    ("Uppal", "Tank-Bund", 30.0),
    ("Uppal", "Warangal", 100.0),
    ("Uppal", "Secunderabad", 35.0),
    ("Uppal", "RTC Colony", 25.0),
    ("Miyapur", "Uppal", 30.0),
    ("Miyapur", "Moulali", 40.0),
    ("Miyapur", "HiTechCity", 10.0),
    ("Miyapur", "Malkajgiri", 40.0),
    ("Secunderabad", "Ramanthapur", 29.0),
    ("Secunderabad", "ECIL", 20.0),
    ("Secunderabad", "Tarnaka", 8.0),
    ("Secunderabad", "Raidurgam", 32.0),
    ("Secunderabad", "Korremula", 40.0),
    ("Narapally", "Ecil", 25.0),
    ("Narapally", "Uppal", 10.0),
    ("Narapally", "Habsiguda", 15.0),
    ("Narapally", "RTC Colony", 23.0),
];

pub fn seed_locations() -> Vec<LocationEdge> {
    SEED_LOCATIONS
        .iter()
        .map(|(source, destination, distance)| {
            LocationEdge::new(*source, *destination, *distance)
        })
        .collect()
}
