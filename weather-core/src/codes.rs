//! WMO weather code lookup.
//!
//! Both lookups are total: any code missing from [`CODES`] falls back to
//! `"Unknown"` and [`DEFAULT_ICON`].

/// Icon identifier in the weatherapi.com icon set.
///
/// `night` is only ever set for entries that have a distinct night icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconId {
    pub code: u16,
    pub night: bool,
}

pub const DEFAULT_ICON: IconId = IconId {
    code: 113,
    night: false,
};

pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

struct CodeEntry {
    code: i32,
    description: &'static str,
    icon: u16,
    has_night_variant: bool,
}

const fn entry(code: i32, description: &'static str, icon: u16) -> CodeEntry {
    CodeEntry {
        code,
        description,
        icon,
        has_night_variant: false,
    }
}

const fn day_night(code: i32, description: &'static str, icon: u16) -> CodeEntry {
    CodeEntry {
        code,
        description,
        icon,
        has_night_variant: true,
    }
}

const CODES: &[CodeEntry] = &[
    day_night(0, "Clear sky", 113),
    day_night(1, "Mainly clear", 116),
    entry(2, "Partly cloudy", 119),
    entry(3, "Overcast", 122),
    entry(45, "Foggy", 143),
    entry(48, "Depositing rime fog", 248),
    entry(51, "Light drizzle", 263),
    entry(53, "Moderate drizzle", 266),
    entry(55, "Dense drizzle", 281),
    entry(61, "Slight rain", 296),
    entry(63, "Moderate rain", 302),
    entry(65, "Heavy rain", 308),
    entry(71, "Slight snow", 323),
    entry(73, "Moderate snow", 326),
    entry(75, "Heavy snow", 338),
    entry(77, "Snow grains", 350),
    entry(80, "Slight rain showers", 353),
    entry(81, "Moderate rain showers", 356),
    entry(82, "Violent rain showers", 359),
    entry(85, "Slight snow showers", 368),
    entry(86, "Heavy snow showers", 371),
    entry(95, "Thunderstorm", 386),
    entry(96, "Thunderstorm with slight hail", 392),
    entry(99, "Thunderstorm with heavy hail", 395),
];

fn lookup(code: i32) -> Option<&'static CodeEntry> {
    CODES.iter().find(|e| e.code == code)
}

/// Human-readable description for a provider weather code.
pub fn describe(code: i32) -> &'static str {
    lookup(code).map_or(UNKNOWN_DESCRIPTION, |e| e.description)
}

/// Icon for a provider weather code at the given time of day.
pub fn icon_id(code: i32, is_night: bool) -> IconId {
    match lookup(code) {
        Some(e) => IconId {
            code: e.icon,
            night: is_night && e.has_night_variant,
        },
        None => DEFAULT_ICON,
    }
}

/// Night is after 18:00 or before 06:00 local time.
pub fn is_night_hour(hour: u32) -> bool {
    !(6..=18).contains(&hour)
}
