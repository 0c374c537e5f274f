//! Plain-language descriptions of bin labels and states.

use nimbus_markov::{BIN_SEPARATOR, DAY_SEPARATOR, State};

/// Bin label -> description, for every bin of every parameter.
const DESCRIPTIONS: &[(&str, &str)] = &[
    ("tavg <= 18", "cool day (avg at most 18 °C)"),
    ("18 < tavg <= 25", "mild day (avg 18-25 °C)"),
    ("25 < tavg", "hot day (avg above 25 °C)"),
    ("tmax <= 18", "cool high (max at most 18 °C)"),
    ("18 < tmax <= 25", "mild high (max 18-25 °C)"),
    ("25 < tmax", "hot high (max above 25 °C)"),
    ("tmin <= 18", "cool low (min at most 18 °C)"),
    ("18 < tmin", "warm night (min above 18 °C)"),
    ("prcp == 0", "dry"),
    ("0 < prcp <= 5", "light rain (up to 5 mm)"),
    ("5 < prcp <= 10", "moderate rain (5-10 mm)"),
    ("10 < prcp", "heavy rain (over 10 mm)"),
    ("wspd <= 5", "calm (wind up to 5 km/h)"),
    ("5 < wspd <= 10", "breezy (wind 5-10 km/h)"),
    ("10 < wspd", "windy (wind over 10 km/h)"),
];

/// Description of one bin label, or `None` for an unknown label.
pub fn describe_label(label: &str) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, d)| *d)
}

/// Description of a whole state.
///
/// Labels within a day are joined with ", " and days with " then ".
/// Unknown labels are shown verbatim.
pub fn describe_state(state: &State) -> String {
    state
        .as_str()
        .split(DAY_SEPARATOR)
        .map(|day| {
            day.split(BIN_SEPARATOR)
                .map(|label| describe_label(label).unwrap_or(label))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join(" then ")
}
