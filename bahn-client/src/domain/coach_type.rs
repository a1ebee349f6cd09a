//! Coach type codes.
//!
//! German rolling stock carries a compact type code such as `ABpmz` or
//! `WRmz`: an uppercase class segment (what the vehicle is) followed by a
//! lowercase feature segment (what it has). [`CoachTypeInfo::decode`] turns
//! such a code into flat booleans.

use serde::{Deserialize, Serialize};

/// Decoded attributes of a coach type code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachTypeInfo {
    /// The code as received.
    pub raw_type: String,

    pub diesel_locomotive: bool,
    pub diesel_electric_locomotive: bool,
    pub electric_locomotive: bool,

    pub first_class: bool,
    pub second_class: bool,
    pub double_deck: bool,
    pub sleeping: bool,
    pub restaurant: bool,
    pub bistro: bool,
    pub car_transport: bool,
    pub saloon: bool,

    pub accessible: bool,
    pub couchette: bool,
    pub air_conditioning: bool,
    pub interregio: bool,
    pub intercity: bool,
    pub bicycle: bool,
    pub compartments: bool,
    pub open_coach: bool,
    pub control_car: bool,
    pub service_point: bool,
    pub reduced_compartment_count: bool,
}

/// Unconsumed part of one code segment.
struct Remainder(String);

impl Remainder {
    /// Remove the first occurrence of `token`, reporting whether there was one.
    fn take(&mut self, token: char) -> bool {
        match self.0.find(token) {
            Some(at) => {
                self.0.remove(at);
                true
            }
            None => false,
        }
    }
}

/// Split a code into its class and feature segments.
fn segments(code: &str) -> (&str, &str) {
    let mut class = "";
    let mut features = "";
    if let Some((at, c)) = code.char_indices().find(|(_, c)| !c.is_uppercase()) {
        class = &code[..at];
        if c.is_alphabetic() {
            features = &code[at..];
        }
    }
    if class.is_empty() {
        class = code;
    }
    (class, features)
}

impl CoachTypeInfo {
    /// Decode a coach type code.
    ///
    /// Tokens are stripped from each segment in a fixed order and the first
    /// occurrence of each wins, so `WRmz` (`R` then `W`) is a restaurant car
    /// while `ARmz` (no `W` left after `R`) is a bistro. Characters that no
    /// rule consumes are ignored. Never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use bahn_client::domain::CoachTypeInfo;
    ///
    /// let info = CoachTypeInfo::decode("ABpmz");
    /// assert!(info.first_class && info.second_class);
    /// assert!(info.open_coach && info.compartments);
    /// assert!(!info.restaurant);
    /// ```
    pub fn decode(code: &str) -> Self {
        let mut info = Self {
            raw_type: code.to_string(),
            ..Self::default()
        };

        let (class, features) = segments(code);
        let mut class = Remainder(class.to_string());
        let mut features = Remainder(features.to_string());

        info.first_class = class.take('A');
        info.second_class = class.take('B');
        if class.take('R') {
            if class.take('W') {
                info.restaurant = true;
            } else {
                info.bistro = true;
            }
        }
        if class.take('D') {
            info.double_deck = true;
            info.car_transport = class.take('D');
        }
        info.saloon = class.take('G');
        info.sleeping = class.take('L');
        info.electric_locomotive = class.take('E');
        info.diesel_electric_locomotive = class.take('I');
        info.diesel_locomotive = class.take('V');

        info.accessible = features.take('b');
        info.couchette = features.take('c');
        if features.take('k') {
            info.bistro = true;
            info.restaurant = false;
        }
        if features.take('m') {
            info.compartments = true;
            info.intercity = features.take('m');
            info.interregio = features.take('i');
            info.bicycle = features.take('d');
            features.take('v');
        }
        if features.take('p') {
            info.air_conditioning = true;
            info.open_coach = true;
        }
        info.control_car = features.take('f');
        info.service_point = features.take('s');
        info.reduced_compartment_count = features.take('w');

        // Heating, power supply, lighting and tilting markers carry nothing
        // the model represents.
        for ignored in ['a', 'z', 'h', 'l', 'e', 't'] {
            features.take(ignored);
        }

        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_split_at_first_lowercase() {
        assert_eq!(segments("ABpmz"), ("AB", "pmz"));
        assert_eq!(segments("WRmz"), ("WR", "mz"));
    }

    #[test]
    fn segments_all_uppercase_is_class_only() {
        assert_eq!(segments("DD"), ("DD", ""));
    }

    #[test]
    fn segments_digit_stops_features() {
        assert_eq!(segments("E401"), ("E", ""));
    }

    #[test]
    fn segments_leading_lowercase_is_whole_code() {
        assert_eq!(segments("bmz"), ("bmz", "bmz"));
    }

    #[test]
    fn first_and_second_class() {
        let info = CoachTypeInfo::decode("ABmz");
        assert_eq!(info.raw_type, "ABmz");
        assert!(info.first_class);
        assert!(info.second_class);
        assert!(info.compartments);
        assert!(!info.intercity);
        assert!(!info.restaurant);
    }

    #[test]
    fn restaurant_needs_w_after_r() {
        let info = CoachTypeInfo::decode("WRmz");
        assert!(info.restaurant);
        assert!(!info.bistro);

        let info = CoachTypeInfo::decode("ARWmz");
        assert!(info.first_class);
        assert!(info.restaurant);
        assert!(!info.bistro);
    }

    #[test]
    fn r_without_w_is_bistro() {
        let info = CoachTypeInfo::decode("ARmz");
        assert!(info.first_class);
        assert!(info.bistro);
        assert!(!info.restaurant);
        assert!(info.compartments);
    }

    #[test]
    fn k_demotes_restaurant_to_bistro() {
        let info = CoachTypeInfo::decode("WRkmz");
        assert!(info.bistro);
        assert!(!info.restaurant);
    }

    #[test]
    fn intercity_needs_two_m() {
        assert!(CoachTypeInfo::decode("Bmmz").intercity);

        // A single `m` only marks compartments
        let info = CoachTypeInfo::decode("Bpmz");
        assert!(info.second_class);
        assert!(info.compartments);
        assert!(!info.intercity);
        assert!(info.air_conditioning);
        assert!(info.open_coach);
    }

    #[test]
    fn m_subfeatures() {
        let info = CoachTypeInfo::decode("Bimdzf");
        assert!(info.compartments);
        assert!(info.interregio);
        assert!(info.bicycle);
        assert!(info.control_car);
        assert!(!info.intercity);
    }

    #[test]
    fn subfeatures_require_m() {
        let info = CoachTypeInfo::decode("Bdz");
        assert!(!info.bicycle);
        assert!(!info.compartments);
    }

    #[test]
    fn double_deck_and_car_transport() {
        let info = CoachTypeInfo::decode("DABpbzf");
        assert!(info.double_deck);
        assert!(!info.car_transport);
        assert!(info.first_class);
        assert!(info.second_class);
        assert!(info.accessible);
        assert!(info.open_coach);
        assert!(info.control_car);

        let info = CoachTypeInfo::decode("DDm");
        assert!(info.double_deck);
        assert!(info.car_transport);
    }

    #[test]
    fn sleeping_couchette_saloon() {
        let info = CoachTypeInfo::decode("WLABmz");
        assert!(info.sleeping);
        assert!(info.first_class);

        let info = CoachTypeInfo::decode("Bcmh");
        assert!(info.couchette);

        assert!(CoachTypeInfo::decode("WGmh").saloon);
    }

    #[test]
    fn locomotives() {
        assert!(CoachTypeInfo::decode("E").electric_locomotive);
        assert!(CoachTypeInfo::decode("I").diesel_electric_locomotive);
        assert!(CoachTypeInfo::decode("V").diesel_locomotive);
    }

    #[test]
    fn service_point_and_reduced_compartments() {
        let info = CoachTypeInfo::decode("Bpmdsz");
        assert!(info.service_point);
        assert!(info.bicycle);

        let info = CoachTypeInfo::decode("Awmz");
        assert!(info.reduced_compartment_count);
    }

    #[test]
    fn ignored_features_set_nothing() {
        let info = CoachTypeInfo::decode("Bazhlet");
        assert_eq!(
            info,
            CoachTypeInfo {
                raw_type: "Bazhlet".to_string(),
                second_class: true,
                ..CoachTypeInfo::default()
            }
        );
    }

    #[test]
    fn unknown_trailing_character_changes_nothing() {
        for (code, extended) in [("Bpmz", "Bpmzx"), ("WRmz", "WRmz7"), ("AB", "ABQ")] {
            let mut info = CoachTypeInfo::decode(extended);
            assert_eq!(info.raw_type, extended);
            info.raw_type = code.to_string();
            assert_eq!(info, CoachTypeInfo::decode(code));
        }
    }

    #[test]
    fn unrecognised_codes_decode_to_nothing() {
        assert_eq!(
            CoachTypeInfo::decode("401"),
            CoachTypeInfo {
                raw_type: "401".to_string(),
                ..CoachTypeInfo::default()
            }
        );
        assert_eq!(CoachTypeInfo::decode(""), CoachTypeInfo::default());
    }
}
