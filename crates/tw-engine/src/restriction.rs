//! Track-usage restriction policies: how much a lay must extend or change
//! the operator's usable track.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tw_core::{TwError, TwResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TrackRestriction {
    /// Anything goes.
    Permissive,
    /// New track is needed unless the new tile has a city.
    CityPermissive,
    /// Must use new track.
    Restrictive,
    /// New track or a change in city revenue.
    #[default]
    SemiRestrictive,
}

/// What a lay does to the operator's connected track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackUsage {
    pub used_new_track: bool,
    pub changed_city: bool,
    pub new_tile_has_city: bool,
}

impl TrackRestriction {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackRestriction::Permissive => "permissive",
            TrackRestriction::CityPermissive => "city_permissive",
            TrackRestriction::Restrictive => "restrictive",
            TrackRestriction::SemiRestrictive => "semi_restrictive",
        }
    }

    pub fn check(self, usage: TrackUsage) -> TwResult<()> {
        let rejection = match self {
            TrackRestriction::Permissive => None,
            TrackRestriction::CityPermissive => (!usage.new_tile_has_city && !usage.used_new_track)
                .then_some("Must be city tile or use new track"),
            TrackRestriction::Restrictive => {
                (!usage.used_new_track).then_some("Must use new track")
            }
            TrackRestriction::SemiRestrictive => (!usage.used_new_track && !usage.changed_city)
                .then_some("Must use new track or change city value"),
        };
        match rejection {
            Some(reason) => Err(TwError::illegal(reason)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for TrackRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackRestriction {
    type Err = TwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permissive" => Ok(TrackRestriction::Permissive),
            "city_permissive" => Ok(TrackRestriction::CityPermissive),
            "restrictive" => Ok(TrackRestriction::Restrictive),
            "semi_restrictive" => Ok(TrackRestriction::SemiRestrictive),
            other => Err(TwError::config(format!(
                "track restriction policy '{other}' not found"
            ))),
        }
    }
}

impl TryFrom<String> for TrackRestriction {
    type Error = TwError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TrackRestriction> for String {
    fn from(r: TrackRestriction) -> Self {
        r.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTHING_NEW: TrackUsage = TrackUsage {
        used_new_track: false,
        changed_city: false,
        new_tile_has_city: false,
    };

    #[test]
    fn policies() {
        assert!(TrackRestriction::Permissive.check(NOTHING_NEW).is_ok());
        assert!(TrackRestriction::SemiRestrictive.check(NOTHING_NEW).is_err());
        assert!(TrackRestriction::SemiRestrictive
            .check(TrackUsage {
                changed_city: true,
                ..NOTHING_NEW
            })
            .is_ok());
        assert!(TrackRestriction::Restrictive
            .check(TrackUsage {
                changed_city: true,
                ..NOTHING_NEW
            })
            .is_err());
        assert!(TrackRestriction::CityPermissive
            .check(TrackUsage {
                new_tile_has_city: true,
                ..NOTHING_NEW
            })
            .is_ok());
    }

    #[test]
    fn rejection_messages() {
        let err = TrackRestriction::Restrictive.check(NOTHING_NEW).unwrap_err();
        assert_eq!(err, TwError::illegal("Must use new track"));
        let err = TrackRestriction::CityPermissive
            .check(TrackUsage {
                changed_city: true,
                ..NOTHING_NEW
            })
            .unwrap_err();
        assert_eq!(err, TwError::illegal("Must be city tile or use new track"));
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let err = "lenient".parse::<TrackRestriction>().unwrap_err();
        assert!(matches!(err, TwError::Config { .. }));
        assert_eq!(
            "city_permissive".parse::<TrackRestriction>().unwrap(),
            TrackRestriction::CityPermissive
        );
    }
}
