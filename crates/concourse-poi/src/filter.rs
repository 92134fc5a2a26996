//! Predicate combination for registry queries.

use concourse_types::{Point, Poi, PoiType};

/// A conjunctive filter over POI attributes.
///
/// Every set criterion must match; an empty filter matches everything.
/// Distance filtering measures straight-line distance from the given
/// point, ignoring floors -- combine with [`PoiFilter::on_floor`] to
/// stay within one floor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoiFilter {
    poi_type: Option<PoiType>,
    floor: Option<i32>,
    zone: Option<String>,
    is_active: Option<bool>,
    within: Option<(Point, f32)>,
}

impl PoiFilter {
    /// Create a filter that matches every POI.
    pub const fn new() -> Self {
        Self {
            poi_type: None,
            floor: None,
            zone: None,
            is_active: None,
            within: None,
        }
    }

    /// Require a specific category.
    #[must_use]
    pub const fn with_type(mut self, poi_type: PoiType) -> Self {
        self.poi_type = Some(poi_type);
        self
    }

    /// Require a specific floor. POIs without a floor never match.
    #[must_use]
    pub const fn on_floor(mut self, floor: i32) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Require a specific zone. POIs without a zone never match.
    #[must_use]
    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Require a specific activity state.
    #[must_use]
    pub const fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Require the POI to lie within `max_distance` of `from`.
    #[must_use]
    pub const fn within(mut self, from: Point, max_distance: f32) -> Self {
        self.within = Some((from, max_distance));
        self
    }

    /// Check whether a POI satisfies every set criterion.
    pub fn matches(&self, poi: &Poi) -> bool {
        if self.poi_type.is_some_and(|t| t != poi.poi_type) {
            return false;
        }
        if let Some(floor) = self.floor {
            if poi.position.floor != Some(floor) {
                return false;
            }
        }
        if let Some(zone) = &self.zone {
            if poi.position.zone.as_deref() != Some(zone.as_str()) {
                return false;
            }
        }
        if self.is_active.is_some_and(|a| a != poi.is_active) {
            return false;
        }
        if let Some((from, max_distance)) = self.within {
            if poi.distance_to(from) > max_distance {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use concourse_types::PoiPosition;

    use super::*;

    fn poi_at(id: &str, poi_type: PoiType, x: f32, y: f32, floor: Option<i32>, zone: Option<&str>) -> Poi {
        let mut poi = Poi::new(id, poi_type, id, x, y);
        poi.position = PoiPosition {
            x,
            y,
            floor,
            zone: zone.map(str::to_owned),
        };
        poi
    }

    #[test]
    fn empty_filter_matches_everything() {
        let poi = poi_at("p", PoiType::Food, 0.0, 0.0, None, None);
        assert!(PoiFilter::new().matches(&poi));
    }

    #[test]
    fn type_filter() {
        let poi = poi_at("p", PoiType::Food, 0.0, 0.0, None, None);
        assert!(PoiFilter::new().with_type(PoiType::Food).matches(&poi));
        assert!(!PoiFilter::new().with_type(PoiType::Session).matches(&poi));
    }

    #[test]
    fn floor_filter_requires_a_floor() {
        let on_two = poi_at("a", PoiType::Info, 0.0, 0.0, Some(2), None);
        let floorless = poi_at("b", PoiType::Info, 0.0, 0.0, None, None);
        let filter = PoiFilter::new().on_floor(2);
        assert!(filter.matches(&on_two));
        assert!(!filter.matches(&floorless));
    }

    #[test]
    fn zone_filter_requires_a_zone() {
        let in_hall = poi_at("a", PoiType::Social, 0.0, 0.0, None, Some("hall-a"));
        let zoneless = poi_at("b", PoiType::Social, 0.0, 0.0, None, None);
        let filter = PoiFilter::new().in_zone("hall-a");
        assert!(filter.matches(&in_hall));
        assert!(!filter.matches(&zoneless));
    }

    #[test]
    fn activity_filter() {
        let mut poi = poi_at("p", PoiType::Sponsor, 0.0, 0.0, None, None);
        assert!(PoiFilter::new().active(true).matches(&poi));
        poi.is_active = false;
        assert!(!PoiFilter::new().active(true).matches(&poi));
        assert!(PoiFilter::new().active(false).matches(&poi));
    }

    #[test]
    fn distance_filter_is_inclusive() {
        let poi = poi_at("p", PoiType::Landmark, 3.0, 4.0, None, None);
        let origin = Point::new(0.0, 0.0);
        assert!(PoiFilter::new().within(origin, 5.0).matches(&poi));
        assert!(!PoiFilter::new().within(origin, 4.9).matches(&poi));
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let poi = poi_at("p", PoiType::Food, 1.0, 1.0, Some(1), Some("court"));
        let matching = PoiFilter::new()
            .with_type(PoiType::Food)
            .on_floor(1)
            .in_zone("court")
            .active(true)
            .within(Point::new(0.0, 0.0), 10.0);
        assert!(matching.matches(&poi));

        let one_off = PoiFilter::new().with_type(PoiType::Food).on_floor(3);
        assert!(!one_off.matches(&poi));
    }
}
