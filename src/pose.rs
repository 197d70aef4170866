//! Total landmark maps.
//!
//! A `Pose` always holds a point for every `LandmarkKey`; unresolved joints sit
//! at the origin. Consumers index it directly and never branch on presence.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::ops::Index;

use crate::geometry::{Display, Point, Sensor};
use crate::landmark::{LandmarkKey, LANDMARK_COUNT};

pub struct Pose<S> {
    points: [Point<S>; LANDMARK_COUNT],
}

pub type SensorPose = Pose<Sensor>;
pub type DisplayPose = Pose<Display>;

impl<S> Pose<S> {
    /// Build a pose by evaluating `f` once per key, in `LandmarkKey::ALL` order.
    pub fn from_fn(mut f: impl FnMut(LandmarkKey) -> Point<S>) -> Self {
        let mut points = [Point::ORIGIN; LANDMARK_COUNT];
        for key in LandmarkKey::ALL {
            points[key.index()] = f(key);
        }
        Self { points }
    }

    pub fn get(&self, key: LandmarkKey) -> Point<S> {
        self.points[key.index()]
    }

    pub fn set(&mut self, key: LandmarkKey, point: Point<S>) {
        self.points[key.index()] = point;
    }

    pub fn iter(&self) -> impl Iterator<Item = (LandmarkKey, Point<S>)> + '_ {
        LandmarkKey::ALL
            .into_iter()
            .map(move |key| (key, self.points[key.index()]))
    }
}

impl<S> Default for Pose<S> {
    fn default() -> Self {
        Self {
            points: [Point::ORIGIN; LANDMARK_COUNT],
        }
    }
}

impl<S> Clone for Pose<S> {
    fn clone(&self) -> Self {
        Self {
            points: self.points,
        }
    }
}

impl<S> PartialEq for Pose<S> {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl<S> Index<LandmarkKey> for Pose<S> {
    type Output = Point<S>;

    fn index(&self, key: LandmarkKey) -> &Self::Output {
        &self.points[key.index()]
    }
}

impl<S> fmt::Debug for Pose<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, p)| (key.wire_name(), p)))
            .finish()
    }
}

/// Serializes in the plugin dictionary shape: `{"nosePosition": {"x": .., "y": ..}, ..}`.
impl<S> Serialize for Pose<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(LANDMARK_COUNT))?;
        for (key, point) in self.iter() {
            map.serialize_entry(key.wire_name(), &point)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SensorPoint;

    #[test]
    fn default_pose_is_all_origin() {
        let pose = SensorPose::default();
        assert_eq!(pose.iter().count(), LANDMARK_COUNT);
        assert!(pose.iter().all(|(_, p)| p == SensorPoint::ORIGIN));
    }

    #[test]
    fn set_replaces_single_key() {
        let mut pose = SensorPose::default();
        pose.set(LandmarkKey::LeftKnee, SensorPoint::new(10.0, 20.0));
        assert_eq!(pose[LandmarkKey::LeftKnee], SensorPoint::new(10.0, 20.0));
        assert_eq!(pose.get(LandmarkKey::RightKnee), SensorPoint::ORIGIN);
    }

    #[test]
    fn from_fn_visits_every_key_once() {
        let mut visited = Vec::new();
        let pose = SensorPose::from_fn(|key| {
            visited.push(key);
            SensorPoint::new(key.index() as f64, 0.0)
        });
        assert_eq!(visited, LandmarkKey::ALL.to_vec());
        assert_eq!(pose[LandmarkKey::Nose].x, LandmarkKey::Nose.index() as f64);
    }

    #[test]
    fn serializes_as_wire_dictionary() {
        let mut pose = SensorPose::default();
        pose.set(LandmarkKey::Nose, SensorPoint::new(3.0, 4.0));
        let value = serde_json::to_value(&pose).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), LANDMARK_COUNT);
        assert_eq!(obj["nosePosition"]["x"], 3.0);
        assert_eq!(obj["leftEarPosition"]["y"], 0.0);
    }
}
