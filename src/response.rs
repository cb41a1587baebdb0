//! Wire-format response types.
//!
//! Maps keyed by node/member id are serialized in request order, so the
//! same request always produces byte-identical JSON.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::extract::{ForceEnvelope, MemberResults};

/// A JSON object that keeps its insertion order when serialized.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap<T>(Vec<(String, T)>);

impl<T> OrderedMap<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        self.0.push((key.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T: Serialize> Serialize for OrderedMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Translational displacement components of one node.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct NodeDisplacement {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

/// Local end forces at one member end.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct EndForces {
    #[serde(rename = "Fx")]
    pub fx: f64,
    #[serde(rename = "Fy")]
    pub fy: f64,
    #[serde(rename = "Fz")]
    pub fz: f64,
    #[serde(rename = "Mx")]
    pub mx: f64,
    #[serde(rename = "My")]
    pub my: f64,
    #[serde(rename = "Mz")]
    pub mz: f64,
}

impl From<[f64; 6]> for EndForces {
    fn from(f: [f64; 6]) -> Self {
        Self {
            fx: f[0],
            fy: f[1],
            fz: f[2],
            mx: f[3],
            my: f[4],
            mz: f[5],
        }
    }
}

/// Envelope maxima of a member's internal forces.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MaxAbs {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "Vy")]
    pub vy: f64,
    #[serde(rename = "Vz")]
    pub vz: f64,
    #[serde(rename = "T")]
    pub t: f64,
    #[serde(rename = "My")]
    pub my: f64,
    #[serde(rename = "Mz")]
    pub mz: f64,
}

impl From<ForceEnvelope> for MaxAbs {
    fn from(e: ForceEnvelope) -> Self {
        Self {
            n: e.n,
            vy: e.vy,
            vz: e.vz,
            t: e.t,
            my: e.my,
            mz: e.mz,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MemberReport {
    pub i: EndForces,
    pub j: EndForces,
    #[serde(rename = "maxAbs")]
    pub max_abs: MaxAbs,
    #[serde(rename = "dyMin")]
    pub dy_min: f64,
    #[serde(rename = "dyMax")]
    pub dy_max: f64,
    #[serde(rename = "dyAbsMax")]
    pub dy_abs_max: f64,
}

impl From<MemberResults> for MemberReport {
    fn from(r: MemberResults) -> Self {
        Self {
            i: r.i_forces.into(),
            j: r.j_forces.into(),
            max_abs: r.envelope.into(),
            dy_min: r.dy_min,
            dy_max: r.dy_max,
            dy_abs_max: r.dy_abs_max,
        }
    }
}

/// The node with the greatest displacement magnitude. A model without
/// nodes reports the empty-record form, never `null`.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MaxDisp {
    #[serde(rename = "nodeId")]
    pub node_id: String,
    pub value: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalyzeResponse {
    pub ok: bool,
    pub combo: String,
    pub nodes: OrderedMap<NodeDisplacement>,
    #[serde(rename = "maxDisp")]
    pub max_disp: MaxDisp,
    pub members: OrderedMap<MemberReport>,
    pub note: String,
}

impl AnalyzeResponse {
    /// A failed analysis: empty result maps and a diagnostic note.
    pub fn failure(combo: &str, note: &str) -> Self {
        Self {
            ok: false,
            combo: combo.to_string(),
            nodes: OrderedMap::new(),
            max_disp: MaxDisp::default(),
            members: OrderedMap::new(),
            note: note.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_map_preserves_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("z", 1);
        map.insert("a", 2);
        map.insert("m", 3);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"z":1,"a":2,"m":3}"#);
        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn failure_response_shape() {
        let resp = AnalyzeResponse::failure("Combo 1", "Analysis failed: singular matrix");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["combo"], "Combo 1");
        assert!(json["nodes"].as_object().unwrap().is_empty());
        assert!(json["members"].as_object().unwrap().is_empty());
        assert_eq!(json["maxDisp"]["nodeId"], "");
        assert_eq!(json["maxDisp"]["value"], 0.0);
        assert!(json["note"].as_str().unwrap().contains("singular"));
    }

    #[test]
    fn member_report_uses_wire_field_names() {
        let report = MemberReport {
            i: [1.0, 2.0, 3.0, 4.0, 5.0, 6.0].into(),
            j: [0.0; 6].into(),
            max_abs: ForceEnvelope::default().into(),
            dy_min: -0.01,
            dy_max: 0.0,
            dy_abs_max: 0.01,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["i"]["Fx"], 1.0);
        assert_eq!(json["i"]["Mz"], 6.0);
        assert_eq!(json["maxAbs"]["N"], 0.0);
        assert_eq!(json["dyAbsMax"], 0.01);
    }
}
