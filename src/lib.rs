//! Frame Analysis - 3D structural frame analysis as a library and service
//!
//! Accepts a structural model (nodes, frame/truss members, supports, load
//! cases and combinations), solves it with a native linear-elastic stiffness
//! solver, and reports nodal displacements plus per-member end forces and
//! internal-force envelopes.
//!
//! Models that are singular or kinematically unstable as given are not
//! rejected outright: the solve escalates through stabilization stages
//! (fixing support rotations, then adding weak ground springs) and flags
//! stabilized results with a note.
//!
//! ## Example
//! ```rust
//! use frame_analysis::request::AnalyzeRequest;
//! use frame_analysis::service;
//!
//! let request: AnalyzeRequest = serde_json::from_value(serde_json::json!({
//!     "nodes": [
//!         {"id": "N1", "x": 0.0, "y": 0.0, "z": 0.0},
//!         {"id": "N2", "x": 5.0, "y": 0.0, "z": 0.0}
//!     ],
//!     "members": [
//!         {"id": "M1", "i": "N1", "j": "N2", "type": "frame",
//!          "E": 2.0e8, "G": 8.0e7, "A": 0.01,
//!          "Iy": 1.0e-5, "Iz": 1.0e-5, "J": 2.0e-5}
//!     ],
//!     "supports": [
//!         {"nodeId": "N1", "fix": {"DX": true, "DY": true, "DZ": true,
//!                                   "RX": true, "RY": true, "RZ": true}}
//!     ]
//! })).unwrap();
//!
//! // With no cases or combos given, a single self-weight case is assumed.
//! let response = service::run_analysis(request);
//! assert!(response.ok);
//! assert_eq!(response.combo, "Combo 1");
//! ```

pub mod builder;
pub mod elements;
pub mod error;
pub mod escalation;
pub mod extract;
pub mod loads;
pub mod math;
pub mod model;
pub mod request;
pub mod response;
pub mod service;

// Re-export common types
pub mod prelude {
    pub use crate::elements::{Material, Member, Node, Releases, Section, Support};
    pub use crate::error::{RequestError, SolverError, SolverResult};
    pub use crate::escalation::{StabilizationProfile, Tier};
    pub use crate::loads::{DistributedLoad, LoadCombination, LoadDirection, NodeLoad};
    pub use crate::model::{AnalysisOptions, FrameModel};
    pub use crate::request::{AnalyzeRequest, UdlDirection};
    pub use crate::response::AnalyzeResponse;
    pub use crate::service::run_analysis;
}
