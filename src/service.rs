//! End-to-end analysis pipeline: request -> model -> escalating solve ->
//! extraction -> response.

use crate::builder;
use crate::error::SolverError;
use crate::escalation::{self, Tier};
use crate::extract;
use crate::model::{AnalysisOptions, FrameModel};
use crate::request::AnalyzeRequest;
use crate::response::{AnalyzeResponse, MaxDisp, NodeDisplacement, OrderedMap};

/// Run a full analysis. Never fails outright: unsolvable or invalid models
/// come back as a response with `ok: false` and a diagnostic note.
pub fn run_analysis(req: AnalyzeRequest) -> AnalyzeResponse {
    let req = req.with_defaults();
    let combo = req
        .governing_combo()
        .unwrap_or("Combo 1")
        .to_string();

    if let Err(e) = req.validate() {
        return AnalyzeResponse::failure(&combo, &format!("Invalid model: {e}"));
    }

    let solved = escalation::run(|_tier, profile| {
        let mut model = builder::build_model(&req, profile)?;
        model.analyze(AnalysisOptions {
            check_stability: profile.strict_stability,
        })?;
        Ok(model)
    });

    match solved {
        Ok(solution) => match assemble(&req, &solution.value, &combo, solution.tier) {
            Ok(response) => response,
            Err(e) => AnalyzeResponse::failure(&combo, &format!("Result extraction failed: {e}")),
        },
        Err(e) => AnalyzeResponse::failure(&combo, &format!("Analysis failed: {e}")),
    }
}

fn assemble(
    req: &AnalyzeRequest,
    model: &FrameModel,
    combo: &str,
    tier: Tier,
) -> Result<AnalyzeResponse, SolverError> {
    let mut nodes = OrderedMap::new();
    for node in &req.nodes {
        let d = model.node_displacement(&node.id, combo)?;
        nodes.insert(
            &node.id,
            NodeDisplacement {
                dx: d[0],
                dy: d[1],
                dz: d[2],
            },
        );
    }

    let max_disp = extract::max_displacement(model, req.nodes.iter().map(|n| n.id.as_str()), combo)?
        .map(|(node_id, value)| MaxDisp { node_id, value })
        .unwrap_or_default();

    let mut members = OrderedMap::new();
    for member in &req.members {
        let results = extract::member_results(model, &member.id, combo)?;
        members.insert(&member.id, results.into());
    }

    Ok(AnalyzeResponse {
        ok: true,
        combo: combo.to_string(),
        nodes,
        max_disp,
        members,
        note: tier.note().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cantilever_request() -> AnalyzeRequest {
        serde_json::from_value(serde_json::json!({
            "nodes": [
                {"id": "N1", "x": 0.0, "y": 0.0, "z": 0.0},
                {"id": "N2", "x": 3.0, "y": 0.0, "z": 0.0}
            ],
            "members": [
                {"id": "M1", "i": "N1", "j": "N2", "type": "frame",
                 "E": 2.0e8, "G": 8.0e7, "A": 0.01,
                 "Iy": 1.0e-5, "Iz": 1.0e-5, "J": 2.0e-5}
            ],
            "supports": [
                {"nodeId": "N1", "fix": {"DX": true, "DY": true, "DZ": true,
                                          "RX": true, "RY": true, "RZ": true}}
            ],
            "cases": [
                {"name": "Live", "selfweightY": 0.0,
                 "memberUDL": [{"memberId": "M1", "dir": "GY", "w": -10.0}]}
            ],
            "combos": [
                {"name": "Combo 1", "factors": {"Live": 1.0}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn cantilever_solves_exactly() {
        let resp = run_analysis(cantilever_request());
        assert!(resp.ok);
        assert_eq!(resp.combo, "Combo 1");
        assert!(resp.note.is_empty());

        let m1 = resp.members.get("M1").unwrap();
        assert_relative_eq!(m1.max_abs.mz, 45.0, max_relative = 1e-9);
        assert_relative_eq!(m1.max_abs.vy, 30.0, max_relative = 1e-9);

        assert_eq!(resp.max_disp.node_id, "N2");
        assert!(resp.max_disp.value > 0.0);
    }

    #[test]
    fn invalid_request_fails_without_solving() {
        let mut req = cantilever_request();
        req.members[0].j = "N9".to_string();
        let resp = run_analysis(req);
        assert!(!resp.ok);
        assert!(resp.nodes.is_empty());
        assert!(resp.members.is_empty());
        assert!(resp.note.starts_with("Invalid model"));
    }

    #[test]
    fn floating_model_comes_back_stabilized() {
        let mut req = cantilever_request();
        req.supports.clear();
        let resp = run_analysis(req);
        assert!(resp.ok);
        assert!(resp.note.contains("ground springs"));
        let d = resp.nodes.get("N2").unwrap();
        assert!(d.dy.is_finite());
    }
}
