use ising_core::{BinaryQuadraticModel, CouplingSpec, FieldSpec};
use ising_qpu::embedding::{find_direct_embedding, verify_embedding, TargetGraph};

fn model(edges: &[(u32, u32)]) -> BinaryQuadraticModel {
    let j: CouplingSpec = edges.iter().map(|&e| (e, 1.0)).collect();
    let h: FieldSpec = edges
        .iter()
        .flat_map(|&(u, v)| [(u, 0.0), (v, 0.0)])
        .collect();
    BinaryQuadraticModel::from_ising(&h, &j, 0.0).unwrap()
}

/// 3x3 grid labelled 100..109, row-major.
fn grid() -> TargetGraph {
    let qubits: Vec<u32> = (100..109).collect();
    let mut edges = Vec::new();
    for r in 0..3 {
        for c in 0..3 {
            let q = 100 + r * 3 + c;
            if c < 2 {
                edges.push((q, q + 1));
            }
            if r < 2 {
                edges.push((q, q + 3));
            }
        }
    }
    TargetGraph::from_edges(&qubits, &edges)
}

#[test]
fn chain_fits_on_a_grid() {
    let bqm = model(&[(0, 1), (1, 2)]);
    let target = grid();
    let embedding = find_direct_embedding(&bqm, &target, 10_000).unwrap();
    assert_eq!(embedding.len(), 3);
    assert!(verify_embedding(&bqm, &target, &embedding));
}

#[test]
fn square_cycle_fits_on_a_grid() {
    let bqm = model(&[(0, 1), (1, 2), (2, 3), (0, 3)]);
    let target = grid();
    let embedding = find_direct_embedding(&bqm, &target, 10_000).unwrap();
    assert!(verify_embedding(&bqm, &target, &embedding));
}

#[test]
fn triangle_has_no_direct_placement_on_a_bipartite_grid() {
    let bqm = model(&[(0, 1), (1, 2), (0, 2)]);
    let err = find_direct_embedding(&bqm, &grid(), 10_000).unwrap_err();
    assert_eq!(err.info().code, "no-placement");
}

#[test]
fn exhausted_budget_is_reported() {
    let bqm = model(&[(0, 1), (1, 2), (0, 2)]);
    let err = find_direct_embedding(&bqm, &grid(), 1).unwrap_err();
    assert_eq!(err.info().code, "search-budget");
}

#[test]
fn too_many_variables_fail_fast() {
    let target = TargetGraph::from_edges(&[0, 1], &[(0, 1)]);
    let err = find_direct_embedding(&model(&[(0, 1), (1, 2)]), &target, 10_000).unwrap_err();
    assert_eq!(err.info().code, "no-placement");
}

#[test]
fn isolated_variables_are_placed() {
    let mut bqm = BinaryQuadraticModel::new(0.0);
    bqm.add_variable(5, 0.1);
    bqm.add_variable(6, -0.1);
    let target = grid();
    let embedding = find_direct_embedding(&bqm, &target, 100).unwrap();
    assert_eq!(embedding.len(), 2);
    assert_ne!(embedding[&5], embedding[&6]);
}
