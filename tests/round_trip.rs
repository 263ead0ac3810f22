use std::fs;

use gengrid::{load_grid, GridConfig, GridError, GridFiles, MergeType, MergedGrid, MeshType};

#[test]
fn saved_grid_loads_back_exactly() {
    let dir = tempfile::tempdir().unwrap();

    for mesh_type in [MeshType::Rand, MeshType::Power, MeshType::Bdry3, MeshType::Paper] {
        let config = GridConfig::new(12, -1.0, 1.0, mesh_type, MergeType::Lrp).with_seed(99);
        let merged = MergedGrid::build(&config).unwrap();
        let files = merged.save(dir.path()).unwrap();
        assert_eq!(
            files,
            GridFiles::for_elements(dir.path(), merged.grid().num_elem())
        );

        let loaded = load_grid(&files).unwrap();
        assert_eq!(loaded.grid.nodes(), merged.grid().nodes());
        assert_eq!(loaded.grid.dx().to_bits(), merged.grid().dx().to_bits());
        assert_eq!(loaded.tol.to_bits(), merged.tolerance().to_bits());
        assert_eq!(loaded.grid.mesh_type(), mesh_type);
        assert_eq!(loaded.merge_type, MergeType::Lrp);
    }
}

#[test]
fn load_path_reproduces_merge() {
    let dir = tempfile::tempdir().unwrap();
    let config = GridConfig::new(30, 0.0, 2.0, MeshType::Rand, MergeType::Rp).with_seed(5);
    let merged = MergedGrid::build(&config).unwrap();
    let files = merged.save(dir.path()).unwrap();

    // the saved merge type wins over the requested one
    let reload = GridConfig::new(0, 0.0, 0.0, MeshType::Load, MergeType::Lrnp)
        .with_load(files.stem())
        .with_output_dir(dir.path());
    let reloaded = MergedGrid::build(&reload).unwrap();

    assert_eq!(reloaded.merge_type(), MergeType::Rp);
    assert_eq!(reloaded.grid(), merged.grid());
    assert_eq!(reloaded.map(), merged.map());
}

#[test]
fn pairing_file_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = GridConfig::new(4, 0.0, 1.0, MeshType::Uniform, MergeType::Lrp);
    let files = MergedGrid::build(&config)
        .unwrap()
        .save(dir.path())
        .unwrap();

    let pairing = fs::read_to_string(files.pairing()).unwrap();
    assert_eq!(pairing, "0 0 1\n1 1 1\n2 2 1\n3 3 1\n");

    let metadata = fs::read_to_string(files.metadata()).unwrap();
    assert_eq!(metadata, "0.25\nLRP\n0.125\nuniform\n");

    let nodes = fs::read_to_string(files.nodes()).unwrap();
    assert_eq!(nodes, "0\n0.25\n0.5\n0.75\n1\n");
}

#[test]
fn periodic_pairing_wraps() {
    let dir = tempfile::tempdir().unwrap();
    let config = GridConfig::new(2, 0.0, 1.0, MeshType::Bdry1, MergeType::Lp);
    let merged = MergedGrid::build(&config).unwrap();
    let files = merged.save(dir.path()).unwrap();

    // the alpha cell at the left wall merges across the seam with cell 1
    let pairing = fs::read_to_string(files.pairing()).unwrap();
    assert_eq!(pairing, "1 0 1\n1 1 2\n");
}

#[test]
fn failed_merge_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    // both cells are alpha cells and cannot support each other periodically
    let config = GridConfig::new(2, 0.0, 1.0, MeshType::Bdry2, MergeType::Lrp)
        .with_output_dir(dir.path());
    let err = MergedGrid::build(&config).unwrap_err();
    assert!(matches!(err, GridError::ToleranceExceedsDomain { .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_grid_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = GridConfig::new(4, 0.0, 1.0, MeshType::Load, MergeType::Lrp)
        .with_load(dir.path().join("grid_4"));
    assert!(matches!(
        MergedGrid::build(&config),
        Err(GridError::Io { .. })
    ));
}
