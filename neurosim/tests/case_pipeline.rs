//! Case directories through the full pipeline.

use std::path::Path;

use image::{GrayImage, Luma};
use mesh_types::MeshTopology;
use neurosim::{
    export_region_meshes, fallback, list_artifacts, reconstruct_volume, segment_case,
    simulate_case, ExportRequest, JobRegistry, JobStatus, MeshSource, PipelineParams,
    SegmentationOutput, SimulationOutput,
};
use volume_types::{ScalarVolume, Shape};

fn params() -> PipelineParams {
    PipelineParams::default().with_phantom_seed(5)
}

fn write_disk_image(dir: &Path, name: &str, bright: u8) {
    let image = GrayImage::from_fn(40, 40, |x, y| {
        let dx = f64::from(x) - 19.5;
        let dy = f64::from(y) - 19.5;
        if dx.hypot(dy) < 12.0 {
            Luma([bright])
        } else {
            Luma([0])
        }
    });
    image.save(dir.join(name)).unwrap();
}

/// Float32 NIfTI-1 with unit spacing; `values` in `(z, y, x)` order.
fn write_nifti(path: &Path, shape: Shape, values: &[f32]) {
    let mut bytes = vec![0_u8; 352];
    let mut put = |at: usize, raw: &[u8]| bytes[at..at + raw.len()].copy_from_slice(raw);
    put(0, &348_i32.to_le_bytes());
    let extent = |n: usize| i16::try_from(n).unwrap();
    let dim = [3, extent(shape.cols), extent(shape.rows), extent(shape.depth), 1, 1, 1, 1];
    for (i, d) in dim.iter().enumerate() {
        put(40 + 2 * i, &d.to_le_bytes());
    }
    put(70, &16_i16.to_le_bytes());
    put(72, &32_i16.to_le_bytes());
    for i in 0..4 {
        put(76 + 4 * i, &1.0_f32.to_le_bytes());
    }
    put(108, &352.0_f32.to_le_bytes());
    put(112, &1.0_f32.to_le_bytes());
    put(344, b"n+1\0");
    for v in values {
        bytes.extend(v.to_le_bytes());
    }
    std::fs::write(path, bytes).unwrap();
}

fn layered() -> ScalarVolume {
    ScalarVolume::from_fn(Shape::new(20, 20, 20), |d, r, c| {
        let q = |i: usize| (i as f32 - 9.5).powi(2);
        let radius = (q(d) + q(r) + q(c)).sqrt();
        if radius < 4.0 {
            1.0
        } else if radius < 7.0 {
            0.45
        } else if radius < 9.0 {
            0.2
        } else {
            0.0
        }
    })
}

#[test]
fn blank_volume_falls_back_to_phantom() {
    let volume = ScalarVolume::zeros(Shape::new(40, 40, 40));
    let err = reconstruct_volume(&volume, &params()).unwrap_err();
    assert!(err.is_recoverable());

    let reconstruction = fallback(err.to_string(), &params());
    assert_eq!(reconstruction.mesh.vertex_count(), 900);
    assert_eq!(reconstruction.mesh.face_count(), 1682);
}

#[test]
fn blank_image_case_falls_back_to_phantom() {
    let case = tempfile::tempdir().unwrap();
    write_disk_image(case.path(), "scan.png", 0);

    let reconstruction = segment_case(case.path(), &params());
    assert!(reconstruction.source.is_fallback());
    assert_eq!(reconstruction.mesh.vertex_count(), 900);
}

#[test]
fn image_case_reconstructs() {
    let case = tempfile::tempdir().unwrap();
    write_disk_image(case.path(), "scan.png", 200);

    let reconstruction = segment_case(case.path(), &params().with_target_vertices(1500));
    assert!(matches!(reconstruction.source, MeshSource::Reconstructed { .. }));
    let mesh = &reconstruction.mesh;
    assert!(mesh.vertex_count() > 0);
    assert!(mesh.vertex_count() <= 1500);
    assert!(mesh.has_valid_indices());
    assert_eq!(reconstruction.labels.len(), mesh.vertex_count());

    let output = SegmentationOutput::from(&reconstruction);
    assert_eq!(output.source, "reconstructed");
    assert_eq!(output.mesh_data.labels.map(|l| l.len()), Some(mesh.vertex_count()));
    assert!(output.fallback_reason.is_none());
}

#[test]
fn simulation_output_serializes() {
    let result = simulate_case(Path::new("/nonexistent/case"), "tumor", 5.0, &params()).unwrap();
    let output = SimulationOutput::from(&result);
    assert_eq!(output.stress.len(), 900);

    let json = serde_json::to_value(&output).unwrap();
    assert!(json["metrics"]["max_displacement_mm"].is_number());
    assert!(json["metrics"]["vulnerable_regions"].is_array());
    assert_eq!(json["deformed_mesh"]["faces"].as_array().map(Vec::len), Some(1682));
}

#[test]
fn background_export_writes_artifacts() {
    let case = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_disk_image(case.path(), "scan.png", 255);

    let registry = JobRegistry::new();
    let status = registry.spawn_region_export(
        ExportRequest {
            case_id: "disk".into(),
            case_dir: case.path().to_path_buf(),
            out_dir: out.path().to_path_buf(),
        },
        params(),
    );
    assert_eq!(status, JobStatus::Processing);

    let Some(JobStatus::Completed { artifacts }) = registry.wait("disk") else {
        panic!("export job did not complete");
    };
    assert!(!artifacts.is_empty());

    let listed = list_artifacts(out.path()).unwrap();
    assert_eq!(listed.len(), artifacts.len());
    for artifact in &artifacts {
        assert!(listed.iter().any(|a| a.file_name == artifact.file_name));
    }
}

#[test]
fn direct_export_matches_listing() {
    let out = tempfile::tempdir().unwrap();
    let volume = ScalarVolume::from_fn(Shape::new(16, 16, 16), |d, r, c| {
        if (4..12).contains(&d) && (4..12).contains(&r) && (4..12).contains(&c) {
            0.7
        } else {
            0.0
        }
    });
    // A single region: everything above background normalizes to 1.0.
    let export = export_region_meshes(&volume, out.path(), None, &params()).unwrap();
    assert_eq!(export.artifacts.len(), 1);
    assert_eq!(export.artifacts[0].label, 4);
    assert_eq!(export.artifacts[0].voxels, 512);
    assert_eq!(list_artifacts(out.path()).unwrap().len(), 1);
}

#[test]
fn nifti_case_exports_regions() {
    let case = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let volume = layered();
    write_nifti(&case.path().join("t1.nii"), volume.shape(), volume.values());

    let registry = JobRegistry::new();
    registry.spawn_region_export(
        ExportRequest {
            case_id: "t1".into(),
            case_dir: case.path().to_path_buf(),
            out_dir: out.path().to_path_buf(),
        },
        params(),
    );

    let Some(JobStatus::Completed { artifacts }) = registry.wait("t1") else {
        panic!("export job did not complete");
    };
    let labels: Vec<u16> = artifacts.iter().map(|a| a.label).collect();
    assert_eq!(labels, vec![1, 2, 4]);
    assert_eq!(list_artifacts(out.path()).unwrap().len(), 3);
}
