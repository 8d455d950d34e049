//! Integration tests for the viewer operations
//!
//! These drive `Viewer` the way the application does, without a window:
//! 1. Loading a known id replaces the assembly; an unknown id keeps it
//! 2. Resizing to the same size leaves the projection alone
//! 3. Exports are taken in the assembled pose, whatever the animation state
//! 4. Export with nothing attached, or a failed encode, never reaches the sink
//! 5. Viewers share no state

use std::sync::{Arc, Mutex, Once};

use explode3d::systems::{DirectorySink, MemorySink};
use explode3d::{Viewer, ViewerError};
use explode3d_export::{AssetEncoder, ExportError};
use explode3d_core::{
    Assembly, AssemblyRegistry, AssemblySource, FlatTextures, Geometry, Material, Part,
    RegistryError, Vec3, ViewState,
};

const SETTLE_TICKS: usize = 200;

/// Keeps every log record so tests can check what was reported
struct RecordingLogger {
    records: Mutex<Vec<(log::Level, String)>>,
}

impl log::Log for RecordingLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: RecordingLogger = RecordingLogger {
    records: Mutex::new(Vec::new()),
};
static LOGGER_INIT: Once = Once::new();

fn recording_logger() -> &'static RecordingLogger {
    LOGGER_INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
    &LOGGER
}

/// Encoder that always fails the container size check
struct OversizedEncoder;

impl AssetEncoder for OversizedEncoder {
    fn encode(&self, _assembly: &Assembly) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::BufferTooLarge(1 << 33))
    }
}

/// Two small fixed assemblies, counting builds
struct TestSource {
    builds: usize,
}

impl TestSource {
    fn new() -> Self {
        Self { builds: 0 }
    }
}

impl AssemblySource for TestSource {
    fn build(&mut self, id: &str) -> Result<Assembly, RegistryError> {
        let geometry = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
        let material = Arc::new(Material::new(0x8899aa));
        let parts = match id {
            "block" => vec![
                Part::new(geometry.clone(), material.clone()),
                Part::new(geometry.clone(), material.clone())
                    .at(Vec3::new(0.0, 1.0, 0.0))
                    .exploding(Vec3::new(0.0, 2.0, 0.0)),
            ],
            "pair" => vec![
                Part::new(geometry.clone(), material.clone()).exploding(Vec3::new(-1.0, 0.0, 0.0)),
                Part::new(geometry, material).exploding(Vec3::new(1.0, 0.0, 0.0)),
            ],
            _ => return Err(RegistryError::NotFound(id.to_string())),
        };
        self.builds += 1;
        Ok(Assembly::new(id, parts))
    }

    fn contains(&self, id: &str) -> bool {
        matches!(id, "block" | "pair")
    }
}

fn test_viewer() -> Viewer<TestSource> {
    let mut viewer = Viewer::new(TestSource::new());
    viewer.init(800, 600);
    viewer
}

fn settle<S: AssemblySource>(viewer: &mut Viewer<S>) {
    for _ in 0..SETTLE_TICKS {
        viewer.tick().unwrap();
    }
}

// ==================== Load Tests ====================

#[test]
fn test_load_replaces_assembly() {
    let mut viewer = test_viewer();
    viewer.load_assembly("block", false, false, false).unwrap();
    viewer.load_assembly("pair", false, false, false).unwrap();

    let scene = viewer.scene().unwrap();
    let assembly = scene.current_assembly().unwrap();
    assert_eq!(assembly.id(), "pair");
    assert_eq!(assembly.part_count(), 2);
    assert_eq!(viewer.source().builds, 2);
}

#[test]
fn test_unknown_id_keeps_assembly_and_applies_flags() {
    let mut viewer = test_viewer();
    viewer.load_assembly("block", false, true, false).unwrap();
    let generation = viewer.scene().unwrap().generation();

    let result = viewer.load_assembly("missing", true, false, false);
    assert!(matches!(result, Err(ViewerError::NotFound(ref id)) if id == "missing"));

    assert_eq!(viewer.current_id(), Some("block"));
    assert_eq!(viewer.scene().unwrap().generation(), generation);
    assert_eq!(viewer.view_state(), ViewState::new(true, false));
}

#[test]
fn test_reload_starts_assembled() {
    let mut viewer = test_viewer();
    viewer.load_assembly("block", true, false, false).unwrap();
    settle(&mut viewer);
    assert!(!viewer.scene().unwrap().current_assembly().unwrap().is_assembled(1e-3));

    // same id again: a fresh build, back at rest
    viewer.load_assembly("block", true, false, false).unwrap();
    assert!(viewer.scene().unwrap().current_assembly().unwrap().is_assembled(1e-6));
}

// ==================== Animation Tests ====================

#[test]
fn test_explode_converges_to_scaled_offset() {
    let mut viewer = test_viewer();
    viewer.load_assembly("block", true, false, false).unwrap();
    settle(&mut viewer);

    let assembly = viewer.scene().unwrap().current_assembly().unwrap();
    let moved = assembly.parts()[1].displacement();
    assert!((moved - Vec3::new(0.0, 1.4, 0.0)).length() < 1e-3);
    // static part never moves
    assert_eq!(assembly.parts()[0].displacement(), Vec3::ZERO);

    viewer.set_explode_state(false);
    settle(&mut viewer);
    assert!(viewer.scene().unwrap().current_assembly().unwrap().is_assembled(1e-3));
}

#[test]
fn test_rotation_toggle_keeps_yaw() {
    let mut viewer = test_viewer();
    viewer.load_assembly("pair", false, true, false).unwrap();
    for _ in 0..10 {
        viewer.tick().unwrap();
    }
    let yaw = viewer.scene().unwrap().current_assembly().unwrap().yaw();
    assert!((yaw - 0.05).abs() < 1e-5);

    viewer.set_rotate_state(false);
    for _ in 0..10 {
        viewer.tick().unwrap();
    }
    assert_eq!(viewer.scene().unwrap().current_assembly().unwrap().yaw(), yaw);

    viewer.set_rotate_state(true);
    viewer.tick().unwrap();
    let resumed = viewer.scene().unwrap().current_assembly().unwrap().yaw();
    assert!((resumed - (yaw + 0.005)).abs() < 1e-5);
}

// ==================== Surface Tests ====================

#[test]
fn test_resize_same_size_is_idempotent() {
    let mut viewer = test_viewer();
    let revision = viewer.scene().unwrap().camera().projection_revision();

    assert!(!viewer.resize(800, 600).unwrap());
    assert_eq!(viewer.scene().unwrap().camera().projection_revision(), revision);

    assert!(viewer.resize(1280, 720).unwrap());
    assert!(!viewer.resize(1280, 720).unwrap());
    assert_eq!(viewer.scene().unwrap().camera().viewport(), (1280, 720));
}

// ==================== Export Tests ====================

#[test]
fn test_export_mid_explosion_is_assembled() {
    let mut reference = test_viewer();
    reference.load_assembly("block", false, false, false).unwrap();
    let mut sink = MemorySink::new();
    reference.export_asset("block", &mut sink).unwrap();
    let assembled = sink.get("block_3d_model.glb").unwrap().to_vec();

    let mut viewer = test_viewer();
    viewer.load_assembly("block", true, true, false).unwrap();
    for _ in 0..7 {
        viewer.tick().unwrap();
    }
    let live = viewer.scene().unwrap().current_assembly().unwrap();
    assert!(!live.is_assembled(1e-3));
    assert!(live.yaw() > 0.0);
    let displacements = live.displacements();

    let mut sink = MemorySink::new();
    viewer.export_asset("block", &mut sink).unwrap();
    assert_eq!(sink.get("block_3d_model.glb").unwrap(), &assembled[..]);

    // the live scene is untouched by the export
    let live = viewer.scene().unwrap().current_assembly().unwrap();
    assert_eq!(live.displacements(), displacements);
}

#[test]
fn test_export_without_assembly_is_unavailable() {
    let mut sink = MemorySink::new();

    let viewer = Viewer::new(TestSource::new());
    assert!(matches!(
        viewer.export_asset("none", &mut sink),
        Err(ViewerError::ExportUnavailable)
    ));

    let viewer = test_viewer();
    assert!(matches!(
        viewer.export_asset("none", &mut sink),
        Err(ViewerError::ExportUnavailable)
    ));
    assert!(sink.files.is_empty());
}

#[test]
fn test_failed_encode_is_logged_and_leaves_sink_empty() {
    let logger = recording_logger();
    let mut viewer = Viewer::new(TestSource::new()).with_exporter(OversizedEncoder);
    viewer.init(800, 600);
    viewer.load_assembly("block", true, false, false).unwrap();

    let mut sink = MemorySink::new();
    let result = viewer.export_asset("block", &mut sink);
    assert!(matches!(result, Err(ViewerError::Serialization(_))));
    assert!(sink.files.is_empty());

    let records = logger.records.lock().unwrap();
    assert!(records
        .iter()
        .any(|(level, msg)| *level == log::Level::Error && msg.starts_with("Export failed") && msg.contains("too large")));
}

#[test]
fn test_export_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path().join("exports"));

    let mut viewer = Viewer::new(AssemblyRegistry::with_builtin_models(Box::new(FlatTextures)));
    viewer.init(640, 480);
    viewer.load_assembly("cmg", true, false, false).unwrap();

    let path = viewer.export_asset("cmg", &mut sink).unwrap();
    assert_eq!(path, dir.path().join("exports").join("cmg_3d_model.glb"));

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"glTF");
    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("exports"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
        .collect();
    assert!(leftovers.is_empty());
}

// ==================== Isolation Tests ====================

#[test]
fn test_viewers_are_independent() {
    let mut a = test_viewer();
    let mut b = test_viewer();
    a.load_assembly("block", true, true, false).unwrap();
    b.load_assembly("pair", false, false, false).unwrap();

    for _ in 0..5 {
        a.tick().unwrap();
        b.tick().unwrap();
    }
    a.scene_mut().unwrap().camera_mut().orbit(0.5, 0.1);

    assert_eq!(b.current_id(), Some("pair"));
    assert_eq!(b.view_state(), ViewState::new(false, false));
    let b_assembly = b.scene().unwrap().current_assembly().unwrap();
    assert_eq!(b_assembly.yaw(), 0.0);
    assert!(b_assembly.is_assembled(1e-6));
    assert_ne!(a.scene().unwrap().camera().eye(), b.scene().unwrap().camera().eye());
}
