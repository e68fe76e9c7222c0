//! End-to-end scaffold runs against the real adapters.

use std::path::{Path, PathBuf};

use expresso_adapters::{LocalFilesystem, MemoryFilesystem, ScriptedProcessRunner};
use expresso_core::{
    application::{ApplicationError, ScaffoldService, lock_path, ports::Filesystem},
    domain::{
        DIRECTORIES, DEV_SCRIPT, PLACEHOLDER_FILES, PackageManifest, START_SCRIPT, ScaffoldOutcome,
        Stage, TEMPLATE_FILES, templates,
    },
    error::ExpressoError,
};
use tempfile::TempDir;

const ROOT: &str = "/home/dev/api";
const LOCK_DIR: &str = "/cache/expresso/locks";

const NPM_INIT_MANIFEST: &str = r#"{
  "name": "api",
  "version": "1.0.0",
  "main": "index.js",
  "scripts": {
    "test": "echo \"Error: no test specified\" && exit 1"
  },
  "license": "ISC"
}"#;

fn memory_setup() -> (MemoryFilesystem, ScriptedProcessRunner) {
    let fs = MemoryFilesystem::with_root(ROOT);
    let runner = ScriptedProcessRunner::new().with_init_manifest(fs.clone(), NPM_INIT_MANIFEST);
    (fs, runner)
}

fn service(fs: &MemoryFilesystem, runner: &ScriptedProcessRunner) -> ScaffoldService {
    ScaffoldService::new(Box::new(fs.clone()), Box::new(runner.clone())).with_lock_dir(LOCK_DIR)
}

fn root_lock() -> PathBuf {
    lock_path(Path::new(LOCK_DIR), Path::new(ROOT))
}

// ── fresh workspace ──────────────────────────────────────────────────────────

#[test]
fn fresh_workspace_gets_full_skeleton() {
    let (fs, runner) = memory_setup();
    let root = Path::new(ROOT);

    let outcome = service(&fs, &runner).scaffold(root).unwrap();

    let ScaffoldOutcome::Completed(report) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(report.created_directories.len(), 11);
    assert_eq!(report.created_files.len(), 15);
    assert_eq!(report.completed_stages, Stage::ALL);

    for dir in DIRECTORIES {
        assert!(fs.is_dir(&root.join(dir)), "missing directory {dir}");
    }
    for file in PLACEHOLDER_FILES {
        assert!(fs.exists(&root.join(file)), "missing file {file}");
    }
}

#[test]
fn templates_hold_literal_content() {
    let (fs, runner) = memory_setup();
    let root = Path::new(ROOT);

    service(&fs, &runner).scaffold(root).unwrap();

    for template in TEMPLATE_FILES {
        assert_eq!(
            fs.read_file(&root.join(template.path)).as_deref(),
            Some(template.content),
            "{} differs",
            template.path
        );
    }
    let env = fs.read_file(&root.join(".env")).unwrap();
    assert!(env.lines().any(|l| l == "PORT=3000"));
    assert_eq!(fs.read_file(&root.join("src/app.js")).as_deref(), Some(templates::APP));
}

#[test]
fn non_template_placeholders_are_empty() {
    let (fs, runner) = memory_setup();
    let root = Path::new(ROOT);

    service(&fs, &runner).scaffold(root).unwrap();

    let templated: Vec<&str> = TEMPLATE_FILES.iter().map(|t| t.path).collect();
    for file in PLACEHOLDER_FILES.iter().filter(|f| !templated.contains(*f)) {
        assert_eq!(fs.read_file(&root.join(file)).as_deref(), Some(""), "{file}");
    }
}

#[test]
fn commands_run_in_order_from_root() {
    let (fs, runner) = memory_setup();

    service(&fs, &runner).scaffold(Path::new(ROOT)).unwrap();

    assert_eq!(
        runner.command_lines(),
        [
            "npm init -y",
            "npm install express",
            "npm install --save-dev nodemon"
        ]
    );
    assert!(
        runner
            .invocations()
            .iter()
            .all(|i| i.cwd == PathBuf::from(ROOT))
    );
}

#[test]
fn manifest_is_patched_and_preserved() {
    let (fs, runner) = memory_setup();
    let root = Path::new(ROOT);

    service(&fs, &runner).scaffold(root).unwrap();

    let manifest = PackageManifest::parse(&fs.read_file(&root.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest.get("type"), Some(&serde_json::json!("module")));
    assert_eq!(manifest.script("start"), Some(START_SCRIPT));
    assert_eq!(manifest.script("dev"), Some(DEV_SCRIPT));
    assert!(manifest.script("test").unwrap().contains("no test specified"));
    assert_eq!(manifest.get("license"), Some(&serde_json::json!("ISC")));
}

#[test]
fn lock_is_released_after_run() {
    let (fs, runner) = memory_setup();

    service(&fs, &runner).scaffold(Path::new(ROOT)).unwrap();

    assert!(fs.try_lock(&root_lock()).unwrap().is_some());
}

// ── guard and idempotence ────────────────────────────────────────────────────

#[test]
fn second_run_is_a_no_op() {
    let (fs, runner) = memory_setup();
    let root = Path::new(ROOT);
    let svc = service(&fs, &runner);

    svc.scaffold(root).unwrap();
    let writes = fs.write_count();
    let invocations = runner.invocations().len();

    let outcome = svc.scaffold(root).unwrap();

    assert!(matches!(outcome, ScaffoldOutcome::AlreadyScaffolded { .. }));
    assert_eq!(fs.write_count(), writes);
    assert_eq!(runner.invocations().len(), invocations);
}

#[test]
fn partial_workspace_creates_only_what_is_missing() {
    let (fs, runner) = memory_setup();
    let root = Path::new(ROOT);
    fs.create_dir_all(&root.join("src/config")).unwrap();
    fs.create_dir_all(&root.join("public/js")).unwrap();
    fs.write_file(&root.join("src/config/database.js"), "export default {};")
        .unwrap();
    for template in TEMPLATE_FILES {
        if fs.is_dir(&root.join(template.path).parent().unwrap()) {
            fs.write_file(&root.join(template.path), "// stale").unwrap();
        }
    }

    let outcome = service(&fs, &runner).scaffold(root).unwrap();

    let ScaffoldOutcome::Completed(report) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(report.created_directories.len(), 9);
    assert!(!report.created_directories.contains(&PathBuf::from("src/config")));
    assert!(!report.created_directories.contains(&PathBuf::from("public/js")));
    assert!(!report.created_files.contains(&PathBuf::from("src/config/database.js")));
    assert_eq!(
        fs.read_file(&root.join("src/config/database.js")).as_deref(),
        Some("export default {};")
    );
    assert_eq!(report.written_templates.len(), 5);
    for template in TEMPLATE_FILES {
        assert_eq!(
            fs.read_file(&root.join(template.path)).as_deref(),
            Some(template.content),
            "{} not overwritten",
            template.path
        );
    }
}

#[test]
fn partial_workspace_keeps_placeholders_and_overwrites_templates() {
    let (fs, runner) = memory_setup();
    let root = Path::new(ROOT);
    fs.create_dir_all(&root.join("src")).unwrap();
    fs.write_file(&root.join("README.md"), "# My API").unwrap();
    fs.write_file(&root.join("src/app.js"), "// hand written").unwrap();

    let outcome = service(&fs, &runner).scaffold(root).unwrap();

    let ScaffoldOutcome::Completed(report) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(fs.read_file(&root.join("README.md")).as_deref(), Some("# My API"));
    assert_eq!(fs.read_file(&root.join("src/app.js")).as_deref(), Some(templates::APP));
    assert!(!report.created_files.contains(&PathBuf::from("README.md")));
    assert!(!report.created_directories.contains(&PathBuf::from("src")));
}

#[test]
fn held_lock_rejects_run() {
    let (fs, runner) = memory_setup();
    let root = Path::new(ROOT);
    let _held = fs.try_lock(&root_lock()).unwrap().unwrap();

    let err = service(&fs, &runner).scaffold(root).unwrap_err();

    assert!(matches!(
        err,
        ExpressoError::Application(ApplicationError::ScaffoldInProgress { .. })
    ));
    assert!(runner.invocations().is_empty());
    assert!(!fs.is_dir(&root.join("src")));
}

// ── pipeline failures ────────────────────────────────────────────────────────

#[test]
fn init_failure_stops_after_one_process() {
    let (fs, runner) = memory_setup();
    let runner = runner.failing_at(Stage::Init);
    let root = Path::new(ROOT);

    let err = service(&fs, &runner).scaffold(root).unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Init));
    assert_eq!(runner.invocations().len(), 1);
    // Files written before the failure stay.
    assert_eq!(fs.read_file(&root.join("src/server.js")).as_deref(), Some(templates::SERVER));
    assert!(fs.try_lock(&root_lock()).unwrap().is_some());
}

#[test]
fn dev_install_failure_keeps_patched_manifest() {
    let (fs, runner) = memory_setup();
    let runner = runner.failing_at(Stage::InstallDev);
    let root = Path::new(ROOT);

    let err = service(&fs, &runner).scaffold(root).unwrap_err();

    assert_eq!(err.stage(), Some(Stage::InstallDev));
    assert_eq!(err.to_string().split(':').next(), Some("Error installing nodemon"));
    assert_eq!(runner.invocations().len(), 3);
    let manifest = PackageManifest::parse(&fs.read_file(&root.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest.script("dev"), Some(DEV_SCRIPT));
}

#[test]
fn custom_package_manager_is_used_for_every_stage() {
    let (fs, runner) = memory_setup();

    service(&fs, &runner)
        .with_package_manager("pnpm")
        .scaffold(Path::new(ROOT))
        .unwrap();

    assert!(runner.invocations().iter().all(|i| i.command.program == "pnpm"));
}

// ── real filesystem ──────────────────────────────────────────────────────────

#[test]
fn local_filesystem_scaffold() {
    let dir = TempDir::new().unwrap();
    let locks = TempDir::new().unwrap();
    let svc = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(ScriptedProcessRunner::new()),
    )
    .with_lock_dir(locks.path());
    // The scripted runner does not create package.json; seed it as npm would.
    std::fs::write(dir.path().join("package.json"), NPM_INIT_MANIFEST).unwrap();

    let root = svc.resolve_workspace(Some(dir.path().to_path_buf())).unwrap();
    svc.scaffold(&root).unwrap();

    for dir_name in DIRECTORIES {
        assert!(root.join(dir_name).is_dir());
    }
    assert_eq!(
        std::fs::read_to_string(root.join("src/routes/index.js")).unwrap(),
        templates::INDEX_ROUTES
    );
    assert_eq!(std::fs::read_to_string(root.join("src/models/User.js")).unwrap(), "");
    let lock = lock_path(locks.path(), &root);
    assert!(lock.is_file());
    assert!(LocalFilesystem::new().try_lock(&lock).unwrap().is_some());
    assert!(!root.join(".expresso.lock").exists());

    let manifest = std::fs::read_to_string(root.join("package.json")).unwrap();
    assert!(manifest.contains("\"type\": \"module\""));
}

#[test]
fn local_lock_blocks_a_concurrent_run_on_the_same_root() {
    let dir = TempDir::new().unwrap();
    let locks = TempDir::new().unwrap();
    let fs = LocalFilesystem::new();
    let root = fs.canonicalize(dir.path()).unwrap();
    let _held = fs.try_lock(&lock_path(locks.path(), &root)).unwrap().unwrap();
    let runner = ScriptedProcessRunner::new();

    let err = ScaffoldService::new(Box::new(fs), Box::new(runner.clone()))
        .with_lock_dir(locks.path())
        .scaffold(&root)
        .unwrap_err();

    assert!(matches!(
        err,
        ExpressoError::Application(ApplicationError::ScaffoldInProgress { .. })
    ));
    assert!(!root.join("src").exists());
    assert!(runner.invocations().is_empty());
}

#[test]
fn local_filesystem_missing_workspace() {
    let dir = TempDir::new().unwrap();
    let svc = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(ScriptedProcessRunner::new()),
    );

    let err = svc
        .resolve_workspace(Some(dir.path().join("does-not-exist")))
        .unwrap_err();

    assert!(err.to_string().starts_with("Please open a folder first"));
}
