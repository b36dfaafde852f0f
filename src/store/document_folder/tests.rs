// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{DocumentFolder, PersistedModel, StoreError, WriteDurability};
use crate::model::fixtures::library_class_diagram;
use crate::model::DiagramType;
use crate::service::{DiagramUpdate, ModelStore};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("nereid-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct DocumentFolderTestCtx {
    _tmp: TempDir,
    model_dir: std::path::PathBuf,
    folder: DocumentFolder,
}

#[fixture]
fn ctx() -> DocumentFolderTestCtx {
    let tmp = TempDir::new("document-folder");
    let model_dir = tmp.path().join("my-model");
    let folder = DocumentFolder::new(&model_dir);
    DocumentFolderTestCtx {
        _tmp: tmp,
        model_dir,
        folder,
    }
}

fn persisted() -> PersistedModel {
    PersistedModel {
        model: library_class_diagram(),
        last_update: "2026-01-02T03:04:05Z".to_owned(),
    }
}

#[rstest]
fn save_creates_folder_and_round_trips(ctx: DocumentFolderTestCtx) {
    ctx.folder.save(&persisted()).expect("save");
    assert!(ctx.model_dir.join("model.json").is_file());

    let loaded = ctx.folder.load().expect("load");
    assert_eq!(loaded, persisted());
}

#[rstest]
fn saved_record_uses_editor_keys(ctx: DocumentFolderTestCtx) {
    ctx.folder.save(&persisted()).expect("save");
    let raw = std::fs::read_to_string(ctx.folder.model_path()).expect("read");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");

    assert_eq!(value["lastUpdate"], "2026-01-02T03:04:05Z");
    assert_eq!(value["model"]["type"], "ClassDiagram");
    assert!(value["model"]["elements"]["class-book"].is_object());
}

#[rstest]
fn save_leaves_no_temp_files(ctx: DocumentFolderTestCtx) {
    ctx.folder.save(&persisted()).expect("first save");
    ctx.folder.save(&persisted()).expect("overwrite");

    let names = std::fs::read_dir(&ctx.model_dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["model.json".to_owned()]);
}

#[cfg(unix)]
#[rstest]
#[case(WriteDurability::BestEffort)]
#[case(WriteDurability::Durable)]
fn failed_save_removes_its_temp_file(
    ctx: DocumentFolderTestCtx,
    #[case] durability: WriteDurability,
) {
    let blocker = ctx.folder.model_path();
    std::fs::create_dir_all(blocker.join("occupied")).expect("block model path");
    let folder = ctx.folder.clone().with_durability(durability);

    let err = folder.save(&persisted()).expect_err("model path is a directory");
    assert!(matches!(err, StoreError::Io { .. }));

    let names = std::fs::read_dir(&ctx.model_dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["model.json".to_owned()]);
}

#[rstest]
#[case(WriteDurability::BestEffort)]
#[case(WriteDurability::Durable)]
fn durability_modes_both_persist(ctx: DocumentFolderTestCtx, #[case] durability: WriteDurability) {
    let folder = ctx.folder.clone().with_durability(durability);
    assert_eq!(folder.durability(), durability);
    folder.save(&persisted()).expect("save");
    assert_eq!(folder.load().expect("load").model, library_class_diagram());
}

#[rstest]
fn load_or_init_starts_empty_without_a_model(ctx: DocumentFolderTestCtx) {
    let doc = ctx
        .folder
        .load_or_init(DiagramType::AgentDiagram)
        .expect("init");
    assert_eq!(doc.diagram_type(), DiagramType::AgentDiagram);
    assert!(doc.elements().is_empty());
}

#[rstest]
fn load_or_init_reports_corrupt_model(ctx: DocumentFolderTestCtx) {
    std::fs::create_dir_all(&ctx.model_dir).expect("mkdir");
    std::fs::write(ctx.folder.model_path(), "{ not json").expect("write");

    let err = ctx
        .folder
        .load_or_init(DiagramType::ClassDiagram)
        .expect_err("corrupt");
    assert!(matches!(err, StoreError::Json { .. }));
}

#[cfg(unix)]
#[rstest]
fn save_refuses_symlinked_model_file(ctx: DocumentFolderTestCtx) {
    std::fs::create_dir_all(&ctx.model_dir).expect("mkdir");
    let elsewhere = ctx.model_dir.join("elsewhere.json");
    std::fs::write(&elsewhere, "{}").expect("write");
    std::os::unix::fs::symlink(&elsewhere, ctx.folder.model_path()).expect("symlink");

    let err = ctx.folder.save(&persisted()).expect_err("symlink");
    assert!(matches!(err, StoreError::SymlinkRefused { .. }));
    assert_eq!(std::fs::read_to_string(&elsewhere).expect("read"), "{}");
}

#[rstest]
#[tokio::test]
async fn model_store_update_writes_the_record(ctx: DocumentFolderTestCtx) {
    let update = DiagramUpdate {
        model: library_class_diagram(),
        last_update: "2026-05-06T07:08:09Z".to_owned(),
    };
    ctx.folder.update_diagram(update).await.expect("update");

    let loaded = ctx.folder.load().expect("load");
    assert_eq!(loaded.last_update, "2026-05-06T07:08:09Z");
    assert_eq!(loaded.model, library_class_diagram());
}
