// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use nereid_uml::config::LayoutConfig;
use nereid_uml::convert::converter_for;
use nereid_uml::model::{DiagramType, Document};
use nereid_uml::service::merge_system_into_model;

/// `(case id, classes, attributes per class)`. Case ids stay stable across refactors.
pub const CASES: [(&str, usize, usize); 3] = [("small", 8, 4), ("medium", 64, 8), ("large", 256, 12)];

/// A chain of classes, each associated with the next.
pub fn class_system_spec(classes: usize, attributes: usize) -> Value {
    let class_specs = (0..classes)
        .map(|index| {
            let attributes = (0..attributes)
                .map(|attr| json!({ "name": format!("field{attr}"), "type": "int" }))
                .collect::<Vec<_>>();
            json!({
                "className": format!("Class{index}"),
                "attributes": attributes,
                "methods": [{ "name": "run", "returnType": "void" }]
            })
        })
        .collect::<Vec<_>>();
    let relationships = (1..classes)
        .map(|index| {
            json!({
                "type": "Association",
                "sourceClass": format!("Class{}", index - 1),
                "targetClass": format!("Class{index}")
            })
        })
        .collect::<Vec<_>>();
    json!({ "classes": class_specs, "relationships": relationships })
}

pub fn class_document(classes: usize, attributes: usize) -> Document {
    let system = converter_for(DiagramType::ClassDiagram)
        .convert_complete_system(
            &class_system_spec(classes, attributes),
            &LayoutConfig::default(),
        )
        .expect("class system");
    merge_system_into_model(&Document::new(DiagramType::ClassDiagram), system)
}

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("nereid-bench-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
