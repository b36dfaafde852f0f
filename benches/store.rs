// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nereid_uml::store::{DocumentFolder, PersistedModel};

mod fixtures;

use fixtures::TempDir;

// Benchmark identity (keep stable):
// - Group names in this file: `store.save`, `store.load`
// - Case ids come from `fixtures::CASES`.
fn benches_store(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("store.save");
        for (case_id, classes, attributes) in fixtures::CASES {
            let persisted = PersistedModel {
                model: fixtures::class_document(classes, attributes),
                last_update: "2026-01-01T00:00:00Z".to_owned(),
            };
            group.bench_function(case_id, move |b| {
                b.iter_batched_ref(
                    || TempDir::new("store_save"),
                    |tmp| {
                        let folder = DocumentFolder::new(tmp.path());
                        folder.save(black_box(&persisted)).expect("save");
                        black_box(std::fs::metadata(folder.model_path()).expect("metadata").len())
                    },
                    BatchSize::SmallInput,
                )
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("store.load");
        for (case_id, classes, attributes) in fixtures::CASES {
            let tmp = TempDir::new("store_load");
            let folder = DocumentFolder::new(tmp.path());
            folder
                .save(&PersistedModel {
                    model: fixtures::class_document(classes, attributes),
                    last_update: "2026-01-01T00:00:00Z".to_owned(),
                })
                .expect("seed");
            group.bench_function(case_id, move |b| {
                let _keep = &tmp;
                b.iter(|| black_box(folder.load().expect("load").model.elements().len()))
            });
        }
        group.finish();
    }
}

criterion_group!(benches, benches_store);
criterion_main!(benches);
