use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use specbuild::core::pipeline::compile_root;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A tree of `n` roles, `n` guards referencing two roles each, and `n` docs.
fn spec_tree(n: usize) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for i in 0..n {
        write(
            tmp.path(),
            &format!("roles/role-{}.toml", i),
            &format!("[role]\nid = \"role-{}\"\nname = \"Role {}\"\n", i, i),
        );
        write(
            tmp.path(),
            &format!("guards/guard-{}.toml", i),
            &format!(
                "[guard]\nid = \"guard-{}\"\n[relations]\nroles = [\"role-{}\", \"role-{}\"]\n",
                i,
                i,
                (i + 7) % n
            ),
        );
        write(
            tmp.path(),
            &format!("docs/doc-{}.md", i),
            &format!("# Doc {}\n\nBody text.\n", i),
        );
    }
    tmp
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    group.measurement_time(Duration::from_secs(10));

    for size in [50usize, 500] {
        let tree = spec_tree(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let build = compile_root(tree.path(), "knowledge/project.toml").unwrap();
                black_box(build.summary().entities);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
