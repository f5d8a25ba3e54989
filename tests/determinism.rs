//! Compiling the same tree twice must produce byte-identical artifacts.

use specbuild::core::pipeline::compile_root;
use specbuild::core::writer;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "knowledge/project.toml",
        "[project]\nid = \"shop\"\nname = \"Shop\"\n",
    );
    for i in 0..24 {
        write(
            root,
            &format!("roles/role-{:02}.toml", i),
            &format!("[role]\nid = \"role-{:02}\"\nname = \"Role {}\"\n", i, i),
        );
        write(
            root,
            &format!("guards/nested/guard-{:02}.toml", i),
            &format!(
                "[guard]\nid = \"guard-{:02}\"\n[relations]\nroles = [\"role-{:02}\", \"role-{:02}\"]\nmissing = [\"ghost-{}\"]\n",
                i,
                i,
                (i + 1) % 24,
                i % 3
            ),
        );
        write(
            root,
            &format!("routes/route-{:02}.toml", i),
            &format!(
                "[route]\nid = \"route-{:02}\"\npath = \"/r/{}\"\ntitle = \"Route {}\"\nweight = {}.5\n[route.relations]\nguards = [\"guard-{:02}\"]\n",
                i, i, i, i, i
            ),
        );
        write(root, &format!("docs/page-{:02}.md", i), &format!("# Page {}\n\nText.\n", i));
    }
    write(root, "roles/broken.toml", "[role\nid = ");
    tmp
}

fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(base: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                let rel = path.strip_prefix(base).unwrap().to_path_buf();
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(dir, dir, &mut out);
    out
}

#[test]
fn repeated_builds_are_byte_identical() {
    let spec = fixture();
    let out_a = TempDir::new().unwrap();
    let out_b = TempDir::new().unwrap();

    let first = compile_root(spec.path(), "knowledge/project.toml").unwrap();
    writer::write_artifacts(&first, out_a.path()).unwrap();
    let second = compile_root(spec.path(), "knowledge/project.toml").unwrap();
    writer::write_artifacts(&second, out_b.path()).unwrap();

    let a = snapshot(out_a.path());
    let b = snapshot(out_b.path());
    assert_eq!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());
    for (path, bytes) in &a {
        assert!(bytes == &b[path], "artifact differs: {}", path.display());
    }
    assert_eq!(first.status.fingerprint, second.status.fingerprint);
    assert_eq!(first.warnings.len(), 24);
}

#[test]
fn rebuild_into_same_directory_replaces_everything() {
    let spec = fixture();
    let out = TempDir::new().unwrap();

    let build = compile_root(spec.path(), "knowledge/project.toml").unwrap();
    writer::write_artifacts(&build, out.path()).unwrap();
    let before = snapshot(out.path());

    fs::write(out.path().join("stale.json"), "{}").unwrap();
    let again = compile_root(spec.path(), "knowledge/project.toml").unwrap();
    writer::write_artifacts(&again, out.path()).unwrap();
    let after = snapshot(out.path());

    assert_eq!(before, after);
}
