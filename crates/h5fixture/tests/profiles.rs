//! Integration tests: write each profile and check the container contents.

use h5fixture::{AttrValue, DatasetData, Error, FixtureProfile, FixtureWriter};
use h5fixture_format::readback::FileView;

fn write(profile: FixtureProfile) -> (tempfile::TempDir, FileView) {
    let dir = tempfile::tempdir().unwrap();
    let path = profile.write_in(dir.path()).unwrap();
    assert!(path.exists());
    let view = FileView::open(&path).unwrap();
    (dir, view)
}

fn range(r: std::ops::Range<i64>) -> Vec<i64> {
    r.collect()
}

#[test]
fn single_dataset() {
    let (_dir, view) = write(FixtureProfile::SingleDataset);
    assert!(view.root.attrs.is_empty());
    assert!(view.root.groups.is_empty());
    let ds = view.dataset("dataset").unwrap();
    assert_eq!(ds.shape, vec![100]);
    let expected: Vec<f64> = (0..100).map(f64::from).collect();
    assert_eq!(ds.read_f64().unwrap(), expected);
}

#[test]
fn root_attribute() {
    let (_dir, view) = write(FixtureProfile::RootAttribute);
    assert_eq!(view.root.attrs.len(), 1);
    assert_eq!(
        view.root.attrs["test_attr1"],
        AttrValue::String("this_is_a_test_attr".into())
    );
    assert_eq!(view.root.datasets.len(), 1);
    assert_eq!(view.dataset("test_dataset").unwrap().read_i64().unwrap(), range(0..100));
}

#[test]
fn two_datasets() {
    let (_dir, view) = write(FixtureProfile::TwoDatasets);
    let ds2 = view.dataset("test_dataset2").unwrap();
    assert_eq!(ds2.len(), 98);
    assert_eq!(ds2.read_i64().unwrap(), range(2..100));
    assert!(view.root.groups.is_empty());
}

#[test]
fn nested() {
    let (_dir, view) = write(FixtureProfile::Nested);
    assert_eq!(
        view.root.datasets.keys().map(String::as_str).collect::<Vec<_>>(),
        ["test_dataset", "test_dataset2"]
    );
    let group = view.group("test_group").unwrap();
    assert_eq!(group.datasets.keys().map(String::as_str).collect::<Vec<_>>(), ["tg_dataset"]);
    assert!(group.attrs.is_empty());
    assert_eq!(view.dataset("test_group/tg_dataset").unwrap().read_i64().unwrap(), range(0..10));

    let ds = view.dataset("test_dataset").unwrap();
    assert_eq!(ds.attrs["test"], AttrValue::Bytes(b"dataset_attr".to_vec()));
    assert!(view.dataset("test_dataset2").unwrap().attrs.is_empty());
}

#[test]
fn scalar_attributes() {
    let (_dir, view) = write(FixtureProfile::ScalarAttributes);
    assert!(view.root.datasets.is_empty());
    assert_eq!(view.root.attrs["i32_attribute"], AttrValue::I32(12345));
    assert_eq!(view.root.attrs["i64_attribute"], AttrValue::I64(12345));
    assert_eq!(view.root.attrs["f32_attribute"], AttrValue::F32(1.2345));
    assert_eq!(view.root.attrs["f64_attribute"], AttrValue::F64(1.2345));
}

#[test]
fn rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    for profile in FixtureProfile::ALL {
        let path = profile.write_in(dir.path()).unwrap();
        let first = std::fs::read(&path).unwrap();
        profile.write_in(dir.path()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), first, "{profile}");
    }
}

#[test]
fn overwrite_truncates_larger_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.hdf5");
    std::fs::write(&path, vec![0x5Au8; 64 * 1024]).unwrap();
    FixtureProfile::SingleDataset.write_to(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let view = FileView::parse(&bytes).unwrap();
    assert_eq!(view.superblock.eof_address, bytes.len() as u64);
    assert!(bytes.len() < 64 * 1024);
}

#[test]
fn dataset_attr_before_dataset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut w = FixtureWriter::create(dir.path().join("order.h5")).unwrap();
    let err = w.set_dataset_attr("test_dataset", "test", "x").unwrap_err();
    assert!(matches!(err, Error::DatasetNotFound(ref p) if p == "test_dataset"));
    w.close().unwrap();
}

#[test]
fn group_dataset_before_group_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut w = FixtureWriter::create(dir.path().join("order.h5")).unwrap();
    let err = w
        .create_dataset("test_group/tg_dataset", DatasetData::I64(vec![1]))
        .unwrap_err();
    assert!(matches!(err, Error::GroupNotFound(ref g) if g == "test_group"));

    w.create_group("test_group").unwrap();
    w.create_dataset("test_group/tg_dataset", DatasetData::I64(vec![1])).unwrap();
    w.close().unwrap();
}

#[test]
fn duplicate_names_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut w = FixtureWriter::create(dir.path().join("dup.h5")).unwrap();
    w.create_dataset("a", vec![1.0]).unwrap();
    assert!(matches!(w.create_dataset("a", vec![2i64]), Err(Error::DuplicateName(_))));
    assert!(matches!(w.create_group("a"), Err(Error::DuplicateName(_))));
    w.create_group("g").unwrap();
    assert!(matches!(w.create_group("g"), Err(Error::DuplicateName(_))));
    w.create_dataset("g/a", vec![1i64]).unwrap();
    assert!(matches!(w.create_dataset("g/a", vec![1i64]), Err(Error::DuplicateName(_))));
    assert!(matches!(w.create_dataset("g/h/a", vec![1i64]), Err(Error::InvalidPath(_))));
    w.close().unwrap();
}

#[test]
fn attributes_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attrs.h5");
    let mut w = FixtureWriter::create(&path).unwrap();
    w.set_root_attr("note", "first").unwrap();
    w.set_root_attr("note", "second").unwrap();
    w.create_group("g").unwrap();
    w.set_group_attr("g", "level", 1i64).unwrap();
    w.set_group_attr("g", "level", 2i64).unwrap();
    w.create_dataset("g/d", vec![0.25]).unwrap();
    w.set_dataset_attr("g/d", "unit", "m").unwrap();
    w.close().unwrap();

    let view = FileView::open(&path).unwrap();
    assert_eq!(view.root.attrs["note"], AttrValue::String("second".into()));
    assert_eq!(view.group("g").unwrap().attrs["level"], AttrValue::I64(2));
    assert_eq!(view.dataset("g/d").unwrap().attrs["unit"], AttrValue::String("m".into()));
}

#[test]
fn group_attr_on_missing_group() {
    let dir = tempfile::tempdir().unwrap();
    let mut w = FixtureWriter::create(dir.path().join("g.h5")).unwrap();
    assert!(matches!(w.set_group_attr("nope", "a", 1i32), Err(Error::GroupNotFound(_))));
    w.close().unwrap();
}

#[test]
fn unwritable_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing_dir").join("test.hdf5");
    assert!(matches!(FixtureWriter::create(&path), Err(Error::Io(_))));
    assert!(matches!(FixtureProfile::Nested.write_to(&path), Err(Error::Io(_))));
}

#[test]
fn drop_without_close_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.h5");
    {
        let mut w = FixtureWriter::create(&path).unwrap();
        FixtureProfile::Nested.populate(&mut w).unwrap();
    }
    let explicit = FixtureProfile::Nested.write_in(dir.path()).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), std::fs::read(explicit).unwrap());
}

// ---- h5py interop (ignored by default; needs python3 + h5py) ----

fn h5py_dump(path: &std::path::Path) -> serde_json::Value {
    let script = format!(
        r#"
import h5py, json
def val(v):
    if isinstance(v, bytes):
        return v.decode()
    if hasattr(v, 'tolist'):
        return v.tolist()
    return v
def walk(g):
    out = {{'attrs': {{k: val(v) for k, v in g.attrs.items()}}, 'datasets': {{}}, 'groups': {{}}}}
    for k, v in g.items():
        if isinstance(v, h5py.Dataset):
            out['datasets'][k] = {{'dtype': str(v.dtype), 'data': v[:].tolist(),
                                   'attrs': {{a: val(x) for a, x in v.attrs.items()}}}}
        else:
            out['groups'][k] = walk(v)
    return out
print(json.dumps(walk(h5py.File({:?}, 'r'))))
"#,
        path.display().to_string()
    );
    let o = std::process::Command::new("python3")
        .args(["-c", &script])
        .output()
        .expect("python3");
    if !o.status.success() {
        panic!("h5py failed: {}", String::from_utf8_lossy(&o.stderr));
    }
    serde_json::from_slice(&o.stdout).unwrap()
}

#[test]
#[ignore = "requires python3 + h5py"]
fn h5py_reads_nested_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = FixtureProfile::Nested.write_in(dir.path()).unwrap();
    let v = h5py_dump(&path);
    assert_eq!(v["attrs"]["test_attr1"], "this_is_a_test_attr");
    assert_eq!(v["datasets"]["test_dataset"]["dtype"], "int64");
    assert_eq!(v["datasets"]["test_dataset"]["data"], serde_json::json!(range(0..100)));
    assert_eq!(v["datasets"]["test_dataset"]["attrs"]["test"], "dataset_attr");
    assert_eq!(v["datasets"]["test_dataset2"]["data"], serde_json::json!(range(2..100)));
    assert_eq!(
        v["groups"]["test_group"]["datasets"]["tg_dataset"]["data"],
        serde_json::json!(range(0..10))
    );
    assert_eq!(v["groups"]["test_group"]["datasets"].as_object().unwrap().len(), 1);
}

#[test]
#[ignore = "requires python3 + h5py"]
fn h5py_reads_scalar_attributes_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = FixtureProfile::ScalarAttributes.write_in(dir.path()).unwrap();
    let v = h5py_dump(&path);
    assert_eq!(v["attrs"]["i32_attribute"], 12345);
    assert_eq!(v["attrs"]["i64_attribute"], 12345);
    assert!((v["attrs"]["f32_attribute"].as_f64().unwrap() - 1.2345).abs() < 1e-6);
    assert_eq!(v["attrs"]["f64_attribute"], 1.2345);
}

#[test]
#[ignore = "requires python3 + h5py"]
fn h5py_reads_single_dataset_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = FixtureProfile::SingleDataset.write_in(dir.path()).unwrap();
    let v = h5py_dump(&path);
    assert_eq!(v["datasets"]["dataset"]["dtype"], "float64");
    assert_eq!(v["datasets"]["dataset"]["data"][42], 42.0);
}
